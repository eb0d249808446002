//! Pipe Bloom headless driver
//!
//! Plays a few rounds against a stand-in peg board and prints each round's
//! breakdown as JSON.
//!
//! Usage: `pipe-bloom [seed] [rounds] [tuning.json]`

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use serde::Serialize;

use pipe_bloom::consts::FRAME_DT;
use pipe_bloom::run::Reward;
use pipe_bloom::{
    Breakdown, Peg, PegTag, Phase, PipeStats, PipeSystem, RunState, Tuning, resolve_peg_hit,
};

/// Pegs on the stand-in board
const BOARD_PEGS: u32 = 48;
/// Frames a dropped ball spends bouncing
const DROP_FRAMES: u32 = 180;
/// Chance per frame that the ball hits a peg
const HIT_CHANCE: f64 = 0.06;
/// Upper bound on frames spent in showcase/compression
const MAX_PHASE_FRAMES: u32 = 60 * 30;

#[derive(Debug, Serialize)]
struct RoundSummary {
    round: u32,
    hits: u32,
    stats: PipeStats,
    breakdown: Option<Breakdown>,
    reward: Option<Reward>,
    coins: u64,
    score: u64,
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1337);
    let rounds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    let tuning = args.next().map(Tuning::load_or_default).unwrap_or_default();

    log::info!("Pipe Bloom (headless) seed {seed}, {rounds} rounds");

    let mut run = RunState::new(seed);
    let mut system = PipeSystem::new(seed, tuning);

    for _ in 0..rounds {
        let summary = play_round(&mut run, &mut system);
        match serde_json::to_string(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Cannot serialize round {}: {e}", summary.round),
        }
        run.advance_round();
    }
}

/// Stand-in for the physics board: tags drawn from the round's board stream
fn build_board(run: &RunState) -> Vec<Peg> {
    let mut rng = run.board_rng().to_rng();
    (0..BOARD_PEGS)
        .map(|id| {
            let tag_count = match rng.random_range(0..10) {
                0..=4 => 0,
                5..=8 => 1,
                _ => 2,
            };
            let tags = (0..tag_count)
                .map(|_| PegTag::ALL[rng.random_range(0..PegTag::ALL.len())])
                .collect();
            Peg::new(id, tags)
        })
        .collect()
}

fn play_round(run: &mut RunState, system: &mut PipeSystem) -> RoundSummary {
    system.reset_system(run.round);
    let board = build_board(run);
    // Ball trajectories are not part of the determinism contract
    let mut bounce = rand::rng();
    let mut hits = 0;

    for _ in 0..run.drops_for_round() {
        for _ in 0..DROP_FRAMES {
            if bounce.random_bool(HIT_CHANCE) {
                let peg = &board[bounce.random_range(0..board.len())];
                let hit = resolve_peg_hit(peg, &run.modifiers);
                log::debug!("Peg {} hit: {}", peg.id, hit.labels.join(", "));
                run.apply_peg_hit(&hit);
                system.apply_effects(&hit.effects, &run.modifiers);
                hits += 1;
            }
            system.tick(FRAME_DT, &run.modifiers);
        }
    }

    let stats = system.stats();
    let captured: Rc<RefCell<Option<Breakdown>>> = Rc::default();
    let sink = Rc::clone(&captured);
    system.start_showcase(move |breakdown| *sink.borrow_mut() = Some(breakdown.clone()));
    run_phase(system, run, Phase::Showcase);

    system.start_compression(|| log::debug!("Structure collapsed"));
    run_phase(system, run, Phase::Compression);

    let breakdown = captured.borrow_mut().take();
    let reward = breakdown.as_ref().map(|b| run.apply_breakdown(b));

    RoundSummary {
        round: run.round,
        hits,
        stats,
        breakdown,
        reward,
        coins: run.coins,
        score: run.score,
    }
}

fn run_phase(system: &mut PipeSystem, run: &RunState, phase: Phase) {
    for _ in 0..MAX_PHASE_FRAMES {
        if system.phase() != phase {
            return;
        }
        system.tick(FRAME_DT, &run.modifiers);
    }
    log::warn!("{phase:?} did not finish within {MAX_PHASE_FRAMES} frames");
}
