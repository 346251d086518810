//! Cast Away! headless demo
//!
//! Plays one dice throw and one burrowing puzzle with a fixed seed, then
//! saves the island inventory. Rendering and input belong to the embedding
//! frontend; here the per-frame loop just logs what would be drawn.

use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use castaway::burrow::{BurrowPhase, Burrowing, DECK_COUNT, SymbolTable};
use castaway::consts::{MAX_SUBSTEPS, SIM_DT};
use castaway::dice::{DiceEvent, DiceInput, DiceThrowing, ThrowPhase};
use castaway::island::GiveTask;
use castaway::persistence::{JsonFileStore, load_inventory, save_inventory};
use castaway::render::die_instances;
use castaway::sched::Scheduler;
use castaway::{Config, Inventory};

const CONFIG_PATH: &str = "castaway.json";
const SAVE_PATH: &str = "castaway-save.json";

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 30.0;
/// Give up on a throw that has not settled after this many frames
const MAX_FRAMES: u32 = 30 * 60;
/// Frames spent aiming before the throw
const AIM_FRAMES: u32 = 20;
const DICE_COUNT: usize = 3;
/// Cards drawn before pressing "Go"
const MAX_CARDS: usize = 8;

/// Fixed-timestep frame driver
struct Frame {
    accumulator: f32,
}

impl Frame {
    /// Number of simulation ticks to run for a frame of length `dt`
    fn substeps(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        steps
    }
}

fn play_dice(config: &Config, seed: u64, inventory: &mut Inventory) {
    let mut throwing = DiceThrowing::new(config, DICE_COUNT, seed);
    let mut scheduler: Scheduler<Inventory> = Scheduler::new();
    let mut frame = Frame { accumulator: 0.0 };

    for n in 0..MAX_FRAMES {
        let input = DiceInput {
            steer: if n < AIM_FRAMES { Vec2::new(1.0, 0.0) } else { Vec2::ZERO },
            throw: n == AIM_FRAMES,
        };
        for _ in 0..frame.substeps(FRAME_DT) {
            for event in throwing.tick(&input, SIM_DT) {
                match event {
                    DiceEvent::WallHit { .. } | DiceEvent::DiceHit { .. } => {
                        log::trace!("{:?}", event)
                    }
                    DiceEvent::Finished { reward } => {
                        log::info!("Throw finished, reward {:?}", reward);
                        scheduler.spawn(GiveTask::new(reward, 0.5));
                    }
                    _ => log::info!("{:?}", event),
                }
            }
        }
        scheduler.tick(inventory, FRAME_DT);

        let instances = die_instances(&throwing.dice);
        log::trace!("Frame {}: {} die instances", n, instances.len());

        if throwing.phase == ThrowPhase::Settled && scheduler.is_empty() {
            return;
        }
    }
    log::warn!("Dice did not settle within {} frames", MAX_FRAMES);
}

fn play_burrow(seed: u64, inventory: &mut Inventory) {
    let symbols = SymbolTable::shipped();
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut burrowing = Burrowing::shuffled(&mut rng);

    while burrowing.phase() == BurrowPhase::Selecting && burrowing.selected().len() < MAX_CARDS {
        let deck = rng.random_range(0..DECK_COUNT);
        if let Some(step) = burrowing.choose(deck) {
            log::info!("Played {:?}: worm at {} facing {}", step.card, step.pos, step.heading);
        }
    }
    burrowing.go();

    if let Some(thing) = burrowing.finish(&symbols, &mut rng) {
        println!("{}", thing.message);
        inventory.collect(thing.record.to_string());
    }
}

fn main() {
    env_logger::init();
    log::info!("Cast Away! (headless) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    log::info!("Using seed: {}", seed);

    let config = Config::load_or_default(Path::new(CONFIG_PATH));
    let mut store = match JsonFileStore::open(SAVE_PATH) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot open save {}: {}", SAVE_PATH, e);
            return;
        }
    };
    let mut inventory = load_inventory(&mut store);

    play_dice(&config, seed, &mut inventory);
    play_burrow(seed, &mut inventory);

    println!(
        "Food {}, magic {}, cube {}, things {}",
        inventory.food,
        inventory.magic,
        inventory.cube,
        inventory.things.len()
    );
    match save_inventory(&mut store, &inventory) {
        Ok(()) => log::info!("Game saved to {}", store.path().display()),
        Err(e) => log::warn!("Save failed: {}", e),
    }
}
