//! The dice-throwing mini-game
//!
//! Owns the dice, advances them once per tick, resolves die-die contacts
//! and pays out once every die has come to rest.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::die::Die;
use crate::config::{Config, DiceTuning, RewardTable};
use crate::island::Bonus;

/// Current phase of the throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrowPhase {
    /// Dice are held; steering previews faces
    Selecting,
    /// Dice are tumbling
    Rolling,
    /// Every die is locked and the payout is known
    Settled,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct DiceInput {
    /// Held steering direction (each axis in -1..=1)
    pub steer: Vec2,
    /// Release the dice
    pub throw: bool,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum DiceEvent {
    Thrown,
    WallHit { die: u32 },
    DiceHit { a: u32, b: u32 },
    Locked { die: u32, face: u8 },
    Pair { face: u8, dice: (u32, u32) },
    Finished { reward: Bonus },
}

/// Payout for a set of resting faces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    pub reward: Bonus,
    /// Index pairs (into the face list) of matched faces
    pub pairs: Vec<(usize, usize)>,
}

/// Tally face rewards and pair bonuses. Matching faces pair up greedily in
/// order; each die is used in at most one pair.
pub fn score_faces(faces: &[u8], rewards: &RewardTable) -> Score {
    let mut score = Score::default();
    let mut used = vec![false; faces.len()];

    for (i, &face) in faces.iter().enumerate() {
        score.reward += rewards.face(face);
        if used[i] {
            continue;
        }
        if let Some(j) = (i + 1..faces.len()).find(|&j| !used[j] && faces[j] == face) {
            used[i] = true;
            used[j] = true;
            score.pairs.push((i, j));
            score.reward += rewards.pair;
        }
    }
    score
}

/// RNG seed wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// The mini-game state
pub struct DiceThrowing {
    pub dice: Vec<Die>,
    pub phase: ThrowPhase,
    pub rng_state: RngState,
    rng: Pcg32,
    tuning: DiceTuning,
    rewards: RewardTable,
    /// Ticks since the throw
    pub time_ticks: u64,
    score: Option<Score>,
}

impl DiceThrowing {
    /// Line `count` dice up along the middle of the box, ready to be aimed
    pub fn new(config: &Config, count: usize, seed: u64) -> Self {
        let tuning = config.dice.clone();
        let spacing = tuning.arena_width / (count as f32 + 1.0);
        let dice = (0..count)
            .map(|i| {
                let pos = Vec3::new(
                    spacing * (i as f32 + 1.0),
                    tuning.arena_height / 2.0,
                    0.0,
                );
                let mut die = Die::new(i as u32 + 1, pos, tuning.die_size);
                die.pos.z = die.radius;
                die.refresh_face();
                die
            })
            .collect();

        let rng_state = RngState { seed };
        log::info!("Dice throw set up: {} dice, seed {}", count, seed);
        Self {
            dice,
            phase: ThrowPhase::Selecting,
            rng: rng_state.to_rng(),
            rng_state,
            tuning,
            rewards: config.rewards.clone(),
            time_ticks: 0,
            score: None,
        }
    }

    pub fn tuning(&self) -> &DiceTuning {
        &self.tuning
    }

    /// True once every die is locked
    pub fn all_locked(&self) -> bool {
        self.dice.iter().all(|d| d.locked)
    }

    /// Payout, once settled
    pub fn score(&self) -> Option<&Score> {
        self.score.as_ref()
    }

    /// Release every die with a random position, velocity and spin
    pub fn throw(&mut self) {
        for die in &mut self.dice {
            die.throw(&self.tuning, &mut self.rng);
        }
        self.phase = ThrowPhase::Rolling;
        self.time_ticks = 0;
    }

    /// Advance the mini-game by one tick
    pub fn tick(&mut self, input: &DiceInput, dt: f32) -> Vec<DiceEvent> {
        let mut events = Vec::new();
        match self.phase {
            ThrowPhase::Selecting => {
                for die in &mut self.dice {
                    die.steer(input.steer, &self.tuning, dt);
                    die.refresh_face();
                }
                if input.throw {
                    self.throw();
                    events.push(DiceEvent::Thrown);
                }
            }
            ThrowPhase::Rolling => {
                self.time_ticks += 1;
                for die in &mut self.dice {
                    let outcome = die.tick(&self.tuning, dt, Vec2::ZERO);
                    if outcome.bounced {
                        events.push(DiceEvent::WallHit { die: die.id });
                    }
                    if outcome.locked {
                        events.push(DiceEvent::Locked {
                            die: die.id,
                            face: die.face.unwrap_or_default(),
                        });
                    }
                }
                self.collide_pairs(&mut events);

                if self.all_locked() {
                    self.settle(&mut events);
                }
            }
            ThrowPhase::Settled => {}
        }
        events
    }

    /// Sweep every pair once; overlapping dice bounce off the plane halfway
    /// between them and get kicked apart, without being shoved out of the box
    fn collide_pairs(&mut self, events: &mut Vec<DiceEvent>) {
        let kick = self.tuning.collision_kick;
        for i in 0..self.dice.len() {
            for j in i + 1..self.dice.len() {
                let (head, tail) = self.dice.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];

                let sep = a.pos - b.pos;
                let reach = a.radius + b.radius;
                if sep.length_squared() > reach * reach {
                    continue;
                }
                let Some(dir) = sep.try_normalize() else {
                    continue;
                };
                let half = sep.length() / 2.0;

                let hit_a = a.bounce(half, dir, &self.tuning);
                let hit_b = b.bounce(half, -dir, &self.tuning);
                if hit_a {
                    a.vel += dir * kick;
                    a.confine(&self.tuning);
                }
                if hit_b {
                    b.vel -= dir * kick;
                    b.confine(&self.tuning);
                }
                if hit_a || hit_b {
                    log::debug!("Dice {} and {} collided", a.id, b.id);
                    events.push(DiceEvent::DiceHit { a: a.id, b: b.id });
                }
            }
        }
    }

    fn settle(&mut self, events: &mut Vec<DiceEvent>) {
        let faces: Vec<u8> = self
            .dice
            .iter()
            .map(|d| d.face.unwrap_or_default())
            .collect();
        let score = score_faces(&faces, &self.rewards);
        for &(i, j) in &score.pairs {
            events.push(DiceEvent::Pair {
                face: faces[i],
                dice: (self.dice[i].id, self.dice[j].id),
            });
        }
        log::info!(
            "Dice settled after {} ticks: faces {:?}, {} pair(s), reward {:?}",
            self.time_ticks,
            faces,
            score.pairs.len(),
            score.reward
        );
        events.push(DiceEvent::Finished {
            reward: score.reward,
        });
        self.score = Some(score);
        self.phase = ThrowPhase::Settled;
    }
}
