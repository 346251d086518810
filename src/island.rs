//! Island resource economy
//!
//! Mini-games pay out `Bonus` bundles; the hub keeps an `Inventory` of
//! counters plus every collected thing record.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::sched::{Step, Task, Wait};

/// A bundle of resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Bonus {
    pub food: u32,
    pub magic: u32,
    pub cube: u32,
    pub thing: u32,
}

impl Bonus {
    pub const fn food(n: u32) -> Self {
        Self {
            food: n,
            magic: 0,
            cube: 0,
            thing: 0,
        }
    }

    pub const fn magic(n: u32) -> Self {
        Self {
            food: 0,
            magic: n,
            cube: 0,
            thing: 0,
        }
    }

    pub const fn cube(n: u32) -> Self {
        Self {
            food: 0,
            magic: 0,
            cube: n,
            thing: 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.food + self.magic + self.cube + self.thing
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-zero entries in display order
    pub fn entries(&self) -> impl Iterator<Item = (Resource, u32)> {
        [
            (Resource::Food, self.food),
            (Resource::Magic, self.magic),
            (Resource::Cube, self.cube),
            (Resource::Thing, self.thing),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
    }
}

impl Add for Bonus {
    type Output = Bonus;

    fn add(self, rhs: Bonus) -> Bonus {
        Bonus {
            food: self.food + rhs.food,
            magic: self.magic + rhs.magic,
            cube: self.cube + rhs.cube,
            thing: self.thing + rhs.thing,
        }
    }
}

impl AddAssign for Bonus {
    fn add_assign(&mut self, rhs: Bonus) {
        *self = *self + rhs;
    }
}

/// Resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    Food,
    Magic,
    Cube,
    Thing,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Food => "food",
            Resource::Magic => "magic",
            Resource::Cube => "cube",
            Resource::Thing => "thing",
        }
    }
}

/// Player holdings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub food: u32,
    pub magic: u32,
    pub cube: u32,
    /// Collected thing records, oldest first
    pub things: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Food => self.food,
            Resource::Magic => self.magic,
            Resource::Cube => self.cube,
            Resource::Thing => self.things.len() as u32,
        }
    }

    /// Add one unit of a counter resource (things are added via `collect`)
    pub fn add_one(&mut self, resource: Resource) {
        match resource {
            Resource::Food => self.food += 1,
            Resource::Magic => self.magic += 1,
            Resource::Cube => self.cube += 1,
            Resource::Thing => {}
        }
    }

    /// Add a whole bonus at once. Only the counters are paid: a `thing`
    /// count has no record behind it and is dropped. Use `collect` for things.
    pub fn give(&mut self, bonus: Bonus) {
        if bonus.thing > 0 {
            log::warn!("Ignoring {} thing(s) given without a record", bonus.thing);
        }
        self.food += bonus.food;
        self.magic += bonus.magic;
        self.cube += bonus.cube;
    }

    /// Store a finished thing record
    pub fn collect(&mut self, record: impl Into<String>) {
        let record = record.into();
        log::info!("Collected thing {}", record);
        self.things.push(record);
    }

    pub fn can_afford(&self, cost: &Bonus) -> bool {
        self.food >= cost.food
            && self.magic >= cost.magic
            && self.cube >= cost.cube
            && self.things.len() as u32 >= cost.thing
    }

    /// Pay a cost; things are consumed oldest first. Returns false (and
    /// changes nothing) if the cost cannot be covered.
    pub fn spend(&mut self, cost: &Bonus) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.food -= cost.food;
        self.magic -= cost.magic;
        self.cube -= cost.cube;
        self.things.drain(..cost.thing as usize);
        true
    }
}

/// Seconds between individual units of a staged hand-out
const GIVE_INTERVAL: f32 = 0.1;

/// Hands a bonus to the inventory one unit at a time, row by row, the way
/// the HUD counters tick up after an activity.
pub struct GiveTask {
    pending: Vec<(Resource, u32)>,
    delay: f32,
    started: bool,
}

impl GiveTask {
    /// Thing counts are skipped: things arrive as records via `collect`
    pub fn new(bonus: Bonus, delay: f32) -> Self {
        Self {
            pending: bonus
                .entries()
                .filter(|(r, _)| *r != Resource::Thing)
                .collect(),
            delay,
            started: false,
        }
    }
}

impl Task<Inventory> for GiveTask {
    fn resume(&mut self, inv: &mut Inventory) -> Step {
        if !self.started {
            self.started = true;
            if self.delay > 0.0 {
                return Step::Wait(Wait::Sleep(self.delay));
            }
        }
        let Some((resource, left)) = self.pending.first_mut() else {
            return Step::Done;
        };
        inv.add_one(*resource);
        *left -= 1;
        if *left == 0 {
            self.pending.remove(0);
        }
        if self.pending.is_empty() {
            Step::Done
        } else {
            Step::Wait(Wait::Sleep(GIVE_INTERVAL))
        }
    }

    /// Whatever is still pending is paid out at once
    fn cancel(&mut self, inv: &mut Inventory) {
        for (resource, left) in self.pending.drain(..) {
            for _ in 0..left {
                inv.add_one(resource);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::Scheduler;

    #[test]
    fn test_bonus_add() {
        let b = Bonus::food(2) + Bonus::magic(1) + Bonus::food(1);
        assert_eq!(b.food, 3);
        assert_eq!(b.magic, 1);
        assert_eq!(b.total(), 4);
        assert!(Bonus::default().is_empty());
    }

    #[test]
    fn test_spend() {
        let mut inv = Inventory::new();
        inv.give(Bonus::food(3) + Bonus::cube(1));
        inv.collect("O000-O0000000000000000000-I");

        let cost = Bonus {
            food: 2,
            thing: 1,
            ..Default::default()
        };
        assert!(inv.spend(&cost));
        assert_eq!(inv.food, 1);
        assert!(inv.things.is_empty());

        // Cannot afford: nothing changes
        assert!(!inv.spend(&Bonus::food(5)));
        assert_eq!(inv.food, 1);
        assert_eq!(inv.cube, 1);
    }

    #[test]
    fn test_give_ignores_thing_count() {
        let mut inv = Inventory::new();
        inv.give(Bonus {
            food: 1,
            thing: 2,
            ..Default::default()
        });
        assert_eq!(inv.food, 1);
        assert!(inv.things.is_empty());
        assert_eq!(inv.count(Resource::Thing), 0);
    }

    #[test]
    fn test_give_task_staggers_units() {
        let mut sched = Scheduler::new();
        let mut inv = Inventory::new();
        sched.spawn(GiveTask::new(Bonus::food(2) + Bonus::magic(1), 0.0));

        sched.tick(&mut inv, 0.05);
        assert_eq!(inv.food, 1);
        sched.tick(&mut inv, 0.05);
        assert_eq!(inv.food, 1);
        sched.tick(&mut inv, 0.05);
        assert_eq!(inv.food, 2);
        assert_eq!(inv.magic, 0);

        for _ in 0..4 {
            sched.tick(&mut inv, 0.05);
        }
        assert_eq!(inv.magic, 1);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_give_task_cancel_pays_remaining() {
        let mut sched = Scheduler::new();
        let mut inv = Inventory::new();
        let id = sched.spawn(GiveTask::new(Bonus::cube(5), 1.0));
        sched.tick(&mut inv, 0.1);
        assert_eq!(inv.cube, 0);
        sched.cancel(id);
        sched.tick(&mut inv, 0.1);
        assert_eq!(inv.cube, 5);
    }
}
