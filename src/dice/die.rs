//! A single rigid die
//!
//! Position is in scene units with z as height above the floor. Velocity is
//! a per-tick displacement; gravity and damping are applied per second.
//! The spin quaternion is a rotation per second, applied each tick as
//! `spin^dt`.
//!
//! For contact with the box the die is a sphere of `radius`: its centre is
//! never left closer than that to a wall or the floor. The cube shape only
//! decides whether a contact bounces (a corner reaches the plane) and how
//! it spins the die.

use glam::{Quat, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Plane, box_planes, quat_pow, reflect, support};
use crate::config::DiceTuning;
use crate::rotation_angle;

/// Face number for each candidate "up" axis, in the order
/// +x, +y, +z, -x, -y, -z of the die's local frame. The die carries five
/// distinct faces; the blank face is printed twice, on opposite sides.
pub const FACE_NUMBERS: [u8; 6] = [1, 2, 4, 3, 0, 4];

/// What happened to a die during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Bounced off a wall or the floor
    pub bounced: bool,
    /// Came to rest this tick
    pub locked: bool,
}

/// A simulated cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Die {
    pub id: u32,
    pub pos: Vec3,
    pub rotation: Quat,
    /// Displacement per tick
    pub vel: Vec3,
    /// Rotation per second
    pub spin: Quat,
    /// Half edge length
    pub size: f32,
    /// Bounding sphere radius (`size * √3`)
    pub radius: f32,
    pub locked: bool,
    /// Face number pointing up, once known
    pub face: Option<u8>,
}

impl Die {
    /// A die at rest at `pos` in the canonical pose
    pub fn new(id: u32, pos: Vec3, size: f32) -> Self {
        Self {
            id,
            pos,
            rotation: Quat::IDENTITY,
            vel: Vec3::ZERO,
            spin: Quat::IDENTITY,
            size,
            radius: size * 3.0_f32.sqrt(),
            locked: false,
            face: None,
        }
    }

    /// Launch the die: random spot in the box, random drop height, random
    /// horizontal velocity and random spin
    pub fn throw(&mut self, tuning: &DiceTuning, rng: &mut impl Rng) {
        let margin = self.radius;
        let (lo, hi) = tuning.drop_height;
        self.pos = Vec3::new(
            rng.random_range(margin..(tuning.arena_width - margin).max(margin + 1.0)),
            rng.random_range(margin..(tuning.arena_height - margin).max(margin + 1.0)),
            self.radius + rng.random_range(lo..hi.max(lo + 0.001)),
        );
        let speed = tuning.throw_speed;
        self.vel = Vec3::new(
            rng.random_range(-speed..=speed),
            rng.random_range(-speed..=speed),
            rng.random_range(0.0..=speed / 2.0),
        );
        self.spin = random_spin(tuning.throw_spin, rng);
        self.locked = false;
        self.face = None;
        log::debug!("Die {} thrown from {:?} at {:?}", self.id, self.pos, self.vel);
    }

    /// "Up" expressed in the die's local frame
    fn local_up(&self) -> Vec3 {
        self.rotation.inverse() * Vec3::Z
    }

    /// Face pointing most nearly up and how well it is aligned
    pub fn up_face(&self) -> (u8, f32) {
        let up = self.local_up();
        let candidates = [up.x, up.y, up.z, -up.x, -up.y, -up.z];
        let (best, dot) = candidates
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |acc, (i, d)| if d > acc.1 { (i, d) } else { acc });
        (FACE_NUMBERS[best], dot)
    }

    /// Recompute the resting face from the current orientation
    pub fn refresh_face(&mut self) -> f32 {
        let (face, dot) = self.up_face();
        self.face = Some(face);
        dot
    }

    /// Rotate about the world x/y axes while a steering input is held
    pub fn steer(&mut self, steer: Vec2, tuning: &DiceTuning, dt: f32) {
        if steer == Vec2::ZERO {
            return;
        }
        let step = tuning.steer_rate * dt;
        let turn = Quat::from_rotation_y(steer.x * step) * Quat::from_rotation_x(-steer.y * step);
        self.rotation = (turn * self.rotation).normalize();
    }

    /// Advance one tick. Locked dice are not simulated.
    pub fn tick(&mut self, tuning: &DiceTuning, dt: f32, steer: Vec2) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.locked {
            return outcome;
        }

        // Rest check
        let l1_speed = self.vel.x.abs() + self.vel.y.abs() + self.vel.z.abs();
        if l1_speed < tuning.rest_speed && rotation_angle(self.spin) < tuning.rest_spin {
            let dot = self.refresh_face();
            if dot > tuning.settle_dot {
                self.locked = true;
                self.pos.z = self.radius;
                self.vel = Vec3::ZERO;
                self.spin = Quat::IDENTITY;
                outcome.locked = true;
                log::debug!("Die {} locked on face {:?}", self.id, self.face);
                return outcome;
            }
        }

        self.steer(steer, tuning, dt);

        self.pos += self.vel;

        let mut grounded = false;
        for plane in box_planes(tuning.arena_width, tuning.arena_height) {
            let distance = plane.distance(self.pos);
            if distance > self.radius {
                continue;
            }
            if self.bounce(distance, plane.normal, tuning) {
                outcome.bounced = true;
            } else {
                self.rest_against(distance, plane.normal);
            }
            grounded |= plane.normal == Vec3::Z;
        }

        self.integrate_rotation(dt);
        if grounded {
            self.roll_on_floor(tuning, dt);
        }

        self.vel *= tuning.damping.powf(dt);
        self.vel.z -= tuning.gravity * dt;
        match quat_pow(self.spin, tuning.spin_damping.powf(dt)) {
            Ok(spin) => self.spin = spin,
            Err(e) => log::warn!("Die {}: spin damping skipped: {}", self.id, e),
        }

        outcome
    }

    /// Apply this tick's share of the spin. A failed fractional power skips
    /// the rotation for this tick only.
    fn integrate_rotation(&mut self, dt: f32) {
        match quat_pow(self.spin, dt) {
            Ok(step) => self.rotation = (self.rotation * step).normalize(),
            Err(e) => log::warn!("Die {}: rotation skipped this tick: {}", self.id, e),
        }
    }

    /// Bounce off a plane `distance` away along `normal` (pointing from the
    /// plane towards the die). Returns false if no corner reaches the plane.
    pub fn bounce(&mut self, distance: f32, normal: Vec3, tuning: &DiceTuning) -> bool {
        let contact = support(self.rotation, self.size, normal);
        if distance + contact.depth > 0.0 {
            return false;
        }
        self.locked = false;

        let speed = self.vel.length();
        let lateral = contact.point - normal * contact.point.dot(normal);
        let tumble = normal.cross(lateral) * (tuning.tumble * speed);
        let upright = self.vel.cross(normal) * tuning.upright;
        let impulse = Quat::from_scaled_axis(tumble) * Quat::from_scaled_axis(upright);
        if impulse.is_finite() {
            self.spin = self.spin.lerp(impulse, tuning.spin_blend).normalize();
        }

        self.vel *= tuning.bounce_damping;
        if self.vel.dot(normal) < 0.0 {
            self.vel = reflect(self.vel, normal);
        }
        self.pos += normal * (self.radius - distance);
        true
    }

    /// Hold the centre `radius` away from a plane that no corner touches yet.
    /// Motion into the plane is absorbed.
    fn rest_against(&mut self, distance: f32, normal: Vec3) {
        self.pos += normal * (self.radius - distance);
        let into = self.vel.dot(normal);
        if into < 0.0 {
            self.vel -= normal * into;
        }
    }

    /// Push the die back inside the box after an outside shove
    pub fn confine(&mut self, tuning: &DiceTuning) {
        for plane in box_planes(tuning.arena_width, tuning.arena_height) {
            let distance = plane.distance(self.pos);
            if distance < self.radius {
                self.rest_against(distance, plane.normal);
            }
        }
    }

    /// Floor contact: friction slows sliding and spinning, and the die tips
    /// over onto the face nearest to flat
    fn roll_on_floor(&mut self, tuning: &DiceTuning, dt: f32) {
        let keep = tuning.floor_friction.powf(dt);
        self.vel.x *= keep;
        self.vel.y *= keep;
        match quat_pow(self.spin, keep) {
            Ok(spin) => self.spin = spin,
            Err(e) => log::warn!("Die {}: floor friction skipped: {}", self.id, e),
        }

        let up = self.local_up();
        let tilt = Quat::from_rotation_arc(nearest_axis(up), up);
        match quat_pow(tilt, (tuning.topple_rate * dt).min(1.0)) {
            Ok(step) => self.rotation = (self.rotation * step).normalize(),
            Err(e) => log::warn!("Die {}: topple skipped: {}", self.id, e),
        }
    }

    /// Clearance between the centre and a plane beyond `radius`
    /// (negative when the die sits too deep)
    pub fn clearance(&self, plane: &Plane) -> f32 {
        plane.distance(self.pos) - self.radius
    }
}

/// Signed local axis closest to `v`
fn nearest_axis(v: Vec3) -> Vec3 {
    let a = v.abs();
    if a.x >= a.y && a.x >= a.z {
        Vec3::X * v.x.signum()
    } else if a.y >= a.z {
        Vec3::Y * v.y.signum()
    } else {
        Vec3::Z * v.z.signum()
    }
}

/// Random spin built from three random Euler rates (x, then y, then z)
pub fn random_spin(max_rate: f32, rng: &mut impl Rng) -> Quat {
    let mut rate = || rng.random_range(-max_rate..=max_rate);
    Quat::from_rotation_x(rate()) * Quat::from_rotation_y(rate()) * Quat::from_rotation_z(rate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn corner_down() -> Quat {
        Quat::from_rotation_arc(Vec3::ONE.normalize(), Vec3::NEG_Z)
    }

    #[test]
    fn test_radius_from_size() {
        let die = Die::new(1, Vec3::ZERO, 10.0);
        assert!((die.radius - 10.0 * 3.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_floor_bounce_reflects_and_resolves() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(100.0, 100.0, 0.0), tuning.die_size);
        die.pos.z = die.radius - 0.01;
        die.vel = Vec3::new(0.0, 0.0, -5.0);
        die.rotation = corner_down();

        assert!(die.bounce(die.pos.z, Vec3::Z, &tuning));
        assert!(die.vel.z > 0.0);
        assert!((die.pos.z - die.radius).abs() < 1e-4);
        assert!(!die.locked);
    }

    #[test]
    fn test_bounce_misses_when_no_corner_touches() {
        let tuning = DiceTuning::default();
        // Flat die hovering at radius height: bottom face is well above the floor
        let mut die = Die::new(1, Vec3::new(100.0, 100.0, 0.0), tuning.die_size);
        die.pos.z = die.radius;
        die.vel = Vec3::new(0.0, 0.0, -1.0);
        assert!(!die.bounce(die.pos.z, Vec3::Z, &tuning));
        assert_eq!(die.vel, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_bounce_unlocks() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(100.0, 100.0, 0.0), tuning.die_size);
        die.rotation = corner_down();
        die.locked = true;
        die.pos.z = die.radius - 1.0;
        assert!(die.bounce(die.pos.z, Vec3::Z, &tuning));
        assert!(!die.locked);
    }

    #[test]
    fn test_resting_die_locks_and_snaps() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(100.0, 100.0, 60.0), tuning.die_size);
        let outcome = die.tick(&tuning, SIM_DT, Vec2::ZERO);
        assert!(outcome.locked);
        assert!(die.locked);
        assert_eq!(die.pos.z, die.radius);
        // Canonical pose has local +z up
        assert_eq!(die.face, Some(FACE_NUMBERS[2]));
    }

    #[test]
    fn test_locked_die_is_idempotent() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(100.0, 100.0, 60.0), tuning.die_size);
        die.tick(&tuning, SIM_DT, Vec2::ZERO);
        let (pos, rot, face) = (die.pos, die.rotation, die.face);
        for _ in 0..100 {
            let outcome = die.tick(&tuning, SIM_DT, Vec2::new(1.0, 1.0));
            assert_eq!(outcome, TickOutcome::default());
        }
        assert_eq!(die.pos, pos);
        assert_eq!(die.rotation, rot);
        assert_eq!(die.face, face);
    }

    #[test]
    fn test_tilted_slow_die_does_not_lock() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(100.0, 100.0, 60.0), tuning.die_size);
        die.rotation = Quat::from_rotation_x(0.5);
        let outcome = die.tick(&tuning, SIM_DT, Vec2::ZERO);
        assert!(!outcome.locked);
        // Face is still reported while near rest
        assert!(die.face.is_some());
    }

    #[test]
    fn test_up_face_table() {
        let mut die = Die::new(1, Vec3::ZERO, 1.0);
        // Local -z pointing up
        die.rotation = Quat::from_rotation_x(std::f32::consts::PI);
        let (face, dot) = die.up_face();
        assert_eq!(face, FACE_NUMBERS[5]);
        assert!(dot > 0.99);

        // Local +x pointing up
        die.rotation = Quat::from_rotation_arc(Vec3::X, Vec3::Z);
        assert_eq!(die.up_face().0, FACE_NUMBERS[0]);
    }

    #[test]
    fn test_every_face_number_reachable() {
        let mut seen: Vec<u8> = FACE_NUMBERS.to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_thrown_die_keeps_clear_of_walls() {
        let tuning = DiceTuning::default();
        let planes = box_planes(tuning.arena_width, tuning.arena_height);
        for seed in [7, 21, 1234] {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut die = Die::new(1, Vec3::ZERO, tuning.die_size);
            die.throw(&tuning, &mut rng);

            for _ in 0..1200 {
                die.tick(&tuning, SIM_DT, Vec2::ZERO);
                assert!((die.rotation.length() - 1.0).abs() < 1e-4);
                for plane in &planes {
                    assert!(
                        die.clearance(plane) > -1e-3,
                        "centre too close to {:?} at {:?}",
                        plane.normal,
                        die.pos
                    );
                }
            }
        }
    }

    #[test]
    fn test_flat_landing_rests_at_radius() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(100.0, 100.0, 0.0), tuning.die_size);
        die.pos.z = die.radius + 2.0;
        die.vel = Vec3::new(0.0, 0.0, -6.0);

        let outcome = die.tick(&tuning, SIM_DT, Vec2::ZERO);
        // No corner reaches the floor: the fall is absorbed instead of bounced
        assert!(!outcome.bounced);
        assert!((die.pos.z - die.radius).abs() < 1e-4);
        assert!(die.vel.z <= 0.0 && die.vel.z > -1.0);
    }

    #[test]
    fn test_corner_balanced_die_topples_and_locks() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(100.0, 100.0, 0.0), tuning.die_size);
        die.pos.z = die.radius;
        die.rotation = corner_down();
        assert!(die.up_face().1 < 0.6);

        let locked_at = (0..120).find(|_| die.tick(&tuning, SIM_DT, Vec2::ZERO).locked);
        assert!(locked_at.is_some(), "die stuck at {:?}", die.up_face());
        assert!(die.up_face().1 > tuning.settle_dot);
        assert_eq!(die.pos.z, die.radius);
    }

    #[test]
    fn test_sliding_die_comes_to_rest() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(100.0, 300.0, 0.0), tuning.die_size);
        die.pos.z = die.radius;
        die.vel = Vec3::new(6.0, 0.0, 0.0);
        die.spin = Quat::from_rotation_z(4.0);

        assert!((0..300).any(|_| die.tick(&tuning, SIM_DT, Vec2::ZERO).locked));
        assert!(die.pos.x > 100.0);
        assert_eq!(die.vel, Vec3::ZERO);
    }

    #[test]
    fn test_bounce_spin_applies_same_tick() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::ZERO, tuning.die_size);
        die.pos = Vec3::new(die.radius - 1.0, 300.0, 200.0);
        die.rotation = Quat::from_rotation_arc(Vec3::ONE.normalize(), Vec3::NEG_X);
        die.vel = Vec3::new(-3.0, 2.0, 0.0);
        let start = die.rotation;

        let mut bounced = die.clone();
        bounced.pos += bounced.vel;
        assert!(bounced.bounce(bounced.pos.x, Vec3::X, &tuning));
        let expected = (start * quat_pow(bounced.spin, SIM_DT).unwrap()).normalize();

        assert!(die.tick(&tuning, SIM_DT, Vec2::ZERO).bounced);
        assert!(!die.rotation.abs_diff_eq(start, 1e-6));
        assert!(die.rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_confine_pushes_back_inside() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::new(-5.0, 300.0, 3.0), tuning.die_size);
        die.vel = Vec3::new(-2.0, 1.0, -4.0);
        die.confine(&tuning);
        assert!((die.pos.x - die.radius).abs() < 1e-4);
        assert!((die.pos.z - die.radius).abs() < 1e-4);
        assert_eq!(die.vel, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_nearest_axis() {
        assert_eq!(nearest_axis(Vec3::new(0.2, -0.9, 0.1)), Vec3::NEG_Y);
        assert_eq!(nearest_axis(Vec3::new(0.5, 0.1, 0.6)), Vec3::Z);
    }

    #[test]
    fn test_steer_rotates_about_world_axes() {
        let tuning = DiceTuning::default();
        let mut die = Die::new(1, Vec3::ZERO, 1.0);
        die.steer(Vec2::new(1.0, 0.0), &tuning, 0.1);
        let (axis, angle) = die.rotation.to_axis_angle();
        assert!((angle - tuning.steer_rate * 0.1).abs() < 1e-4);
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-4));
    }

    #[test]
    fn test_random_spin_deterministic() {
        let a = random_spin(5.0, &mut Pcg32::seed_from_u64(3));
        let b = random_spin(5.0, &mut Pcg32::seed_from_u64(3));
        assert_eq!(a, b);
        assert!(a.is_normalized());
    }
}
