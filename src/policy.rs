//! Velocity policies steering robots between ticks.
//!
//! Policies draw randomness only from the generator they are handed, so a simulation seeded
//! the same way replays the same way.

use log::debug;
use rand::{Rng, RngCore};

use crate::domain::Robot;

/// Largest turn velocity picked when backing away from a wall.
const ESCAPE_TURN: f64 = 0.5;
/// Largest turn velocity change applied by a jitter.
const JITTER_TURN: f64 = 0.1;
/// Factor by which the turn velocity decays each tick without jitter.
const TURN_DECAY: f64 = 0.5;

pub trait VelocityPolicy: Send + Sync {
    /// Sets the robot's velocity for the next tick.
    fn steer(&mut self, robot: &mut Robot, rng: &mut dyn RngCore);
}

/// Cruises forward, backs away with a random turn after a stall and otherwise swerves at
/// random with probability `jitter` per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Wander {
    cruise: f64,
    jitter: f64,
}

impl Wander {
    pub fn new(cruise: f64, jitter: f64) -> Self {
        Self {
            cruise,
            jitter: jitter.clamp(0.0, 1.0),
        }
    }

    pub fn cruise(&self) -> f64 {
        self.cruise
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }
}

impl VelocityPolicy for Wander {
    fn steer(&mut self, robot: &mut Robot, rng: &mut dyn RngCore) {
        if robot.stalled() {
            let va = rng.random_range(-ESCAPE_TURN..=ESCAPE_TURN);
            debug!("robot {:?} escaping with turn {va:.3}", robot.name());
            robot.set_velocity(-self.cruise, 0.0, va);
            return;
        }
        let (_, _, va) = robot.velocity();
        let va = if rng.random_bool(self.jitter) {
            va + rng.random_range(-JITTER_TURN..=JITTER_TURN)
        } else {
            va * TURN_DECAY
        };
        robot.set_velocity(self.cruise, 0.0, va);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::domain::{Color, Point, World};

    fn stalled_world() -> World {
        let mut world = World::new(500.0, 250.0).unwrap();
        world.add_box(Color::BLACK, Point::new(110.0, 80.0), Point::new(130.0, 120.0));
        let id = world.add_robot(Robot::new("r", 100.0, 100.0, 0.0)).unwrap();
        world.robot_mut(id).unwrap().forward(5.0);
        world.update(0.1);
        world
    }

    #[test]
    fn test_wander_backs_away_after_stall() {
        let mut world = stalled_world();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut wander = Wander::new(3.0, 0.0);
        let robot = world.robots_mut().next().unwrap();
        assert!(robot.stalled());

        wander.steer(robot, &mut rng);
        let (vx, vy, va) = robot.velocity();
        assert_eq!((vx, vy), (-3.0, 0.0));
        assert!((-ESCAPE_TURN..=ESCAPE_TURN).contains(&va));
    }

    #[test]
    fn test_wander_cruises_and_decays_turn() {
        let mut robot = Robot::new("r", 250.0, 125.0, 0.0);
        robot.set_velocity(0.0, 1.0, 0.4);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut wander = Wander::new(2.0, 0.0);

        wander.steer(&mut robot, &mut rng);
        assert_eq!(robot.velocity(), (2.0, 0.0, 0.2));
        wander.steer(&mut robot, &mut rng);
        assert_eq!(robot.velocity(), (2.0, 0.0, 0.1));
    }

    #[test]
    fn test_wander_jitter_stays_bounded() {
        let mut robot = Robot::new("r", 250.0, 125.0, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut wander = Wander::new(2.0, 1.0);
        wander.steer(&mut robot, &mut rng);
        let (_, _, va) = robot.velocity();
        assert!(va.abs() <= JITTER_TURN);
    }

    #[test]
    fn test_wander_is_reproducible() {
        let run = |seed| {
            let mut robot = Robot::new("r", 250.0, 125.0, 0.0);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut wander = Wander::new(2.0, 0.5);
            (0..20)
                .map(|_| {
                    wander.steer(&mut robot, &mut rng);
                    robot.velocity().2
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_wander_clamps_jitter() {
        assert_abs_diff_eq!(Wander::new(1.0, 2.0).jitter(), 1.0);
        assert_abs_diff_eq!(Wander::new(1.0, -1.0).jitter(), 0.0);
    }
}
