//! Fixed-rate tick driver around a `World`.

use std::fmt;

use log::trace;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    domain::{DrawList, World},
    policy::VelocityPolicy,
};

pub struct Simulation {
    world: World,
    tick_rate: f64,
    ticks: u64,
    rng: ChaCha8Rng,
    policy: Option<Box<dyn VelocityPolicy>>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("tick_rate", &self.tick_rate)
            .field("ticks", &self.ticks)
            .field("policy", &self.policy.is_some())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// `tick_rate` is in ticks per second, `seed` feeds the generator handed to the policy.
    pub fn new(world: World, tick_rate: f64, seed: u64) -> Self {
        Self {
            world,
            tick_rate,
            ticks: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            policy: None,
        }
    }

    pub fn with_policy(self, policy: Box<dyn VelocityPolicy>) -> Self {
        Self {
            policy: Some(policy),
            ..self
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn time(&self) -> f64 {
        self.world.time()
    }

    /// Applies the policy to every robot, then advances the world by one tick.
    pub fn step(&mut self) -> DrawList {
        if let Some(policy) = &mut self.policy {
            for robot in self.world.robots_mut() {
                policy.steer(robot, &mut self.rng);
            }
        }
        self.ticks += 1;
        let time = self.ticks as f64 / self.tick_rate;
        trace!("tick {} at {time:.3}s", self.ticks);
        self.world.update(time)
    }

    /// Steps `ticks` times and returns the drawing of the last tick.
    pub fn run(&mut self, ticks: u64) -> DrawList {
        let mut draw = DrawList::new();
        for _ in 0..ticks {
            draw = self.step();
        }
        draw
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        domain::{Camera, CameraConfig, Color, Point, RangeSensor, Robot},
        policy::Wander,
    };

    fn simulation(world: World) -> Simulation {
        Simulation::new(world, 10.0, 0)
    }

    fn forward_sensor(max: f64) -> RangeSensor {
        RangeSensor::new(0.0, 0.0, max, 0.0).unwrap()
    }

    #[test]
    fn test_empty_room_reads_nothing() {
        let mut world = World::new(500.0, 250.0).unwrap();
        world
            .add_robot(
                Robot::new("r", 250.0, 125.0, 0.0).with_range_sensors(vec![forward_sensor(20.0)]),
            )
            .unwrap();
        let mut simulation = simulation(world);
        simulation.step();
        assert_eq!(simulation.world().robots()[0].ir(0), Some(1.0));
    }

    #[test]
    fn test_box_ahead_reads_quarter_range() {
        let world = World::with_boxes(
            500.0,
            250.0,
            [(Color::BLACK, Point::new(255.0, 120.0), Point::new(265.0, 130.0))],
        )
        .unwrap();
        let mut world = world;
        world
            .add_robot(
                Robot::new("r", 250.0, 125.0, 0.0).with_range_sensors(vec![forward_sensor(20.0)]),
            )
            .unwrap();
        let mut simulation = simulation(world);
        simulation.step();
        let reading = simulation.world().robots()[0].ir(0).unwrap();
        assert_abs_diff_eq!(reading, 0.25, epsilon = 0.01);
    }

    #[test]
    fn test_driving_into_wall_stalls_in_place() {
        let half_side = 10.0 / 2.0_f64.sqrt();
        let mut world = World::new(500.0, 250.0).unwrap();
        world.add_box(
            Color::BLACK,
            Point::new(250.0 + half_side + 2.0, 100.0),
            Point::new(270.0, 150.0),
        );
        let id = world.add_robot(Robot::new("r", 250.0, 125.0, 0.0)).unwrap();
        world.robot_mut(id).unwrap().forward(5.0);
        let mut simulation = simulation(world);
        simulation.step();

        let robot = simulation.world().robot(id).unwrap();
        assert!(robot.stalled());
        assert_eq!((robot.x(), robot.y(), robot.direction()), (250.0, 125.0, 0.0));
    }

    #[rstest]
    #[case::near(50.0)]
    #[case::mid(100.0)]
    #[case::far(200.0)]
    fn test_equidistant_wall_shades_uniformly(#[case] radius: f64) {
        const SIDES: usize = 720;
        let center = Point::new(250.0, 250.0);
        let ring = (0..SIDES)
            .map(|i| {
                let angle = i as f64 / SIDES as f64 * 2.0 * PI;
                center + Point::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect::<Vec<_>>();
        let mut world = World::new(500.0, 500.0).unwrap();
        world.add_wall(Color::rgb(0, 0, 255), &ring).unwrap();
        let camera = Camera::color(CameraConfig::default()).unwrap();
        world
            .add_robot(Robot::new("eye", 250.0, 250.0, 0.3).with_camera(camera))
            .unwrap();
        let mut simulation = simulation(world);
        simulation.step();

        let camera = &simulation.world().robots()[0].cameras()[0];
        let expected = 1.0 - radius / 500.0;
        for column in 0..camera.config().columns {
            let shading = camera.shading(column).unwrap();
            assert_abs_diff_eq!(shading, expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_step_advances_time() {
        let mut simulation = Simulation::new(World::new(100.0, 100.0).unwrap(), 20.0, 0);
        simulation.run(5);
        assert_eq!(simulation.ticks(), 5);
        assert_abs_diff_eq!(simulation.time(), 0.25);
    }

    #[test]
    fn test_run_returns_last_drawing() {
        let mut world = World::new(100.0, 100.0).unwrap();
        world.add_robot(Robot::new("r", 50.0, 50.0, 0.0)).unwrap();
        let mut simulation = simulation(world);
        assert!(simulation.run(0).is_empty());
        assert!(!simulation.run(2).is_empty());
    }

    #[test]
    fn test_debug_shows_ticks_and_policy() {
        let mut simulation = simulation(World::new(100.0, 100.0).unwrap())
            .with_policy(Box::new(Wander::new(3.0, 0.3)));
        simulation.run(3);
        let debug = format!("{simulation:?}");
        assert!(debug.contains("ticks: 3"), "{debug}");
        assert!(debug.contains("policy: true"), "{debug}");
    }

    fn wandering(seed: u64) -> Vec<(f64, f64, f64)> {
        let world = World::with_boxes(
            500.0,
            250.0,
            [(Color::BLACK, Point::new(300.0, 0.0), Point::new(310.0, 250.0))],
        )
        .unwrap();
        let mut world = world;
        world.add_robot(Robot::new("r", 250.0, 125.0, 0.0)).unwrap();
        let mut simulation =
            Simulation::new(world, 10.0, seed).with_policy(Box::new(Wander::new(3.0, 0.3)));
        (0..100)
            .map(|_| {
                simulation.step();
                simulation.world().robots()[0].pose()
            })
            .map(|pose| (pose.x, pose.y, pose.direction))
            .collect()
    }

    #[test]
    fn test_policy_runs_are_reproducible() {
        assert_eq!(wandering(11), wandering(11));
    }

    #[test]
    fn test_policy_keeps_robot_inside_walls() {
        for (x, y, _) in wandering(5) {
            assert!((0.0..=300.0).contains(&x), "x = {x}");
            assert!((0.0..=250.0).contains(&y), "y = {y}");
        }
    }
}
