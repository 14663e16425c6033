//! Keyboard control of the simulation.
//!
//! Space pauses and resumes, S advances a paused simulation by one tick, D toggles the debug
//! drawing of every robot. While the simulation runs, the arrow keys drive the first robot.

use bevy::prelude::*;

use crate::resource::SimulationRes;

const DRIVE_VELOCITY: f64 = 3.0;
const TURN_VELOCITY: f64 = 0.1;

pub struct Controller;

#[derive(Resource)]
pub struct Control {
    pub running: bool,
    pub step: bool,
    manual: bool,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            running: true,
            step: false,
            manual: false,
        }
    }
}

impl Plugin for Controller {
    fn build(&self, app: &mut App) {
        app.init_resource::<Control>()
            .add_systems(Update, (handle_keyboard_input, drive));
    }
}

fn handle_keyboard_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut control: ResMut<Control>,
    mut simulation: ResMut<SimulationRes>,
) {
    if keys.just_pressed(KeyCode::Space) {
        control.running = !control.running;
        info!(
            "simulation {}",
            if control.running { "resumed" } else { "paused" }
        );
    }

    if keys.just_pressed(KeyCode::KeyS) && !control.running {
        control.step = true;
    }

    if keys.just_pressed(KeyCode::KeyD) {
        for robot in simulation.world_mut().robots_mut() {
            let debug = !robot.debug();
            robot.set_debug(debug);
        }
    }
}

/// After the first arrow key press, the arrow keys drive the first robot.
fn drive(
    keys: Res<ButtonInput<KeyCode>>,
    mut control: ResMut<Control>,
    mut simulation: ResMut<SimulationRes>,
) {
    let arrows = [
        KeyCode::ArrowUp,
        KeyCode::ArrowDown,
        KeyCode::ArrowLeft,
        KeyCode::ArrowRight,
    ];
    if keys.any_pressed(arrows) {
        control.manual = true;
    }
    if !control.manual {
        return;
    }
    let Some(robot) = simulation.world_mut().robots_mut().next() else {
        return;
    };

    let mut vx = 0.0;
    let mut va = 0.0;
    if keys.pressed(KeyCode::ArrowUp) {
        vx += DRIVE_VELOCITY;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        vx -= DRIVE_VELOCITY;
    }
    // Positive turn velocity turns counterclockwise on screen.
    if keys.pressed(KeyCode::ArrowLeft) {
        va += TURN_VELOCITY;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        va -= TURN_VELOCITY;
    }
    robot.set_velocity(vx, 0.0, va);
}
