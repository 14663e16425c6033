//! Ticking of the simulation.
//!
//! The world advances in Bevy's fixed time step at the scenario's tick rate, unless the
//! controller has paused it. A paused simulation can still be advanced one tick at a time.

use bevy::prelude::*;

use crate::{
    controller::Control,
    resource::{DrawListRes, SimulationRes},
};

pub struct Simulator {
    pub tick_rate: f64,
}

impl Plugin for Simulator {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(self.tick_rate))
            .init_resource::<DrawListRes>()
            .add_systems(FixedUpdate, simulate);
    }
}

fn simulate(
    mut control: ResMut<Control>,
    mut simulation: ResMut<SimulationRes>,
    mut draw: ResMut<DrawListRes>,
) {
    if !control.running && !control.step {
        return;
    }
    control.step = false;
    *draw = simulation.step().into();
}
