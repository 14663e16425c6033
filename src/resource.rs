//! The resource module wraps simulation state for use with Bevy.

use std::ops::{Deref, DerefMut};

use bevy::ecs::system::Resource;

use jyro_sim::{domain, simulation};

#[derive(Resource)]
pub struct SimulationRes(simulation::Simulation);

impl Deref for SimulationRes {
    type Target = simulation::Simulation;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SimulationRes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<simulation::Simulation> for SimulationRes {
    fn from(value: simulation::Simulation) -> Self {
        Self(value)
    }
}

/// Drawing produced by the last tick.
#[derive(Resource, Default)]
pub struct DrawListRes(domain::DrawList);

impl Deref for DrawListRes {
    type Target = domain::DrawList;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<domain::DrawList> for DrawListRes {
    fn from(value: domain::DrawList) -> Self {
        Self(value)
    }
}
