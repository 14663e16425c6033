//! Discrete-time 2D simulator for wheeled robots with range sensors and ray-cast cameras.

pub mod config;
pub mod domain;
pub mod policy;
pub mod simulation;
