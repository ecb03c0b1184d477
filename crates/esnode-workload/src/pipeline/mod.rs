//! Compilation stages, leaf-first: resources, volumes, env, scheduling, container

pub mod container;
pub mod env;
pub mod resources;
pub mod scheduling;
pub mod volumes;
