//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: marker актора + required components (store, counter, body, config)
//! - motion: MotionBody (velocity + ground contact от movement collaborator)

pub mod actor;
pub mod motion;

pub use actor::*;
pub use motion::*;
