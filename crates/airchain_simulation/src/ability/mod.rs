//! Bounce ability module
//!
//! ECS ответственность:
//! - AirBounceCounter: air bounce'ы + ground state
//! - BounceConfig: tuning (presets, momentum transfer)
//! - validate/execute: один общий предикат `evaluate_bounce`
//!
//! Movement collaborator ответственность:
//! - GroundContactChanged при landing/takeoff
//! - применение MotionBody.velocity к character controller

use bevy::prelude::*;

pub mod bounce;
pub mod config;
pub mod counter;
pub mod events;
pub mod gate;
pub mod systems;


pub use bounce::{
    execute_bounce, select_momentum_snapshot, standalone_bounce_velocity, try_bounce, validate_bounce, BounceError,
    BounceExecution, BounceTicket,
};
pub use config::{BounceConfig, BouncePreset, MAX_BOUNCE_VELOCITY, MIN_BOUNCE_VELOCITY};
pub use counter::{AirBounceCounter, GroundState, DEFAULT_MAX_AIR_BOUNCES, MAX_AIR_BOUNCES_LIMIT};
pub use events::{BounceExecuted, BounceRejected, BounceRejection, BounceRequested, GroundContactChanged};
pub use gate::{evaluate_bounce, BounceConditions, BounceDenied, BounceKind, BounceRules};
pub use systems::{apply_ground_contact, process_bounce_requests};

use crate::momentum::MomentumSet;

/// Bounce Plugin
///
/// Порядок в FixedUpdate:
/// 1. apply_ground_contact (MomentumSet::Contact): landing reset до активации
/// 2. process_bounce_requests (MomentumSet::Activation): после capture,
///    чтобы snapshot этого же tick'а уже был виден
pub struct BouncePlugin;

impl Plugin for BouncePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GroundContactChanged>()
            .add_event::<BounceRequested>()
            .add_event::<BounceExecuted>()
            .add_event::<BounceRejected>()
            .register_type::<AirBounceCounter>()
            .register_type::<BounceConfig>();

        app.add_systems(
            FixedUpdate,
            (
                apply_ground_contact.in_set(MomentumSet::Contact),
                process_bounce_requests.in_set(MomentumSet::Activation),
            ),
        );
    }
}
