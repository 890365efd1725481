//! Bounce events
//!
//! Входящие: GroundContactChanged (movement), BounceRequested (input).
//! Исходящие: BounceExecuted / BounceRejected (combat layer, VFX, аналитика).

use bevy::prelude::*;

use super::bounce::BounceError;
use super::gate::{BounceDenied, BounceKind};
use crate::snapshot::MotionSource;

/// Event: контакт с землёй изменился
#[derive(Event, Debug, Clone, Copy)]
pub struct GroundContactChanged {
    pub entity: Entity,
    pub grounded: bool,
}

/// Event: input запросил bounce (без payload)
#[derive(Event, Debug, Clone, Copy)]
pub struct BounceRequested {
    pub entity: Entity,
}

/// Event: bounce выполнен, velocity уже записана в MotionBody
#[derive(Event, Debug, Clone, Copy)]
pub struct BounceExecuted {
    pub entity: Entity,
    pub kind: BounceKind,
    pub velocity: Vec3,
    pub air_bounces: u32,
    pub momentum_source: Option<MotionSource>,
}

/// Почему bounce не состоялся
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BounceRejection {
    /// Отказ на validate
    Denied(BounceDenied),
    /// Validate прошёл, но execute увидел другое состояние
    Drift { validated: BounceKind, reason: BounceDenied },
}

impl From<BounceError> for BounceRejection {
    fn from(error: BounceError) -> Self {
        match error {
            BounceError::Denied(denied) => BounceRejection::Denied(denied),
            BounceError::ExecutionValidationFailed { validated, reason } => {
                BounceRejection::Drift { validated, reason }
            }
        }
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct BounceRejected {
    pub entity: Entity,
    pub rejection: BounceRejection,
}
