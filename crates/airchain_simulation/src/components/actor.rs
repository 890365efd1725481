//! Actor: владелец per-actor momentum состояния
//!
//! Архитектура: Required Components (Bevy 0.16)
//! - Actor требует SnapshotStore + AirBounceCounter + MotionBody + BounceConfig
//! - Состояние живёт только на entity; после despawn любые события к ней
//!   отбрасываются с warning (query lookup = liveness check)

use bevy::prelude::*;

use super::motion::MotionBody;
use crate::ability::{AirBounceCounter, BounceConfig};
use crate::snapshot::SnapshotStore;

/// Актор (игрок, NPC): базовый marker для momentum-движка
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(SnapshotStore, AirBounceCounter, MotionBody, BounceConfig)]
pub struct Actor;
