//! Motion компоненты: граница с movement collaborator

use bevy::prelude::*;

/// Текущее движение актора (world space, Z-up)
///
/// Архитектура:
/// - Movement collaborator пишет velocity каждый frame
/// - Bounce система пишет итоговую velocity после execute
/// - Collaborator читает и применяет её к character controller
///
/// Ground state здесь не хранится. Его единственный владелец: `AirBounceCounter`,
/// и меняется он только через событие `GroundContactChanged`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct MotionBody {
    pub velocity: Vec3,
}

impl MotionBody {
    pub fn new(velocity: Vec3) -> Self {
        Self { velocity }
    }
}
