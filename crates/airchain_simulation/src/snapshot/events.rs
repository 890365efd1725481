//! Snapshot events (motion producer → store)

use bevy::prelude::*;

use super::record::{MotionSource, SnapshotLabel};

/// Event: producing action зафиксировал значимое изменение velocity
///
/// Генерируется:
/// - Dash ability (старт рывка)
/// - Jump / fall-off-edge (movement collaborator)
/// - Внешние импульсы (launch pads, knockback)
///
/// Обрабатывается `capture_velocity_snapshots`. Шумовая velocity отбрасывается.
#[derive(Event, Debug, Clone)]
pub struct CaptureVelocity {
    pub entity: Entity,
    pub velocity: Vec3,
    pub source: MotionSource,
    /// `None` → label по умолчанию для source
    pub label: Option<SnapshotLabel>,
}

impl CaptureVelocity {
    pub fn new(entity: Entity, velocity: Vec3, source: MotionSource) -> Self {
        Self {
            entity,
            velocity,
            source,
            label: None,
        }
    }

    pub fn with_label(mut self, label: SnapshotLabel) -> Self {
        self.label = Some(label);
        self
    }
}

/// Event: сбросить все snapshot'ы актора (respawn/reset)
#[derive(Event, Debug, Clone)]
pub struct ClearSnapshots {
    pub entity: Entity,
}
