//! Velocity snapshot domain
//!
//! Содержит:
//! - VelocitySnapshot / MotionSource / SnapshotLabel (record)
//! - SnapshotStore (ring buffer + O(1) индексы)
//! - CaptureVelocity / ClearSnapshots (events)
//! - capture/sync/cleanup системы + SnapshotTicking маркер

use bevy::prelude::*;

pub mod events;
pub mod record;
pub mod store;
pub mod systems;


pub use events::*;
pub use record::*;
pub use store::*;
pub use systems::*;

use crate::momentum::MomentumSet;

/// Snapshot Plugin
///
/// Регистрирует события и системы store'а:
/// - capture/clear (MomentumSet::Capture)
/// - sync маркера → cleanup (MomentumSet::Cleanup), cleanup только при
///   наличии хотя бы одного `SnapshotTicking`
pub struct SnapshotPlugin;

impl Plugin for SnapshotPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CaptureVelocity>().add_event::<ClearSnapshots>();

        app.add_systems(
            FixedUpdate,
            (
                (capture_velocity_snapshots, clear_snapshots_on_request)
                    .chain()
                    .in_set(MomentumSet::Capture),
                (
                    sync_snapshot_ticking,
                    cleanup_expired_snapshots.run_if(any_with_component::<SnapshotTicking>),
                )
                    .chain()
                    .in_set(MomentumSet::Cleanup),
            ),
        );
    }
}
