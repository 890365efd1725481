//! Snapshot ECS systems
//!
//! Activity gate: маркер `SnapshotTicking` висит на entity только пока её
//! store держит данные. Cleanup система выполняется только при наличии
//! хотя бы одного такого маркера (`any_with_component`).

use bevy::prelude::*;

use super::events::{CaptureVelocity, ClearSnapshots};
use super::record::SnapshotLabel;
use super::store::{SnapshotStore, TickTransition};
use crate::logger;

/// Маркер: store актора активен (есть неистёкшие записи)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SnapshotTicking;

/// Система: CaptureVelocity события → SnapshotStore
pub fn capture_velocity_snapshots(
    mut events: EventReader<CaptureVelocity>,
    mut stores: Query<&mut SnapshotStore>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for event in events.read() {
        let Ok(mut store) = stores.get_mut(event.entity) else {
            logger::log_warning(&format!(
                "CaptureVelocity: entity {:?} has no SnapshotStore (despawned?)",
                event.entity
            ));
            continue;
        };

        let label = event
            .label
            .clone()
            .unwrap_or_else(|| SnapshotLabel::for_source(event.source));
        store.capture(event.velocity, event.source, label, now);
    }
}

/// Система: ClearSnapshots события → store.clear()
pub fn clear_snapshots_on_request(
    mut events: EventReader<ClearSnapshots>,
    mut stores: Query<&mut SnapshotStore>,
) {
    for event in events.read() {
        match stores.get_mut(event.entity) {
            Ok(mut store) => store.clear(),
            Err(_) => logger::log_warning(&format!(
                "ClearSnapshots: entity {:?} has no SnapshotStore",
                event.entity
            )),
        }
    }
}

/// Система: зеркалит `store.is_ticking()` в маркер `SnapshotTicking`
///
/// Смотрит только на изменённые store'ы: проверка на границе мутации.
pub fn sync_snapshot_ticking(
    mut commands: Commands,
    stores: Query<(Entity, &SnapshotStore, Has<SnapshotTicking>), Changed<SnapshotStore>>,
) {
    for (entity, store, marked) in stores.iter() {
        match (store.is_ticking(), marked) {
            (true, false) => {
                commands.entity(entity).try_insert(SnapshotTicking);
            }
            (false, true) => {
                commands.entity(entity).try_remove::<SnapshotTicking>();
            }
            _ => {}
        }
    }
}

/// Система: cleanup истёкших snapshot'ов у активных store'ов
pub fn cleanup_expired_snapshots(
    mut commands: Commands,
    mut stores: Query<(Entity, &mut SnapshotStore), With<SnapshotTicking>>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for (entity, mut store) in stores.iter_mut() {
        let report = store.cleanup(now);
        if report.transition == TickTransition::Disabled {
            commands.entity(entity).try_remove::<SnapshotTicking>();
        }
    }
}
