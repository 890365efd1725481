//! Momentum transfer: перенос captured velocity в новую способность
//!
//! Чистая функция `combine(base, snapshot, config)`: без snapshot'а
//! возвращает base как есть (transfer строго опционален).
//!
//! Здесь же `MomentumPlugin`: snapshot + bounce подсистемы и порядок их фаз.

use bevy::prelude::*;

pub mod transfer;

#[cfg(test)]
mod transfer_tests;

pub use transfer::*;

use crate::ability::BouncePlugin;
use crate::snapshot::SnapshotPlugin;

/// Фазы momentum-движка внутри FixedUpdate (выполняются по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MomentumSet {
    /// Ground contact события (landing reset)
    Contact,
    /// Capture/clear snapshot'ов
    Capture,
    /// Bounce активации (validate → execute)
    Activation,
    /// Ticking marker sync + cleanup истёкших записей
    Cleanup,
}

/// Momentum Plugin
///
/// Contact → Capture → Activation → Cleanup. Capture идёт до Activation,
/// поэтому dash и bounce в одном tick'е уже видят общий snapshot.
pub struct MomentumPlugin;

impl Plugin for MomentumPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                MomentumSet::Contact,
                MomentumSet::Capture,
                MomentumSet::Activation,
                MomentumSet::Cleanup,
            )
                .chain(),
        )
        .add_plugins((SnapshotPlugin, BouncePlugin));
    }
}
