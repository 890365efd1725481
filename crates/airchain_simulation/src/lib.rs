//! AIRCHAIN Simulation Core
//!
//! Momentum-движок на Bevy 0.16: dash → bounce цепочки в воздухе.
//!
//! Архитектура:
//! - snapshot: per-actor ring buffer недавних velocity (самоотключающийся cleanup)
//! - momentum: чистая функция переноса captured velocity в новую способность
//! - ability: bounce (air bounce counter + validate/execute на общем предикате)
//! - движение/физика: у movement collaborator'а (события + MotionBody)
//!
//! Мир Z-up, симуляция в FixedUpdate (60Hz).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ability;
pub mod components;
pub mod diagnostics;
pub mod logger;
pub mod momentum;
pub mod shared;
pub mod snapshot;

// Re-export базовых типов для удобства
pub use ability::{
    try_bounce, AirBounceCounter, BounceConfig, BounceDenied, BounceError, BounceExecuted, BounceKind, BouncePlugin,
    BouncePreset, BounceRejected, BounceRejection, BounceRequested, GroundContactChanged,
};
pub use components::*;
pub use diagnostics::MomentumDiagnostics;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, set_logger_if_needed, LogLevel,
    LogPrinter,
};
pub use momentum::{combine, MomentumPlugin, MomentumSet, MomentumTransferConfig};
pub use snapshot::{
    CaptureVelocity, ClearSnapshots, MotionSource, SnapshotLabel, SnapshotPlugin, SnapshotStore, SnapshotTicking,
    VelocitySnapshot,
};

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .add_plugins(MomentumPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Подсистемы не подключены: добавь `MomentumPlugin` (или `SimulationPlugin`).
/// Время FixedUpdate можно двигать вручную: `Time<Fixed>::advance_by`, затем
/// `run_schedule(FixedUpdate)`.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
