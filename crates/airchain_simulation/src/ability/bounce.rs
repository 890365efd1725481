//! Bounce activation: validate → execute
//!
//! ```text
//! validate_bounce()  ── pure, можно звать сколько угодно ──▶ BounceTicket
//!        │
//!        ▼
//! execute_bounce()   ── повторный evaluate_bounce на живом состоянии
//!        │               fail → ExecutionValidationFailed, ничего не мутирует
//!        ▼
//! counter += 1 (Air) → standalone velocity → momentum snapshot → combine → body.velocity
//! ```
//!
//! Ground state (grounded/airborne) не трогается: им владеет movement
//! collaborator через `GroundContactChanged`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::BounceConfig;
use super::counter::AirBounceCounter;
use super::gate::{evaluate_bounce, BounceConditions, BounceDenied, BounceKind};
use crate::components::MotionBody;
use crate::momentum::combine;
use crate::shared::axes;
use crate::snapshot::{MotionSource, SnapshotStore, VelocitySnapshot};

/// Порядок предпочтения snapshot'ов для bounce'а
const MOMENTUM_PRIORITY: [MotionSource; 3] = [MotionSource::Dash, MotionSource::Jump, MotionSource::Fall];

/// Результат успешной валидации. Создаётся только `validate_bounce`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceTicket {
    kind: BounceKind,
    conditions: BounceConditions,
}

impl BounceTicket {
    pub fn kind(&self) -> BounceKind {
        self.kind
    }

    /// Состояние, на котором валидация прошла
    pub fn conditions(&self) -> &BounceConditions {
        &self.conditions
    }
}

/// Итог execute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceExecution {
    pub kind: BounceKind,
    pub velocity: Vec3,
    /// Счётчик после bounce'а
    pub air_bounces: u32,
    /// Source snapshot'а, если momentum был применён
    pub momentum_source: Option<MotionSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BounceError {
    #[error("bounce denied: {0}")]
    Denied(#[from] BounceDenied),

    #[error("bounce validated as {validated:?} but execution check failed: {reason}")]
    ExecutionValidationFailed { validated: BounceKind, reason: BounceDenied },
}

/// Проверить, можно ли bounce сейчас (без мутаций)
pub fn validate_bounce(
    counter: &AirBounceCounter,
    body: &MotionBody,
    config: &BounceConfig,
) -> Result<BounceTicket, BounceDenied> {
    let conditions = BounceConditions::capture(counter, body.velocity);
    let kind = evaluate_bounce(&conditions, &config.rules())?;
    Ok(BounceTicket { kind, conditions })
}

/// Выполнить ранее провалидированный bounce
///
/// Предикат перепроверяется на текущем состоянии: если между validate и
/// execute счётчик/ground/velocity изменились и bounce больше не разрешён,
/// возвращается `ExecutionValidationFailed` без каких-либо изменений.
pub fn execute_bounce(
    ticket: &BounceTicket,
    counter: &mut AirBounceCounter,
    body: &mut MotionBody,
    store: &SnapshotStore,
    config: &BounceConfig,
    now: f64,
) -> Result<BounceExecution, BounceError> {
    let conditions = BounceConditions::capture(counter, body.velocity);
    let kind = evaluate_bounce(&conditions, &config.rules()).map_err(|reason| {
        BounceError::ExecutionValidationFailed {
            validated: ticket.kind,
            reason,
        }
    })?;

    if kind == BounceKind::Air {
        counter.record_air_bounce();
    }

    let standalone = standalone_bounce_velocity(body.velocity, counter.air_bounces(), config);
    let snapshot = select_momentum_snapshot(store, now);
    let momentum_source = snapshot
        .filter(|_| config.momentum.enabled)
        .map(VelocitySnapshot::source);
    let velocity = combine(standalone, snapshot, &config.momentum);

    body.velocity = velocity;

    Ok(BounceExecution {
        kind,
        velocity,
        air_bounces: counter.air_bounces(),
        momentum_source,
    })
}

/// validate + execute за один вызов
pub fn try_bounce(
    counter: &mut AirBounceCounter,
    body: &mut MotionBody,
    store: &SnapshotStore,
    config: &BounceConfig,
    now: f64,
) -> Result<BounceExecution, BounceError> {
    let ticket = validate_bounce(counter, body, config)?;
    execute_bounce(&ticket, counter, body, store, config, now)
}

/// Bounce velocity без momentum transfer (fallback путь)
///
/// `air_bounces`: значение счётчика после инкремента (0 для ground bounce'а).
pub fn standalone_bounce_velocity(current: Vec3, air_bounces: u32, config: &BounceConfig) -> Vec3 {
    let horizontal = axes::horizontal(current) * config.horizontal_retention * config.horizontal_multiplier;

    let upward = config.effective_upward_velocity(air_bounces);
    let current_vertical = axes::vertical(current);
    let vertical = if config.preserve_downward_momentum && current_vertical < 0.0 {
        current_vertical + upward
    } else {
        upward
    };

    axes::compose(horizontal, vertical)
}

/// Самый релевантный snapshot: первый валидный из Dash/Jump/Fall, иначе latest
pub fn select_momentum_snapshot(store: &SnapshotStore, now: f64) -> Option<&VelocitySnapshot> {
    MOMENTUM_PRIORITY
        .iter()
        .find_map(|source| store.by_source(*source, now))
        .or_else(|| store.latest(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotLabel;

    fn airborne_counter(air_bounces: u32) -> AirBounceCounter {
        AirBounceCounter::with_state(false, air_bounces, 2)
    }

    #[test]
    fn test_ground_bounce_keeps_counter() {
        let mut counter = AirBounceCounter::default();
        let mut body = MotionBody::default();
        let store = SnapshotStore::default();
        let config = BounceConfig::default();

        let execution = try_bounce(&mut counter, &mut body, &store, &config, 0.0).unwrap();

        assert_eq!(execution.kind, BounceKind::Ground);
        assert_eq!(execution.air_bounces, 0);
        assert_eq!(execution.velocity, Vec3::new(0.0, 0.0, 800.0));
        assert_eq!(execution.momentum_source, None);
        assert_eq!(body.velocity, execution.velocity);
    }

    #[test]
    fn test_air_bounce_increments_once_and_decays() {
        let mut counter = airborne_counter(0);
        let mut body = MotionBody::new(Vec3::new(100.0, 0.0, -200.0));
        let store = SnapshotStore::default();
        let config = BounceConfig::default();

        let execution = try_bounce(&mut counter, &mut body, &store, &config, 1.0).unwrap();

        assert_eq!(execution.kind, BounceKind::Air);
        assert_eq!(counter.air_bounces(), 1);
        assert!((execution.velocity.z - 680.0).abs() < 1e-3);
        assert_eq!(execution.velocity.x, 100.0);
    }

    #[test]
    fn test_limit_denied_without_mutation() {
        let mut counter = airborne_counter(2);
        let mut body = MotionBody::new(Vec3::new(100.0, 0.0, -200.0));
        let before_body = body;
        let store = SnapshotStore::default();

        let result = try_bounce(&mut counter, &mut body, &store, &BounceConfig::default(), 1.0);

        assert_eq!(
            result,
            Err(BounceError::Denied(BounceDenied::AirBounceLimit { used: 2, max: 2 }))
        );
        assert_eq!(counter.air_bounces(), 2);
        assert_eq!(body, before_body);
    }

    #[test]
    fn test_dash_momentum_applied() {
        let mut counter = airborne_counter(0);
        let mut body = MotionBody::new(Vec3::new(600.0, 0.0, -20.0));
        let mut store = SnapshotStore::default();
        store.capture(Vec3::new(600.0, 0.0, 0.0), MotionSource::Dash, SnapshotLabel::DASH, 0.0);

        let execution = try_bounce(&mut counter, &mut body, &store, &BounceConfig::default(), 0.1).unwrap();

        assert_eq!(execution.momentum_source, Some(MotionSource::Dash));
        assert!((execution.velocity.x - 918.0).abs() < 1e-2);
        assert!(execution.velocity.y.abs() < 1e-4);
        assert!((execution.velocity.z - 952.0).abs() < 1e-2);
    }

    #[test]
    fn test_momentum_disabled_reports_no_source() {
        let mut counter = airborne_counter(0);
        let mut body = MotionBody::new(Vec3::new(300.0, 0.0, 0.0));
        let mut store = SnapshotStore::default();
        store.capture(Vec3::new(600.0, 0.0, 0.0), MotionSource::Dash, SnapshotLabel::DASH, 0.0);
        let mut config = BounceConfig::default();
        config.momentum.enabled = false;

        let execution = try_bounce(&mut counter, &mut body, &store, &config, 0.1).unwrap();

        assert_eq!(execution.momentum_source, None);
        assert_eq!(execution.velocity.x, 300.0);
    }

    #[test]
    fn test_preserve_downward_momentum() {
        let mut config = BounceConfig::default();
        config.preserve_downward_momentum = true;

        let falling = standalone_bounce_velocity(Vec3::new(0.0, 0.0, -300.0), 0, &config);
        assert_eq!(falling.z, 500.0);

        // Не падаем → обычная вертикаль
        let level = standalone_bounce_velocity(Vec3::new(0.0, 0.0, 10.0), 0, &config);
        assert_eq!(level.z, 800.0);
    }

    #[test]
    fn test_standalone_horizontal_retention() {
        let config = BounceConfig::low_bounce();
        let velocity = standalone_bounce_velocity(Vec3::new(400.0, -200.0, -50.0), 0, &config);

        assert!((velocity.x - 360.0).abs() < 1e-3);
        assert!((velocity.y + 180.0).abs() < 1e-3);
        assert_eq!(velocity.z, 500.0);
    }

    #[test]
    fn test_select_prefers_dash_over_newer_records() {
        let mut store = SnapshotStore::default();
        store.capture(Vec3::new(600.0, 0.0, 0.0), MotionSource::Dash, SnapshotLabel::DASH, 0.0);
        store.capture(Vec3::new(0.0, 0.0, -300.0), MotionSource::Fall, SnapshotLabel::FALL, 0.05);
        store.capture(Vec3::new(0.0, 500.0, 0.0), MotionSource::External, SnapshotLabel::EXTERNAL, 0.1);

        assert_eq!(select_momentum_snapshot(&store, 0.15).unwrap().source(), MotionSource::Dash);
        // Dash истёк → Fall
        assert_eq!(select_momentum_snapshot(&store, 0.22).unwrap().source(), MotionSource::Fall);
    }

    #[test]
    fn test_select_falls_back_to_latest() {
        let mut store = SnapshotStore::default();
        store.capture(Vec3::new(0.0, 500.0, 0.0), MotionSource::External, SnapshotLabel::EXTERNAL, 0.0);

        assert_eq!(select_momentum_snapshot(&store, 0.1).unwrap().source(), MotionSource::External);
        assert!(select_momentum_snapshot(&store, 0.5).is_none());
    }

    #[test]
    fn test_ticket_reports_validated_state() {
        let counter = airborne_counter(1);
        let body = MotionBody::new(Vec3::new(0.0, 0.0, -10.0));

        let ticket = validate_bounce(&counter, &body, &BounceConfig::default()).unwrap();
        assert_eq!(ticket.kind(), BounceKind::Air);
        assert_eq!(ticket.conditions().air_bounces, 1);
    }
}
