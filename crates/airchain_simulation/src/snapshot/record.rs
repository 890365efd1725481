//! VelocitySnapshot: неизменяемая запись одного motion event
//!
//! Создаётся producing action (dash/jump/fall) в момент изменения velocity,
//! никогда не мутирует, "умирает" по истечении `valid_for`.

use std::borrow::Cow;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Порог скорости: всё что ≤ считается шумом и не сохраняется
pub const MIN_SNAPSHOT_SPEED: f32 = 1.0;

/// Validity window по умолчанию (секунды)
pub const DEFAULT_SNAPSHOT_VALIDITY: f64 = 0.2;

/// Какая motion-система породила snapshot (coarse category)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum MotionSource {
    #[default]
    None,
    Dash,
    Jump,
    Fall,
    External,
}

impl MotionSource {
    /// Количество вариантов (размер fixed-table индексов)
    pub const COUNT: usize = 5;

    pub const ALL: [MotionSource; Self::COUNT] = [
        MotionSource::None,
        MotionSource::Dash,
        MotionSource::Jump,
        MotionSource::Fall,
        MotionSource::External,
    ];

    /// Dense index для `[T; COUNT]` таблиц
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            MotionSource::None => 0,
            MotionSource::Dash => 1,
            MotionSource::Jump => 2,
            MotionSource::Fall => 3,
            MotionSource::External => 4,
        }
    }

    /// Dash несёт часть lift'а в вертикаль при momentum transfer
    #[inline]
    pub const fn is_momentum_heavy(self) -> bool {
        matches!(self, MotionSource::Dash)
    }
}

/// Fine-grained идентификатор причины (аналог gameplay tag)
///
/// Lookup по label независим от `MotionSource`: два разных label могут
/// иметь один source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotLabel(Cow<'static, str>);

impl SnapshotLabel {
    pub const DASH: SnapshotLabel = SnapshotLabel::from_static("Ability.Dash");
    pub const JUMP: SnapshotLabel = SnapshotLabel::from_static("State.Jumping");
    pub const FALL: SnapshotLabel = SnapshotLabel::from_static("State.Falling");
    pub const EXTERNAL: SnapshotLabel = SnapshotLabel::from_static("Motion.External");
    pub const NONE: SnapshotLabel = SnapshotLabel::from_static("");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label по умолчанию для source (когда producer не указал свой)
    pub fn for_source(source: MotionSource) -> Self {
        match source {
            MotionSource::Dash => Self::DASH,
            MotionSource::Jump => Self::JUMP,
            MotionSource::Fall => Self::FALL,
            MotionSource::External => Self::EXTERNAL,
            MotionSource::None => Self::NONE,
        }
    }
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for SnapshotLabel {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

/// Snapshot velocity в момент capture
///
/// Инвариант: `speed > MIN_SNAPSHOT_SPEED` и все компоненты velocity конечны.
/// Поля читаются только через accessors. Только `Serialize`: собирается исключительно через `new`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocitySnapshot {
    velocity: Vec3,
    direction: Vec3,
    speed: f32,
    source: MotionSource,
    label: SnapshotLabel,
    captured_at: f64,
    valid_for: f64,
}

impl VelocitySnapshot {
    /// Собрать snapshot; `None` если velocity шумовая или не конечная
    pub fn new(
        velocity: Vec3,
        source: MotionSource,
        label: SnapshotLabel,
        captured_at: f64,
        valid_for: f64,
    ) -> Option<Self> {
        if !velocity.is_finite() {
            return None;
        }
        let speed = velocity.length();
        if speed <= MIN_SNAPSHOT_SPEED {
            return None;
        }

        Some(Self {
            velocity,
            direction: velocity / speed,
            speed,
            source,
            label,
            captured_at,
            valid_for,
        })
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn source(&self) -> MotionSource {
        self.source
    }

    pub fn label(&self) -> &SnapshotLabel {
        &self.label
    }

    pub fn captured_at(&self) -> f64 {
        self.captured_at
    }

    pub fn valid_for(&self) -> f64 {
        self.valid_for
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.captured_at
    }

    /// Сколько ещё живёт (0 если истёк)
    pub fn remaining(&self, now: f64) -> f64 {
        (self.valid_for - self.age(now)).max(0.0)
    }

    pub fn is_valid(&self, now: f64) -> bool {
        self.age(now) <= self.valid_for && self.speed > MIN_SNAPSHOT_SPEED
    }
}
