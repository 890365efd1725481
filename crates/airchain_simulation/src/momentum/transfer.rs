//! Momentum transfer calculation
//!
//! Формула:
//! - factor = multiplier(source) × efficiency
//! - direction mode: horizontal = horizontal(snapshot.velocity) × factor
//! - magnitude mode: направление base, |h| = |base_h| + snapshot.speed × factor
//! - vertical = base.z, для Dash × (1 + (multiplier − 1) × 0.5)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::axes;
use crate::snapshot::{MotionSource, VelocitySnapshot};

/// Доля multiplier'а, переходящая в вертикальный lift (только Dash)
pub const LIFT_CARRY_OVER: f32 = 0.5;

/// Настройки momentum transfer (часть BounceConfig)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct MomentumTransferConfig {
    /// Выключено → combine всегда возвращает base
    pub enabled: bool,
    pub dash_multiplier: f32,
    pub jump_multiplier: f32,
    pub fall_multiplier: f32,
    /// Transfer efficiency ∈ [0, 1]
    pub efficiency: f32,
    /// true: берём направление snapshot'а; false: направление base + прибавка скорости
    pub preserve_direction: bool,
}

impl Default for MomentumTransferConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dash_multiplier: 1.8,
            jump_multiplier: 1.3,
            fall_multiplier: 1.0,
            efficiency: 0.85,
            preserve_direction: true,
        }
    }
}

impl MomentumTransferConfig {
    /// Per-source multiplier (fixed table)
    #[inline]
    pub fn multiplier(&self, source: MotionSource) -> f32 {
        match source {
            MotionSource::Dash => self.dash_multiplier,
            MotionSource::Jump => self.jump_multiplier,
            MotionSource::Fall => self.fall_multiplier,
            MotionSource::None | MotionSource::External => 1.0,
        }
    }

    #[inline]
    pub fn transfer_factor(&self, source: MotionSource) -> f32 {
        self.multiplier(source) * self.efficiency
    }

    /// Множитель вертикали для source
    #[inline]
    pub fn lift_scale(&self, source: MotionSource) -> f32 {
        if source.is_momentum_heavy() {
            1.0 + (self.multiplier(source) - 1.0) * LIFT_CARRY_OVER
        } else {
            1.0
        }
    }

    /// Clamp в диапазоны из tuning-таблицы (multipliers 0..3, efficiency 0..1)
    pub fn sanitized(mut self) -> Self {
        self.dash_multiplier = clamp_or(self.dash_multiplier, 0.0, 3.0, 1.8);
        self.jump_multiplier = clamp_or(self.jump_multiplier, 0.0, 3.0, 1.3);
        self.fall_multiplier = clamp_or(self.fall_multiplier, 0.0, 2.0, 1.0);
        self.efficiency = clamp_or(self.efficiency, 0.0, 1.0, 0.85);
        self
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Совместить base velocity новой способности с captured snapshot'ом
///
/// `snapshot == None` (или transfer выключен) → ровно `base`.
pub fn combine(base: Vec3, snapshot: Option<&VelocitySnapshot>, config: &MomentumTransferConfig) -> Vec3 {
    let Some(snapshot) = snapshot.filter(|_| config.enabled) else {
        return base;
    };

    let source = snapshot.source();
    let factor = config.transfer_factor(source);

    let horizontal = if config.preserve_direction {
        axes::horizontal(snapshot.velocity()) * factor
    } else {
        let base_horizontal = axes::horizontal(base);
        let direction = base_horizontal
            .try_normalize()
            .or_else(|| axes::horizontal(snapshot.velocity()).try_normalize())
            .unwrap_or(Vec3::ZERO);
        direction * (base_horizontal.length() + snapshot.speed() * factor)
    };

    let vertical = axes::vertical(base) * config.lift_scale(source);

    axes::compose(horizontal, vertical)
}
