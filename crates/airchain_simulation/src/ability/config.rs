//! BounceConfig: tuning bounce способности (per-actor component)
//!
//! Загружается через serde частично: отсутствующие поля берутся из Default.
//! Setters и `sanitized()` приводят значения в рабочие диапазоны.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::counter::{AirBounceCounter, DEFAULT_MAX_AIR_BOUNCES};
use super::gate::BounceRules;
use crate::momentum::MomentumTransferConfig;

pub const MIN_BOUNCE_VELOCITY: f32 = 200.0;
pub const MAX_BOUNCE_VELOCITY: f32 = 2000.0;

#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct BounceConfig {
    /// Базовая вертикальная скорость bounce'а (units/s)
    pub upward_velocity: f32,
    /// Множитель на каждый air bounce: upward × reduction^n
    pub air_bounce_velocity_reduction: f32,
    /// Доля текущей горизонтали, сохраняемая без momentum snapshot'а
    pub horizontal_retention: f32,
    pub horizontal_multiplier: f32,
    /// Падаем → vertical = current.z + upward (вместо фиксированной)
    pub preserve_downward_momentum: bool,
    pub allow_bounce_while_rising: bool,
    /// Vertical speed выше которой актор считается "rising"
    pub rising_threshold: f32,
    pub log_bounce_events: bool,
    pub momentum: MomentumTransferConfig,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            upward_velocity: 800.0,
            air_bounce_velocity_reduction: 0.85,
            horizontal_retention: 1.0,
            horizontal_multiplier: 1.0,
            preserve_downward_momentum: false,
            allow_bounce_while_rising: false,
            rising_threshold: 50.0,
            log_bounce_events: false,
            momentum: MomentumTransferConfig::default(),
        }
    }
}

impl BounceConfig {
    /// Короткий bounce, один air bounce, теряет часть горизонтали
    pub fn low_bounce() -> Self {
        Self {
            upward_velocity: 500.0,
            air_bounce_velocity_reduction: 0.8,
            horizontal_retention: 0.9,
            ..Default::default()
        }
    }

    /// Высокий bounce, три air bounce'а
    pub fn high_bounce() -> Self {
        Self {
            upward_velocity: 1200.0,
            air_bounce_velocity_reduction: 0.75,
            horizontal_retention: 1.0,
            ..Default::default()
        }
    }

    pub fn snappy() -> Self {
        Self {
            upward_velocity: 900.0,
            horizontal_retention: 1.0,
            ..Default::default()
        }
    }

    /// Вертикальная скорость для bounce'а с номером `air_bounces` (после инкремента)
    pub fn effective_upward_velocity(&self, air_bounces: u32) -> f32 {
        let exponent = i32::try_from(air_bounces).unwrap_or(i32::MAX);
        self.upward_velocity * self.air_bounce_velocity_reduction.powi(exponent)
    }

    pub fn rules(&self) -> BounceRules {
        BounceRules {
            allow_while_rising: self.allow_bounce_while_rising,
            rising_threshold: self.rising_threshold,
        }
    }

    pub fn set_upward_velocity(&mut self, velocity: f32) {
        self.upward_velocity = clamp_or(velocity, MIN_BOUNCE_VELOCITY, MAX_BOUNCE_VELOCITY, 800.0);
    }

    pub fn set_air_bounce_velocity_reduction(&mut self, reduction: f32) {
        self.air_bounce_velocity_reduction = clamp_or(reduction, 0.1, 1.0, 0.85);
    }

    pub fn set_horizontal_retention(&mut self, retention: f32) {
        self.horizontal_retention = clamp_or(retention, 0.0, 1.0, 1.0);
    }

    pub fn set_rising_threshold(&mut self, threshold: f32) {
        self.rising_threshold = clamp_or(threshold, 0.0, MAX_BOUNCE_VELOCITY, 50.0);
    }

    /// Привести все поля в рабочие диапазоны (после загрузки из файла)
    pub fn sanitized(mut self) -> Self {
        self.set_upward_velocity(self.upward_velocity);
        self.set_air_bounce_velocity_reduction(self.air_bounce_velocity_reduction);
        self.set_horizontal_retention(self.horizontal_retention);
        self.horizontal_multiplier = clamp_or(self.horizontal_multiplier, 0.0, 3.0, 1.0);
        self.set_rising_threshold(self.rising_threshold);
        self.momentum = self.momentum.sanitized();
        self
    }
}

/// Именованные пресеты: config + лимит air bounce'ов для counter'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum BouncePreset {
    #[default]
    Standard,
    Low,
    High,
    Snappy,
}

impl BouncePreset {
    pub fn config(self) -> BounceConfig {
        match self {
            BouncePreset::Standard => BounceConfig::default(),
            BouncePreset::Low => BounceConfig::low_bounce(),
            BouncePreset::High => BounceConfig::high_bounce(),
            BouncePreset::Snappy => BounceConfig::snappy(),
        }
    }

    pub fn max_air_bounces(self) -> u32 {
        match self {
            BouncePreset::Low => 1,
            BouncePreset::High => 3,
            BouncePreset::Standard | BouncePreset::Snappy => DEFAULT_MAX_AIR_BOUNCES,
        }
    }

    pub fn counter(self) -> AirBounceCounter {
        AirBounceCounter::new(self.max_air_bounces())
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = BounceConfig::default();
        assert_eq!(config.upward_velocity, 800.0);
        assert_eq!(config.rising_threshold, 50.0);
        assert!(!config.allow_bounce_while_rising);
        assert!(config.momentum.enabled);
    }

    #[test]
    fn test_effective_upward_velocity_decays() {
        let config = BounceConfig::default();
        assert_eq!(config.effective_upward_velocity(0), 800.0);
        assert!((config.effective_upward_velocity(1) - 680.0).abs() < 1e-3);
        assert!((config.effective_upward_velocity(2) - 578.0).abs() < 1e-3);
    }

    #[test]
    fn test_presets() {
        let low = BounceConfig::low_bounce();
        assert_eq!(low.upward_velocity, 500.0);
        assert_eq!(low.horizontal_retention, 0.9);
        assert_eq!(BouncePreset::Low.max_air_bounces(), 1);

        let high = BounceConfig::high_bounce();
        assert_eq!(high.upward_velocity, 1200.0);
        assert_eq!(high.air_bounce_velocity_reduction, 0.75);
        assert_eq!(BouncePreset::High.counter().max_air_bounces(), 3);

        assert_eq!(BouncePreset::Snappy.config().upward_velocity, 900.0);
        assert_eq!(BouncePreset::Snappy.max_air_bounces(), 2);
    }

    #[test]
    fn test_setters_clamp() {
        let mut config = BounceConfig::default();
        config.set_upward_velocity(50.0);
        assert_eq!(config.upward_velocity, MIN_BOUNCE_VELOCITY);
        config.set_upward_velocity(9000.0);
        assert_eq!(config.upward_velocity, MAX_BOUNCE_VELOCITY);
        config.set_upward_velocity(f32::NAN);
        assert_eq!(config.upward_velocity, 800.0);

        config.set_horizontal_retention(1.5);
        assert_eq!(config.horizontal_retention, 1.0);
    }

    #[test]
    fn test_partial_config_from_json() {
        let json = r#"{ "upward_velocity": 950.0, "momentum": { "dash_multiplier": 2.0 } }"#;
        let config: BounceConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.upward_velocity, 950.0);
        assert_eq!(config.rising_threshold, 50.0);
        assert_eq!(config.momentum.dash_multiplier, 2.0);
        assert_eq!(config.momentum.efficiency, 0.85);
    }

    #[test]
    fn test_sanitized_clamps_loaded_values() {
        let json = r#"{ "upward_velocity": 10.0, "momentum": { "efficiency": 4.0 } }"#;
        let config: BounceConfig = serde_json::from_str::<BounceConfig>(json).unwrap().sanitized();

        assert_eq!(config.upward_velocity, MIN_BOUNCE_VELOCITY);
        assert_eq!(config.momentum.efficiency, 1.0);
    }
}
