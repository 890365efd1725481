//! AirBounceCounter: счётчик air bounce'ов + ground/airborne состояние
//!
//! State machine:
//!
//! ```text
//! Grounded ──leave_ground()──▶ Airborne
//!    ▲                            │
//!    └────────land(now)───────────┘   (air_bounces = 0, last_ground_contact = now)
//! ```
//!
//! Counter целочисленный. Если когда-нибудь понадобится репликация через
//! float-атрибуты: конвертация живёт на границе репликации, не здесь.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Максимально допустимый лимит air bounce'ов (tuning clamp)
pub const MAX_AIR_BOUNCES_LIMIT: u32 = 10;

/// Лимит по умолчанию
pub const DEFAULT_MAX_AIR_BOUNCES: u32 = 2;

/// Ground/airborne классификация
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum GroundState {
    Grounded,
    Airborne,
}

/// Per-ability counter state
///
/// Инварианты:
/// - `air_bounces` сбрасывается в 0 ровно на переходе airborne → grounded
/// - `air_bounces` не превышает `max_air_bounces` за счёт bounce'ов
///   (отклонённая активация ничего не мутирует)
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct AirBounceCounter {
    air_bounces: u32,
    max_air_bounces: u32,
    grounded: bool,
    last_ground_contact: f64,
}

impl Default for AirBounceCounter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AIR_BOUNCES)
    }
}

impl AirBounceCounter {
    pub fn new(max_air_bounces: u32) -> Self {
        Self {
            air_bounces: 0,
            max_air_bounces: max_air_bounces.min(MAX_AIR_BOUNCES_LIMIT),
            grounded: true,
            last_ground_contact: 0.0,
        }
    }

    pub fn air_bounces(&self) -> u32 {
        self.air_bounces
    }

    pub fn max_air_bounces(&self) -> u32 {
        self.max_air_bounces
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn state(&self) -> GroundState {
        if self.grounded {
            GroundState::Grounded
        } else {
            GroundState::Airborne
        }
    }

    pub fn last_ground_contact(&self) -> f64 {
        self.last_ground_contact
    }

    /// Сколько air bounce'ов ещё доступно
    pub fn remaining(&self) -> u32 {
        self.max_air_bounces.saturating_sub(self.air_bounces)
    }

    /// Runtime tuning лимита (clamp к `MAX_AIR_BOUNCES_LIMIT`)
    pub fn set_max_air_bounces(&mut self, max_air_bounces: u32) {
        self.max_air_bounces = max_air_bounces.min(MAX_AIR_BOUNCES_LIMIT);
    }

    /// Landing event. `true` только на переходе airborne → grounded.
    ///
    /// Повторный landing на земле: no-op (без двойного reset и re-stamp).
    pub fn land(&mut self, now: f64) -> bool {
        if self.grounded {
            return false;
        }
        self.grounded = true;
        self.air_bounces = 0;
        self.last_ground_contact = now;
        true
    }

    /// Потеря контакта с землёй (jump start, сход с края)
    pub fn leave_ground(&mut self) -> bool {
        if !self.grounded {
            return false;
        }
        self.grounded = false;
        true
    }

    /// Применить ground contact событие
    pub fn set_ground_contact(&mut self, grounded: bool, now: f64) -> bool {
        if grounded {
            self.land(now)
        } else {
            self.leave_ground()
        }
    }

    /// Засчитать air bounce. Вызывается только из execute после guard'а.
    pub(crate) fn record_air_bounce(&mut self) {
        self.air_bounces += 1;
    }

    /// Принудительный reset (respawn); не трогает ground state
    pub fn reset(&mut self) {
        self.air_bounces = 0;
    }

    #[cfg(test)]
    pub(crate) fn with_state(grounded: bool, air_bounces: u32, max_air_bounces: u32) -> Self {
        Self {
            air_bounces,
            max_air_bounces,
            grounded,
            last_ground_contact: 0.0,
        }
    }
}
