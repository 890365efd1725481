//! Shared bounce predicate
//!
//! `evaluate_bounce`: единственный источник решения "можно ли bounce".
//! Его вызывают и validate (до активации), и execute (повторно, на живом
//! состоянии). Расхождения между ними быть не может: правило одно.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::counter::AirBounceCounter;
use crate::shared::axes;

/// Тип bounce'а, определяется состоянием на момент проверки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum BounceKind {
    Ground,
    Air,
}

/// Снимок состояния, по которому принимается решение
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceConditions {
    pub grounded: bool,
    pub air_bounces: u32,
    pub max_air_bounces: u32,
    /// Вертикальная скорость (Z-up)
    pub vertical_speed: f32,
}

impl BounceConditions {
    pub fn capture(counter: &AirBounceCounter, velocity: Vec3) -> Self {
        Self {
            grounded: counter.is_grounded(),
            air_bounces: counter.air_bounces(),
            max_air_bounces: counter.max_air_bounces(),
            vertical_speed: axes::vertical(velocity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceRules {
    pub allow_while_rising: bool,
    pub rising_threshold: f32,
}

impl Default for BounceRules {
    fn default() -> Self {
        Self {
            allow_while_rising: false,
            rising_threshold: 50.0,
        }
    }
}

/// Причина отказа
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
pub enum BounceDenied {
    #[error("air bounce limit reached ({used}/{max})")]
    AirBounceLimit { used: u32, max: u32 },

    #[error("actor is rising (vertical speed {vertical_speed:.1} > {threshold:.1})")]
    Rising { vertical_speed: f32, threshold: f32 },
}

/// Решение: на земле → Ground; в воздухе → лимит, затем rising, затем Air
pub fn evaluate_bounce(conditions: &BounceConditions, rules: &BounceRules) -> Result<BounceKind, BounceDenied> {
    if conditions.grounded {
        return Ok(BounceKind::Ground);
    }

    if conditions.air_bounces >= conditions.max_air_bounces {
        return Err(BounceDenied::AirBounceLimit {
            used: conditions.air_bounces,
            max: conditions.max_air_bounces,
        });
    }

    if !rules.allow_while_rising && conditions.vertical_speed > rules.rising_threshold {
        return Err(BounceDenied::Rising {
            vertical_speed: conditions.vertical_speed,
            threshold: rules.rising_threshold,
        });
    }

    Ok(BounceKind::Air)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airborne(air_bounces: u32, vertical_speed: f32) -> BounceConditions {
        BounceConditions {
            grounded: false,
            air_bounces,
            max_air_bounces: 2,
            vertical_speed,
        }
    }

    #[test]
    fn test_grounded_always_allowed() {
        let conditions = BounceConditions {
            grounded: true,
            air_bounces: 5,
            max_air_bounces: 2,
            vertical_speed: 900.0,
        };
        assert_eq!(evaluate_bounce(&conditions, &BounceRules::default()), Ok(BounceKind::Ground));
    }

    #[test]
    fn test_air_bounce_within_limit() {
        let rules = BounceRules::default();
        assert_eq!(evaluate_bounce(&airborne(0, -100.0), &rules), Ok(BounceKind::Air));
        assert_eq!(evaluate_bounce(&airborne(1, 0.0), &rules), Ok(BounceKind::Air));
    }

    #[test]
    fn test_limit_checked_before_rising() {
        let result = evaluate_bounce(&airborne(2, 500.0), &BounceRules::default());
        assert_eq!(result, Err(BounceDenied::AirBounceLimit { used: 2, max: 2 }));
    }

    #[test]
    fn test_rising_denied_unless_allowed() {
        let mut rules = BounceRules::default();
        assert!(matches!(
            evaluate_bounce(&airborne(0, 200.0), &rules),
            Err(BounceDenied::Rising { .. })
        ));
        // Ровно на пороге: ещё не rising
        assert_eq!(evaluate_bounce(&airborne(0, 50.0), &rules), Ok(BounceKind::Air));

        rules.allow_while_rising = true;
        assert_eq!(evaluate_bounce(&airborne(0, 200.0), &rules), Ok(BounceKind::Air));
    }

    #[test]
    fn test_conditions_capture_from_counter() {
        let mut counter = AirBounceCounter::new(3);
        counter.leave_ground();
        let conditions = BounceConditions::capture(&counter, Vec3::new(100.0, 0.0, -40.0));

        assert!(!conditions.grounded);
        assert_eq!(conditions.max_air_bounces, 3);
        assert_eq!(conditions.vertical_speed, -40.0);
    }

    #[test]
    fn test_denial_messages() {
        let denied = BounceDenied::AirBounceLimit { used: 2, max: 2 };
        assert_eq!(denied.to_string(), "air bounce limit reached (2/2)");
    }
}
