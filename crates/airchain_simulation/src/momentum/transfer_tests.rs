//! Tests for momentum transfer.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use proptest::prelude::*;

    use crate::momentum::{combine, MomentumTransferConfig};
    use crate::shared::axes;
    use crate::snapshot::{MotionSource, SnapshotLabel, VelocitySnapshot};

    const EPS: f32 = 1e-3;

    fn snapshot(velocity: Vec3, source: MotionSource) -> VelocitySnapshot {
        VelocitySnapshot::new(velocity, source, SnapshotLabel::for_source(source), 0.0, 0.2).unwrap()
    }

    #[test]
    fn test_default_multiplier_table() {
        let config = MomentumTransferConfig::default();
        assert_eq!(config.multiplier(MotionSource::Dash), 1.8);
        assert_eq!(config.multiplier(MotionSource::Jump), 1.3);
        assert_eq!(config.multiplier(MotionSource::Fall), 1.0);
        assert_eq!(config.multiplier(MotionSource::External), 1.0);
        assert_eq!(config.multiplier(MotionSource::None), 1.0);
        assert_eq!(config.efficiency, 0.85);
    }

    #[test]
    fn test_dash_direction_preserving() {
        let config = MomentumTransferConfig::default();
        let dash = snapshot(Vec3::new(600.0, 0.0, 0.0), MotionSource::Dash);
        let base = Vec3::new(50.0, -20.0, 680.0);

        let result = combine(base, Some(&dash), &config);

        // 1.8 × 0.85 = 1.53
        let horizontal = axes::horizontal(result);
        assert!((horizontal.length() - 600.0 * 1.53).abs() < EPS, "horizontal = {:?}", horizontal);
        assert!((result.x - 918.0).abs() < EPS);
        assert!(result.y.abs() < EPS);

        // Vertical: 1 + (1.8 − 1) × 0.5 = 1.4
        assert!((config.lift_scale(MotionSource::Dash) - 1.4).abs() < 1e-6);
        assert!((result.z - 680.0 * 1.4).abs() < EPS);
    }

    #[test]
    fn test_diagonal_dash_keeps_direction() {
        let config = MomentumTransferConfig::default();
        let dash = snapshot(Vec3::new(300.0, 400.0, 120.0), MotionSource::Dash);

        let result = combine(Vec3::new(0.0, 0.0, 800.0), Some(&dash), &config);

        // Вертикаль snapshot'а не переносится: только горизонталь
        assert!((axes::horizontal(result).length() - 500.0 * 1.53).abs() < EPS);
        let direction = axes::horizontal(result).normalize();
        assert!((direction - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_jump_does_not_scale_vertical() {
        let config = MomentumTransferConfig::default();
        let jump = snapshot(Vec3::new(200.0, 0.0, 420.0), MotionSource::Jump);

        let result = combine(Vec3::new(0.0, 0.0, 800.0), Some(&jump), &config);

        assert!((result.x - 200.0 * 1.3 * 0.85).abs() < EPS);
        assert_eq!(result.z, 800.0);
    }

    #[test]
    fn test_magnitude_mode_keeps_base_direction() {
        let config = MomentumTransferConfig {
            preserve_direction: false,
            ..default()
        };
        let dash = snapshot(Vec3::new(600.0, 0.0, 0.0), MotionSource::Dash);
        let base = Vec3::new(0.0, 100.0, 700.0);

        let result = combine(base, Some(&dash), &config);

        // Направление base (+Y), скорость |base_h| + speed × factor
        assert!(result.x.abs() < EPS);
        assert!((result.y - (100.0 + 600.0 * 1.53)).abs() < EPS);
        assert!((result.z - 700.0 * 1.4).abs() < EPS);
    }

    #[test]
    fn test_magnitude_mode_without_base_horizontal() {
        let config = MomentumTransferConfig {
            preserve_direction: false,
            ..default()
        };
        let fall = snapshot(Vec3::new(0.0, -250.0, -400.0), MotionSource::Fall);

        let result = combine(Vec3::new(0.0, 0.0, 800.0), Some(&fall), &config);

        // Base без горизонтали → направление snapshot'а (−Y)
        let expected = fall.speed() * 1.0 * 0.85;
        assert!(result.x.abs() < EPS);
        assert!((result.y + expected).abs() < EPS, "result = {:?}", result);
        assert_eq!(result.z, 800.0);
    }

    #[test]
    fn test_disabled_transfer_returns_base() {
        let config = MomentumTransferConfig {
            enabled: false,
            ..default()
        };
        let dash = snapshot(Vec3::new(600.0, 0.0, 0.0), MotionSource::Dash);
        let base = Vec3::new(12.0, 34.0, 800.0);

        assert_eq!(combine(base, Some(&dash), &config), base);
    }

    #[test]
    fn test_sanitized_clamps() {
        let config = MomentumTransferConfig {
            efficiency: 1.7,
            dash_multiplier: f32::INFINITY,
            ..default()
        }
        .sanitized();

        assert_eq!(config.efficiency, 1.0);
        assert_eq!(config.dash_multiplier, 1.8);
    }

    proptest! {
        #[test]
        fn absent_snapshot_is_identity(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            z in -5000.0f32..5000.0,
            preserve_direction in any::<bool>(),
        ) {
            let config = MomentumTransferConfig { preserve_direction, ..default() };
            let base = Vec3::new(x, y, z);
            prop_assert_eq!(combine(base, None, &config), base);
        }

        #[test]
        fn direction_mode_scales_horizontal_by_factor(
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
            z in -2000.0f32..2000.0,
        ) {
            let config = MomentumTransferConfig::default();
            let velocity = Vec3::new(x, y, z);
            prop_assume!(velocity.length() > 1.0);
            let dash = snapshot(velocity, MotionSource::Dash);

            let result = combine(Vec3::new(1.0, 2.0, 300.0), Some(&dash), &config);
            let expected = axes::horizontal(velocity).length() * 1.53;
            prop_assert!((axes::horizontal(result).length() - expected).abs() <= expected * 1e-5 + 1e-3);
        }
    }
}
