//! Мировые оси симуляции
//!
//! Конвенция: **Z: вверх**, плоскость земли: XY.
//! Movement collaborator отдаёт velocity в тех же осях.

use bevy::prelude::*;

/// Вертикальная ось мира
pub const UP: Vec3 = Vec3::Z;

/// Горизонтальная (ground-plane) компонента вектора
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

/// Вертикальная компонента (скаляр по UP)
#[inline]
pub fn vertical(v: Vec3) -> f32 {
    v.z
}

/// Собрать вектор из горизонтальной части и вертикального скаляра
#[inline]
pub fn compose(horizontal: Vec3, vertical: f32) -> Vec3 {
    Vec3::new(horizontal.x, horizontal.y, vertical)
}
