//! SnapshotStore: fixed-capacity ring buffer снапшотов velocity
//!
//! # Layout (arena + index)
//!
//! ```text
//! slots:     [Some(Dash) | Some(Jump) | None | ... ]   ← источник истины
//! by_source: [None, Some(0), Some(1), None, None]       ← derived cache
//! by_label:  {"Ability.Dash" → 0, "State.Jumping" → 1}  ← derived cache
//! ```
//!
//! Записи адресуются по slot index, не по ссылке. Индексы это кэш: при lookup
//! слот перепроверяется, а `rebuild_indices()` восстанавливает их из arena.
//!
//! # Scheduling
//!
//! `ticking` = true пока в store есть хотя бы одна запись. Capture включает,
//! cleanup/clear выключают. ECS слой зеркалит флаг маркером `SnapshotTicking`.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::record::{MotionSource, SnapshotLabel, VelocitySnapshot, DEFAULT_SNAPSHOT_VALIDITY};
use crate::logger;

/// Ёмкость ring buffer (константа, не растёт)
pub const SNAPSHOT_CAPACITY: usize = 8;

/// Допустимый диапазон validity window (секунды)
pub const MIN_SNAPSHOT_VALIDITY: f64 = 0.05;
pub const MAX_SNAPSHOT_VALIDITY: f64 = 1.0;

/// Настройки store (per-actor)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Validity window для новых записей (секунды)
    pub default_validity: f64,
    /// Логировать capture/cleanup (шумно, только для отладки)
    pub log_snapshots: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            default_validity: DEFAULT_SNAPSHOT_VALIDITY,
            log_snapshots: false,
        }
    }
}

impl SnapshotConfig {
    /// Clamp validity в допустимый диапазон
    pub fn sanitized(mut self) -> Self {
        self.default_validity = clamp_validity(self.default_validity);
        self
    }
}

fn clamp_validity(valid_for: f64) -> f64 {
    if valid_for.is_finite() {
        valid_for.clamp(MIN_SNAPSHOT_VALIDITY, MAX_SNAPSHOT_VALIDITY)
    } else {
        DEFAULT_SNAPSHOT_VALIDITY
    }
}

/// Переход scheduling-состояния store после cleanup
///
/// Cleanup умеет только выключать ticking; включает его capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickTransition {
    Unchanged,
    Disabled,
}

/// Результат одного cleanup прохода
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    /// Сколько записей истекло и было удалено
    pub expired: usize,
    pub transition: TickTransition,
}

/// Per-actor cache недавних motion snapshot'ов
///
/// Инварианты:
/// - `occupied` == число `Some` слотов ≤ `SNAPSHOT_CAPACITY`
/// - индексы указывают только на занятые слоты с тем же source/label
/// - при переполнении перезаписывается самый старый слот (cursor)
#[derive(Component, Debug, Clone)]
pub struct SnapshotStore {
    slots: [Option<VelocitySnapshot>; SNAPSHOT_CAPACITY],
    /// Следующий слот для записи (он же самый старый при заполненном буфере)
    cursor: usize,
    occupied: usize,
    by_source: [Option<usize>; MotionSource::COUNT],
    by_label: HashMap<SnapshotLabel, usize>,
    config: SnapshotConfig,
    ticking: bool,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(SnapshotConfig::default())
    }
}

impl SnapshotStore {
    pub fn new(config: SnapshotConfig) -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            cursor: 0,
            occupied: 0,
            by_source: [None; MotionSource::COUNT],
            by_label: HashMap::with_capacity(SNAPSHOT_CAPACITY),
            config: config.sanitized(),
            ticking: false,
        }
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Поменять настройки; уже записанные snapshot'ы не трогаются
    pub fn set_config(&mut self, config: SnapshotConfig) {
        self.config = config.sanitized();
    }

    /// Записать snapshot с validity по умолчанию
    ///
    /// Возвращает `false` (no-op) для шумовой или не конечной velocity.
    pub fn capture(&mut self, velocity: Vec3, source: MotionSource, label: SnapshotLabel, now: f64) -> bool {
        let valid_for = self.config.default_validity;
        self.capture_for(velocity, source, label, now, valid_for)
    }

    /// Записать snapshot с собственным validity window
    pub fn capture_for(
        &mut self,
        velocity: Vec3,
        source: MotionSource,
        label: SnapshotLabel,
        now: f64,
        valid_for: f64,
    ) -> bool {
        let Some(snapshot) = VelocitySnapshot::new(velocity, source, label, now, clamp_validity(valid_for)) else {
            if self.config.log_snapshots {
                logger::log(&format!(
                    "VelocitySnapshot: rejected {:?} capture (velocity {:?} below noise threshold)",
                    source, velocity
                ));
            }
            return false;
        };

        let slot = self.cursor;
        match self.slots[slot].take() {
            Some(overwritten) => self.forget_slot(slot, &overwritten),
            None => self.occupied += 1,
        }

        self.by_source[source.index()] = Some(slot);
        self.by_label.insert(snapshot.label().clone(), slot);

        if self.config.log_snapshots {
            logger::log(&format!(
                "VelocitySnapshot: captured {} ({:?}) {:.1} units/s into slot {}",
                snapshot.label(),
                source,
                snapshot.speed(),
                slot
            ));
        }

        self.slots[slot] = Some(snapshot);
        self.cursor = (slot + 1) % SNAPSHOT_CAPACITY;

        if !self.ticking {
            self.ticking = true;
            if self.config.log_snapshots {
                logger::log("VelocitySnapshot: ticking enabled");
            }
        }

        true
    }

    /// Самый свежий валидный snapshot (скан ≤ N слотов от новых к старым)
    pub fn latest(&self, now: f64) -> Option<&VelocitySnapshot> {
        self.newest_first().find(|snapshot| snapshot.is_valid(now))
    }

    /// O(1) lookup по source; устаревший индекс = отсутствие (без fallback скана)
    pub fn by_source(&self, source: MotionSource, now: f64) -> Option<&VelocitySnapshot> {
        let slot = self.by_source[source.index()]?;
        self.slots[slot]
            .as_ref()
            .filter(|snapshot| snapshot.source() == source && snapshot.is_valid(now))
    }

    /// O(1) lookup по label
    pub fn by_label(&self, label: &SnapshotLabel, now: f64) -> Option<&VelocitySnapshot> {
        let slot = *self.by_label.get(label)?;
        self.slots[slot]
            .as_ref()
            .filter(|snapshot| snapshot.label() == label && snapshot.is_valid(now))
    }

    /// Сброс store (respawn/reset)
    pub fn clear(&mut self) {
        self.slots = std::array::from_fn(|_| None);
        self.cursor = 0;
        self.occupied = 0;
        self.by_source = [None; MotionSource::COUNT];
        self.by_label.clear();
        self.ticking = false;

        if self.config.log_snapshots {
            logger::log("VelocitySnapshot: cleared all snapshots");
        }
    }

    /// Один cleanup проход: удаляет истёкшие записи, выключает ticking если пусто
    pub fn cleanup(&mut self, now: f64) -> CleanupReport {
        let mut expired = 0;

        for slot in 0..SNAPSHOT_CAPACITY {
            let is_expired = self.slots[slot]
                .as_ref()
                .is_some_and(|snapshot| !snapshot.is_valid(now));
            if !is_expired {
                continue;
            }
            if let Some(snapshot) = self.slots[slot].take() {
                self.forget_slot(slot, &snapshot);
                self.occupied -= 1;
                expired += 1;
            }
        }

        if expired > 0 {
            self.rebuild_indices();
            if self.config.log_snapshots {
                logger::log(&format!("VelocitySnapshot: cleaned {} expired snapshots", expired));
            }
        }

        let transition = if self.occupied == 0 && self.ticking {
            self.ticking = false;
            if self.config.log_snapshots {
                logger::log("VelocitySnapshot: ticking disabled (no valid snapshots)");
            }
            TickTransition::Disabled
        } else {
            TickTransition::Unchanged
        };

        CleanupReport { expired, transition }
    }

    /// Пересобрать индексы из arena (от старых к новым: новые побеждают)
    pub fn rebuild_indices(&mut self) {
        self.by_source = [None; MotionSource::COUNT];
        self.by_label.clear();

        for offset in 0..SNAPSHOT_CAPACITY {
            let slot = (self.cursor + offset) % SNAPSHOT_CAPACITY;
            if let Some(snapshot) = &self.slots[slot] {
                self.by_source[snapshot.source().index()] = Some(slot);
                self.by_label.insert(snapshot.label().clone(), slot);
            }
        }
    }

    /// Физически занятых слотов (включая логически истёкшие до cleanup)
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub const fn capacity(&self) -> usize {
        SNAPSHOT_CAPACITY
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn valid_count(&self, now: f64) -> usize {
        self.iter_valid(now).count()
    }

    pub fn has_valid(&self, now: f64) -> bool {
        self.latest(now).is_some()
    }

    /// Валидные snapshot'ы, от новых к старым
    pub fn iter_valid(&self, now: f64) -> impl Iterator<Item = &VelocitySnapshot> + '_ {
        self.newest_first().filter(move |snapshot| snapshot.is_valid(now))
    }

    /// Дамп arena в logger (только чтение)
    pub fn log_contents(&self, now: f64) {
        logger::log_info(&format!(
            "=== VELOCITY SNAPSHOTS: occupied {}/{}, cursor {}, ticking {} ===",
            self.occupied, SNAPSHOT_CAPACITY, self.cursor, self.ticking
        ));
        for (slot, entry) in self.slots.iter().enumerate() {
            if let Some(snapshot) = entry {
                logger::log_info(&format!(
                    "  [{}] {} ({:?}) speed {:.1}, valid {}, age {:.3}s",
                    slot,
                    snapshot.label(),
                    snapshot.source(),
                    snapshot.speed(),
                    if snapshot.is_valid(now) { "YES" } else { "NO" },
                    snapshot.age(now)
                ));
            }
        }
    }

    fn newest_first(&self) -> impl Iterator<Item = &VelocitySnapshot> + '_ {
        (1..=SNAPSHOT_CAPACITY).filter_map(move |back| {
            let slot = (self.cursor + SNAPSHOT_CAPACITY - back) % SNAPSHOT_CAPACITY;
            self.slots[slot].as_ref()
        })
    }

    /// Убрать индексы, указывающие на `slot` (перед перезаписью/удалением)
    fn forget_slot(&mut self, slot: usize, snapshot: &VelocitySnapshot) {
        let source_index = snapshot.source().index();
        if self.by_source[source_index] == Some(slot) {
            self.by_source[source_index] = None;
        }
        if self.by_label.get(snapshot.label()) == Some(&slot) {
            self.by_label.remove(snapshot.label());
        }
    }
}
