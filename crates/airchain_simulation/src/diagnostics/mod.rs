//! Read-only диагностика momentum-состояния актора (debug overlay, логи)

use crate::ability::AirBounceCounter;
use crate::snapshot::{SnapshotStore, VelocitySnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumDiagnostics {
    pub air_bounces: u32,
    pub max_air_bounces: u32,
    pub grounded: bool,
    /// Занятые слоты (включая ещё не вычищенные истёкшие)
    pub stored: usize,
    pub valid: usize,
    pub ticking: bool,
    pub latest: Option<VelocitySnapshot>,
}

impl MomentumDiagnostics {
    pub fn read(counter: &AirBounceCounter, store: &SnapshotStore, now: f64) -> Self {
        Self {
            air_bounces: counter.air_bounces(),
            max_air_bounces: counter.max_air_bounces(),
            grounded: counter.is_grounded(),
            stored: store.len(),
            valid: store.valid_count(now),
            ticking: store.is_ticking(),
            latest: store.latest(now).cloned(),
        }
    }

    pub fn summary(&self) -> String {
        let latest = match &self.latest {
            Some(snapshot) => format!("{} {:.1} u/s", snapshot.label(), snapshot.speed()),
            None => "none".to_string(),
        };
        format!(
            "air {}/{} | {} | snapshots {}/{} valid{} | latest: {}",
            self.air_bounces,
            self.max_air_bounces,
            if self.grounded { "grounded" } else { "airborne" },
            self.valid,
            self.stored,
            if self.ticking { " (ticking)" } else { "" },
            latest
        )
    }
}
