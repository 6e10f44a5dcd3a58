//! The timing lookup table and its JSON loader.

use serde::{Deserialize, Serialize};
use silk_device::{CostClass, DriveStrength, ResourceKind};
use std::collections::HashMap;
use std::path::Path;

/// One measured delay record from the characterization harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayRecord {
    /// Source resource kind.
    pub from: ResourceKind,
    /// Destination resource kind.
    pub to: ResourceKind,
    /// Connection cost class the measurement was taken over.
    pub class: CostClass,
    /// Drive-strength variant, when the source is an output driver;
    /// `None` is the kind-pair baseline.
    #[serde(default)]
    pub drive: Option<DriveStrength>,
    /// Rising-edge propagation delay in nanoseconds.
    pub rise_ns: f64,
    /// Falling-edge propagation delay in nanoseconds.
    pub fall_ns: f64,
}

#[derive(Debug, Deserialize)]
struct TimingFile {
    entries: Vec<DelayRecord>,
}

type Key = (ResourceKind, ResourceKind, CostClass, Option<DriveStrength>);

/// A total delay lookup built from characterization records.
#[derive(Debug, Clone, Default)]
pub struct TimingModel {
    entries: HashMap<Key, (f64, f64)>,
}

impl TimingModel {
    /// An empty model: every lookup reports "no data".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the model contains no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records in the model.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Builds a model from in-memory records. Later records for the same key
    /// replace earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = DelayRecord>) -> Self {
        let mut entries = HashMap::new();
        for r in records {
            entries.insert((r.from, r.to, r.class, r.drive), (r.rise_ns, r.fall_ns));
        }
        Self { entries }
    }

    /// Loads a model from a characterization JSON file.
    pub fn load(path: &Path) -> Result<Self, TimingError> {
        let text = std::fs::read_to_string(path)?;
        let file: TimingFile =
            serde_json::from_str(&text).map_err(|e| TimingError::Parse(e.to_string()))?;
        Ok(Self::from_records(file.entries))
    }

    /// Looks up the (rise, fall) delay for one fabric arc.
    ///
    /// Falls back from the drive-specific record to the kind-pair baseline;
    /// returns `None` when neither exists.
    pub fn arc_delay(
        &self,
        from: ResourceKind,
        to: ResourceKind,
        class: CostClass,
        drive: Option<DriveStrength>,
    ) -> Option<(f64, f64)> {
        if drive.is_some() {
            if let Some(&d) = self.entries.get(&(from, to, class, drive)) {
                return Some(d);
            }
        }
        self.entries.get(&(from, to, class, None)).copied()
    }

    /// The worst-case delay of one arc in tenths of nanoseconds, as used by
    /// the placement cost function. Missing data contributes zero.
    pub fn arc_cost_tenths(
        &self,
        from: ResourceKind,
        to: ResourceKind,
        class: CostClass,
        drive: Option<DriveStrength>,
    ) -> u64 {
        match self.arc_delay(from, to, class, drive) {
            Some((rise, fall)) => (rise.max(fall).max(0.0) * 10.0).round() as u64,
            None => 0,
        }
    }
}

/// The characterization file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum TimingError {
    /// The file could not be read.
    #[error("failed to read timing data: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is not valid characterization JSON.
    #[error("failed to parse timing data: {0}")]
    Parse(String),
}

impl TimingError {
    /// Whether this error is a missing file, which degrades to non-timing
    /// placement rather than aborting the run.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TimingError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
