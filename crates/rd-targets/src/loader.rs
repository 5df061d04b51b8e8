//! CSV target loader.
//!
//! # CSV format
//!
//! One row per target, in priority tie-break order (newest first):
//!
//! ```csv
//! id,lng,lat,severity,is_active,category,label
//! zone-17,-0.1246,51.5007,5,true,natural,Flooding on the Embankment
//! zone-12,-0.0877,51.5055,3,false,,
//! ```
//!
//! `category` and `label` are optional columns.  Rows with a severity
//! outside 1..=5 or a blank id are dropped with a warning rather than
//! failing the whole file, so one bad record never hides the others.

use std::io::Read;
use std::path::Path;

use rd_core::{Position, TargetId};
use serde::Deserialize;
use tracing::warn;

use crate::{FeedError, FeedResult, Severity, Target};

#[derive(Deserialize)]
struct TargetRecord {
    id:        String,
    lng:       f64,
    lat:       f64,
    severity:  i64,
    is_active: bool,
    #[serde(default)]
    category:  Option<String>,
    #[serde(default)]
    label:     Option<String>,
}

impl TargetRecord {
    fn into_target(self) -> FeedResult<Target> {
        let id = TargetId::parse(self.id)
            .map_err(|e| FeedError::InvalidRecord(e.to_string()))?;
        let position = Position::new(self.lng, self.lat);
        if !position.is_finite() {
            return Err(FeedError::InvalidRecord(format!("target {id}: non-finite position")));
        }
        let severity = Severity::new(self.severity)?;
        Ok(Target {
            id,
            position,
            severity,
            is_active: self.is_active,
            category:  self.category.filter(|c| !c.is_empty()),
            label:     self.label.filter(|l| !l.is_empty()),
        })
    }
}

/// Load targets from a CSV file.
pub fn load_targets_csv(path: &Path) -> FeedResult<Vec<Target>> {
    let file = std::fs::File::open(path)?;
    load_targets_reader(file)
}

/// Like [`load_targets_csv`] but accepts any `Read` source.
///
/// # Errors
///
/// [`FeedError::Csv`] if a row cannot be parsed at all (wrong column types,
/// missing required column).  Semantically invalid rows are skipped.
pub fn load_targets_reader<R: Read>(reader: R) -> FeedResult<Vec<Target>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut targets = Vec::new();

    for result in csv_reader.deserialize::<TargetRecord>() {
        match result?.into_target() {
            Ok(target) => targets.push(target),
            Err(err) => warn!(error = %err, "skipping target record"),
        }
    }

    Ok(targets)
}
