//! The unified dispatch target (incident or danger zone).

use std::fmt;

use rd_core::{Position, TargetId};

use crate::{FeedError, FeedResult};

/// Incident severity on the 1 (minor) to 5 (critical) scale.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Severity(u8);

impl Severity {
    pub const MIN: Severity = Severity(1);
    pub const MAX: Severity = Severity(5);

    /// Validate `level`.
    ///
    /// # Errors
    ///
    /// [`FeedError::InvalidSeverity`] outside `1..=5`.
    pub fn new(level: i64) -> FeedResult<Self> {
        match u8::try_from(level) {
            Ok(l @ 1..=5) => Ok(Severity(l)),
            _ => Err(FeedError::InvalidSeverity(level)),
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// A dispatch candidate.
///
/// `category` and `label` are carried for display and logging only; the
/// selector looks at `is_active` and `severity` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id:        TargetId,
    pub position:  Position,
    pub severity:  Severity,
    pub is_active: bool,
    pub category:  Option<String>,
    pub label:     Option<String>,
}

impl Target {
    pub fn new(id: impl Into<TargetId>, position: Position, severity: Severity, is_active: bool) -> Self {
        Self {
            id: id.into(),
            position,
            severity,
            is_active,
            category: None,
            label: None,
        }
    }
}
