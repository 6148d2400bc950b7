//! Temporal/contextual constraint attached to users, roles, and
//! role assignments.

use serde::{Deserialize, Serialize};

/// Sentinel accepted anywhere a field should be treated as unset.
pub const NONE: &str = "none";

/// Temporal/contextual activation constraint.
///
/// Every field is optional; an unset (or `"none"`) field never causes a
/// rejection on its own dimension. Dates are fixed-width `YYYYMMDD`
/// strings, times are military `HHMM`, and the day mask is a string of
/// day digits (`'1'` = Sunday .. `'7'` = Saturday) whose presence
/// enables that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// First day the entity may be activated (`YYYYMMDD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_date: Option<String>,

    /// Last day the entity may be activated (`YYYYMMDD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Start of the enforced-inactive window (`YYYYMMDD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_lock_date: Option<String>,

    /// End of the enforced-inactive window (`YYYYMMDD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_lock_date: Option<String>,

    /// Earliest time of day for activation (`HHMM`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_time: Option<String>,

    /// Latest time of day for activation (`HHMM`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Enabled days of the week, e.g. `"23456"` for Monday-Friday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_mask: Option<String>,

    /// Seconds of session inactivity allowed; 0 disables the check
    #[serde(default)]
    pub timeout: u64,
}

impl Constraint {
    /// Constraint with every dimension disabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_window(
        mut self,
        begin: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.begin_date = Some(begin.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn with_lock_window(
        mut self,
        begin: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.begin_lock_date = Some(begin.into());
        self.end_lock_date = Some(end.into());
        self
    }

    pub fn with_time_window(
        mut self,
        begin: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.begin_time = Some(begin.into());
        self.end_time = Some(end.into());
        self
    }

    pub fn with_day_mask(mut self, mask: impl Into<String>) -> Self {
        self.day_mask = Some(mask.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Whether an optional field carries a real value (not the `"none"`
    /// sentinel).
    pub(crate) fn is_set(field: &Option<String>) -> bool {
        matches!(field, Some(v) if !v.eq_ignore_ascii_case(NONE) && !v.is_empty())
    }
}
