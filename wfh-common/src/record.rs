//! Selection record types

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week a staff member may work from home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WfhDay {
    Thursday,
    Friday,
}

impl WfhDay {
    /// All selectable days, in calendar order
    pub const ALL: [WfhDay; 2] = [WfhDay::Thursday, WfhDay::Friday];

    /// Days after the week's Monday
    pub fn offset_from_monday(self) -> u64 {
        match self {
            WfhDay::Thursday => 3,
            WfhDay::Friday => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WfhDay::Thursday => "Thursday",
            WfhDay::Friday => "Friday",
        }
    }
}

impl fmt::Display for WfhDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WfhDay {
    type Err = Error;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("thursday") {
            Ok(WfhDay::Thursday)
        } else if trimmed.eq_ignore_ascii_case("friday") {
            Ok(WfhDay::Friday)
        } else {
            Err(Error::InvalidDay(s.to_string()))
        }
    }
}

/// Year + ISO week key, formatted `YYYY-WW`
///
/// Values read back from a legacy file are kept verbatim, so a `WeekId` is not
/// guaranteed to be well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekId(String);

impl WeekId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One persisted WFH selection
///
/// Records written by the ledger always have every field populated. Records
/// loaded from older files may carry empty strings or `None` where the file
/// lacked a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub name: String,
    pub week_id: WeekId,
    pub week_starting: Option<NaiveDate>,
    pub day: Option<WfhDay>,
    pub wfh_date: Option<NaiveDate>,
}

impl SelectionRecord {
    /// True if this record belongs to `name` in `week_id`
    pub fn matches(&self, name: &str, week_id: &WeekId) -> bool {
        self.name == name && &self.week_id == week_id
    }
}
