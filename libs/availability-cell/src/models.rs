use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A bookable (date, time, doctor) tuple as served by the booking backend.
/// Slots are immutable on this side; the backend owns their lifecycle.
/// Serde aliases accept the backend's Italian wire names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    #[serde(alias = "data")]
    pub date: NaiveDate,
    #[serde(alias = "oraInizio")]
    pub start_time: String,
    #[serde(alias = "medicoId")]
    pub doctor_id: String,
    #[serde(alias = "nomeMedico")]
    pub doctor_name: String,
    #[serde(default, alias = "sedeId")]
    pub location_id: Option<String>,
    #[serde(default, alias = "nomeSede")]
    pub location_name: Option<String>,
}

impl Slot {
    /// Parses the wire-form start time. `None` means the backend sent
    /// something unusable; callers drop the slot rather than erroring.
    pub fn start_time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.start_time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&self.start_time, "%H:%M:%S"))
            .ok()
    }

    pub fn start_hour(&self) -> Option<u32> {
        use chrono::Timelike;
        self.start_time_of_day().map(|t| t.hour())
    }
}

/// Time-of-day predicate over slot start hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    All,
    /// [9, 12)
    Morning,
    /// [13, 17]
    Afternoon,
    /// [start, end)
    Range { start: u32, end: u32 },
}

impl TimeFilter {
    pub fn from_query(
        from_hour: Option<u32>,
        to_hour: Option<u32>,
        period: Option<&str>,
    ) -> Result<Self, AvailabilityError> {
        match (from_hour, to_hour) {
            (Some(start), Some(end)) => {
                if start < end && end <= 24 {
                    Ok(TimeFilter::Range { start, end })
                } else {
                    Err(AvailabilityError::InvalidHourRange { start, end })
                }
            }
            (Some(_), None) | (None, Some(_)) => Err(AvailabilityError::IncompleteHourRange),
            (None, None) => match period {
                None | Some("all") => Ok(TimeFilter::All),
                Some("morning") => Ok(TimeFilter::Morning),
                Some("afternoon") => Ok(TimeFilter::Afternoon),
                Some(other) => Err(AvailabilityError::UnknownPeriod(other.to_string())),
            },
        }
    }

    pub fn accepts(&self, hour: u32) -> bool {
        match self {
            TimeFilter::All => true,
            TimeFilter::Morning => (9..12).contains(&hour),
            TimeFilter::Afternoon => (13..=17).contains(&hour),
            TimeFilter::Range { start, end } => (*start..*end).contains(&hour),
        }
    }
}

/// The filtered, sorted, capped slot list split into two display columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotBoard {
    pub left: Vec<Slot>,
    pub right: Vec<Slot>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpcomingSlotsQuery {
    pub service_id: String,
    pub doctor_id: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub from_hour: Option<u32>,
    pub to_hour: Option<u32>,
    pub period: Option<String>,
    pub location_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotsByDayQuery {
    pub service_id: String,
    pub date: NaiveDate,
    pub doctor_id: Option<String>,
    pub location_id: Option<String>,
    pub from_hour: Option<u32>,
    pub to_hour: Option<u32>,
    pub period: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum AvailabilityError {
    #[error("From hour {start} must be before to hour {end} (and end at most 24)")]
    InvalidHourRange { start: u32, end: u32 },

    #[error("Both from_hour and to_hour are required for an explicit hour range")]
    IncompleteHourRange,

    #[error("Unknown time period: {0}")]
    UnknownPeriod(String),

    #[error("From date must not be after to date")]
    InvalidDateRange,
}
