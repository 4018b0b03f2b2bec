//! Typed Booking Rows

use crate::record::RawRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Column names of the bookings CSV
pub mod columns {
    pub const ARRIVAL_DATE: &str = "arrival_date";
    pub const HOTEL: &str = "hotel";
    pub const IS_CANCELED: &str = "is_canceled";
    pub const LEAD_TIME: &str = "lead_time";
    pub const DEPOSIT_TYPE: &str = "deposit_type";
    pub const ADR: &str = "adr";
    pub const PARKING_SPACES: &str = "required_car_parking_spaces";
    pub const PREVIOUS_CANCELLATIONS: &str = "previous_cancellations";

    /// Columns every dataset must carry
    pub const REQUIRED: [&str; 8] = [
        ARRIVAL_DATE,
        HOTEL,
        IS_CANCELED,
        LEAD_TIME,
        DEPOSIT_TYPE,
        ADR,
        PARKING_SPACES,
        PREVIOUS_CANCELLATIONS,
    ];

    /// Attributes collected by the live prediction form
    pub const FORM_ATTRIBUTES: [&str; 4] =
        [PARKING_SPACES, ADR, PREVIOUS_CANCELLATIONS, DEPOSIT_TYPE];
}

/// Whether a reservation was canceled, with the labels used in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CancellationStatus {
    #[serde(rename = "Not Canceled")]
    NotCanceled,
    #[serde(rename = "Canceled")]
    Canceled,
}

impl CancellationStatus {
    pub fn from_flag(is_canceled: bool) -> Self {
        if is_canceled {
            CancellationStatus::Canceled
        } else {
            CancellationStatus::NotCanceled
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CancellationStatus::NotCanceled => "Not Canceled",
            CancellationStatus::Canceled => "Canceled",
        }
    }
}

/// One booking with the fields reports need typed, plus all raw attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub arrival_date: NaiveDate,
    pub hotel: String,
    pub is_canceled: bool,
    pub lead_time: u32,
    pub deposit_type: String,
    pub adr: f64,
    pub required_car_parking_spaces: u32,
    pub previous_cancellations: u32,
    /// Every descriptive column of the row except the label
    pub attributes: RawRecord,
}

impl Booking {
    /// First day of the arrival month
    pub fn arrival_month(&self) -> NaiveDate {
        self.arrival_date.with_day(1).unwrap_or(self.arrival_date)
    }

    pub fn arrival_year(&self) -> i32 {
        self.arrival_date.year()
    }

    pub fn status(&self) -> CancellationStatus {
        CancellationStatus::from_flag(self.is_canceled)
    }
}
