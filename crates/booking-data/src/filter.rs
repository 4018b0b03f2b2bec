//! Dashboard Filters

use crate::booking::Booking;
use crate::error::DataError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hotel type selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HotelFilter {
    #[default]
    Both,
    #[serde(rename = "City Hotel")]
    City,
    #[serde(rename = "Resort Hotel")]
    Resort,
}

impl HotelFilter {
    pub fn matches(&self, hotel: &str) -> bool {
        match self {
            HotelFilter::Both => true,
            HotelFilter::City => hotel == "City Hotel",
            HotelFilter::Resort => hotel == "Resort Hotel",
        }
    }
}

impl FromStr for HotelFilter {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "" => Ok(HotelFilter::Both),
            "city" | "city hotel" => Ok(HotelFilter::City),
            "resort" | "resort hotel" => Ok(HotelFilter::Resort),
            _ => Err(DataError::UnknownHotel(s.to_string())),
        }
    }
}

/// Inclusive range of arrival months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    /// Build a range; the bounds are normalized to month starts and sorted
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        let a = month_start(a);
        let b = month_start(b);
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Parse `YYYY-MM` bounds
    pub fn parse(start: &str, end: &str) -> Result<Self, DataError> {
        Ok(Self::new(parse_month(start)?, parse_month(end)?))
    }

    pub fn contains(&self, month: NaiveDate) -> bool {
        let month = month_start(month);
        self.start <= month && month <= self.end
    }
}

/// Parse a `YYYY-MM` string into the first day of that month
pub fn parse_month(s: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| DataError::InvalidMonth(s.to_string()))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Combined date-range and hotel filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFilter {
    pub months: Option<MonthRange>,
    pub hotel: HotelFilter,
}

impl BookingFilter {
    pub fn new(months: Option<MonthRange>, hotel: HotelFilter) -> Self {
        Self { months, hotel }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.hotel.matches(&booking.hotel)
            && self
                .months
                .map_or(true, |range| range.contains(booking.arrival_month()))
    }
}
