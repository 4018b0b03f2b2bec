//! Reservation Timelines

use booking_data::{Booking, CancellationStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reservations arriving in one month at one hotel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReservations {
    /// First day of the month
    pub month: NaiveDate,
    pub hotel: String,
    pub reservations: usize,
}

/// Reservations per year, hotel and cancellation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyCancellations {
    pub year: i32,
    pub hotel: String,
    pub status: CancellationStatus,
    pub reservations: usize,
}

/// Count per (arrival month, hotel), ordered by month then hotel
pub fn monthly_reservations(bookings: &[&Booking]) -> Vec<MonthlyReservations> {
    let mut counts: BTreeMap<(NaiveDate, &str), usize> = BTreeMap::new();
    for booking in bookings {
        *counts
            .entry((booking.arrival_month(), booking.hotel.as_str()))
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((month, hotel), reservations)| MonthlyReservations {
            month,
            hotel: hotel.to_string(),
            reservations,
        })
        .collect()
}

/// Count per (year, hotel, status); "Not Canceled" precedes "Canceled"
pub fn yearly_cancellations(bookings: &[&Booking]) -> Vec<YearlyCancellations> {
    let mut counts: BTreeMap<(i32, &str, CancellationStatus), usize> = BTreeMap::new();
    for booking in bookings {
        *counts
            .entry((booking.arrival_year(), booking.hotel.as_str(), booking.status()))
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((year, hotel, status), reservations)| YearlyCancellations {
            year,
            hotel: hotel.to_string(),
            status,
            reservations,
        })
        .collect()
}
