//! Lead Time Reports

use crate::ReportError;
use booking_data::Booking;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Histogram bins used when none are requested
pub const DEFAULT_BINS: usize = 50;

/// Half-open bin `[start, end)`; the last bin also holds its upper edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotelHistogram {
    pub hotel: String,
    /// One count per bin
    pub counts: Vec<usize>,
}

/// Canceled reservations with an exact lead time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadTimeCancellations {
    pub lead_time: u32,
    pub cancellations: usize,
}

/// Per-hotel histograms over a shared bin grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadTimeDistribution {
    pub bins: Vec<HistogramBin>,
    pub hotels: Vec<HotelHistogram>,
    /// Present only when requested
    pub cancellations: Option<Vec<LeadTimeCancellations>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadTimeRate {
    pub lead_time: u32,
    pub hotel: String,
    /// Share of canceled reservations in [0, 1]
    pub cancellation_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub lead_time: u32,
    /// Percentage in [0, 100]
    pub cancellation_rate: f64,
}

/// Lead-time histogram per hotel, optionally with cancellations per lead time
pub fn lead_time_distribution(
    bookings: &[&Booking],
    bins: usize,
    include_cancellations: bool,
) -> Result<LeadTimeDistribution, ReportError> {
    if bins == 0 {
        return Err(ReportError::InvalidBins);
    }

    let cancellations = include_cancellations.then(|| cancellations_per_lead_time(bookings));
    let (Some(min), Some(max)) = (
        bookings.iter().map(|b| b.lead_time).min(),
        bookings.iter().map(|b| b.lead_time).max(),
    ) else {
        return Ok(LeadTimeDistribution {
            bins: Vec::new(),
            hotels: Vec::new(),
            cancellations,
        });
    };

    let min = f64::from(min);
    let span = f64::from(max) - min;
    let width = if span > 0.0 { span / bins as f64 } else { 1.0 };
    let grid: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
        })
        .collect();

    let mut per_hotel: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for booking in bookings {
        let offset = (f64::from(booking.lead_time) - min) / width;
        let index = (offset.floor() as usize).min(bins - 1);
        per_hotel
            .entry(booking.hotel.as_str())
            .or_insert_with(|| vec![0; bins])[index] += 1;
    }

    debug!(
        "Lead time histogram: {} bookings, {} hotels, width {:.2}",
        bookings.len(),
        per_hotel.len(),
        width
    );

    Ok(LeadTimeDistribution {
        bins: grid,
        hotels: per_hotel
            .into_iter()
            .map(|(hotel, counts)| HotelHistogram {
                hotel: hotel.to_string(),
                counts,
            })
            .collect(),
        cancellations,
    })
}

fn cancellations_per_lead_time(bookings: &[&Booking]) -> Vec<LeadTimeCancellations> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for booking in bookings.iter().filter(|b| b.is_canceled) {
        *counts.entry(booking.lead_time).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(lead_time, cancellations)| LeadTimeCancellations {
            lead_time,
            cancellations,
        })
        .collect()
}

/// Mean cancellation rate per (lead time, hotel)
pub fn lead_time_cancellation_rate(bookings: &[&Booking]) -> Vec<LeadTimeRate> {
    let mut groups: BTreeMap<(u32, &str), (usize, usize)> = BTreeMap::new();
    for booking in bookings {
        let (canceled, total) = groups
            .entry((booking.lead_time, booking.hotel.as_str()))
            .or_insert((0, 0));
        *canceled += usize::from(booking.is_canceled);
        *total += 1;
    }

    groups
        .into_iter()
        .map(|((lead_time, hotel), (canceled, total))| LeadTimeRate {
            lead_time,
            hotel: hotel.to_string(),
            cancellation_rate: canceled as f64 / total as f64,
        })
        .collect()
}

/// Cancellation rate in percent per lead time, all hotels together
pub fn lead_time_cancellation_heatmap(bookings: &[&Booking]) -> Vec<HeatmapCell> {
    let mut groups: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for booking in bookings {
        let (canceled, total) = groups.entry(booking.lead_time).or_insert((0, 0));
        *canceled += usize::from(booking.is_canceled);
        *total += 1;
    }

    groups
        .into_iter()
        .map(|(lead_time, (canceled, total))| HeatmapCell {
            lead_time,
            cancellation_rate: canceled as f64 / total as f64 * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{booking, sample};
    use proptest::prelude::*;

    #[test]
    fn test_histogram_grid() {
        let bookings = sample();
        let refs: Vec<&Booking> = bookings.iter().collect();
        let dist = lead_time_distribution(&refs, 4, false).unwrap();

        assert_eq!(dist.bins.len(), 4);
        assert_eq!(dist.bins[0].start, 0.0);
        assert_eq!(dist.bins[3].end, 342.0);
        assert!(dist.cancellations.is_none());

        let city = &dist.hotels[0];
        assert_eq!(city.hotel, "City Hotel");
        // lead times 88, 88, 0, 13, 200 with width 85.5
        assert_eq!(city.counts, vec![2, 2, 1, 0]);
        let resort = &dist.hotels[1];
        // 342 sits on the upper edge of the last bin
        assert_eq!(resort.counts, vec![1, 1, 0, 1]);
    }

    #[test]
    fn test_cancellation_line() {
        let bookings = sample();
        let refs: Vec<&Booking> = bookings.iter().collect();
        let dist = lead_time_distribution(&refs, DEFAULT_BINS, true).unwrap();
        let line = dist.cancellations.unwrap();

        assert_eq!(
            line,
            vec![
                LeadTimeCancellations { lead_time: 88, cancellations: 2 },
                LeadTimeCancellations { lead_time: 120, cancellations: 1 },
                LeadTimeCancellations { lead_time: 200, cancellations: 1 },
            ]
        );
    }

    #[test]
    fn test_single_lead_time() {
        let bookings = vec![booking((2016, 1, 1), "City Hotel", false, 7, "No Deposit")];
        let refs: Vec<&Booking> = bookings.iter().collect();
        let dist = lead_time_distribution(&refs, 3, false).unwrap();
        assert_eq!(dist.hotels[0].counts, vec![1, 0, 0]);
    }

    #[test]
    fn test_empty_and_invalid() {
        let dist = lead_time_distribution(&[], 10, true).unwrap();
        assert!(dist.bins.is_empty());
        assert_eq!(dist.cancellations, Some(Vec::new()));
        assert_eq!(lead_time_distribution(&[], 0, false), Err(ReportError::InvalidBins));
    }

    #[test]
    fn test_rates() {
        let bookings = sample();
        let refs: Vec<&Booking> = bookings.iter().collect();

        let rates = lead_time_cancellation_rate(&refs);
        let at_13: Vec<_> = rates.iter().filter(|r| r.lead_time == 13).collect();
        assert_eq!(at_13.len(), 2);
        assert!(at_13.iter().all(|r| r.cancellation_rate == 0.0));

        let heat = lead_time_cancellation_heatmap(&refs);
        let at_88 = heat.iter().find(|c| c.lead_time == 88).unwrap();
        assert_eq!(at_88.cancellation_rate, 100.0);
        assert_eq!(heat.len(), 6);
    }

    proptest! {
        #[test]
        fn prop_histogram_counts_every_booking(
            leads in prop::collection::vec(0u32..800, 1..200),
            bins in 1usize..60,
        ) {
            let bookings: Vec<Booking> = leads
                .iter()
                .enumerate()
                .map(|(i, &lead)| {
                    let hotel = if i % 2 == 0 { "City Hotel" } else { "Resort Hotel" };
                    booking((2016, 3, 1), hotel, i % 3 == 0, lead, "No Deposit")
                })
                .collect();
            let refs: Vec<&Booking> = bookings.iter().collect();
            let dist = lead_time_distribution(&refs, bins, false).unwrap();

            let total: usize = dist.hotels.iter().flat_map(|h| h.counts.iter()).sum();
            prop_assert_eq!(total, bookings.len());
            prop_assert!(dist.hotels.iter().all(|h| h.counts.len() == bins));
        }
    }
}
