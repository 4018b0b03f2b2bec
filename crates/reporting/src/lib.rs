//! Dashboard Reporting
//!
//! One aggregation per dashboard chart. Every function takes the bookings
//! left after filtering and recomputes its result from scratch.

mod deposit;
mod lead_time;
mod model;
mod style;
mod timeline;

pub use deposit::{
    deposit_cancellation_breakdown, deposit_type_distribution, reservation_flow, DepositShare,
    DepositStatusShare, FlowLink, FlowNode, ReservationFlow,
};
pub use lead_time::{
    lead_time_cancellation_heatmap, lead_time_cancellation_rate, lead_time_distribution,
    HeatmapCell, HistogramBin, HotelHistogram, LeadTimeCancellations, LeadTimeDistribution,
    LeadTimeRate, DEFAULT_BINS,
};
pub use model::{aggregate_importances, metrics_table, MetricRow, DEFAULT_TOP_N};
pub use style::ReportStyle;
pub use timeline::{monthly_reservations, yearly_cancellations, MonthlyReservations, YearlyCancellations};

use thiserror::Error;

/// Errors while building report data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("Histogram needs at least one bin")]
    InvalidBins,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use booking_data::{Booking, RawRecord};
    use chrono::NaiveDate;

    pub fn booking(date: (i32, u32, u32), hotel: &str, canceled: bool, lead: u32, deposit: &str) -> Booking {
        Booking {
            arrival_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            hotel: hotel.to_string(),
            is_canceled: canceled,
            lead_time: lead,
            deposit_type: deposit.to_string(),
            adr: 100.0,
            required_car_parking_spaces: 0,
            previous_cancellations: 0,
            attributes: RawRecord::new(),
        }
    }

    pub fn sample() -> Vec<Booking> {
        vec![
            booking((2015, 7, 1), "Resort Hotel", false, 342, "No Deposit"),
            booking((2015, 7, 3), "Resort Hotel", false, 13, "No Deposit"),
            booking((2015, 7, 20), "City Hotel", true, 88, "Non Refund"),
            booking((2015, 8, 2), "City Hotel", true, 88, "Non Refund"),
            booking((2015, 8, 5), "City Hotel", false, 0, "No Deposit"),
            booking((2016, 1, 9), "Resort Hotel", true, 120, "No Deposit"),
            booking((2016, 1, 12), "City Hotel", false, 13, "Refundable"),
            booking((2016, 2, 28), "City Hotel", true, 200, "Non Refund"),
        ]
    }
}
