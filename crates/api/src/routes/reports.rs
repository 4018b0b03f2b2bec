//! Report Routes

use axum::{
    extract::{Query, State},
    Json,
};
use booking_data::{parse_month, Booking, BookingFilter, HotelFilter, MonthRange};
use reporting::{
    deposit_cancellation_breakdown, deposit_type_distribution, lead_time_cancellation_heatmap,
    lead_time_cancellation_rate, lead_time_distribution, monthly_reservations,
    reservation_flow, yearly_cancellations, DepositShare, DepositStatusShare, HeatmapCell,
    LeadTimeDistribution, LeadTimeRate, MonthlyReservations, ReservationFlow,
    YearlyCancellations, DEFAULT_BINS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Upper bound on requested histogram bins
const MAX_BINS: usize = 500;

/// Filters shared by every report
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// First month, `YYYY-MM`
    pub start: Option<String>,
    /// Last month, `YYYY-MM`
    pub end: Option<String>,
    /// "Both", "City Hotel" or "Resort Hotel"
    pub hotel: Option<String>,
    pub bins: Option<usize>,
    #[serde(default)]
    pub show_cancellations: bool,
}

impl ReportQuery {
    /// Missing month bounds fall back to the dataset's first/last month
    fn filter(&self, state: &AppState) -> Result<BookingFilter, ApiError> {
        let hotel = match &self.hotel {
            Some(h) => h.parse::<HotelFilter>()?,
            None => HotelFilter::Both,
        };

        let months = if self.start.is_none() && self.end.is_none() {
            None
        } else {
            let available = state.dataset.available_months();
            let bound = |value: &Option<String>, fallback: Option<&chrono::NaiveDate>| {
                match value {
                    Some(s) => parse_month(s).map(Some),
                    None => Ok(fallback.copied()),
                }
            };
            let start = bound(&self.start, available.first())?;
            let end = bound(&self.end, available.last())?;
            start.zip(end).map(|(s, e)| MonthRange::new(s, e))
        };

        Ok(BookingFilter::new(months, hotel))
    }
}

/// Chart data plus the colors to draw it with
#[derive(Debug, Serialize)]
pub struct ReportResponse<T> {
    pub data: T,
    /// Bookings left after filtering
    pub bookings: usize,
    pub colors: BTreeMap<String, String>,
}

fn select<'a>(state: &'a AppState, query: &ReportQuery, report: &'static str) -> Result<Vec<&'a Booking>, ApiError> {
    metrics::counter!("report_requests_total", "report" => report).increment(1);
    let filter = query.filter(state)?;
    let bookings = state.dataset.filter(&filter);
    debug!("Report {}: {} bookings after filtering", report, bookings.len());
    Ok(bookings)
}

fn respond<T>(data: T, bookings: usize, colors: &BTreeMap<String, String>) -> Json<ReportResponse<T>> {
    Json(ReportResponse {
        data,
        bookings,
        colors: colors.clone(),
    })
}

/// Reservations per month and hotel
pub async fn monthly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse<Vec<MonthlyReservations>>>, ApiError> {
    let bookings = select(&state, &query, "monthly")?;
    Ok(respond(monthly_reservations(&bookings), bookings.len(), &state.style.hotel_colors))
}

/// Reservations per year, hotel and status
pub async fn yearly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse<Vec<YearlyCancellations>>>, ApiError> {
    let bookings = select(&state, &query, "yearly")?;
    Ok(respond(yearly_cancellations(&bookings), bookings.len(), &state.style.status_colors))
}

/// Lead time histogram with optional cancellation line
pub async fn lead_time(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse<LeadTimeDistribution>>, ApiError> {
    let bins = query.bins.unwrap_or(DEFAULT_BINS);
    if bins == 0 || bins > MAX_BINS {
        return Err(ApiError::BadRequest(format!(
            "bins must be between 1 and {}",
            MAX_BINS
        )));
    }

    let bookings = select(&state, &query, "lead_time")?;
    let distribution = lead_time_distribution(&bookings, bins, query.show_cancellations)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(respond(distribution, bookings.len(), &state.style.hotel_colors))
}

/// Cancellation rate per lead time and hotel
pub async fn lead_time_rate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse<Vec<LeadTimeRate>>>, ApiError> {
    let bookings = select(&state, &query, "lead_time_rate")?;
    Ok(respond(lead_time_cancellation_rate(&bookings), bookings.len(), &state.style.hotel_colors))
}

/// Cancellation rate in percent per lead time
pub async fn lead_time_heatmap(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse<Vec<HeatmapCell>>>, ApiError> {
    let bookings = select(&state, &query, "lead_time_heatmap")?;
    Ok(respond(lead_time_cancellation_heatmap(&bookings), bookings.len(), &BTreeMap::new()))
}

/// Share of each deposit type
pub async fn deposit_distribution(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse<Vec<DepositShare>>>, ApiError> {
    let bookings = select(&state, &query, "deposit_distribution")?;
    Ok(respond(deposit_type_distribution(&bookings), bookings.len(), &state.style.deposit_colors))
}

/// Status percentages within each deposit type
pub async fn deposit_breakdown(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse<Vec<DepositStatusShare>>>, ApiError> {
    let bookings = select(&state, &query, "deposit_breakdown")?;
    Ok(respond(deposit_cancellation_breakdown(&bookings), bookings.len(), &state.style.status_colors))
}

/// Deposit type to status flow
pub async fn flow(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse<ReservationFlow>>, ApiError> {
    let bookings = select(&state, &query, "reservation_flow")?;
    let flow = reservation_flow(&bookings, &state.style);
    Ok(respond(flow, bookings.len(), &state.style.status_colors))
}
