//! Booking Data
//!
//! Raw booking records, CSV dataset ingestion, column kind inference and the
//! filters used to slice the dataset for reporting.

mod booking;
mod dataset;
mod error;
mod filter;
mod record;

pub use booking::{columns, Booking, CancellationStatus};
pub use dataset::{Dataset, LabeledRecord};
pub use error::DataError;
pub use filter::{parse_month, BookingFilter, HotelFilter, MonthRange};
pub use record::{Attribute, AttributeKind, RawRecord, RawValue};
