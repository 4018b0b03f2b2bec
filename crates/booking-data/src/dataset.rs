//! CSV Dataset Ingestion

use crate::booking::{columns, Booking};
use crate::error::DataError;
use crate::filter::BookingFilter;
use crate::record::{Attribute, AttributeKind, RawRecord, RawValue};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw record paired with its cancellation label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub record: RawRecord,
    pub label: bool,
}

/// Bookings loaded once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct Dataset {
    bookings: Vec<Booking>,
    attributes: Vec<Attribute>,
    skipped_rows: usize,
}

impl Dataset {
    /// Load a dataset from a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        info!("Loading bookings from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a dataset from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in columns::REQUIRED {
            if !headers.iter().any(|h| h == column) {
                return Err(DataError::MissingColumn(column));
            }
        }

        let rows = csv_reader
            .records()
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;
        if rows.is_empty() {
            return Err(DataError::Empty);
        }

        let attributes = infer_attributes(&headers, &rows);
        debug!(
            "Inferred {} attributes ({} numeric)",
            attributes.len(),
            attributes
                .iter()
                .filter(|a| a.kind == AttributeKind::Numeric)
                .count()
        );

        let columns = ColumnIndex::new(&headers)?;
        let attribute_columns: Vec<(usize, &Attribute)> = attributes
            .iter()
            .filter_map(|a| headers.iter().position(|h| h == a.name).map(|idx| (idx, a)))
            .collect();
        let mut bookings = Vec::with_capacity(rows.len());
        let mut skipped_rows = 0;

        for (i, row) in rows.iter().enumerate() {
            // Header is line 1
            let line = i + 2;
            match columns.parse_booking(line, row, &attribute_columns)? {
                Some(booking) => bookings.push(booking),
                None => skipped_rows += 1,
            }
        }

        if skipped_rows > 0 {
            warn!("Skipped {} rows with unparseable arrival dates", skipped_rows);
        }
        if bookings.is_empty() {
            return Err(DataError::Empty);
        }

        info!("Loaded {} bookings", bookings.len());
        Ok(Self {
            bookings,
            attributes,
            skipped_rows,
        })
    }

    /// Build a dataset from already-typed bookings
    pub fn from_bookings(bookings: Vec<Booking>, attributes: Vec<Attribute>) -> Self {
        Self {
            bookings,
            attributes,
            skipped_rows: 0,
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    /// Rows dropped during load because their arrival date did not parse
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Descriptive attributes (every column except the label)
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// All attributes except the excluded names
    pub fn attributes_excluding(&self, exclude: &[String]) -> Vec<Attribute> {
        self.attributes
            .iter()
            .filter(|a| !exclude.iter().any(|e| e == &a.name))
            .cloned()
            .collect()
    }

    /// Look up the named attributes, in the given order
    pub fn select_attributes(&self, names: &[&str]) -> Result<Vec<Attribute>, DataError> {
        names
            .iter()
            .map(|name| {
                self.attributes
                    .iter()
                    .find(|a| a.name == *name)
                    .cloned()
                    .ok_or_else(|| DataError::UnknownAttribute(name.to_string()))
            })
            .collect()
    }

    /// Training view: records restricted to `attributes`, with labels
    pub fn labeled_records(&self, attributes: &[Attribute]) -> Vec<LabeledRecord> {
        let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        self.bookings
            .iter()
            .map(|b| LabeledRecord {
                record: b.attributes.project(&names),
                label: b.is_canceled,
            })
            .collect()
    }

    /// Distinct arrival months in ascending order
    pub fn available_months(&self) -> Vec<NaiveDate> {
        self.bookings
            .iter()
            .map(Booking::arrival_month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Bookings matching a filter
    pub fn filter(&self, filter: &BookingFilter) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| filter.matches(b)).collect()
    }
}

/// Positions of the typed columns in the header
struct ColumnIndex {
    arrival_date: usize,
    hotel: usize,
    is_canceled: usize,
    lead_time: usize,
    deposit_type: usize,
    adr: usize,
    parking: usize,
    previous_cancellations: usize,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self, DataError> {
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(DataError::MissingColumn(name))
        };
        Ok(Self {
            arrival_date: position(columns::ARRIVAL_DATE)?,
            hotel: position(columns::HOTEL)?,
            is_canceled: position(columns::IS_CANCELED)?,
            lead_time: position(columns::LEAD_TIME)?,
            deposit_type: position(columns::DEPOSIT_TYPE)?,
            adr: position(columns::ADR)?,
            parking: position(columns::PARKING_SPACES)?,
            previous_cancellations: position(columns::PREVIOUS_CANCELLATIONS)?,
        })
    }

    /// Returns `None` for rows whose arrival date cannot be parsed
    fn parse_booking(
        &self,
        line: usize,
        row: &StringRecord,
        attribute_columns: &[(usize, &Attribute)],
    ) -> Result<Option<Booking>, DataError> {
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let Some(arrival_date) = parse_date(cell(self.arrival_date)) else {
            debug!("Line {}: unparseable arrival date {:?}", line, cell(self.arrival_date));
            return Ok(None);
        };

        let mut record = RawRecord::new();
        for (idx, attribute) in attribute_columns {
            record.insert(
                attribute.name.clone(),
                RawValue::from_cell(cell(*idx), attribute.kind),
            );
        }

        Ok(Some(Booking {
            arrival_date,
            hotel: cell(self.hotel).to_string(),
            is_canceled: parse_flag(line, columns::IS_CANCELED, cell(self.is_canceled))?,
            lead_time: parse_count(line, columns::LEAD_TIME, cell(self.lead_time))?,
            deposit_type: cell(self.deposit_type).to_string(),
            adr: parse_number(line, columns::ADR, cell(self.adr))?,
            required_car_parking_spaces: parse_count(
                line,
                columns::PARKING_SPACES,
                cell(self.parking),
            )?,
            previous_cancellations: parse_count(
                line,
                columns::PREVIOUS_CANCELLATIONS,
                cell(self.previous_cancellations),
            )?,
            attributes: record,
        }))
    }
}

/// Columns ignored entirely: the label and pandas index columns
fn is_ignored_column(name: &str) -> bool {
    name == columns::IS_CANCELED || name.is_empty() || name.starts_with("Unnamed:")
}

/// A column is numeric iff every present cell parses as a float
fn infer_attributes(headers: &StringRecord, rows: &[StringRecord]) -> Vec<Attribute> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !is_ignored_column(name))
        .map(|(idx, name)| {
            let mut present = rows
                .iter()
                .map(|row| row.get(idx).unwrap_or(""))
                .filter(|cell| !RawValue::is_missing_cell(cell))
                .peekable();

            let numeric = present.peek().is_some()
                && present.all(|cell| cell.parse::<f64>().is_ok());

            Attribute {
                name: name.to_string(),
                kind: if numeric {
                    AttributeKind::Numeric
                } else {
                    AttributeKind::Categorical
                },
            }
        })
        .collect()
}

fn invalid(line: usize, column: &str, value: &str) -> DataError {
    DataError::InvalidValue {
        row: line,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let date_part = cell.get(..10).unwrap_or(cell);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_number(line: usize, column: &str, cell: &str) -> Result<f64, DataError> {
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(line, column, cell))
}

fn parse_count(line: usize, column: &str, cell: &str) -> Result<u32, DataError> {
    let value = parse_number(line, column, cell)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(invalid(line, column, cell));
    }
    Ok(value as u32)
}

fn parse_flag(line: usize, column: &str, cell: &str) -> Result<bool, DataError> {
    match cell.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        _ => Err(invalid(line, column, cell)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
hotel,is_canceled,lead_time,arrival_date,adr,deposit_type,required_car_parking_spaces,previous_cancellations,country,meal
Resort Hotel,0,342,2015-07-01,0.0,No Deposit,0,0,PRT,BB
City Hotel,1,85,2015-07-14,82.0,Non Refund,0,1,GBR,HB
City Hotel,0,13,2015-08-02,107.5,No Deposit,1,0,,BB
Resort Hotel,1,60,2016-01-20,60.0,Refundable,0,0,ESP,SC
";

    #[test]
    fn test_load_sample() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 4);

        let first = &dataset.bookings()[0];
        assert_eq!(first.hotel, "Resort Hotel");
        assert_eq!(first.lead_time, 342);
        assert!(!first.is_canceled);
        assert_eq!(
            first.attributes.get("country"),
            Some(&RawValue::Text("PRT".to_string()))
        );
        assert!(first.attributes.get(columns::IS_CANCELED).is_none());

        let third = &dataset.bookings()[2];
        assert_eq!(third.attributes.get("country"), Some(&RawValue::Missing));
    }

    #[test]
    fn test_kind_inference() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let kinds: Vec<(&str, AttributeKind)> = dataset
            .attributes()
            .iter()
            .map(|a| (a.name.as_str(), a.kind))
            .collect();

        assert!(kinds.contains(&("adr", AttributeKind::Numeric)));
        assert!(kinds.contains(&("lead_time", AttributeKind::Numeric)));
        assert!(kinds.contains(&("deposit_type", AttributeKind::Categorical)));
        assert!(kinds.contains(&("arrival_date", AttributeKind::Categorical)));
        assert!(!kinds.iter().any(|(name, _)| *name == "is_canceled"));
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "hotel,is_canceled\nCity Hotel,1\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("arrival_date")));

        let csv = "arrival_date,hotel,is_canceled\n2016-01-01,City Hotel,1\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("lead_time")));
    }

    #[test]
    fn test_invalid_label_is_rejected() {
        let csv = SAMPLE.replace("City Hotel,1,85", "City Hotel,maybe,85");
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { row: 3, .. }));
    }

    #[test]
    fn test_bad_dates_are_skipped() {
        let csv = SAMPLE.replace("2015-08-02", "not-a-date");
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.skipped_rows(), 1);
    }

    #[test]
    fn test_available_months_sorted_unique() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let months = dataset.available_months();
        assert_eq!(
            months,
            vec![
                NaiveDate::from_ymd_opt(2015, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2015, 8, 1).unwrap(),
                NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_labeled_records_projection() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let attributes = dataset.select_attributes(&columns::FORM_ATTRIBUTES).unwrap();
        let labeled = dataset.labeled_records(&attributes);

        assert_eq!(labeled.len(), 4);
        assert_eq!(labeled[1].record.len(), 4);
        assert!(labeled[1].label);
        assert!(dataset.select_attributes(&["no_such_column"]).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 4);
    }
}
