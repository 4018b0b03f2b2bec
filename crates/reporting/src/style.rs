//! Chart Colors

use booking_data::CancellationStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Color maps served alongside chart data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStyle {
    /// Keyed by status label ("Not Canceled", "Canceled")
    pub status_colors: BTreeMap<String, String>,
    pub hotel_colors: BTreeMap<String, String>,
    pub deposit_colors: BTreeMap<String, String>,
    /// Cycled over the deposit-type nodes of the reservation flow
    pub flow_palette: Vec<String>,
    pub flow_link_color: String,
}

fn color_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            status_colors: color_map(&[("Not Canceled", "#377eb8"), ("Canceled", "#a6cee3")]),
            hotel_colors: color_map(&[("City Hotel", "#636EFA"), ("Resort Hotel", "#EF553B")]),
            deposit_colors: color_map(&[
                ("No Deposit", "#8c0650"),
                ("Non Refund", "#c90672"),
                ("Refundable", "#ff038e"),
            ]),
            flow_palette: vec![
                "#636EFA".to_string(),
                "#EF553B".to_string(),
                "#00CC96".to_string(),
            ],
            flow_link_color: "rgba(150, 150, 150, 0.4)".to_string(),
        }
    }
}

impl ReportStyle {
    pub fn status_color(&self, status: CancellationStatus) -> Option<&str> {
        self.status_colors.get(status.as_str()).map(String::as_str)
    }

    /// Palette entry for the n-th flow source node
    pub fn flow_color(&self, index: usize) -> Option<&str> {
        if self.flow_palette.is_empty() {
            return None;
        }
        Some(&self.flow_palette[index % self.flow_palette.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_colors() {
        let style = ReportStyle::default();
        assert_eq!(style.status_color(CancellationStatus::Canceled), Some("#a6cee3"));
        assert_eq!(style.hotel_colors["Resort Hotel"], "#EF553B");
        assert_eq!(style.flow_color(4), Some("#EF553B"));
    }

    #[test]
    fn test_empty_palette() {
        let style = ReportStyle {
            flow_palette: Vec::new(),
            ..Default::default()
        };
        assert_eq!(style.flow_color(0), None);
    }
}
