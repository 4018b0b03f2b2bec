//! Deposit Type Reports

use crate::style::ReportStyle;
use booking_data::{Booking, CancellationStatus};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositShare {
    pub deposit_type: String,
    pub count: usize,
    /// Percentage of all selected reservations
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositStatusShare {
    pub deposit_type: String,
    pub status: CancellationStatus,
    pub count: usize,
    /// Percentage within the deposit type
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub label: String,
    pub color: Option<String>,
}

/// Link between node indices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub count: usize,
    /// Percentage of all selected reservations
    pub percentage: f64,
}

/// Sankey data: deposit types flowing into cancellation statuses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationFlow {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
    pub link_color: String,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn counts_by_deposit_and_status<'a>(
    bookings: &[&'a Booking],
) -> BTreeMap<(&'a str, CancellationStatus), usize> {
    let mut counts = BTreeMap::new();
    for booking in bookings {
        *counts
            .entry((booking.deposit_type.as_str(), booking.status()))
            .or_insert(0) += 1;
    }
    counts
}

/// Count and share per deposit type, most frequent first
pub fn deposit_type_distribution(bookings: &[&Booking]) -> Vec<DepositShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for booking in bookings {
        *counts.entry(booking.deposit_type.as_str()).or_insert(0) += 1;
    }

    let mut shares: Vec<DepositShare> = counts
        .into_iter()
        .map(|(deposit_type, count)| DepositShare {
            deposit_type: deposit_type.to_string(),
            count,
            share: percent(count, bookings.len()),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Status split within each deposit type
pub fn deposit_cancellation_breakdown(bookings: &[&Booking]) -> Vec<DepositStatusShare> {
    let counts = counts_by_deposit_and_status(bookings);

    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for ((deposit, _), count) in &counts {
        *totals.entry(*deposit).or_insert(0) += count;
    }

    counts
        .iter()
        .map(|(&(deposit, status), &count)| DepositStatusShare {
            deposit_type: deposit.to_string(),
            status,
            count,
            percentage: percent(count, totals.get(deposit).copied().unwrap_or(0)),
        })
        .collect()
}

/// Flow from each deposit type present to "Canceled" / "Not Canceled"
pub fn reservation_flow(bookings: &[&Booking], style: &ReportStyle) -> ReservationFlow {
    let counts = counts_by_deposit_and_status(bookings);

    let deposits: Vec<&str> = {
        let mut seen: Vec<&str> = counts.keys().map(|(deposit, _)| *deposit).collect();
        seen.dedup();
        seen
    };
    let targets = [CancellationStatus::Canceled, CancellationStatus::NotCanceled];

    let mut nodes: Vec<FlowNode> = deposits
        .iter()
        .enumerate()
        .map(|(i, deposit)| FlowNode {
            label: deposit.to_string(),
            color: style.flow_color(i).map(str::to_string),
        })
        .collect();
    nodes.extend(targets.iter().map(|status| FlowNode {
        label: status.as_str().to_string(),
        color: style.status_color(*status).map(str::to_string),
    }));

    let mut links = Vec::with_capacity(counts.len());
    for (target_offset, status) in targets.iter().enumerate() {
        for (source, deposit) in deposits.iter().enumerate() {
            if let Some(&count) = counts.get(&(*deposit, *status)) {
                links.push(FlowLink {
                    source,
                    target: deposits.len() + target_offset,
                    count,
                    percentage: percent(count, bookings.len()),
                });
            }
        }
    }

    ReservationFlow {
        nodes,
        links,
        link_color: style.flow_link_color.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample;

    #[test]
    fn test_distribution() {
        let bookings = sample();
        let refs: Vec<&Booking> = bookings.iter().collect();
        let shares = deposit_type_distribution(&refs);

        assert_eq!(shares[0].deposit_type, "No Deposit");
        assert_eq!(shares[0].count, 4);
        assert_eq!(shares[0].share, 50.0);
        assert_eq!(shares[1].deposit_type, "Non Refund");
        assert_eq!(shares[2].count, 1);
        assert!((shares.iter().map(|s| s.share).sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_percentages_within_deposit() {
        let bookings = sample();
        let refs: Vec<&Booking> = bookings.iter().collect();
        let breakdown = deposit_cancellation_breakdown(&refs);

        let no_deposit: Vec<_> = breakdown
            .iter()
            .filter(|b| b.deposit_type == "No Deposit")
            .collect();
        assert_eq!(no_deposit[0].status, CancellationStatus::NotCanceled);
        assert_eq!(no_deposit[0].percentage, 75.0);
        assert_eq!(no_deposit[1].percentage, 25.0);

        let non_refund: Vec<_> = breakdown
            .iter()
            .filter(|b| b.deposit_type == "Non Refund")
            .collect();
        assert_eq!(non_refund.len(), 1);
        assert_eq!(non_refund[0].percentage, 100.0);
    }

    #[test]
    fn test_flow_nodes_and_links() {
        let bookings = sample();
        let refs: Vec<&Booking> = bookings.iter().collect();
        let flow = reservation_flow(&refs, &ReportStyle::default());

        let labels: Vec<&str> = flow.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["No Deposit", "Non Refund", "Refundable", "Canceled", "Not Canceled"]
        );
        assert_eq!(flow.nodes[3].color.as_deref(), Some("#a6cee3"));

        // Only combinations that occur become links
        assert_eq!(flow.links.len(), 4);
        let canceled_non_refund = flow
            .links
            .iter()
            .find(|l| l.source == 1 && l.target == 3)
            .unwrap();
        assert_eq!(canceled_non_refund.count, 3);
        assert_eq!(canceled_non_refund.percentage, 37.5);
        assert_eq!(flow.links.iter().map(|l| l.count).sum::<usize>(), bookings.len());
    }

    #[test]
    fn test_flow_without_bookings() {
        let flow = reservation_flow(&[], &ReportStyle::default());
        assert_eq!(flow.nodes.len(), 2);
        assert!(flow.links.is_empty());
    }
}
