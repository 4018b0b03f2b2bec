//! Held-Out Evaluation

use inference_engine::{ConfusionCounts, EvaluationMetrics};

/// Binary classification metrics with cancellation as the positive class.
///
/// Precision and recall are 0 when their denominator is empty.
pub fn evaluate(actual: &[bool], predicted: &[bool]) -> EvaluationMetrics {
    let mut confusion = ConfusionCounts::default();
    for (&truth, &guess) in actual.iter().zip(predicted) {
        match (truth, guess) {
            (true, true) => confusion.true_positives += 1,
            (false, true) => confusion.false_positives += 1,
            (false, false) => confusion.true_negatives += 1,
            (true, false) => confusion.false_negatives += 1,
        }
    }

    let total = confusion.total();
    if total == 0 {
        return EvaluationMetrics::default();
    }

    let tp = confusion.true_positives as f64;
    let accuracy = (confusion.true_positives + confusion.true_negatives) as f64 / total as f64;
    let precision = ratio(tp, (confusion.true_positives + confusion.false_positives) as f64);
    let recall = ratio(tp, (confusion.true_positives + confusion.false_negatives) as f64);
    let f1 = ratio(2.0 * precision * recall, precision + recall);

    EvaluationMetrics {
        accuracy,
        precision,
        recall,
        f1,
        confusion,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_ratios() {
        let actual = [true, true, true, false, false, false, false, false];
        let predicted = [true, true, false, true, false, false, false, false];
        let m = evaluate(&actual, &predicted);

        assert_eq!(m.confusion.true_positives, 2);
        assert_eq!(m.confusion.false_positives, 1);
        assert_eq!(m.confusion.true_negatives, 4);
        assert_eq!(m.confusion.false_negatives, 1);
        assert!((m.accuracy - 0.75).abs() < 1e-12);
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_positive_predictions() {
        let m = evaluate(&[true, false, false], &[false, false, false]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
        assert!((m.accuracy - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(evaluate(&[], &[]), EvaluationMetrics::default());
    }
}
