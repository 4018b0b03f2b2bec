//! Stratified Train/Test Split

use crate::TrainerError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of each partition, ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split rows so both partitions keep the class ratio.
///
/// Each class contributes `round(n * test_fraction)` rows to the test
/// partition, clamped so both partitions see every class.
pub fn stratified_split(
    labels: &[bool],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, TrainerError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for class in [false, true] {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();

        let count = members.len();
        if count < 2 {
            return Err(TrainerError::InsufficientData {
                class: u8::from(class),
                count,
            });
        }

        members.shuffle(&mut rng);
        let n_test = ((count as f64 * test_fraction).round() as usize).clamp(1, count - 1);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(SplitIndices { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(negatives: usize, positives: usize) -> Vec<bool> {
        (0..negatives + positives).map(|i| i >= negatives).collect()
    }

    #[test]
    fn test_partition_sizes() {
        let split = stratified_split(&labels(800, 200), 0.3, 42).unwrap();
        assert_eq!(split.test.len(), 300);
        assert_eq!(split.train.len(), 700);

        let y = labels(800, 200);
        assert_eq!(split.test.iter().filter(|&&i| y[i]).count(), 60);
    }

    #[test]
    fn test_same_seed_same_split() {
        let y = labels(50, 30);
        assert_eq!(
            stratified_split(&y, 0.3, 42).unwrap(),
            stratified_split(&y, 0.3, 42).unwrap()
        );
        assert_ne!(
            stratified_split(&y, 0.3, 42).unwrap(),
            stratified_split(&y, 0.3, 43).unwrap()
        );
    }

    #[test]
    fn test_tiny_class_still_in_both_partitions() {
        let y = labels(10, 2);
        let split = stratified_split(&y, 0.3, 1).unwrap();
        assert_eq!(split.test.iter().filter(|&&i| y[i]).count(), 1);
        assert_eq!(split.train.iter().filter(|&&i| y[i]).count(), 1);
    }

    #[test]
    fn test_missing_class_rejected() {
        let err = stratified_split(&labels(10, 0), 0.3, 42).unwrap_err();
        assert!(matches!(err, TrainerError::InsufficientData { class: 1, count: 0 }));

        let err = stratified_split(&labels(1, 10), 0.3, 42).unwrap_err();
        assert!(matches!(err, TrainerError::InsufficientData { class: 0, count: 1 }));
    }

    proptest! {
        #[test]
        fn prop_split_is_a_partition(neg in 2usize..200, pos in 2usize..200, seed in any::<u64>()) {
            let split = stratified_split(&labels(neg, pos), 0.3, seed).unwrap();
            let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..neg + pos).collect::<Vec<_>>());
        }
    }
}
