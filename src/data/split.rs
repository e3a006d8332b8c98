//! Deterministic stratified train/test split.

use rand::prelude::*;

/// Split sample indices into `(train, test)`, stratified on the binary label.
///
/// Each class's indices are shuffled with a seeded RNG and
/// `round(test_fraction * class_count)` of them go to the test side, so both
/// sides keep the class ratio up to rounding. Returned indices are sorted.
pub fn stratified_split(labels: &[u8], test_fraction: f32, seed: u64) -> (Vec<usize>, Vec<usize>) {
    assert!((0.0..1.0).contains(&test_fraction));
    let mut rng = StdRng::seed_from_u64(seed);

    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut idx: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        idx.shuffle(&mut rng);

        let n_test = ((idx.len() as f32) * test_fraction).round() as usize;
        let n_test = n_test.min(idx.len());
        let (class_test, class_train) = idx.split_at(n_test);
        test.extend_from_slice(class_test);
        train.extend_from_slice(class_train);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(neg: usize, pos: usize) -> Vec<u8> {
        let mut l = vec![0u8; neg];
        l.extend(std::iter::repeat_n(1u8, pos));
        l
    }

    #[test]
    fn partitions_every_index_once() {
        let l = labels(500, 268);
        let (train, test) = stratified_split(&l, 0.2, 42);
        assert_eq!(train.len() + test.len(), l.len());

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..l.len()).collect::<Vec<_>>());
    }

    #[test]
    fn preserves_class_ratio() {
        let l = labels(500, 268);
        let (train, test) = stratified_split(&l, 0.2, 42);

        let test_pos = test.iter().filter(|&&i| l[i] == 1).count();
        let train_pos = train.iter().filter(|&&i| l[i] == 1).count();
        assert_eq!(test_pos, 54); // round(268 * 0.2)
        assert_eq!(test.len() - test_pos, 100);
        assert_eq!(train_pos, 214);
    }

    #[test]
    fn seeded() {
        let l = labels(60, 40);
        assert_eq!(stratified_split(&l, 0.25, 3), stratified_split(&l, 0.25, 3));
        assert_ne!(stratified_split(&l, 0.25, 3).1, stratified_split(&l, 0.25, 4).1);
    }

    #[test]
    fn zero_fraction_keeps_everything_for_training() {
        let l = labels(5, 5);
        let (train, test) = stratified_split(&l, 0.0, 1);
        assert_eq!(train.len(), 10);
        assert!(test.is_empty());
    }
}
