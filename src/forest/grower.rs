//! CART tree grower for the random forest.
//!
//! Grows one classification tree depth-first with Gini impurity. At each node a
//! shuffled feature order is scanned; once `n_candidate_features` features have
//! been tried the scan stops, unless none of them produced a valid split, in
//! which case it keeps going through the remaining features.

use ndarray::ArrayView2;
use rand::prelude::*;

use super::config::ForestConfig;
use super::tree::{MutableTree, NodeId, Tree};

/// Parameters for tree growth.
#[derive(Clone, Debug)]
pub struct GrowerParams {
    pub max_depth: u32,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features tried per node before accepting the best split found.
    pub n_candidate_features: usize,
    /// Draw a bootstrap resample of the rows before growing.
    pub bootstrap: bool,
}

impl GrowerParams {
    pub fn from_config(config: &ForestConfig, n_features: usize) -> Self {
        Self {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            n_candidate_features: config.max_features.resolve(n_features),
            bootstrap: config.bootstrap,
        }
    }
}

/// Best split found for a node.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SplitInfo {
    feature: usize,
    threshold: f32,
    /// Sample-weighted Gini impurity of the two children.
    impurity: f64,
}

/// A node waiting to be expanded, with the rows that reached it.
struct NodeCandidate {
    node: NodeId,
    rows: Vec<usize>,
    depth: u32,
}

/// Grows one tree over a borrowed feature matrix.
pub struct TreeGrower<'a> {
    params: GrowerParams,
    features: ArrayView2<'a, f32>,
    labels: &'a [u8],
    /// Reused `(value, label)` buffer for sorting a node's rows by one feature.
    sorted: Vec<(f32, u8)>,
}

impl<'a> TreeGrower<'a> {
    /// `features` is `[n_samples, n_features]`, `labels` holds `0`/`1`.
    pub fn new(params: GrowerParams, features: ArrayView2<'a, f32>, labels: &'a [u8]) -> Self {
        debug_assert_eq!(features.nrows(), labels.len());
        Self {
            params,
            features,
            labels,
            sorted: Vec::with_capacity(labels.len()),
        }
    }

    /// Grow a tree. All randomness (bootstrap rows, feature order) comes from `rng`.
    pub fn grow<R: Rng>(&mut self, rng: &mut R) -> Tree {
        let n_samples = self.labels.len();
        let rows: Vec<usize> = if self.params.bootstrap {
            (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
        } else {
            (0..n_samples).collect()
        };

        let mut tree = MutableTree::new();
        let root = tree.init_root();
        if rows.is_empty() {
            tree.make_leaf(root, 0.0);
            return tree.finish();
        }

        let mut stack = vec![NodeCandidate {
            node: root,
            rows,
            depth: 0,
        }];

        while let Some(candidate) = stack.pop() {
            let counts = self.class_counts(&candidate.rows);
            let split = if self.should_expand(&candidate, counts) {
                self.find_split(&candidate.rows, counts, rng)
            } else {
                None
            };

            let Some(split) = split else {
                tree.make_leaf(candidate.node, positive_fraction(counts));
                continue;
            };

            let features = self.features;
            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = candidate
                .rows
                .into_iter()
                .partition(|&r| features[[r, split.feature]] < split.threshold);
            let (left, right) = tree.apply_split(candidate.node, split.feature as u32, split.threshold);

            // Right first so the left subtree is expanded first.
            stack.push(NodeCandidate {
                node: right,
                rows: right_rows,
                depth: candidate.depth + 1,
            });
            stack.push(NodeCandidate {
                node: left,
                rows: left_rows,
                depth: candidate.depth + 1,
            });
        }

        tree.finish()
    }

    fn class_counts(&self, rows: &[usize]) -> [usize; 2] {
        let positives = rows.iter().filter(|&&r| self.labels[r] == 1).count();
        [rows.len() - positives, positives]
    }

    fn should_expand(&self, candidate: &NodeCandidate, counts: [usize; 2]) -> bool {
        let n = candidate.rows.len();
        candidate.depth < self.params.max_depth
            && n >= self.params.min_samples_split
            && n >= 2 * self.params.min_samples_leaf
            && counts[0] > 0
            && counts[1] > 0
    }

    fn find_split<R: Rng>(&mut self, rows: &[usize], counts: [usize; 2], rng: &mut R) -> Option<SplitInfo> {
        let mut order: Vec<usize> = (0..self.features.ncols()).collect();
        order.shuffle(rng);

        let mut best: Option<SplitInfo> = None;
        for (tried, &feature) in order.iter().enumerate() {
            if tried >= self.params.n_candidate_features && best.is_some() {
                break;
            }
            if let Some(split) = self.best_split_for_feature(feature, rows, counts[1]) {
                if best.is_none_or(|b| split.impurity < b.impurity) {
                    best = Some(split);
                }
            }
        }
        best
    }

    /// Exhaustive threshold search on one feature.
    fn best_split_for_feature(&mut self, feature: usize, rows: &[usize], total_pos: usize) -> Option<SplitInfo> {
        let features = self.features;
        let labels = self.labels;
        self.sorted.clear();
        self.sorted
            .extend(rows.iter().map(|&r| (features[[r, feature]], labels[r])));
        self.sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let n = self.sorted.len();
        let min_leaf = self.params.min_samples_leaf;
        let mut left_pos = 0usize;
        let mut best: Option<(f64, f32, f32)> = None;

        for n_left in 1..n {
            let (lo, label) = self.sorted[n_left - 1];
            left_pos += label as usize;
            let hi = self.sorted[n_left].0;

            let n_right = n - n_left;
            if n_left < min_leaf || n_right < min_leaf || lo >= hi {
                continue;
            }

            let impurity = weighted_gini(n_left, left_pos, n_right, total_pos - left_pos);
            if best.is_none_or(|(b, _, _)| impurity < b) {
                best = Some((impurity, lo, hi));
            }
        }

        best.map(|(impurity, lo, hi)| SplitInfo {
            feature,
            threshold: split_threshold(lo, hi),
            impurity,
        })
    }
}

/// Threshold strictly above `lo` and at most `hi`, so `lo` goes left and `hi` right.
fn split_threshold(lo: f32, hi: f32) -> f32 {
    let mid = ((lo as f64 + hi as f64) / 2.0) as f32;
    if mid <= lo { hi } else { mid }
}

#[inline]
fn gini(n: usize, positives: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

#[inline]
fn weighted_gini(n_left: usize, pos_left: usize, n_right: usize, pos_right: usize) -> f64 {
    let n = (n_left + n_right) as f64;
    (n_left as f64 * gini(n_left, pos_left) + n_right as f64 * gini(n_right, pos_right)) / n
}

#[inline]
fn positive_fraction(counts: [usize; 2]) -> f32 {
    let n = counts[0] + counts[1];
    if n == 0 {
        0.0
    } else {
        counts[1] as f32 / n as f32
    }
}
