//! Binary classification metrics for the hold-out evaluation.

use std::fmt;

/// Fraction of predictions equal to the true label. 0 for empty input.
pub fn accuracy(labels: &[u8], predictions: &[u8]) -> f64 {
    debug_assert_eq!(labels.len(), predictions.len());
    if labels.is_empty() {
        return 0.0;
    }
    let correct = labels
        .iter()
        .zip(predictions)
        .filter(|(l, p)| l == p)
        .count();
    correct as f64 / labels.len() as f64
}

/// Binary cross-entropy of positive-class probabilities.
///
/// Lower is better. Probabilities are clamped away from 0 and 1.
pub fn log_loss(labels: &[u8], probabilities: &[f64]) -> f64 {
    debug_assert_eq!(labels.len(), probabilities.len());
    if labels.is_empty() {
        return 0.0;
    }
    const EPS: f64 = 1e-15;
    let sum: f64 = labels
        .iter()
        .zip(probabilities)
        .map(|(&l, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            if l == 1 { -p.ln() } else { -(1.0 - p).ln() }
        })
        .sum();
    sum / labels.len() as f64
}

/// Area under the ROC curve, with average ranks for tied scores.
///
/// Returns 0.5 when only one class is present.
pub fn roc_auc(labels: &[u8], probabilities: &[f64]) -> f64 {
    debug_assert_eq!(labels.len(), probabilities.len());
    let n = labels.len();
    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| probabilities[a].total_cmp(&probabilities[b]));

    // Ascending ranks, ties share their average rank.
    let mut rank_sum_pos = 0.0f64;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && probabilities[indices[j]] == probabilities[indices[i]] {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        rank_sum_pos += avg_rank * indices[i..j].iter().filter(|&&k| labels[k] == 1).count() as f64;
        i = j;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    (rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}

// =============================================================================
// Confusion matrix
// =============================================================================

/// `counts[actual][predicted]` for labels 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn new(labels: &[u8], predictions: &[u8]) -> Self {
        let mut counts = [[0usize; 2]; 2];
        for (&l, &p) in labels.iter().zip(predictions) {
            counts[l.min(1) as usize][p.min(1) as usize] += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Rows whose true label is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    /// Rows predicted as `class`.
    pub fn predicted(&self, class: usize) -> usize {
        self.counts[0][class] + self.counts[1][class]
    }

    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }
}

// =============================================================================
// Classification report
// =============================================================================

/// Precision, recall, F1 and support for one class or average.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class scores plus accuracy, macro and support-weighted averages.
///
/// Undefined ratios (no predicted or no actual samples of a class) are 0.
/// `Display` renders the familiar two-decimal text table.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: [ClassScores; 2],
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
    pub confusion: ConfusionMatrix,
}

impl ClassificationReport {
    pub fn new(labels: &[u8], predictions: &[u8]) -> Self {
        let confusion = ConfusionMatrix::new(labels, predictions);
        let classes = [0, 1].map(|c| {
            let tp = confusion.counts[c][c];
            let precision = ratio(tp, confusion.predicted(c));
            let recall = ratio(tp, confusion.support(c));
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassScores {
                precision,
                recall,
                f1,
                support: confusion.support(c),
            }
        });

        let total = confusion.total();
        let macro_avg = ClassScores {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1: (classes[0].f1 + classes[1].f1) / 2.0,
            support: total,
        };
        let weighted = |f: fn(&ClassScores) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes.iter().map(|s| f(s) * s.support as f64).sum::<f64>() / total as f64
            }
        };
        let weighted_avg = ClassScores {
            precision: weighted(|s| s.precision),
            recall: weighted(|s| s.recall),
            f1: weighted(|s| s.f1),
            support: total,
        };

        Self {
            classes,
            accuracy: ratio(confusion.correct(), total),
            macro_avg,
            weighted_avg,
            confusion,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

const NAME_WIDTH: usize = 12;

fn write_scores(f: &mut fmt::Formatter<'_>, name: &str, s: &ClassScores) -> fmt::Result {
    writeln!(
        f,
        "{name:>NAME_WIDTH$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        s.precision, s.recall, s.f1, s.support
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>NAME_WIDTH$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (class, scores) in self.classes.iter().enumerate() {
            write_scores(f, &class.to_string(), scores)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>NAME_WIDTH$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.confusion.total()
        )?;
        write_scores(f, "macro avg", &self.macro_avg)?;
        write_scores(f, "weighted avg", &self.weighted_avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn accuracy_counts_matches() {
        assert_abs_diff_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn auc_perfect_and_inverted() {
        let labels = [0, 0, 1, 1];
        assert_abs_diff_eq!(roc_auc(&labels, &[0.1, 0.2, 0.8, 0.9]), 1.0);
        assert_abs_diff_eq!(roc_auc(&labels, &[0.9, 0.8, 0.2, 0.1]), 0.0);
        assert_abs_diff_eq!(roc_auc(&labels, &[0.5, 0.5, 0.5, 0.5]), 0.5);
        assert_abs_diff_eq!(roc_auc(&[1, 1], &[0.3, 0.4]), 0.5);
    }

    #[test]
    fn auc_with_one_swap() {
        // One of four positive/negative pairs is misordered.
        let labels = [0, 1, 0, 1];
        assert_abs_diff_eq!(roc_auc(&labels, &[0.1, 0.3, 0.4, 0.9]), 0.75);
    }

    #[test]
    fn log_loss_is_small_for_confident_correct() {
        assert!(log_loss(&[1, 0], &[0.99, 0.01]) < 0.02);
        assert_abs_diff_eq!(log_loss(&[1], &[0.5]), std::f64::consts::LN_2, epsilon = 1e-12);
        assert!(log_loss(&[1], &[0.0]).is_finite());
    }

    #[test]
    fn report_scores() {
        // actual:    0 0 0 0 1 1 1 1 1 1
        // predicted: 0 0 0 1 1 1 1 1 0 0
        let labels = [0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
        let preds = [0, 0, 0, 1, 1, 1, 1, 1, 0, 0];
        let r = ClassificationReport::new(&labels, &preds);

        assert_eq!(r.confusion.counts, [[3, 1], [2, 4]]);
        assert_abs_diff_eq!(r.accuracy, 0.7);
        assert_abs_diff_eq!(r.classes[0].precision, 0.6);
        assert_abs_diff_eq!(r.classes[0].recall, 0.75);
        assert_abs_diff_eq!(r.classes[1].precision, 0.8);
        assert_abs_diff_eq!(r.classes[1].recall, 4.0 / 6.0);
        assert_eq!(r.classes[1].support, 6);
        assert_abs_diff_eq!(r.macro_avg.precision, 0.7);
        assert_abs_diff_eq!(r.weighted_avg.recall, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn report_handles_missing_predictions() {
        let r = ClassificationReport::new(&[0, 1], &[0, 0]);
        assert_eq!(r.classes[1].precision, 0.0);
        assert_eq!(r.classes[1].f1, 0.0);
    }

    #[test]
    fn report_renders_table() {
        let r = ClassificationReport::new(&[0, 0, 1, 1], &[0, 0, 1, 0]);
        let text = r.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "              precision    recall  f1-score   support"
        );
        assert_eq!(
            lines[2],
            "           0       0.67      1.00      0.80         2"
        );
        assert_eq!(
            lines[5],
            "    accuracy                           0.75         4"
        );
        assert!(lines[7].starts_with("weighted avg"));
    }
}
