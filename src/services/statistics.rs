//! Read-side aggregation over a set of submissions. Recomputed on every call;
//! nothing here is persisted or cached.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SubmissionStatistics {
    pub(crate) total: i64,
    pub(crate) graded_count: i64,
    pub(crate) late_count: i64,
    pub(crate) average_score: f64,
    pub(crate) completion_rate: f64,
}

/// Summarize `(score, is_late)` pairs. The average is over graded submissions
/// only; both ratios are 0.0 (never NaN) when their denominator is zero.
pub(crate) fn summarize(
    items: impl IntoIterator<Item = (Option<i32>, bool)>,
) -> SubmissionStatistics {
    let mut total: i64 = 0;
    let mut graded_count: i64 = 0;
    let mut late_count: i64 = 0;
    let mut score_sum: i64 = 0;

    for (score, is_late) in items {
        total += 1;
        if is_late {
            late_count += 1;
        }
        if let Some(score) = score {
            graded_count += 1;
            score_sum += i64::from(score);
        }
    }

    let average_score =
        if graded_count > 0 { score_sum as f64 / graded_count as f64 } else { 0.0 };
    let completion_rate =
        if total > 0 { graded_count as f64 * 100.0 / total as f64 } else { 0.0 };

    SubmissionStatistics { total, graded_count, late_count, average_score, completion_rate }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_all_zeros() {
        let stats = summarize([]);
        assert_eq!(
            stats,
            SubmissionStatistics {
                total: 0,
                graded_count: 0,
                late_count: 0,
                average_score: 0.0,
                completion_rate: 0.0,
            }
        );
    }

    #[test]
    fn ungraded_submissions_do_not_skew_average() {
        let stats = summarize([(Some(80), false), (None, false), (None, true)]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.graded_count, 1);
        assert_eq!(stats.late_count, 1);
        assert_eq!(stats.average_score, 80.0);
        assert!((stats.completion_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn single_late_graded_submission() {
        let stats = summarize([(Some(85), true)]);
        assert_eq!(
            stats,
            SubmissionStatistics {
                total: 1,
                graded_count: 1,
                late_count: 1,
                average_score: 85.0,
                completion_rate: 100.0,
            }
        );
    }

    #[test]
    fn average_is_mean_of_graded_scores() {
        let stats = summarize([(Some(60), false), (Some(90), false), (Some(75), true)]);
        assert_eq!(stats.average_score, 75.0);
        assert_eq!(stats.completion_rate, 100.0);
    }
}
