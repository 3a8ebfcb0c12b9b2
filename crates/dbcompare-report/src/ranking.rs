//! Per-operation ranking and cross-operation scoring.

use dbcompare_core::{Measurement, Suite};
use std::collections::HashMap;
use std::time::Duration;

/// Points awarded to the first three places of each compared operation.
pub const RANK_POINTS: [u32; 3] = [3, 2, 1];

/// One backend's position within an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// 1-based position.
    pub rank: usize,
    pub backend: String,
    /// Units per second; undefined throughput ranks as 0.
    pub throughput: f64,
    /// Difference to the fastest backend in percent, never positive.
    pub percent_diff: f64,
    pub duration: Duration,
    pub error_rate: Option<f64>,
}

/// Ranking of every backend that ran one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRanking {
    pub operation: String,
    pub entries: Vec<RankedEntry>,
}

/// Total points of one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendScore {
    pub backend: String,
    pub points: u32,
}

/// Rankings for every shared operation and the resulting scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub rankings: Vec<OperationRanking>,
    pub scores: Vec<BackendScore>,
}

impl Comparison {
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}

/// Rank backends per operation and score them across operations.
pub fn compare(suite: &Suite) -> Comparison {
    let rankings: Vec<OperationRanking> = group_by_operation(suite.measurements())
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(operation, group)| rank_operation(operation, &group))
        .collect();
    let scores = score_backends(&rankings, &suite.backend_labels());
    Comparison { rankings, scores }
}

/// Partition measurements by operation label, in order of first appearance.
pub fn group_by_operation(measurements: &[Measurement]) -> Vec<(&str, Vec<&Measurement>)> {
    let mut groups: Vec<(&str, Vec<&Measurement>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for m in measurements {
        match positions.get(m.operation()) {
            Some(&index) => groups[index].1.push(m),
            None => {
                positions.insert(m.operation(), groups.len());
                groups.push((m.operation(), vec![m]));
            }
        }
    }
    groups
}

/// Sort one operation's measurements by descending throughput.
///
/// The sort is stable, so tied backends keep their suite order.
pub fn rank_operation(operation: &str, group: &[&Measurement]) -> OperationRanking {
    let mut sorted: Vec<&Measurement> = group.to_vec();
    sorted.sort_by(|a, b| throughput_of(b).total_cmp(&throughput_of(a)));

    let fastest = sorted.first().map(|m| throughput_of(m)).unwrap_or(0.0);
    let entries = sorted
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let throughput = throughput_of(m);
            let percent_diff = if fastest > 0.0 {
                (throughput - fastest) / fastest * 100.0
            } else {
                0.0
            };
            RankedEntry {
                rank: i + 1,
                backend: m.backend().to_string(),
                throughput,
                percent_diff,
                duration: m.duration(),
                error_rate: m.error_rate(),
            }
        })
        .collect();

    OperationRanking {
        operation: operation.to_string(),
        entries,
    }
}

/// Sum rank points per backend and sort by total.
///
/// `discovery_order` breaks ties. Backends that never shared an operation
/// with another backend are not listed.
pub fn score_backends(rankings: &[OperationRanking], discovery_order: &[&str]) -> Vec<BackendScore> {
    let mut totals: HashMap<&str, u32> = HashMap::new();
    for ranking in rankings.iter().filter(|r| r.entries.len() > 1) {
        for entry in &ranking.entries {
            let points = RANK_POINTS.get(entry.rank - 1).copied().unwrap_or(0);
            *totals.entry(entry.backend.as_str()).or_insert(0) += points;
        }
    }

    let mut scores: Vec<BackendScore> = discovery_order
        .iter()
        .filter_map(|backend| {
            totals.get(backend).map(|&points| BackendScore {
                backend: backend.to_string(),
                points,
            })
        })
        .collect();
    scores.sort_by(|a, b| b.points.cmp(&a.points));
    scores
}

fn throughput_of(m: &Measurement) -> f64 {
    m.throughput().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dbcompare_core::{BackendRun, BackendStatus};

    /// A measurement of `records` units over one second.
    fn m(op: &str, backend: &str, records: u64) -> Measurement {
        Measurement::recorded(op, backend, records, 0, Utc::now(), Duration::from_secs(1))
    }

    fn suite(measurements: Vec<Measurement>) -> Suite {
        let mut suite = Suite::begin();
        let count = measurements.len();
        suite.record(BackendRun::new("mixed", BackendStatus::Completed, count), measurements);
        suite.finish();
        suite
    }

    #[test]
    fn test_two_backend_comparison() {
        let suite = suite(vec![m("bulk-write", "Alpha", 1000), m("bulk-write", "Beta", 500)]);
        let comparison = compare(&suite);

        assert_eq!(comparison.rankings.len(), 1);
        let entries = &comparison.rankings[0].entries;
        assert_eq!(entries[0].backend, "Alpha");
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].percent_diff, 0.0);
        assert_eq!(entries[1].backend, "Beta");
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[1].percent_diff, -50.0);

        assert_eq!(
            comparison.scores,
            vec![
                BackendScore { backend: "Alpha".to_string(), points: 3 },
                BackendScore { backend: "Beta".to_string(), points: 2 },
            ]
        );
    }

    #[test]
    fn test_slower_backend_first_in_suite() {
        let suite = suite(vec![m("Random Read", "Beta", 200), m("Random Read", "Alpha", 800)]);
        let ranking = &compare(&suite).rankings[0];
        assert_eq!(ranking.entries[0].backend, "Alpha");
        assert_eq!(ranking.entries[1].percent_diff, -75.0);
    }

    #[test]
    fn test_ties_keep_suite_order() {
        let suite = suite(vec![
            m("Update Operations", "Gamma", 700),
            m("Update Operations", "Alpha", 700),
            m("Update Operations", "Beta", 700),
        ]);
        let ranking = &compare(&suite).rankings[0];
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.backend.as_str()).collect();
        assert_eq!(order, vec!["Gamma", "Alpha", "Beta"]);
        assert!(ranking.entries.iter().all(|e| e.percent_diff == 0.0));
    }

    #[test]
    fn test_fourth_place_scores_zero() {
        let suite = suite(vec![
            m("Bulk Insert", "A", 400),
            m("Bulk Insert", "B", 300),
            m("Bulk Insert", "C", 200),
            m("Bulk Insert", "D", 100),
        ]);
        let scores = compare(&suite).scores;
        let points: Vec<(&str, u32)> = scores.iter().map(|s| (s.backend.as_str(), s.points)).collect();
        assert_eq!(points, vec![("A", 3), ("B", 2), ("C", 1), ("D", 0)]);
    }

    #[test]
    fn test_single_backend_operations_are_not_scored() {
        let suite = suite(vec![
            m("Bulk Insert", "Alpha", 100),
            m("Bulk Insert", "Beta", 200),
            m("Complex Query", "Alpha", 5000),
            m("Transaction Performance", "Alpha", 5000),
        ]);
        let comparison = compare(&suite);

        let operations: Vec<&str> = comparison.rankings.iter().map(|r| r.operation.as_str()).collect();
        assert_eq!(operations, vec!["Bulk Insert"]);
        assert_eq!(comparison.scores[0].backend, "Beta");
        assert_eq!(comparison.scores[0].points, 3);
        assert_eq!(comparison.scores[1].points, 2);
    }

    #[test]
    fn test_score_ties_follow_discovery_order() {
        let suite = suite(vec![
            m("Bulk Insert", "Beta", 100),
            m("Bulk Insert", "Alpha", 200),
            m("Random Read", "Beta", 900),
            m("Random Read", "Alpha", 300),
        ]);
        let scores = compare(&suite).scores;
        assert_eq!(scores[0].backend, "Beta");
        assert_eq!(scores[0].points, 5);
        assert_eq!(scores[1].backend, "Alpha");
        assert_eq!(scores[1].points, 5);
    }

    #[test]
    fn test_grouping_uses_first_appearance() {
        let measurements = vec![
            m("Random Read", "Alpha", 1),
            m("Bulk Insert", "Alpha", 1),
            m("Random Read", "Beta", 1),
        ];
        let groups = group_by_operation(&measurements);
        assert_eq!(groups[0].0, "Random Read");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Bulk Insert");
    }

    #[test]
    fn test_undefined_throughput_ranks_last() {
        let empty = Measurement::recorded("Random Read", "Alpha", 0, 0, Utc::now(), Duration::from_secs(1));
        let suite = suite(vec![empty, m("Random Read", "Beta", 10)]);
        let ranking = &compare(&suite).rankings[0];
        assert_eq!(ranking.entries[0].backend, "Beta");
        assert_eq!(ranking.entries[1].throughput, 0.0);
        assert_eq!(ranking.entries[1].percent_diff, -100.0);
    }

    #[test]
    fn test_compare_leaves_suite_untouched() {
        let suite = suite(vec![m("Bulk Insert", "Beta", 1), m("Bulk Insert", "Alpha", 2)]);
        let before: Vec<String> = suite.measurements().iter().map(|m| m.backend().to_string()).collect();
        let _ = compare(&suite);
        let after: Vec<String> = suite.measurements().iter().map(|m| m.backend().to_string()).collect();
        assert_eq!(before, after);
    }
}
