//! Ranked comparison reports.
//!
//! A [`GroupReport`] borrows a group's statistics, ranks them and renders
//! plain text lines. Writing those lines anywhere is left to a [`TextSink`].

pub mod bars;
pub mod sink;
pub mod styles;
pub mod table;

pub use sink::{StdoutSink, TextSink};
pub use styles::{ReportStyle, StabilityPolicy};

use crate::benchmark::runner::GroupOutcome;
use crate::error::{Result, TaskFailure};
use crate::metrics::{format_duration, format_margin, format_ops, TaskStatistics};
use styles::FASTEST_MARKER;
use table::{display_width, Align, Table};

/// A task's position in the ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry<'a> {
    pub stats: &'a TaskStatistics,
    /// Index of the task in registration order
    pub registration_index: usize,
    /// `100 * ops / fastest_ops`
    pub ratio: f64,
}

/// Relative performance of `ops` against the fastest rate, in percent.
///
/// When the fastest rate is zero every task is tied and gets 100.
pub fn relative_ratio(ops: f64, fastest_ops: f64) -> f64 {
    if fastest_ops > 0.0 {
        ops / fastest_ops * 100.0
    } else {
        100.0
    }
}

/// Order statistics by descending rate; ties keep registration order.
pub fn rank(statistics: &[TaskStatistics]) -> Vec<RankedEntry<'_>> {
    let mut ranking: Vec<RankedEntry<'_>> = statistics
        .iter()
        .enumerate()
        .map(|(registration_index, stats)| RankedEntry {
            stats,
            registration_index,
            ratio: 0.0,
        })
        .collect();
    ranking.sort_by(|a, b| b.stats.ops_per_second.total_cmp(&a.stats.ops_per_second));

    let fastest_ops = ranking
        .first()
        .map(|entry| entry.stats.ops_per_second)
        .unwrap_or(0.0);
    for (position, entry) in ranking.iter_mut().enumerate() {
        entry.ratio = if position == 0 {
            100.0
        } else {
            relative_ratio(entry.stats.ops_per_second, fastest_ops)
        };
    }

    ranking
}

/// Report for one group
#[derive(Debug, Clone)]
pub struct GroupReport<'a> {
    title: &'a str,
    statistics: &'a [TaskStatistics],
    failures: &'a [TaskFailure],
    ranking: Vec<RankedEntry<'a>>,
}

impl<'a> GroupReport<'a> {
    pub fn new(title: &'a str, statistics: &'a [TaskStatistics]) -> Self {
        Self {
            title,
            statistics,
            failures: &[],
            ranking: rank(statistics),
        }
    }

    pub fn from_outcome(outcome: &'a GroupOutcome) -> Self {
        Self::new(&outcome.title, &outcome.statistics).with_failures(&outcome.failures)
    }

    pub fn with_failures(mut self, failures: &'a [TaskFailure]) -> Self {
        self.failures = failures;
        self
    }

    pub fn ranking(&self) -> &[RankedEntry<'a>] {
        &self.ranking
    }

    /// The fastest task; the first registered wins a tie.
    pub fn fastest(&self) -> Option<&'a TaskStatistics> {
        self.ranking.first().map(|entry| entry.stats)
    }

    /// Render the full report as lines of text.
    pub fn render(&self, style: &ReportStyle) -> Vec<String> {
        let mut lines = vec![self.title.to_string()];
        lines.extend(self.render_table());

        if let Some(fastest) = self.fastest() {
            lines.push(String::new());
            lines.push(format!(
                "Fastest: {} ({} ops/sec)",
                fastest.name,
                format_ops(fastest.ops_per_second)
            ));

            lines.push(String::new());
            lines.push("Relative performance:".to_string());
            lines.extend(bars::render_bars(&self.ranking, style.bar_unit_percent));

            lines.push(String::new());
            lines.push("Stability:".to_string());
            lines.extend(self.render_stability(&style.stability));
        }

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Failed tasks:".to_string());
            for failure in self.failures {
                lines.push(format!("  {}: {}", failure.task, failure.cause));
            }
        }

        lines
    }

    /// Render and write every line to `sink`, stopping at the first write error.
    pub fn emit(&self, style: &ReportStyle, sink: &mut dyn TextSink) -> Result<()> {
        for line in self.render(style) {
            sink.write_line(&line)?;
        }
        Ok(())
    }

    fn render_table(&self) -> Vec<String> {
        let mut table = Table::new([
            ("Task", Align::Left),
            ("ops/sec", Align::Right),
            ("mean", Align::Right),
            ("p75", Align::Right),
            ("p99", Align::Right),
            ("±rme", Align::Right),
            ("samples", Align::Right),
        ]);

        let fastest = self.ranking.first().map(|entry| entry.registration_index);
        for (index, stats) in self.statistics.iter().enumerate() {
            let marker = if Some(index) == fastest {
                FASTEST_MARKER.to_string()
            } else {
                " ".repeat(FASTEST_MARKER.len())
            };
            table.push_row(vec![
                format!("{marker}{}", stats.name),
                format_ops(stats.ops_per_second),
                format_duration(stats.mean),
                format_duration(stats.p75),
                format_duration(stats.p99),
                format_margin(stats.relative_margin_of_error),
                stats.sample_count.to_string(),
            ]);
        }

        table.render()
    }

    fn render_stability(&self, policy: &StabilityPolicy) -> Vec<String> {
        let name_width = self
            .statistics
            .iter()
            .map(|stats| display_width(&stats.name))
            .max()
            .unwrap_or(0);

        self.statistics
            .iter()
            .map(|stats| {
                let fill = " ".repeat(name_width - display_width(&stats.name));
                format!(
                    "  {}{fill} {:<5} ({})",
                    stats.name,
                    policy.rating(stats.relative_margin_of_error),
                    format_margin(stats.relative_margin_of_error)
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, ops: f64) -> TaskStatistics {
        TaskStatistics {
            name: name.to_string(),
            ops_per_second: ops,
            mean: if ops > 0.0 { 1.0 / ops } else { 0.0 },
            sample_count: 10,
            ..TaskStatistics::default()
        }
    }

    #[test]
    fn test_fastest_is_argmax() {
        let all = vec![stats("slow", 10.0), stats("fast", 40.0), stats("mid", 20.0)];
        let report = GroupReport::new("group", &all);

        assert_eq!(report.fastest().map(|s| s.name.as_str()), Some("fast"));
        let order: Vec<_> = report.ranking().iter().map(|e| e.stats.name.as_str()).collect();
        assert_eq!(order, ["fast", "mid", "slow"]);
        let ratios: Vec<_> = report.ranking().iter().map(|e| e.ratio).collect();
        assert_eq!(ratios, [100.0, 50.0, 25.0]);
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let all = vec![stats("a", 5.0), stats("b", 7.0), stats("c", 7.0)];
        let ranking = rank(&all);

        assert_eq!(ranking[0].stats.name, "b");
        assert_eq!(ranking[1].stats.name, "c");
        assert_eq!(ranking[1].ratio, 100.0);
        assert_eq!(ranking[0].registration_index, 1);
    }

    #[test]
    fn test_fastest_ratio_is_exactly_hundred() {
        let all = vec![stats("x", 3.0), stats("y", 0.1 + 0.2)];
        let ranking = rank(&all);
        assert_eq!(ranking[0].ratio, 100.0);
    }

    #[test]
    fn test_all_zero_rates_are_tied() {
        let all = vec![stats("a", 0.0), stats("b", 0.0)];
        let ranking = rank(&all);
        assert_eq!(ranking[0].stats.name, "a");
        assert!(ranking.iter().all(|e| e.ratio == 100.0));
    }

    #[test]
    fn test_ranking_leaves_input_untouched() {
        let all = vec![stats("a", 1.0), stats("b", 2.0)];
        let before = all.clone();
        let _ = GroupReport::new("g", &all).render(&ReportStyle::default());
        assert_eq!(all, before);
    }

    #[test]
    fn test_empty_group_renders_empty_table() {
        let report = GroupReport::new("nothing", &[]);
        let lines = report.render(&ReportStyle::default());

        assert!(report.fastest().is_none());
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "nothing");
        assert!(!lines.iter().any(|l| l.starts_with("Fastest")));
    }

    #[test]
    fn test_render_marks_fastest_and_draws_bars() {
        let all = vec![stats("alpha", 1_000.0), stats("beta", 2_000.0)];
        let lines = GroupReport::new("pair", &all).render(&ReportStyle::default());

        assert!(lines.iter().any(|l| l.contains("* beta")));
        assert!(lines.iter().any(|l| l.contains("  alpha")));
        assert!(lines.contains(&"Fastest: beta (2.00K ops/sec)".to_string()));

        let beta_bar = lines.iter().find(|l| l.starts_with("  beta ")).unwrap();
        assert!(beta_bar.ends_with(&format!("{} 100.0%", "█".repeat(20))));
        let alpha_bar = lines.iter().find(|l| l.starts_with("  alpha ")).unwrap();
        assert!(alpha_bar.ends_with(&format!("{} 50.0%", "█".repeat(10))));
    }

    #[test]
    fn test_emit_surfaces_write_errors() {
        struct ClosedPipe(usize);
        impl TextSink for ClosedPipe {
            fn write_line(&mut self, _line: &str) -> std::io::Result<()> {
                self.0 += 1;
                Err(std::io::ErrorKind::BrokenPipe.into())
            }
        }

        let all = vec![stats("ok", 1.0)];
        let mut sink = ClosedPipe(0);
        let err = GroupReport::new("g", &all)
            .emit(&ReportStyle::default(), &mut sink)
            .unwrap_err();

        assert!(matches!(err, crate::error::HarnessError::Io(_)));
        assert_eq!(sink.0, 1);
    }

    #[test]
    fn test_failures_are_listed() {
        let all = vec![stats("ok", 1.0)];
        let failures = vec![TaskFailure::new("bad", "exploded")];
        let mut sink: Vec<String> = Vec::new();
        GroupReport::new("g", &all)
            .with_failures(&failures)
            .emit(&ReportStyle::default(), &mut sink)
            .unwrap();

        assert!(sink.contains(&"Failed tasks:".to_string()));
        assert!(sink.contains(&"  bad: exploded".to_string()));
    }
}
