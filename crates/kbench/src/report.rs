//! Comparison report: speedup, correctness verdicts and rendering.

use crate::stats::{CandidateSummary, GoldenChecksum};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const RULE_WIDTH: usize = 86;

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub average_duration: f64,
    pub stdev_duration: f64,
    pub speedup: f64,
    pub successful_runs: u32,
    pub correct_count: u32,
    pub total_attempts: u32,
    /// Every attempt produced the reference checksum.
    pub passed: bool,
    pub is_baseline: bool,
}

impl ComparisonRow {
    /// Correctness ratio as `correct/total`.
    pub fn correctness_ratio(&self) -> String {
        format!("{}/{}", self.correct_count, self.total_attempts)
    }
}

/// Full result of a benchmark campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub campaign_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Digest of the ordered candidate set.
    pub registry_digest: String,
    pub golden_checksum: GoldenChecksum,
    pub workers: usize,
    pub repetitions: u32,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonReport {
    /// Whether every candidate passed.
    pub fn all_passed(&self) -> bool {
        self.rows.iter().all(|r| r.passed)
    }

    /// Number of candidates with at least one incorrect or failed attempt.
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.passed).count()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Baseline average over candidate average; 0 when the candidate has no data.
pub fn speedup(baseline_average: f64, candidate_average: f64) -> f64 {
    if candidate_average > 0.0 {
        baseline_average / candidate_average
    } else {
        0.0
    }
}

/// Turn summaries into table rows. The baseline row's speedup is exactly 1.
pub fn build_rows(summaries: &[CandidateSummary], baseline: &str) -> Vec<ComparisonRow> {
    let baseline_average = summaries
        .iter()
        .find(|s| s.name == baseline)
        .map(|s| s.average_duration)
        .unwrap_or(0.0);

    summaries
        .iter()
        .map(|s| {
            let is_baseline = s.name == baseline;
            ComparisonRow {
                name: s.name.clone(),
                average_duration: s.average_duration,
                stdev_duration: s.stdev_duration,
                speedup: if is_baseline {
                    1.0
                } else {
                    speedup(baseline_average, s.average_duration)
                },
                successful_runs: s.successful_runs,
                correct_count: s.correct_count,
                total_attempts: s.total_attempts,
                passed: s.all_correct(),
                is_baseline,
            }
        })
        .collect()
}

/// Render the comparison table, optionally with ANSI colours.
pub fn render_table(report: &ComparisonReport, color: bool) -> String {
    TableView { report, color }.to_string()
}

/// Comparison table of a report, rendered through [`fmt::Display`].
pub struct TableView<'a> {
    pub report: &'a ComparisonReport,
    pub color: bool,
}

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let color = self.color;

        let title = format!(
            "--- Results (reference checksum: {}, {} workers, {} runs each) ---",
            report.golden_checksum, report.workers, report.repetitions
        );
        let header = format!(
            "{:<15} | {:<12} | {:<12} | {:<10} | {:<10} | {}",
            "Candidate", "Mean (s)", "Stdev (s)", "Speedup", "Succeeded", "Correctness"
        );
        let rule = "-".repeat(RULE_WIDTH);

        writeln!(f, "{}", paint(&title, color, |s| s.magenta().bold().to_string()))?;
        writeln!(f, "{}", paint(&header, color, |s| s.bold().to_string()))?;
        writeln!(f, "{rule}")?;

        for row in &report.rows {
            let speedup = format!("{:.2}×", row.speedup);
            let succeeded = format!("{}/{}", row.successful_runs, row.total_attempts);
            let verdict = if row.passed { "PASS" } else { "FAIL" };
            let correctness = format!("({}) {}", row.correctness_ratio(), verdict);
            let correctness = if row.passed {
                paint(&correctness, color, |s| s.green().to_string())
            } else {
                paint(&correctness, color, |s| s.red().to_string())
            };

            writeln!(
                f,
                "{:<15} | {:<12.4} | {:<12.4} | {:<10} | {:<10} | {}",
                row.name, row.average_duration, row.stdev_duration, speedup, succeeded, correctness
            )?;
        }

        writeln!(f, "{rule}")
    }
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, average: f64, correct: u32, total: u32) -> CandidateSummary {
        CandidateSummary {
            name: name.to_string(),
            average_duration: average,
            stdev_duration: 0.0,
            successful_runs: correct,
            correct_count: correct,
            total_attempts: total,
        }
    }

    fn report(rows: Vec<ComparisonRow>) -> ComparisonReport {
        ComparisonReport {
            campaign_id: Uuid::new_v4(),
            started_at: Utc::now(),
            registry_digest: "abc123".to_string(),
            golden_checksum: GoldenChecksum(12345),
            workers: 4,
            repetitions: 30,
            rows,
        }
    }

    #[test]
    fn test_speedup_relative_to_baseline() {
        let rows = build_rows(
            &[summary("seq", 2.0, 30, 30), summary("omp", 0.5, 30, 30)],
            "seq",
        );
        assert_eq!(rows[0].speedup, 1.0);
        assert!(rows[0].is_baseline);
        assert_eq!(rows[1].speedup, 4.0);
        assert!(!rows[1].is_baseline);
    }

    #[test]
    fn test_baseline_speedup_fixed_even_without_data() {
        let rows = build_rows(&[summary("seq", 0.0, 0, 30)], "seq");
        assert_eq!(rows[0].speedup, 1.0);
    }

    #[test]
    fn test_zero_average_speedup_is_zero() {
        assert_eq!(speedup(2.0, 0.0), 0.0);
        let rows = build_rows(
            &[summary("seq", 2.0, 30, 30), summary("mpi", 0.0, 0, 30)],
            "seq",
        );
        assert_eq!(rows[1].speedup, 0.0);
    }

    #[test]
    fn test_pass_requires_all_attempts_correct() {
        let rows = build_rows(
            &[summary("seq", 1.0, 30, 30), summary("omp", 1.0, 29, 30)],
            "seq",
        );
        assert!(rows[0].passed);
        assert!(!rows[1].passed);
        assert_eq!(rows[1].correctness_ratio(), "29/30");

        let report = report(rows);
        assert!(!report.all_passed());
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_render_plain_table() {
        let rows = build_rows(
            &[summary("seq", 1.0, 30, 30), summary("omp", 0.25, 1, 3)],
            "seq",
        );
        let table = render_table(&report(rows), false);

        assert!(table.contains("reference checksum: 12345"));
        assert!(table.contains("1.00×"));
        assert!(table.contains("4.00×"));
        assert!(table.contains("(30/30) PASS"));
        assert!(table.contains("(1/3) FAIL"));
        assert!(!table.contains('\u{1b}'));
    }

    /// Forces ANSI output for the guard's lifetime.
    struct ForceColor;

    impl ForceColor {
        fn on() -> Self {
            colored::control::set_override(true);
            ForceColor
        }
    }

    impl Drop for ForceColor {
        fn drop(&mut self) {
            colored::control::unset_override();
        }
    }

    #[test]
    fn test_render_colored_table_distinguishes_pass() {
        let _color = ForceColor::on();
        let rows = build_rows(
            &[summary("seq", 1.0, 30, 30), summary("omp", 1.0, 0, 30)],
            "seq",
        );
        let table = render_table(&report(rows), true);

        let pass_line = table.lines().find(|l| l.starts_with("seq")).unwrap();
        let fail_line = table.lines().find(|l| l.starts_with("omp")).unwrap();
        assert!(pass_line.contains("\u{1b}[32m"));
        assert!(fail_line.contains("\u{1b}[31m"));
    }

    #[test]
    fn test_report_serializes() {
        let rows = build_rows(&[summary("seq", 1.0, 30, 30)], "seq");
        let json = report(rows).to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["golden_checksum"], 12345);
        assert_eq!(value["rows"][0]["name"], "seq");
        assert_eq!(value["rows"][0]["passed"], true);
    }
}
