//! Result reporting
//!
//! Gantree: L4_Engine → Report
//!
//! Side-by-side comparison of target and obtained distributions,
//! rendered as text, Markdown, CSV or JSON.

use crate::runner::VqaOutcome;
use hea_core::{HeaError, HeaResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Plain text table
    #[default]
    Text,
    /// Markdown table
    Markdown,
    /// CSV
    Csv,
    /// JSON
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(HeaError::UnknownOption {
                kind: "report format".into(),
                value: s.into(),
            }),
        }
    }
}

/// One basis state in the comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Basis state, qubit 0 rightmost
    pub bitstring: String,
    /// Expected count at the run's shot budget
    pub target_count: f64,
    /// Observed count
    pub obtained_count: u64,
    /// Target probability
    pub target_prob: f64,
    /// Obtained probability
    pub obtained_prob: f64,
}

impl ReportRow {
    /// |target - obtained|
    pub fn abs_diff(&self) -> f64 {
        (self.target_prob - self.obtained_prob).abs()
    }
}

/// Distribution comparison report
/// Gantree: DistributionReport // 분포 비교 리포트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Per-state rows in index order
    pub rows: Vec<ReportRow>,
    /// Final cost
    pub cost: f64,
    /// Cost function name
    pub cost_function: String,
    /// Found parameters
    pub params: Vec<f64>,
    /// Initial parameters
    pub initial_params: Vec<f64>,
    /// Objective evaluations
    pub evaluations: usize,
    /// Shots used for the final execution
    pub shots: u64,
}

impl DistributionReport {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Build a report from a finished run
    pub fn from_outcome(outcome: &VqaOutcome) -> Self {
        let shots = outcome.shots as f64;
        let rows = outcome
            .target
            .iter()
            .zip(outcome.output.as_slice())
            .map(|((bits, target_prob), &obtained_prob)| {
                let bitstring = bits.to_string();
                let obtained_count = outcome.counts.get(&bitstring).copied().unwrap_or(0);
                ReportRow {
                    bitstring,
                    target_count: target_prob * shots,
                    obtained_count,
                    target_prob,
                    obtained_prob,
                }
            })
            .collect();

        Self {
            rows,
            cost: outcome.cost,
            cost_function: outcome.cost_function.name().to_string(),
            params: outcome.params.clone(),
            initial_params: outcome.initial_params.clone(),
            evaluations: outcome.evaluations,
            shots: outcome.shots,
        }
    }

    /// Largest per-state probability gap
    pub fn max_abs_diff(&self) -> f64 {
        self.rows.iter().map(ReportRow::abs_diff).fold(0.0, f64::max)
    }

    // ========================================================================
    // Format Converters
    // ========================================================================

    /// Generate report in specified format
    pub fn render(&self, format: ReportFormat) -> HeaResult<String> {
        let table = match format {
            ReportFormat::Text => return Ok(self.to_text()),
            ReportFormat::Json => return self.to_json(),
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Csv => self.to_csv(),
        };
        table.map_err(|_| HeaError::ConfigError(format!("failed to render {:?} report", format)))
    }

    /// Plain text table
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Markdown table with a summary list
    pub fn to_markdown(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();

        writeln!(out, "# Distribution Fit\n")?;
        writeln!(out, "- **Cost ({})**: {:.6}", self.cost_function, self.cost)?;
        writeln!(out, "- **Max |diff|**: {:.6}", self.max_abs_diff())?;
        writeln!(out, "- **Evaluations**: {}", self.evaluations)?;
        writeln!(out, "- **Shots**: {}\n", self.shots)?;

        writeln!(
            out,
            "| State | Target Count | Obtained Count | Target P | Obtained P | \\|Diff\\| |"
        )?;
        writeln!(out, "|---|---:|---:|---:|---:|---:|")?;
        for row in &self.rows {
            writeln!(
                out,
                "| {} | {:.1} | {} | {:.4} | {:.4} | {:.4} |",
                row.bitstring,
                row.target_count,
                row.obtained_count,
                row.target_prob,
                row.obtained_prob,
                row.abs_diff()
            )?;
        }

        Ok(out)
    }

    /// CSV, one row per basis state
    pub fn to_csv(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();

        writeln!(
            out,
            "state,target_count,obtained_count,target_prob,obtained_prob,abs_diff"
        )?;
        for row in &self.rows {
            writeln!(
                out,
                "{},{:.3},{},{:.6},{:.6},{:.6}",
                row.bitstring,
                row.target_count,
                row.obtained_count,
                row.target_prob,
                row.obtained_prob,
                row.abs_diff()
            )?;
        }

        Ok(out)
    }

    /// Pretty JSON
    pub fn to_json(&self) -> HeaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| HeaError::JsonError(e.to_string()))
    }
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>12} {:>14} {:>10} {:>11} {:>8}",
            "State", "Target Cnt", "Obtained Cnt", "Target P", "Obtained P", "|Diff|"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<10} {:>12.1} {:>14} {:>10.4} {:>11.4} {:>8.4}",
                row.bitstring,
                row.target_count,
                row.obtained_count,
                row.target_prob,
                row.obtained_prob,
                row.abs_diff()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Output Error ({}): {:.6}", self.cost_function, self.cost)?;
        writeln!(f, "Parameters Found:   {:?}", self.params)?;
        writeln!(f, "Initial Parameters: {:?}", self.initial_params)?;
        write!(f, "Evaluations: {}", self.evaluations)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostFunction;
    use hea_core::{Counts, Distribution};

    fn make_outcome() -> VqaOutcome {
        let mut counts = Counts::new();
        counts.insert("00".to_string(), 480);
        counts.insert("11".to_string(), 520);

        VqaOutcome {
            target: Distribution::new(vec![0.5, 0.0, 0.0, 0.5]).unwrap(),
            output: Distribution::new(vec![0.48, 0.0, 0.0, 0.52]).unwrap(),
            counts,
            cost: 0.04,
            cost_function: CostFunction::Manhattan,
            params: vec![1.5, 0.1],
            initial_params: vec![0.3, 2.0],
            evaluations: 57,
            iterations: 20,
            converged: true,
            history: vec![1.2, 0.04],
            shots: 1000,
            total_time_ms: 3,
        }
    }

    #[test]
    fn test_from_outcome() {
        let report = DistributionReport::from_outcome(&make_outcome());

        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.rows[0].bitstring, "00");
        assert_eq!(report.rows[3].bitstring, "11");
        assert!((report.rows[0].target_count - 500.0).abs() < 1e-9);
        assert_eq!(report.rows[0].obtained_count, 480);
        assert_eq!(report.rows[1].obtained_count, 0);
        assert!((report.max_abs_diff() - 0.02).abs() < 1e-9);
        assert_eq!(report.cost_function, "manhattan");
    }

    #[test]
    fn test_to_text() {
        let text = DistributionReport::from_outcome(&make_outcome()).to_text();

        assert!(text.contains("Target Cnt"));
        assert!(text.contains("Output Error (manhattan): 0.040000"));
        assert!(text.contains("Evaluations: 57"));
    }

    #[test]
    fn test_to_markdown() {
        let md = DistributionReport::from_outcome(&make_outcome())
            .to_markdown()
            .unwrap();

        assert!(md.contains("# Distribution Fit"));
        assert!(md.contains("| 11 | 500.0 | 520 |"));
    }

    #[test]
    fn test_to_csv() {
        let csv = DistributionReport::from_outcome(&make_outcome())
            .to_csv()
            .unwrap();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("state,"));
        assert!(lines[1].starts_with("00,500.000,480,"));
    }

    #[test]
    fn test_to_json() {
        let report = DistributionReport::from_outcome(&make_outcome());
        let json = report.to_json().unwrap();

        let parsed: DistributionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_render_and_parse_format() {
        let report = DistributionReport::from_outcome(&make_outcome());

        for name in ["text", "md", "csv", "json"] {
            let format: ReportFormat = name.parse().unwrap();
            assert!(!report.render(format).unwrap().is_empty());
        }
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
