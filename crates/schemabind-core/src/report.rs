//! Report schema (stable v1)
//!
//! Machine-readable summary of one introspection run. The shape is
//! versioned; breaking changes require a major bump.

use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Severity};
use crate::graph::SchemaGraph;

/// Report schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    pub major: u32,
    pub minor: u32,
}

impl ReportVersion {
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub schemas: usize,
    pub tables: usize,
    pub types: usize,
    pub functions: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

/// Run report (report.json v1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub version: ReportVersion,

    /// Timestamp (ISO 8601).
    pub timestamp: String,

    pub summary: ReportSummary,

    /// All diagnostics across built schemas.
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Build a report from a set of completed graphs.
    pub fn from_graphs(graphs: &[SchemaGraph]) -> Self {
        let mut report = Self::new();

        for graph in graphs {
            report.summary.schemas += 1;
            report.summary.tables += graph.tables.len();
            report.summary.types += graph.types.len();
            report.summary.functions += graph.functions.len();

            for diag in &graph.diagnostics {
                match diag.severity {
                    Severity::Error => report.summary.errors += 1,
                    Severity::Warn => report.summary.warnings += 1,
                    Severity::Info => report.summary.info += 1,
                }
                report.diagnostics.push(diag.clone());
            }
        }

        report
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
