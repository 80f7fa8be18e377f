//! JSON summary of a seeding run.

use super::{Phase, SeedSummary};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use vet_loader::LoadReport;

/// Metrics for a whole run, written with `--emit-metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct SeedMetrics {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Seed used for generation, if one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub chunk_size: usize,
    pub success: bool,
    pub rows_inserted: u64,
    pub tables: Vec<TableMetrics>,
}

/// Load metrics for a single table.
#[derive(Debug, Clone, Serialize)]
pub struct TableMetrics {
    pub phase: Phase,
    pub table: String,
    pub chunks_submitted: usize,
    pub rows_inserted: u64,
    /// Indices of chunks whose insert or commit failed
    pub failed_chunks: Vec<usize>,
    /// Rows never submitted after an abort
    pub rows_skipped: u64,
    pub duration_ms: u64,
    pub rows_per_second: f64,
}

impl TableMetrics {
    fn from_report(phase: Phase, report: &LoadReport) -> Self {
        Self {
            phase,
            table: report.table.name().to_string(),
            chunks_submitted: report.chunks_submitted,
            rows_inserted: report.rows_inserted,
            failed_chunks: report.failed_chunk_indices(),
            rows_skipped: report.rows_skipped,
            duration_ms: report.duration.as_millis() as u64,
            rows_per_second: report.rows_per_second(),
        }
    }
}

impl SeedMetrics {
    pub fn new(
        summary: &SeedSummary,
        started_at: DateTime<Utc>,
        seed: Option<u64>,
        chunk_size: usize,
    ) -> Self {
        let tables = summary
            .phases
            .iter()
            .flat_map(|p| p.reports.iter().map(|r| TableMetrics::from_report(p.phase, r)))
            .collect();

        Self {
            started_at,
            seed,
            chunk_size,
            success: summary.is_success(),
            rows_inserted: summary.rows_inserted(),
            tables,
        }
    }

    pub async fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize metrics")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::PhaseSummary;
    use std::time::Duration;
    use vet_loader::ChunkFailure;
    use vet_types::Table;

    fn summary() -> SeedSummary {
        let mut owners = LoadReport::new(Table::Owners);
        owners.chunks_submitted = 3;
        owners.rows_inserted = 20;
        owners.duration = Duration::from_millis(500);
        owners.failed_chunks.push(ChunkFailure {
            index: 1,
            rows: 10,
            error: "boom".to_string(),
        });

        let mut initial = PhaseSummary::new(Phase::Initial);
        initial.reports.push(owners);

        SeedSummary {
            phases: vec![initial],
        }
    }

    #[test]
    fn test_metrics_from_summary() {
        let metrics = SeedMetrics::new(&summary(), Utc::now(), Some(42), 10);

        assert!(!metrics.success);
        assert_eq!(metrics.rows_inserted, 20);
        assert_eq!(metrics.tables.len(), 1);
        assert_eq!(metrics.tables[0].table, "owners");
        assert_eq!(metrics.tables[0].failed_chunks, vec![1]);
        assert_eq!(metrics.tables[0].duration_ms, 500);
    }

    #[tokio::test]
    async fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");

        SeedMetrics::new(&summary(), Utc::now(), None, 10)
            .write_to(&path)
            .await
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["tables"][0]["phase"], "initial");
        assert_eq!(json["tables"][0]["rows_inserted"], 20);
        assert!(json.get("seed").is_none());
    }
}
