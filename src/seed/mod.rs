//! Seeding phases and the runner that connects, seeds and closes per phase.

pub mod appointments;
pub mod initial;
pub mod metrics;

use anyhow::Context;
use std::fmt;
use tracing::{info, warn};
use vet_generator::{DataGenerator, DateWindow};
use vet_loader::{insert, BatchLoader, Connect, FailurePolicy, LoadReport, SeedStore};
use vet_types::Table;

pub use appointments::seed_appointments;
pub use initial::seed_initial_data;

pub const DEFAULT_OWNERS: usize = 500_000;
pub const DEFAULT_PETS: usize = 500_000;
pub const DEFAULT_VETERINARIANS: usize = 500;
pub const DEFAULT_APPOINTMENTS: usize = 500_000;

/// A unit of work run on its own connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Owners, pets and veterinarians.
    Initial,
    /// Appointments for already persisted pets and veterinarians.
    Appointments,
}

impl Phase {
    pub fn all() -> [Phase; 2] {
        [Phase::Initial, Phase::Appointments]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initial => write!(f, "initial"),
            Phase::Appointments => write!(f, "appointments"),
        }
    }
}

/// How much to seed and how to load it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub owners: usize,
    pub pets: usize,
    pub veterinarians: usize,
    pub appointments: usize,
    pub chunk_size: usize,
    pub policy: FailurePolicy,
    pub create_tables: bool,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            owners: DEFAULT_OWNERS,
            pets: DEFAULT_PETS,
            veterinarians: DEFAULT_VETERINARIANS,
            appointments: DEFAULT_APPOINTMENTS,
            chunk_size: vet_loader::DEFAULT_CHUNK_SIZE,
            policy: FailurePolicy::Continue,
            create_tables: false,
        }
    }
}

impl SeedPlan {
    pub fn loader(&self) -> BatchLoader {
        BatchLoader::new(self.chunk_size).with_policy(self.policy)
    }

    /// Check that the chunk size works for every table.
    pub fn validate(&self) -> anyhow::Result<()> {
        for table in Table::all() {
            insert::check_chunk_size(table, self.chunk_size).with_context(|| {
                format!(
                    "Chunk size {} is unusable for '{table}' (maximum {})",
                    self.chunk_size,
                    insert::max_chunk_size(table)
                )
            })?;
        }
        Ok(())
    }
}

/// Load reports of one phase.
#[derive(Debug, Clone)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub reports: Vec<LoadReport>,
}

impl PhaseSummary {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            reports: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.reports.iter().all(LoadReport::is_success)
    }

    pub fn rows_inserted(&self) -> u64 {
        self.reports.iter().map(|r| r.rows_inserted).sum()
    }

    pub fn report(&self, table: Table) -> Option<&LoadReport> {
        self.reports.iter().find(|r| r.table == table)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
    pub phases: Vec<PhaseSummary>,
}

impl SeedSummary {
    pub fn is_success(&self) -> bool {
        self.phases.iter().all(PhaseSummary::is_success)
    }

    pub fn rows_inserted(&self) -> u64 {
        self.phases.iter().map(PhaseSummary::rows_inserted).sum()
    }

    /// Tables with at least one failed or skipped chunk.
    pub fn failed_tables(&self) -> Vec<Table> {
        self.phases
            .iter()
            .flat_map(|p| &p.reports)
            .filter(|r| !r.is_success())
            .map(|r| r.table)
            .collect()
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseSummary> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

/// Run `phases` in order, each on a fresh connection from `connector`.
///
/// A phase that cannot connect, or that cannot read the ids it depends on,
/// stops the run with an error and later phases are not attempted. Failed
/// chunks do not; they are reported in the returned summary.
pub async fn run_seed<C: Connect>(
    connector: &C,
    plan: &SeedPlan,
    phases: &[Phase],
    generator: &mut DataGenerator,
    window: DateWindow,
) -> anyhow::Result<SeedSummary> {
    plan.validate()?;

    let mut summary = SeedSummary::default();
    let mut create = plan.create_tables;

    for &phase in phases {
        info!("Starting {} phase", phase);

        let mut store = connector
            .connect()
            .await
            .with_context(|| format!("Failed to connect for the {phase} phase"))?;

        let result = run_phase(&mut store, phase, plan, generator, window, create).await;

        if let Err(e) = store.close().await {
            warn!("Failed to close connection after the {} phase: {}", phase, e);
        }

        let phase_summary = result.with_context(|| format!("The {phase} phase failed"))?;
        create = false;

        info!(
            "Finished {} phase: {} rows inserted",
            phase,
            phase_summary.rows_inserted()
        );
        summary.phases.push(phase_summary);
    }

    Ok(summary)
}

async fn run_phase<S: SeedStore + ?Sized>(
    store: &mut S,
    phase: Phase,
    plan: &SeedPlan,
    generator: &mut DataGenerator,
    window: DateWindow,
    create: bool,
) -> anyhow::Result<PhaseSummary> {
    if create {
        create_tables(store).await?;
    }

    match phase {
        Phase::Initial => seed_initial_data(store, plan, generator).await,
        Phase::Appointments => seed_appointments(store, plan, generator, window).await,
    }
}

/// Create every table that does not exist yet, referenced tables first.
pub async fn create_tables<S: SeedStore + ?Sized>(store: &mut S) -> anyhow::Result<()> {
    for table in Table::all() {
        info!("Creating table if missing: {}", table);
        store
            .execute(&table.create_table_statement())
            .await
            .with_context(|| format!("Failed to create table '{table}'"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_matches_source_constants() {
        let plan = SeedPlan::default();
        assert_eq!(plan.owners, 500_000);
        assert_eq!(plan.veterinarians, 500);
        assert_eq!(plan.chunk_size, 10_000);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_chunk_sizes() {
        let plan = SeedPlan {
            chunk_size: 0,
            ..SeedPlan::default()
        };
        assert!(plan.validate().is_err());

        // 6 columns per pet row
        let plan = SeedPlan {
            chunk_size: 11_000,
            ..SeedPlan::default()
        };
        let err = plan.validate().unwrap_err();
        assert!(format!("{err:#}").contains("pets"));
    }

    #[test]
    fn test_largest_usable_chunk_size() {
        let plan = SeedPlan {
            chunk_size: 10_922,
            ..SeedPlan::default()
        };
        assert!(plan.validate().is_ok());

        let plan = SeedPlan {
            chunk_size: 10_923,
            ..SeedPlan::default()
        };
        let err = format!("{:#}", plan.validate().unwrap_err());
        assert!(err.contains("maximum 10922"), "{err}");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Initial.to_string(), "initial");
        assert_eq!(Phase::Appointments.to_string(), "appointments");
    }
}
