//! Command-line interface for vet-seed
//!
//! # Usage Examples
//!
//! ```bash
//! # Seed everything with the default row counts
//! vet-seed --host localhost --user root --password root --database clinic
//!
//! # Create the tables first, then seed a small reproducible dataset
//! vet-seed --database clinic --user root --password root \
//!   --create-tables --seed 42 --owners 1000 --pets 1500 \
//!   --veterinarians 20 --appointments 5000
//!
//! # Only the appointments phase, with a JSON summary
//! vet-seed --emit-metrics metrics.json appointments
//!
//! # Show what would be seeded without connecting
//! vet-seed --dry-run
//! ```

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use vet_generator::{DataGenerator, DateWindow};
use vet_loader::StoreConfig;
use vet_seed::seed::metrics::SeedMetrics;
use vet_seed::{run_seed, DatabaseOpts, Phase, SeedOpts, SeedPlan};

#[derive(Parser)]
#[command(name = "vet-seed")]
#[command(about = "Seed a veterinary clinic MySQL database with synthetic data")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// MySQL connection options
    #[command(flatten)]
    db: DatabaseOpts,

    /// Row counts and load options
    #[command(flatten)]
    opts: SeedOpts,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Seed owners, pets and veterinarians
    Initial,
    /// Seed appointments for existing pets and veterinarians
    Appointments,
}

impl Commands {
    fn phases(command: Option<Commands>) -> Vec<Phase> {
        match command {
            Some(Commands::Initial) => vec![Phase::Initial],
            Some(Commands::Appointments) => vec![Phase::Appointments],
            None => Phase::all().to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // A missing .env file is fine; settings may come from flags or the shell
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let phases = Commands::phases(cli.command);
    let config = StoreConfig::from(&cli.db);
    let plan = SeedPlan::from(&cli.opts);

    plan.validate()?;

    let today = chrono::Local::now().date_naive();
    let window = DateWindow::this_year(today);

    if cli.opts.dry_run {
        info!(
            "[DRY-RUN] Would seed {} owners, {} pets, {} veterinarians, {} appointments",
            plan.owners, plan.pets, plan.veterinarians, plan.appointments
        );
        info!("[DRY-RUN] Connection: {}", config);
        info!(
            "[DRY-RUN] Phases: {:?}",
            phases.iter().map(Phase::to_string).collect::<Vec<_>>()
        );
        info!(
            "[DRY-RUN] Chunk size {}, policy {:?}, appointments between {} and {}",
            plan.chunk_size, plan.policy, window.start, window.end
        );
        info!("[DRY-RUN] Settings validated successfully");
        return Ok(());
    }

    let mut generator = match cli.opts.seed {
        Some(seed) => {
            info!("Generating data with seed {}", seed);
            DataGenerator::new(seed)
        }
        None => DataGenerator::from_entropy(),
    };

    let started_at = chrono::Utc::now();
    let summary = run_seed(&config, &plan, &phases, &mut generator, window).await?;

    if let Some(path) = &cli.opts.emit_metrics {
        SeedMetrics::new(&summary, started_at, cli.opts.seed, plan.chunk_size)
            .write_to(path)
            .await?;
        info!("Wrote metrics to {}", path.display());
    }

    if !summary.is_success() {
        for table in summary.failed_tables() {
            warn!("Table '{}' was not fully seeded", table);
        }
        anyhow::bail!(
            "Seeding finished with failures: {} rows inserted, tables {:?} incomplete",
            summary.rows_inserted(),
            summary
                .failed_tables()
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
        );
    }

    info!("Seeding complete: {} rows inserted", summary.rows_inserted());
    Ok(())
}
