use super::{Phase, PhaseSummary, SeedPlan};
use anyhow::Context;
use tracing::info;
use vet_generator::DataGenerator;
use vet_loader::SeedStore;
use vet_types::Table;

/// Seed owners, their pets, and veterinarians.
///
/// Pets reference owner ids read back from the store after the owner load,
/// so only owners whose chunk committed can own a pet.
pub async fn seed_initial_data<S: SeedStore + ?Sized>(
    store: &mut S,
    plan: &SeedPlan,
    generator: &mut DataGenerator,
) -> anyhow::Result<PhaseSummary> {
    let loader = plan.loader();
    let mut summary = PhaseSummary::new(Phase::Initial);

    info!("Generating {} owners", plan.owners);
    let owners = (0..plan.owners).map(|_| generator.owner());
    summary.reports.push(loader.load(store, owners).await?);

    let owner_ids = store
        .fetch_ids(Table::Owners)
        .await
        .context("Failed to read owner ids")?;
    info!("Fetched {} owner ids", owner_ids.len());

    info!("Generating {} pets", plan.pets);
    let pets = generator
        .pets(plan.pets, &owner_ids)
        .context("Cannot generate pets")?;
    summary.reports.push(loader.load(store, pets).await?);

    info!("Generating {} veterinarians", plan.veterinarians);
    let veterinarians = (0..plan.veterinarians).map(|_| generator.veterinarian());
    summary.reports.push(loader.load(store, veterinarians).await?);

    Ok(summary)
}
