use super::{Phase, PhaseSummary, SeedPlan};
use anyhow::Context;
use tracing::info;
use vet_generator::{DataGenerator, DateWindow};
use vet_loader::SeedStore;
use vet_types::Table;

/// Seed appointments for pets and veterinarians already in the store.
///
/// Appointments are generated lazily, one chunk at a time.
pub async fn seed_appointments<S: SeedStore + ?Sized>(
    store: &mut S,
    plan: &SeedPlan,
    generator: &mut DataGenerator,
    window: DateWindow,
) -> anyhow::Result<PhaseSummary> {
    let pet_ids = store
        .fetch_ids(Table::Pets)
        .await
        .context("Failed to read pet ids")?;
    let veterinarian_ids = store
        .fetch_ids(Table::Veterinarians)
        .await
        .context("Failed to read veterinarian ids")?;

    info!(
        "Generating {} appointments between {} and {} for {} pets and {} veterinarians",
        plan.appointments,
        window.start,
        window.end,
        pet_ids.len(),
        veterinarian_ids.len()
    );

    let appointments = generator
        .appointments(plan.appointments, &pet_ids, &veterinarian_ids, window)
        .context("Cannot generate appointments")?;

    let mut summary = PhaseSummary::new(Phase::Appointments);
    summary
        .reports
        .push(plan.loader().load(store, appointments).await?);

    Ok(summary)
}
