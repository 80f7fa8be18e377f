//! Fake-data generator for the veterinary clinic dataset.
//!
//! `DataGenerator` produces owners, pets, veterinarians and appointments
//! from a seeded RNG, so the same seed always yields the same dataset.
//!
//! # Architecture
//!
//! ```text
//!   seed
//!    │
//!    ▼
//! ┌─────────────────┐      owner ids ───┐
//! │  DataGenerator  │                   ▼
//! │                 │──► Owner      ──► Pet
//! │  - rng (StdRng) │──► Veterinarian   │
//! └─────────────────┘        │          ▼
//!                            └─────► Appointment
//! ```
//!
//! Dependent entities never invent foreign keys: they sample uniformly from
//! id lists handed in by the caller, which are read back from the store
//! before generation starts.
//!
//! # Example
//!
//! ```rust
//! use vet_generator::DataGenerator;
//!
//! let mut generator = DataGenerator::new(42);
//! let owners = generator.owners(3);
//! let owner_ids: Vec<String> = owners.iter().map(|o| o.id.clone()).collect();
//!
//! let pets = generator.pets(5, &owner_ids).unwrap();
//! assert!(pets.iter().all(|p| owner_ids.contains(&p.owner_id)));
//! ```

pub mod generator;
pub mod generators;

pub use generator::{AppointmentIterator, DataGenerator, GeneratorError};
pub use generators::date::DateWindow;
