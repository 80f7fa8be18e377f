//! Entity model and table definitions for the veterinary clinic dataset.
//!
//! This crate describes the four tables populated by `vet-seed` and the
//! records written into them.
//!
//! # Structure
//!
//! - `table`: table names, column lists and the SQL issued against them
//! - `value`: `SeedValue`, the parameter type bound into INSERT statements
//! - `entity`: `Owner`, `Pet`, `Veterinarian`, `Appointment` and their
//!   enumerated attributes
//!
//! # Example
//!
//! ```rust
//! use vet_types::{Owner, SeedRecord, Table};
//!
//! let owner = Owner {
//!     id: "5f0c6c9e-7d1e-4c53-9a4e-2f1f3c0b8d11".to_string(),
//!     first_name: "Ada".to_string(),
//!     last_name: "Lovelace".to_string(),
//!     phone: "555-010-0199".to_string(),
//!     email: "ada.lovelace@example.com".to_string(),
//! };
//!
//! assert_eq!(Owner::TABLE, Table::Owners);
//! assert_eq!(owner.into_values().len(), Table::Owners.columns().len());
//! ```

pub mod entity;
pub mod table;
pub mod value;

pub use entity::{
    Appointment, AppointmentStatus, Breed, Owner, Pet, SeedRecord, Specialty, Species,
    Veterinarian,
};
pub use table::Table;
pub use value::SeedValue;
