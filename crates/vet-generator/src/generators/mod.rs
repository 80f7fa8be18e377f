//! Individual value generators.
//!
//! Every generator takes the caller's RNG so that a single seeded
//! `StdRng` drives the whole dataset.

pub mod choice;
pub mod date;
pub mod person;
pub mod uuid;
