//! Main data generator for producing clinic records.

use crate::generators::choice::{choose, choose_variant};
use crate::generators::date::{generate_date, DateWindow};
use crate::generators::person;
use crate::generators::uuid::generate_id;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vet_types::{
    Appointment, AppointmentStatus, Breed, Owner, Pet, Specialty, Species, Veterinarian,
};

/// Inclusive bounds of a pet's age in years.
pub const PET_AGE_RANGE: std::ops::RangeInclusive<u8> = 1..=15;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A dependent entity was requested but there are no ids to reference.
    #[error("Cannot generate {0}: no {1} ids to reference")]
    EmptyReferencePool(&'static str, &'static str),
}

/// Data generator that produces clinic records.
///
/// A generator built with [`DataGenerator::new`] is deterministic: the same
/// seed and the same sequence of calls yield the same records.
pub struct DataGenerator {
    rng: StdRng,
}

impl DataGenerator {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn owner(&mut self) -> Owner {
        let id = generate_id(&mut self.rng);
        let first_name = person::first_name(&mut self.rng);
        let last_name = person::last_name(&mut self.rng);
        let phone = person::phone_number(&mut self.rng);
        let email = person::email(&mut self.rng, &first_name, &last_name);

        Owner {
            id,
            first_name,
            last_name,
            phone,
            email,
        }
    }

    pub fn veterinarian(&mut self) -> Veterinarian {
        let id = generate_id(&mut self.rng);
        let first_name = person::first_name(&mut self.rng);
        let last_name = person::last_name(&mut self.rng);
        let phone = person::phone_number(&mut self.rng);
        let email = person::email(&mut self.rng, &first_name, &last_name);
        let specialty = choose_variant(&mut self.rng, Specialty::ALL);

        Veterinarian {
            id,
            first_name,
            last_name,
            phone,
            email,
            specialty,
        }
    }

    /// Generate a pet belonging to an owner sampled from `owner_ids`.
    pub fn pet(&mut self, owner_ids: &[String]) -> Result<Pet, GeneratorError> {
        let owner_id = choose(&mut self.rng, owner_ids)
            .ok_or(GeneratorError::EmptyReferencePool("pet", "owner"))?
            .clone();

        Ok(Pet {
            id: generate_id(&mut self.rng),
            owner_id,
            pet_name: person::first_name(&mut self.rng),
            species: choose_variant(&mut self.rng, Species::ALL),
            breed: choose_variant(&mut self.rng, Breed::ALL),
            age: self.rng.random_range(PET_AGE_RANGE),
        })
    }

    /// Generate an appointment for a pet and veterinarian sampled from the
    /// given id lists, dated inside `window`.
    pub fn appointment(
        &mut self,
        pet_ids: &[String],
        veterinarian_ids: &[String],
        window: &DateWindow,
    ) -> Result<Appointment, GeneratorError> {
        let pet_id = choose(&mut self.rng, pet_ids)
            .ok_or(GeneratorError::EmptyReferencePool("appointment", "pet"))?
            .clone();
        let veterinarian_id = choose(&mut self.rng, veterinarian_ids)
            .ok_or(GeneratorError::EmptyReferencePool(
                "appointment",
                "veterinarian",
            ))?
            .clone();
        let id = generate_id(&mut self.rng);

        Ok(Appointment {
            id,
            pet_id,
            veterinarian_id,
            appointment_date: generate_date(&mut self.rng, window),
            status: choose_variant(&mut self.rng, AppointmentStatus::ALL),
        })
    }

    pub fn owners(&mut self, count: usize) -> Vec<Owner> {
        (0..count).map(|_| self.owner()).collect()
    }

    pub fn veterinarians(&mut self, count: usize) -> Vec<Veterinarian> {
        (0..count).map(|_| self.veterinarian()).collect()
    }

    /// Generate `count` pets. Fails up front if `owner_ids` is empty and
    /// `count` is non-zero.
    pub fn pets(
        &mut self,
        count: usize,
        owner_ids: &[String],
    ) -> Result<Vec<Pet>, GeneratorError> {
        (0..count).map(|_| self.pet(owner_ids)).collect()
    }

    /// Lazily generate `count` appointments.
    ///
    /// The reference pools are checked before the iterator is returned, so
    /// iteration itself cannot fail.
    pub fn appointments<'a>(
        &'a mut self,
        count: usize,
        pet_ids: &'a [String],
        veterinarian_ids: &'a [String],
        window: DateWindow,
    ) -> Result<AppointmentIterator<'a>, GeneratorError> {
        if count > 0 {
            if pet_ids.is_empty() {
                return Err(GeneratorError::EmptyReferencePool("appointment", "pet"));
            }
            if veterinarian_ids.is_empty() {
                return Err(GeneratorError::EmptyReferencePool(
                    "appointment",
                    "veterinarian",
                ));
            }
        }

        Ok(AppointmentIterator {
            generator: self,
            pet_ids,
            veterinarian_ids,
            window,
            remaining: count,
        })
    }
}

/// Iterator that lazily generates appointments.
pub struct AppointmentIterator<'a> {
    generator: &'a mut DataGenerator,
    pet_ids: &'a [String],
    veterinarian_ids: &'a [String],
    window: DateWindow,
    remaining: usize,
}

impl Iterator for AppointmentIterator<'_> {
    type Item = Appointment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;

        // Pools were verified non-empty when the iterator was built
        self.generator
            .appointment(self.pet_ids, self.veterinarian_ids, &self.window)
            .ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for AppointmentIterator<'_> {}
