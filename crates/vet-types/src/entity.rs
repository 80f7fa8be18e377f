//! Seeded entities and their enumerated attributes.

use crate::table::Table;
use crate::value::SeedValue;
use chrono::NaiveDate;

/// A record that can be written into one of the seeded tables.
pub trait SeedRecord {
    /// Table this record is inserted into.
    const TABLE: Table;

    /// Primary key of the record.
    fn id(&self) -> &str;

    /// Column values in the order of `Self::TABLE.columns()`.
    fn into_values(self) -> Vec<SeedValue>;
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Animal species.
    Species {
        Dog => "Dog",
        Cat => "Cat",
        Bird => "Bird",
    }
}

string_enum! {
    /// Breed. Chosen independently of [`Species`].
    Breed {
        GoldenRetriever => "Golden Retriever",
        Siamese => "Siamese",
        Parakeet => "Parakeet",
    }
}

string_enum! {
    /// Veterinarian specialty.
    Specialty {
        GeneralCare => "General Care",
        Surgery => "Surgery",
        Dentistry => "Dentistry",
    }
}

string_enum! {
    AppointmentStatus {
        Scheduled => "Scheduled",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub owner_id: String,
    pub pet_name: String,
    pub species: Species,
    pub breed: Breed,
    /// Age in years, `1..=15`.
    pub age: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Veterinarian {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub specialty: Specialty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: String,
    pub pet_id: String,
    pub veterinarian_id: String,
    pub appointment_date: NaiveDate,
    pub status: AppointmentStatus,
}

impl SeedRecord for Owner {
    const TABLE: Table = Table::Owners;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_values(self) -> Vec<SeedValue> {
        vec![
            self.id.into(),
            self.first_name.into(),
            self.last_name.into(),
            self.phone.into(),
            self.email.into(),
        ]
    }
}

impl SeedRecord for Pet {
    const TABLE: Table = Table::Pets;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_values(self) -> Vec<SeedValue> {
        vec![
            self.id.into(),
            self.owner_id.into(),
            self.pet_name.into(),
            self.species.as_str().into(),
            self.breed.as_str().into(),
            SeedValue::Int(self.age as i64),
        ]
    }
}

impl SeedRecord for Veterinarian {
    const TABLE: Table = Table::Veterinarians;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_values(self) -> Vec<SeedValue> {
        vec![
            self.id.into(),
            self.first_name.into(),
            self.last_name.into(),
            self.phone.into(),
            self.email.into(),
            self.specialty.as_str().into(),
        ]
    }
}

impl SeedRecord for Appointment {
    const TABLE: Table = Table::Appointments;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_values(self) -> Vec<SeedValue> {
        vec![
            self.id.into(),
            self.pet_id.into(),
            self.veterinarian_id.into(),
            self.appointment_date.into(),
            self.status.as_str().into(),
        ]
    }
}
