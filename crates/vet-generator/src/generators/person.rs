//! Names, phone numbers and email addresses.
//!
//! Phone formats use `#` as a digit placeholder.

use rand::seq::IndexedRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Daniel", "Lisa", "Matthew", "Nancy", "Anthony", "Betty", "Mark",
    "Sandra", "Steven", "Ashley", "Paul", "Emily", "Andrew", "Donna", "Joshua", "Michelle",
    "Kevin", "Carol", "Brian", "Amanda", "George", "Melissa", "Timothy", "Deborah", "Ronald",
    "Stephanie", "Jason", "Rebecca", "Ryan", "Laura", "Jacob", "Sharon", "Gary", "Cynthia",
    "Nicholas", "Kathleen", "Eric", "Amy", "Jonathan", "Angela",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall",
    "Rivera", "Campbell", "Mitchell", "Carter", "Roberts",
];

const PHONE_FORMATS: &[&str] = &[
    "###-###-####",
    "(###)###-####",
    "###.###.####",
    "+1-###-###-####",
    "001-###-###-####",
    "###-###-####x###",
    "(###)###-####x####",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

pub fn first_name<R: Rng>(rng: &mut R) -> String {
    pick(rng, FIRST_NAMES).to_string()
}

pub fn last_name<R: Rng>(rng: &mut R) -> String {
    pick(rng, LAST_NAMES).to_string()
}

/// Generate a North American style phone number.
pub fn phone_number<R: Rng>(rng: &mut R) -> String {
    let format = pick(rng, PHONE_FORMATS);
    fill_digits(rng, format)
}

/// Generate an email address loosely derived from a person's name.
pub fn email<R: Rng>(rng: &mut R, first_name: &str, last_name: &str) -> String {
    let first = first_name.to_lowercase();
    let last = last_name.to_lowercase();
    let domain = pick(rng, EMAIL_DOMAINS);

    let local = match rng.random_range(0..4) {
        0 => format!("{first}.{last}"),
        1 => format!("{first}{last}"),
        2 => {
            let initial: String = first.chars().take(1).collect();
            format!("{initial}{last}")
        }
        _ => format!("{first}{}", rng.random_range(10..100)),
    };

    format!("{local}@{domain}")
}

/// Replace every `#` in `format` with a random decimal digit.
fn fill_digits<R: Rng>(rng: &mut R, format: &str) -> String {
    format
        .chars()
        .map(|c| {
            if c == '#' {
                char::from(b'0' + rng.random_range(0..10u8))
            } else {
                c
            }
        })
        .collect()
}

fn pick<R: Rng>(rng: &mut R, pool: &'static [&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}
