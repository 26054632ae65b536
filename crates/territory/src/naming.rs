use std::ops::RangeInclusive;

use rand::Rng;

const PREFIXES: [&str; 6] = ["Sector", "Zone", "District", "Block", "Region", "Territory"];
const CODE_NAMES: [&str; 7] = ["Alpha", "Bravo", "Echo", "Zeta", "Delta", "Omega", "Nova"];
const HEADINGS: [&str; 5] = ["North", "South", "Central", "East", "West"];

pub const NUMBERS: RangeInclusive<u16> = 100..=999;

/// Generates a display label like `Sector Alpha-123 North`.
///
/// Labels are decoration only: they are not unique and never used as keys.
pub fn area_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = pick(&PREFIXES, rng);
    let code_name = pick(&CODE_NAMES, rng);
    let number = rng.gen_range(NUMBERS);
    let heading = pick(&HEADINGS, rng);
    format!("{} {}-{} {}", prefix, code_name, number, heading)
}

fn pick<'a, R: Rng + ?Sized>(words: &[&'a str], rng: &mut R) -> &'a str {
    words[rng.gen_range(0..words.len())]
}
