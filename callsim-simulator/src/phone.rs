//! Synthetic North-American phone numbers.

use std::collections::HashSet;

use rand::Rng;

/// Draws `count` distinct ten-digit numbers: area code in `200..=799`,
/// exchange in `200..=999`, line in `0..9999`.
pub fn generate_phone_numbers<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u64> {
    let mut seen = HashSet::with_capacity(count);
    let mut numbers = Vec::with_capacity(count);
    while numbers.len() < count {
        let number = random_phone_number(rng);
        if seen.insert(number) {
            numbers.push(number);
        }
    }
    numbers
}

fn random_phone_number<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    let area_code: u64 = rng.random_range(200..800);
    let exchange: u64 = rng.random_range(200..1000);
    let line: u64 = rng.random_range(0..9999);
    area_code * 10_000_000 + exchange * 10_000 + line
}
