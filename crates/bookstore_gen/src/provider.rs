//! Synthetic data providers.
//!
//! Entity generators never touch an RNG directly: every draw goes through a
//! [`DataProvider`], so tests can script the Bernoulli and uniform draws.

use fake::faker::address::en::{
    BuildingNumber, CityName, CountryName, StateAbbr, StreetName, ZipCode,
};
use fake::faker::internet::en::FreeEmailProvider;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of plausible values per semantic field type.
///
/// Values are independent across calls.
pub trait DataProvider {
    /// Full person name
    fn name(&mut self) -> String;
    /// Email address
    fn email(&mut self) -> String;
    /// Street address block, `"<street>\n<city>, <ST> <zip>"`
    fn address(&mut self) -> String;
    fn city(&mut self) -> String;
    /// Two-letter state abbreviation
    fn state_abbr(&mut self) -> String;
    fn zipcode(&mut self) -> String;
    /// Short capitalized sentence ending with a period
    fn sentence(&mut self) -> String;
    fn country(&mut self) -> String;

    /// Uniform integer in the closed interval `[min, max]`
    fn random_int(&mut self, min: i64, max: i64) -> i64;

    /// Uniform float in `[min, max)`
    fn random_float(&mut self, min: f64, max: f64) -> f64;

    /// Bernoulli trial, true with the given probability
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform index in `0..len`; `len` must be non-zero
    fn random_index(&mut self, len: usize) -> usize;

    /// Pick a random element from a non-empty slice
    fn random_element<'a, T>(&mut self, items: &'a [T]) -> &'a T
    where
        Self: Sized,
    {
        &items[self.random_index(items.len())]
    }
}

/// Provider backed by the `fake` crate and a seedable RNG.
pub struct FakeProvider<R: Rng> {
    rng: R,
}

impl FakeProvider<ChaCha8Rng> {
    /// Deterministic provider for a seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> FakeProvider<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DataProvider for FakeProvider<R> {
    fn name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    /// `first.last<n>@<free provider>`, lowercased
    fn email(&mut self) -> String {
        let first: String = FirstName().fake_with_rng(&mut self.rng);
        let last: String = LastName().fake_with_rng(&mut self.rng);
        let number: u32 = self.rng.random_range(0..1000);
        let domain: String = FreeEmailProvider().fake_with_rng(&mut self.rng);
        format!(
            "{}.{}{}@{}",
            email_part(&first),
            email_part(&last),
            number,
            domain
        )
    }

    fn address(&mut self) -> String {
        let number: String = BuildingNumber().fake_with_rng(&mut self.rng);
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        let city = self.city();
        let state = self.state_abbr();
        let zip = self.zipcode();
        format!("{} {}\n{}, {} {}", number, street, city, state, zip)
    }

    fn city(&mut self) -> String {
        CityName().fake_with_rng(&mut self.rng)
    }

    fn state_abbr(&mut self) -> String {
        StateAbbr().fake_with_rng(&mut self.rng)
    }

    fn zipcode(&mut self) -> String {
        ZipCode().fake_with_rng(&mut self.rng)
    }

    fn sentence(&mut self) -> String {
        let mut text: String = Sentence(3..8).fake_with_rng(&mut self.rng);
        if let Some(first) = text.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        if !text.ends_with('.') {
            text.push('.');
        }
        text
    }

    fn country(&mut self) -> String {
        CountryName().fake_with_rng(&mut self.rng)
    }

    fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    fn random_float(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn random_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

fn email_part(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
