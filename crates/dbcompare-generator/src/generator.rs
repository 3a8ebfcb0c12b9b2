//! Record generator producing synthetic benchmark data.

use crate::vocabulary::{
    DESCRIPTION_CLOSERS, DESCRIPTION_OPENERS, DOMAINS, FIRST_NAMES, LAST_NAMES, SKILLS,
};
use chrono::{DateTime, Duration, Utc};
use dbcompare_core::Record;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Golden-ratio increment used to spread forked seeds.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Hours in a year; `created_at` falls within the year before the base time.
const CREATED_AT_WINDOW_HOURS: i64 = 365 * 24;

/// Generator of records, lookup keys and balance updates.
///
/// Output is fully determined by the seed and the base time, so two
/// generators built with the same inputs produce the same sequence.
#[derive(Debug, Clone)]
pub struct RecordGenerator {
    seed: u64,
    base_time: DateTime<Utc>,
    rng: StdRng,
}

impl RecordGenerator {
    /// Create a generator with a fixed seed, anchored at the current time.
    pub fn new(seed: u64) -> Self {
        Self::with_base_time(seed, Utc::now())
    }

    /// Create a generator seeded from the given value, or from entropy when absent.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::new(StdRng::from_entropy().gen()),
        }
    }

    /// Create a generator whose timestamps are relative to `base_time`.
    pub fn with_base_time(seed: u64, base_time: DateTime<Utc>) -> Self {
        Self {
            seed,
            base_time,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent generator for a stress worker.
    pub fn fork(&self, worker: u64) -> Self {
        let seed = self
            .seed
            .wrapping_add(worker.wrapping_add(1).wrapping_mul(SEED_STRIDE));
        Self::with_base_time(seed, self.base_time)
    }

    /// Generate one record with the given identity.
    pub fn record(&mut self, id: i64) -> Record {
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        let email = self.email(first, last, id);
        let age = self.age();
        let balance = Decimal::new(self.rng.gen_range(0..100_000), 2);
        let hours_ago = self.rng.gen_range(0..CREATED_AT_WINDOW_HOURS);
        let description = self.description();
        let is_active = self.rng.gen::<f32>() > 0.3;

        Record {
            id,
            name: format!("{first} {last}"),
            email,
            age,
            balance,
            created_at: self.base_time - Duration::hours(hours_ago),
            description,
            is_active,
        }
    }

    /// Uniform id in `1..=max`, or 1 when `max` is not positive.
    pub fn random_id(&mut self, max: i64) -> i64 {
        if max <= 0 {
            return 1;
        }
        self.rng.gen_range(1..=max)
    }

    /// New balance for an update, below 100.00.
    pub fn balance_update(&mut self) -> Decimal {
        Decimal::new(self.rng.gen_range(0..10_000), 2)
    }

    fn age(&mut self) -> i32 {
        self.rng.gen_range(18..78)
    }

    fn pick(&mut self, words: &'static [&'static str]) -> &'static str {
        words[self.rng.gen_range(0..words.len())]
    }

    fn email(&mut self, first: &str, last: &str, id: i64) -> String {
        let domain = self.pick(DOMAINS);
        match self.rng.gen_range(0..4) {
            0 => format!("{first}.{last}@{domain}"),
            1 => format!("{first}_{last}@{domain}"),
            2 => format!("{first}{id}@{domain}"),
            _ => format!("{first}.{last}{id}@{domain}"),
        }
    }

    fn description(&mut self) -> String {
        let opener = self.pick(DESCRIPTION_OPENERS);
        let skill = self.pick(SKILLS);
        let closer = self.pick(DESCRIPTION_CLOSERS);
        format!("{opener} {skill}{closer}")
    }
}
