//! Random trip generation.
//!
//! Produces shared-expense workloads for property tests, benchmarks and
//! the `generate` CLI command.

use crate::core::ledger::{ExpenseInput, Ledger, LedgerError};
use crate::core::participant::ParticipantId;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Configuration for generating a random trip.
#[derive(Debug, Clone)]
pub struct TripConfig {
    /// Number of people on the trip.
    pub participant_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Minimum expense amount, in whole currency units.
    pub min_amount: u64,
    /// Maximum expense amount, in whole currency units.
    pub max_amount: u64,
    /// Probability that an expense carries explicit weights.
    pub weighted_probability: f64,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            participant_count: 6,
            expense_count: 12,
            min_amount: 10,
            max_amount: 1_000,
            weighted_probability: 0.25,
        }
    }
}

const DESCRIPTIONS: &[&str] = &[
    "Snacks", "Taxi", "Bus", "Dinner", "Hotel", "Fuel", "Museum", "Groceries",
];

/// Generate a random sequence of valid expenses.
pub fn generate_random_trip(config: &TripConfig) -> Vec<ExpenseInput> {
    let mut rng = rand::thread_rng();

    let people: Vec<ParticipantId> = (0..config.participant_count.max(1))
        .map(|i| ParticipantId::new(format!("P{:03}", i)))
        .collect();

    let low = config.min_amount.min(config.max_amount).max(1);
    let high = config.min_amount.max(config.max_amount).max(1);

    (0..config.expense_count)
        .map(|_| {
            let payer = people[rng.gen_range(0..people.len())].clone();

            let count = rng.gen_range(1..=people.len());
            let participants: Vec<ParticipantId> =
                people.choose_multiple(&mut rng, count).cloned().collect();

            let weights = if rng.gen_bool(config.weighted_probability.clamp(0.0, 1.0)) {
                let w: HashMap<ParticipantId, Decimal> = participants
                    .iter()
                    .map(|p| (p.clone(), Decimal::from(rng.gen_range(1u32..=4))))
                    .collect();
                Some(w)
            } else {
                None
            };

            let amount = rng.gen_range(low..=high);
            let description = DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())];

            ExpenseInput {
                amount: Decimal::from(amount),
                description: description.to_string(),
                payer,
                participants,
                weights,
            }
        })
        .collect()
}

/// Generate a random trip and load it into a fresh ledger.
pub fn generate_random_ledger(config: &TripConfig) -> Result<Ledger, LedgerError> {
    let mut ledger = Ledger::new();
    for input in generate_random_trip(config) {
        ledger.add_input(&input)?;
    }
    Ok(ledger)
}
