use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while constructing an [`Expense`].
///
/// All of these are detected before any ledger state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpenseError {
    #[error("expense amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },
    #[error("expense must have at least one participant")]
    EmptyParticipants,
    #[error("no weight supplied for participant {participant}")]
    IncompleteWeights { participant: ParticipantId },
    #[error("weight for participant {participant} must be positive, got {weight}")]
    InvalidWeights {
        participant: ParticipantId,
        weight: Decimal,
    },
    #[error("expense weights are too large to total")]
    WeightOverflow,
}

/// The portion of an expense attributed to one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub participant: ParticipantId,
    pub amount: Decimal,
}

/// One shared cost event.
///
/// `payer` covered the full `amount`; the cost is split among
/// `participants` in proportion to their weights. Shares are computed once
/// at construction and always sum to exactly `amount`.
///
/// Expenses are immutable once created.
///
/// # Examples
///
/// ```
/// use splitwise_engine::core::expense::Expense;
/// use splitwise_engine::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let expense = Expense::new(
///     dec!(300),
///     "Snacks",
///     ParticipantId::new("A"),
///     vec!["A".into(), "B".into(), "C".into()],
///     None,
/// ).unwrap();
///
/// assert_eq!(expense.share(&ParticipantId::new("B")), Some(dec!(100)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    amount: Decimal,
    description: String,
    payer: ParticipantId,
    /// Per-participant shares, in the order participants were listed.
    shares: Vec<Share>,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Build an expense and compute its shares.
    ///
    /// When `weights` is `None` every participant gets an equal weight.
    /// Explicit weights are normalized, so raw ratios such as `1:3` are fine;
    /// entries for names not in `participants` are ignored. Repeated names in
    /// `participants` are collapsed to their first occurrence.
    pub fn new(
        amount: Decimal,
        description: impl Into<String>,
        payer: ParticipantId,
        participants: Vec<ParticipantId>,
        weights: Option<&HashMap<ParticipantId, Decimal>>,
    ) -> Result<Self, ExpenseError> {
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::InvalidAmount { amount });
        }

        let participants = dedup_preserving_order(participants);
        if participants.is_empty() {
            return Err(ExpenseError::EmptyParticipants);
        }

        let resolved = resolve_weights(&participants, weights)?;
        let shares = compute_shares(amount, participants, &resolved)?;

        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            description: description.into(),
            payer,
            shares,
            created_at: Utc::now(),
        })
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// Participants in the order they were listed.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.shares.iter().map(|s| &s.participant)
    }

    /// The share owed by `participant`, if they benefit from this expense.
    pub fn share(&self, participant: &ParticipantId) -> Option<Decimal> {
        self.shares
            .iter()
            .find(|s| &s.participant == participant)
            .map(|s| s.amount)
    }

    /// True if `participant` benefits from this expense.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        self.share(participant).is_some()
    }

    /// True if the payer also consumes a share of the cost.
    pub fn payer_participates(&self) -> bool {
        self.involves(&self.payer)
    }

    /// Sum of all shares. Always equal to [`amount`](Self::amount).
    pub fn shares_total(&self) -> Decimal {
        self.shares.iter().map(|s| s.amount).sum()
    }
}

fn dedup_preserving_order(participants: Vec<ParticipantId>) -> Vec<ParticipantId> {
    let mut seen = HashSet::new();
    participants
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Look up a weight for each participant, validating as we go.
fn resolve_weights(
    participants: &[ParticipantId],
    weights: Option<&HashMap<ParticipantId, Decimal>>,
) -> Result<Vec<Decimal>, ExpenseError> {
    let Some(weights) = weights else {
        return Ok(vec![Decimal::ONE; participants.len()]);
    };

    let mut resolved = Vec::with_capacity(participants.len());
    for participant in participants {
        let weight = *weights
            .get(participant)
            .ok_or_else(|| ExpenseError::IncompleteWeights {
                participant: participant.clone(),
            })?;
        if weight <= Decimal::ZERO {
            return Err(ExpenseError::InvalidWeights {
                participant: participant.clone(),
                weight,
            });
        }
        resolved.push(weight);
    }
    Ok(resolved)
}

/// Split `amount` in proportion to `weights`.
///
/// The last participant absorbs the rounding remainder so the shares sum to
/// `amount` exactly. When `amount * weight` does not fit in a `Decimal` the
/// ratio is taken first; it is at most one, so the share never exceeds
/// `amount`.
fn compute_shares(
    amount: Decimal,
    participants: Vec<ParticipantId>,
    weights: &[Decimal],
) -> Result<Vec<Share>, ExpenseError> {
    let total_weight = weights
        .iter()
        .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))
        .ok_or(ExpenseError::WeightOverflow)?;
    let last = participants.len() - 1;
    let mut allocated = Decimal::ZERO;
    let mut shares = Vec::with_capacity(participants.len());

    for (i, (participant, weight)) in participants.into_iter().zip(weights).enumerate() {
        let share = if i == last {
            amount - allocated
        } else {
            match amount.checked_mul(*weight) {
                Some(scaled) => scaled / total_weight,
                None => amount * (*weight / total_weight),
            }
        };
        allocated += share;
        shares.push(Share {
            participant,
            amount: share,
        });
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| ParticipantId::new(*n)).collect()
    }

    fn weights(entries: &[(&str, Decimal)]) -> HashMap<ParticipantId, Decimal> {
        entries
            .iter()
            .map(|(n, w)| (ParticipantId::new(*n), *w))
            .collect()
    }

    #[test]
    fn test_equal_split() {
        let ex = Expense::new(dec!(300), "Snacks", "A".into(), ids(&["A", "B", "C"]), None)
            .unwrap();
        for name in ["A", "B", "C"] {
            assert_eq!(ex.share(&name.into()), Some(dec!(100)));
        }
        assert_eq!(ex.shares_total(), dec!(300));
        assert!(ex.payer_participates());
    }

    #[test]
    fn test_weighted_split() {
        let w = weights(&[("A", dec!(1)), ("B", dec!(3))]);
        let ex = Expense::new(dec!(100), "Cab", "A".into(), ids(&["A", "B"]), Some(&w)).unwrap();
        assert_eq!(ex.share(&"A".into()), Some(dec!(25)));
        assert_eq!(ex.share(&"B".into()), Some(dec!(75)));
    }

    #[test]
    fn test_unnormalized_fractional_weights() {
        let w = weights(&[("A", dec!(0.5)), ("B", dec!(0.5)), ("C", dec!(1))]);
        let ex = Expense::new(dec!(80), "Fuel", "A".into(), ids(&["A", "B", "C"]), Some(&w))
            .unwrap();
        assert_eq!(ex.share(&"A".into()), Some(dec!(20)));
        assert_eq!(ex.share(&"B".into()), Some(dec!(20)));
        assert_eq!(ex.share(&"C".into()), Some(dec!(40)));
    }

    #[test]
    fn test_shares_sum_exactly_with_thirds() {
        let ex = Expense::new(dec!(100), "Dinner", "A".into(), ids(&["A", "B", "C"]), None)
            .unwrap();
        assert_eq!(ex.shares_total(), dec!(100));
        let a = ex.share(&"A".into()).unwrap();
        let c = ex.share(&"C".into()).unwrap();
        assert!((a - c).abs() < dec!(0.000001));
    }

    #[test]
    fn test_extra_weights_ignored() {
        let w = weights(&[("A", dec!(1)), ("B", dec!(1)), ("Z", dec!(50))]);
        let ex = Expense::new(dec!(10), "Tea", "A".into(), ids(&["A", "B"]), Some(&w)).unwrap();
        assert_eq!(ex.share(&"A".into()), Some(dec!(5)));
        assert!(!ex.involves(&"Z".into()));
    }

    #[test]
    fn test_duplicate_participants_collapsed() {
        let ex = Expense::new(dec!(90), "Lunch", "A".into(), ids(&["B", "C", "B"]), None)
            .unwrap();
        assert_eq!(ex.shares().len(), 2);
        assert_eq!(ex.share(&"B".into()), Some(dec!(45)));
        let order: Vec<&str> = ex.participants().map(|p| p.as_str()).collect();
        assert_eq!(order, vec!["B", "C"]);
    }

    #[test]
    fn test_payer_outside_participants() {
        let ex = Expense::new(dec!(200), "Gift", "A".into(), ids(&["B", "C"]), None).unwrap();
        assert!(!ex.payer_participates());
        assert_eq!(ex.share(&"A".into()), None);
    }

    #[test]
    fn test_invalid_amount() {
        let zero = Expense::new(Decimal::ZERO, "x", "A".into(), ids(&["A"]), None);
        assert_eq!(
            zero.unwrap_err(),
            ExpenseError::InvalidAmount {
                amount: Decimal::ZERO
            }
        );
        let negative = Expense::new(dec!(-5), "x", "A".into(), ids(&["A"]), None);
        assert!(matches!(negative, Err(ExpenseError::InvalidAmount { .. })));
    }

    #[test]
    fn test_empty_participants() {
        let result = Expense::new(dec!(10), "x", "A".into(), Vec::new(), None);
        assert_eq!(result.unwrap_err(), ExpenseError::EmptyParticipants);
    }

    #[test]
    fn test_incomplete_weights() {
        let w = weights(&[("A", dec!(1))]);
        let result = Expense::new(dec!(10), "x", "A".into(), ids(&["A", "B"]), Some(&w));
        assert_eq!(
            result.unwrap_err(),
            ExpenseError::IncompleteWeights {
                participant: "B".into()
            }
        );
    }

    #[test]
    fn test_non_positive_weight() {
        let w = weights(&[("A", dec!(1)), ("B", dec!(0))]);
        let result = Expense::new(dec!(10), "x", "A".into(), ids(&["A", "B"]), Some(&w));
        assert_eq!(
            result.unwrap_err(),
            ExpenseError::InvalidWeights {
                participant: "B".into(),
                weight: dec!(0),
            }
        );

        let w = weights(&[("A", dec!(-1))]);
        let result = Expense::new(dec!(10), "x", "A".into(), ids(&["A"]), Some(&w));
        assert!(matches!(result, Err(ExpenseError::InvalidWeights { .. })));
    }

    #[test]
    fn test_large_raw_weights_do_not_overflow() {
        let w = weights(&[("A", dec!(100000000000000000000)), ("B", dec!(300000000000000000000))]);
        let ex = Expense::new(dec!(10000000000), "x", "A".into(), ids(&["A", "B"]), Some(&w))
            .unwrap();
        assert_eq!(ex.share(&"A".into()), Some(dec!(2500000000)));
        assert_eq!(ex.share(&"B".into()), Some(dec!(7500000000)));
        assert_eq!(ex.shares_total(), dec!(10000000000));
    }

    #[test]
    fn test_weight_total_overflow() {
        let w = weights(&[("A", Decimal::MAX), ("B", Decimal::MAX)]);
        let result = Expense::new(dec!(10), "x", "A".into(), ids(&["A", "B"]), Some(&w));
        assert_eq!(result.unwrap_err(), ExpenseError::WeightOverflow);
    }

    #[test]
    fn test_error_messages() {
        let err = ExpenseError::IncompleteWeights {
            participant: "B".into(),
        };
        assert_eq!(err.to_string(), "no weight supplied for participant B");
    }
}
