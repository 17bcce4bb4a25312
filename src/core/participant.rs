use crate::core::amount::is_negligible;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a participant sharing expenses.
///
/// Participants are identified by name. Ordering is lexicographic on the
/// name, which is what every externally visible report sorts by.
///
/// # Examples
///
/// ```
/// use splitwise_engine::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("Alice");
/// let bob = ParticipantId::new("Bob");
/// assert_ne!(alice, bob);
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the participant's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A named party with a running signed balance.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
///
/// The balance can only be changed by the [`Ledger`](crate::core::ledger::Ledger)
/// while it applies an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    balance: Decimal,
}

impl Participant {
    pub(crate) fn new(id: ParticipantId) -> Self {
        Self {
            id,
            balance: Decimal::ZERO,
        }
    }

    pub(crate) fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    /// Balance after applying `delta`, or `None` if it would overflow.
    pub fn balance_after(&self, delta: Decimal) -> Option<Decimal> {
        self.balance.checked_add(delta)
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn is_debtor(&self) -> bool {
        self.balance < Decimal::ZERO && !is_negligible(self.balance)
    }

    pub fn is_creditor(&self) -> bool {
        self.balance > Decimal::ZERO && !is_negligible(self.balance)
    }

    pub fn is_settled(&self) -> bool {
        is_negligible(self.balance)
    }
}
