use crate::core::amount::is_negligible;
use crate::core::expense::{Expense, ExpenseError};
use crate::core::participant::{Participant, ParticipantId};
use crate::settlement::engine::{SettlementEngine, Transaction};
use crate::settlement::summary::SettlementSummary;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors surfaced by ledger operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Expense(#[from] ExpenseError),
    #[error("unknown participant: {0}")]
    UnknownParticipant(ParticipantId),
    #[error("balance of {participant} would overflow")]
    BalanceOverflow { participant: ParticipantId },
}

/// Serializable description of an expense, as read from JSON input.
///
/// ```json
/// { "amount": "100", "description": "Cab", "payer": "A",
///   "participants": ["A", "B"], "weights": { "A": "1", "B": "3" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub payer: ParticipantId,
    pub participants: Vec<ParticipantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<HashMap<ParticipantId, Decimal>>,
}

/// Owns every participant and the append-only expense log.
///
/// Balances are updated incrementally as each expense is added, so the
/// ledger can be queried at any time. After any sequence of successful
/// additions the balances sum to zero.
///
/// # Examples
///
/// ```
/// use splitwise_engine::core::ledger::Ledger;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = Ledger::new();
/// ledger.add_expense(dec!(300), "Snacks", "A", ["A", "B", "C"], None).unwrap();
///
/// assert_eq!(ledger.balance(&"A".into()).unwrap(), dec!(200));
/// assert_eq!(ledger.balance(&"B".into()).unwrap(), dec!(-100));
/// assert!(ledger.is_balanced());
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ledger {
    /// Participants in order of first appearance.
    participants: Vec<Participant>,
    #[serde(skip)]
    index: HashMap<ParticipantId, usize>,
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant, or return the existing one.
    pub fn create_participant(&mut self, name: impl Into<ParticipantId>) -> &Participant {
        let idx = self.register(name.into());
        &self.participants[idx]
    }

    fn register(&mut self, id: ParticipantId) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        debug!("registering participant {}", id);
        let idx = self.participants.len();
        self.index.insert(id.clone(), idx);
        self.participants.push(Participant::new(id));
        idx
    }

    /// Record an expense and update balances.
    ///
    /// The payer and every participant are registered on first reference.
    /// If the payer also participates, they are credited the amount minus
    /// their own share; otherwise they are credited the full amount. Every
    /// other participant is debited their share.
    ///
    /// On error the ledger is left untouched.
    pub fn add_expense<I, P>(
        &mut self,
        amount: Decimal,
        description: impl Into<String>,
        payer: impl Into<ParticipantId>,
        participants: I,
        weights: Option<&HashMap<ParticipantId, Decimal>>,
    ) -> Result<&Expense, LedgerError>
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        let participants: Vec<ParticipantId> = participants.into_iter().map(Into::into).collect();
        let expense = Expense::new(amount, description, payer.into(), participants, weights)
            .map_err(|e| {
                warn!("rejected expense: {}", e);
                e
            })?;

        self.apply_expense(expense)
    }

    /// Record an expense described by an [`ExpenseInput`].
    pub fn add_input(&mut self, input: &ExpenseInput) -> Result<&Expense, LedgerError> {
        self.add_expense(
            input.amount,
            input.description.clone(),
            input.payer.clone(),
            input.participants.iter().cloned(),
            input.weights.as_ref(),
        )
    }

    /// Balance changes for one expense: the payer is credited the amount
    /// minus their own share, every other participant is debited theirs.
    fn balance_deltas(expense: &Expense) -> Vec<(ParticipantId, Decimal)> {
        let payer_share = expense.share(expense.payer()).unwrap_or(Decimal::ZERO);
        let mut deltas = vec![(expense.payer().clone(), expense.amount() - payer_share)];
        deltas.extend(
            expense
                .shares()
                .iter()
                .filter(|s| &s.participant != expense.payer())
                .map(|s| (s.participant.clone(), -s.amount)),
        );
        deltas
    }

    fn apply_expense(&mut self, expense: Expense) -> Result<&Expense, LedgerError> {
        // Resolve every new balance before touching any participant.
        let mut updates = Vec::new();
        for (id, delta) in Self::balance_deltas(&expense) {
            let balance = match self.index.get(&id) {
                Some(&idx) => self.participants[idx].balance_after(delta),
                None => Some(delta),
            };
            let balance = balance.ok_or_else(|| {
                warn!("rejected expense '{}': balance of {} overflows", expense.description(), id);
                LedgerError::BalanceOverflow {
                    participant: id.clone(),
                }
            })?;
            updates.push((id, balance));
        }

        for participant in expense.participants() {
            self.register(participant.clone());
        }
        self.register(expense.payer().clone());

        for (id, balance) in updates {
            let idx = self.index[&id];
            self.participants[idx].set_balance(balance);
        }

        debug!(
            "applied expense '{}': {} paid {} across {} participant(s)",
            expense.description(),
            expense.payer(),
            expense.amount(),
            expense.shares().len()
        );

        self.expenses.push(expense);
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Look up a participant by name. Never registers a new one.
    pub fn participant(&self, id: &ParticipantId) -> Result<&Participant, LedgerError> {
        self.index
            .get(id)
            .map(|&idx| &self.participants[idx])
            .ok_or_else(|| LedgerError::UnknownParticipant(id.clone()))
    }

    /// Current balance of a participant.
    pub fn balance(&self, id: &ParticipantId) -> Result<Decimal, LedgerError> {
        self.participant(id).map(Participant::balance)
    }

    /// All participants, in order of first appearance.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// All expenses, in the order they were added.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Snapshot of every balance, keyed by name.
    pub fn balances(&self) -> BTreeMap<ParticipantId, Decimal> {
        self.participants
            .iter()
            .map(|p| (p.id().clone(), p.balance()))
            .collect()
    }

    /// Verify that the balances sum to zero within tolerance.
    pub fn is_balanced(&self) -> bool {
        self.participants
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.balance()))
            .map_or(false, is_negligible)
    }

    /// True if every participant's balance is within tolerance of zero.
    pub fn is_settled(&self) -> bool {
        self.participants.iter().all(|p| is_negligible(p.balance()))
    }

    /// Total amount that must change hands to settle the ledger
    /// (sum of all creditor balances).
    pub fn total_outstanding(&self) -> Decimal {
        self.participants
            .iter()
            .filter(|p| p.is_creditor())
            .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.balance()))
    }

    /// Gross total of every expense recorded.
    pub fn gross_total(&self) -> Decimal {
        self.expenses
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount()))
    }

    /// Owes/gets lines: debtors first, then creditors, each by name.
    pub fn transaction_summary(&self) -> Vec<String> {
        SettlementSummary::from_ledger(self).lines()
    }

    /// Payments that settle every balance, in deterministic order.
    pub fn settle(&self) -> Vec<Transaction> {
        SettlementEngine::settle(self).into_transactions()
    }
}
