use crate::core::amount::{format_amount, is_negligible};
use crate::core::ledger::Ledger;
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which side of the settlement a balance falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Standing {
    Debtor,
    Creditor,
    Settled,
}

impl Standing {
    /// Classify a balance; anything within tolerance of zero is settled.
    pub fn of(balance: Decimal) -> Self {
        if is_negligible(balance) {
            Standing::Settled
        } else if balance < Decimal::ZERO {
            Standing::Debtor
        } else {
            Standing::Creditor
        }
    }
}

impl std::fmt::Display for Standing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Standing::Debtor => "DEBTOR",
            Standing::Creditor => "CREDITOR",
            Standing::Settled => "SETTLED",
        };
        write!(f, "{}", label)
    }
}

/// How much one participant owes or is owed. `amount` is always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub participant: ParticipantId,
    pub amount: Decimal,
}

/// Descriptive split of participants into debtors and creditors.
///
/// Participants whose balance is within tolerance of zero appear in
/// neither list. Both lists are ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementSummary {
    debtors: Vec<Position>,
    creditors: Vec<Position>,
}

impl SettlementSummary {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self::from_balances(&ledger.balances())
    }

    /// Partition a balance snapshot by sign.
    pub fn from_balances(balances: &BTreeMap<ParticipantId, Decimal>) -> Self {
        let mut summary = Self::default();
        for (participant, &balance) in balances {
            let position = Position {
                participant: participant.clone(),
                amount: balance.abs(),
            };
            match Standing::of(balance) {
                Standing::Debtor => summary.debtors.push(position),
                Standing::Creditor => summary.creditors.push(position),
                Standing::Settled => {}
            }
        }
        summary
    }

    /// Participants with a negative balance, with the amount they owe.
    pub fn debtors(&self) -> &[Position] {
        &self.debtors
    }

    /// Participants with a positive balance, with the amount owed to them.
    pub fn creditors(&self) -> &[Position] {
        &self.creditors
    }

    pub fn is_settled(&self) -> bool {
        self.debtors.is_empty() && self.creditors.is_empty()
    }

    /// Total owed by all debtors.
    pub fn total_owed(&self) -> Decimal {
        self.debtors.iter().map(|p| p.amount).sum()
    }

    /// Report lines: `"<name> owes <amount>"` for each debtor, then
    /// `"<name> gets <amount>"` for each creditor.
    pub fn lines(&self) -> Vec<String> {
        let owes = self
            .debtors
            .iter()
            .map(|p| format!("{} owes {}", p.participant, format_amount(p.amount)));
        let gets = self
            .creditors
            .iter()
            .map(|p| format!("{} gets {}", p.participant, format_amount(p.amount)));
        owes.chain(gets).collect()
    }
}

impl std::fmt::Display for SettlementSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
