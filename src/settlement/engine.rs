//! Greedy debt settlement.
//!
//! # Algorithm
//!
//! 1. Split balances into debtors and creditors, each sorted by name.
//! 2. Walk debtors in order. Each debtor pays the current creditor
//!    `min(owed, still_due)`; the creditor cursor only ever moves forward.
//! 3. A creditor is skipped once fully paid; a debtor stops once clear.
//!
//! Every transfer exhausts a debtor or a creditor (or both), so the plan
//! has at most `debtors + creditors - 1` transfers. This is not the
//! minimum transfer count in general, which is NP-hard to find.

use crate::core::amount::{format_amount, is_negligible};
use crate::core::ledger::Ledger;
use crate::core::participant::ParticipantId;
use crate::settlement::summary::SettlementSummary;
use log::trace;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single proposed payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Decimal,
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} needs to pay {} an amount of {}",
            self.from,
            self.to,
            format_amount(self.amount)
        )
    }
}

/// Ordered list of transfers that zeroes every balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    transactions: Vec<Transaction>,
}

impl SettlementPlan {
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Total money moved by the plan.
    pub fn total_transferred(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Apply every transfer to `balances` and return what is left.
    ///
    /// A payer's balance rises by the amount paid, a receiver's falls by
    /// it. For a plan produced from the same balances the result is zero
    /// (within tolerance) for every participant.
    pub fn apply_to(
        &self,
        balances: &BTreeMap<ParticipantId, Decimal>,
    ) -> BTreeMap<ParticipantId, Decimal> {
        let mut residual = balances.clone();
        for tx in &self.transactions {
            *residual.entry(tx.from.clone()).or_insert(Decimal::ZERO) += tx.amount;
            *residual.entry(tx.to.clone()).or_insert(Decimal::ZERO) -= tx.amount;
        }
        residual
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for tx in &self.transactions {
            writeln!(f, "{}", tx)?;
        }
        Ok(())
    }
}

/// The settlement engine. Stateless; every call reads a balance snapshot.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Compute the settlement plan for a ledger's current balances.
    pub fn settle(ledger: &Ledger) -> SettlementPlan {
        Self::settle_balances(&ledger.balances())
    }

    /// Compute the settlement plan for an arbitrary balance snapshot.
    ///
    /// Balances are expected to sum to zero. If they do not, the plan
    /// settles as much as the smaller side allows.
    pub fn settle_balances(balances: &BTreeMap<ParticipantId, Decimal>) -> SettlementPlan {
        let summary = SettlementSummary::from_balances(balances);
        let mut creditors: Vec<(ParticipantId, Decimal)> = summary
            .creditors()
            .iter()
            .map(|p| (p.participant.clone(), p.amount))
            .collect();

        let mut transactions = Vec::new();
        let mut cursor = 0;

        for debtor in summary.debtors() {
            let mut remaining = debtor.amount;

            while !is_negligible(remaining) && cursor < creditors.len() {
                let (creditor, due) = &mut creditors[cursor];
                let transfer = remaining.min(*due);

                if transfer > Decimal::ZERO {
                    trace!("{} pays {} {}", debtor.participant, creditor, transfer);
                    transactions.push(Transaction {
                        from: debtor.participant.clone(),
                        to: creditor.clone(),
                        amount: transfer,
                    });
                    remaining -= transfer;
                    *due -= transfer;
                }

                if is_negligible(*due) {
                    cursor += 1;
                }
            }
        }

        SettlementPlan { transactions }
    }
}
