//! # splitwise-engine
//!
//! Shared-expense balance tracking and debt settlement engine.
//!
//! Given a sequence of weighted group expenses, this engine computes each
//! participant's net balance and a short, deterministic list of payments
//! that settles every balance to zero.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, expenses, amounts, ledger
//! - **settlement** — Owes/gets summary and greedy debt settlement
//! - **simulation** — Random trip generation for testing and benchmarks

pub mod core;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::expense::{Expense, ExpenseError};
    pub use crate::core::ledger::{Ledger, LedgerError};
    pub use crate::core::participant::{Participant, ParticipantId};
    pub use crate::settlement::engine::{SettlementEngine, SettlementPlan, Transaction};
    pub use crate::settlement::summary::{SettlementSummary, Standing};
}
