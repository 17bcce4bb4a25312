pub mod amount;
pub mod expense;
pub mod ledger;
pub mod participant;
