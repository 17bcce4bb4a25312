//! A six-person weekend trip.
//!
//! Demonstrates how the ledger accumulates balances from equally split
//! expenses and how the settlement engine turns them into payments.

use splitwise_engine::core::amount::format_amount;
use splitwise_engine::core::ledger::Ledger;
use splitwise_engine::settlement::engine::SettlementEngine;
use splitwise_engine::settlement::summary::{SettlementSummary, Standing};
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  splitwise-engine: Weekend Trip Example  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut ledger = Ledger::new();

    ledger.add_expense(dec!(300), "Snacks", "A", ["A", "B", "C"], None).unwrap();
    ledger.add_expense(dec!(600), "Taxi", "B", ["C", "D", "E"], None).unwrap();
    ledger.add_expense(dec!(200), "Bus", "C", ["A", "F"], None).unwrap();
    ledger.add_expense(dec!(500), "Dinner", "D", ["B", "E"], None).unwrap();
    ledger.add_expense(dec!(600), "Hotel", "E", ["C", "F"], None).unwrap();
    ledger.add_expense(dec!(900), "Museum", "F", ["A", "B", "C"], None).unwrap();

    println!("━━━ Balances ━━━\n");
    for (name, balance) in ledger.balances() {
        let status = match Standing::of(balance) {
            Standing::Creditor => "GETS",
            Standing::Debtor => "OWES",
            Standing::Settled => "SETTLED",
        };
        println!("  {:<6} {:>10}  [{}]", name, format_amount(balance), status);
    }
    println!();

    println!("━━━ Transaction Summary ━━━\n");
    print!("{}", SettlementSummary::from_ledger(&ledger));
    println!();

    println!("━━━ Payments ━━━\n");
    let plan = SettlementEngine::settle(&ledger);
    print!("{}", plan);
    println!(
        "\n{} payment(s), {} moved in total",
        plan.len(),
        plan.total_transferred()
    );
}
