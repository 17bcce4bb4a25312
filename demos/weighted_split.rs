//! Weighted splits and paying on someone else's behalf.

use splitwise_engine::core::participant::ParticipantId;
use splitwise_engine::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  splitwise-engine: Weighted Split Example  ║");
    println!("╚════════════════════════════════════════════╝\n");

    let mut ledger = Ledger::new();

    // Bob rode three times as far as Alice.
    let cab: HashMap<ParticipantId, Decimal> = [
        (ParticipantId::new("Alice"), dec!(1)),
        (ParticipantId::new("Bob"), dec!(3)),
    ]
    .into_iter()
    .collect();
    let expense = ledger
        .add_expense(dec!(100), "Cab", "Alice", ["Alice", "Bob"], Some(&cab))
        .unwrap();
    for share in expense.shares() {
        println!("  Cab share for {:<6} {:>8}", share.participant, share.amount);
    }

    // Carol buys a gift for Alice and Bob and takes no share herself.
    ledger
        .add_expense(dec!(60), "Gift", "Carol", ["Alice", "Bob"], None)
        .unwrap();

    // Rejected: weights missing for Carol. The ledger is unchanged.
    let partial: HashMap<ParticipantId, Decimal> =
        [(ParticipantId::new("Alice"), dec!(1))].into_iter().collect();
    if let Err(e) = ledger.add_expense(dec!(45), "Lunch", "Bob", ["Alice", "Carol"], Some(&partial)) {
        println!("\n  Rejected lunch: {}", e);
    }

    println!("\n━━━ Summary ━━━\n");
    for line in ledger.transaction_summary() {
        println!("  {}", line);
    }

    println!("\n━━━ Payments ━━━\n");
    for tx in ledger.settle() {
        println!("  {}", tx);
    }
}
