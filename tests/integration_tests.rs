use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use splitwise_engine::core::ledger::{ExpenseInput, Ledger, LedgerError};
use splitwise_engine::core::participant::ParticipantId;
use splitwise_engine::prelude::*;
use std::collections::HashMap;

fn id(name: &str) -> ParticipantId {
    ParticipantId::new(name)
}

fn six_person_trip() -> Ledger {
    let mut ledger = Ledger::new();
    ledger.add_expense(dec!(300), "Snacks", "A", ["A", "B", "C"], None).unwrap();
    ledger.add_expense(dec!(600), "Snacks", "B", ["C", "D", "E"], None).unwrap();
    ledger.add_expense(dec!(200), "Snacks", "C", ["A", "F"], None).unwrap();
    ledger.add_expense(dec!(500), "Snacks", "D", ["B", "E"], None).unwrap();
    ledger.add_expense(dec!(600), "Snacks", "E", ["C", "F"], None).unwrap();
    ledger.add_expense(dec!(900), "Snacks", "F", ["A", "B", "C"], None).unwrap();
    ledger
}

/// Full pipeline: expenses → balances → summary → settlement → zero.
#[test]
fn full_pipeline_six_person_trip() {
    let ledger = six_person_trip();

    assert_eq!(ledger.participants().len(), 6);
    assert_eq!(ledger.expenses().len(), 6);
    assert_eq!(ledger.gross_total(), dec!(3100));
    assert!(ledger.is_balanced());

    let balances = ledger.balances();
    assert_eq!(balances[&id("A")], dec!(-200));
    assert_eq!(balances[&id("B")], dec!(-50));
    assert_eq!(balances[&id("C")], dec!(-700));
    assert_eq!(balances[&id("D")], dec!(300));
    assert_eq!(balances[&id("E")], dec!(150));
    assert_eq!(balances[&id("F")], dec!(500));

    assert_eq!(
        ledger.transaction_summary(),
        vec![
            "A owes 200.00",
            "B owes 50.00",
            "C owes 700.00",
            "D gets 300.00",
            "E gets 150.00",
            "F gets 500.00",
        ]
    );

    let lines: Vec<String> = ledger.settle().iter().map(|t| t.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "A needs to pay D an amount of 200.00",
            "B needs to pay D an amount of 50.00",
            "C needs to pay D an amount of 50.00",
            "C needs to pay E an amount of 150.00",
            "C needs to pay F an amount of 500.00",
        ]
    );

    let plan = SettlementEngine::settle(&ledger);
    assert_eq!(plan.total_transferred(), ledger.total_outstanding());
    assert!(plan.apply_to(&balances).values().all(|b| b.is_zero()));
}

#[test]
fn settlement_of_single_equal_split() {
    let mut ledger = Ledger::new();
    ledger.add_expense(dec!(300), "Snacks", "A", ["A", "B", "C"], None).unwrap();

    let txs = ledger.settle();
    assert_eq!(txs.len(), 2);
    assert_eq!((txs[0].from.as_str(), txs[0].to.as_str()), ("B", "A"));
    assert_eq!((txs[1].from.as_str(), txs[1].to.as_str()), ("C", "A"));
    assert!(txs.iter().all(|t| t.amount == dec!(100)));
}

#[test]
fn reporting_order_independent_of_registration() {
    let mut forward = Ledger::new();
    forward.add_expense(dec!(90), "x", "Ann", ["Ann", "Bo", "Cy"], None).unwrap();

    let mut reverse = Ledger::new();
    reverse.add_expense(dec!(90), "x", "Ann", ["Cy", "Bo", "Ann"], None).unwrap();

    assert_eq!(forward.transaction_summary(), reverse.transaction_summary());
    assert_eq!(forward.settle(), reverse.settle());
}

#[test]
fn everyone_even_needs_no_payments() {
    let mut ledger = Ledger::new();
    ledger.add_expense(dec!(50), "Lunch", "A", ["A", "B"], None).unwrap();
    ledger.add_expense(dec!(50), "Dinner", "B", ["A", "B"], None).unwrap();

    assert!(ledger.is_settled());
    assert!(ledger.settle().is_empty());
    assert!(ledger.transaction_summary().is_empty());
}

#[test]
fn thirds_settle_to_within_tolerance() {
    let mut ledger = Ledger::new();
    ledger.add_expense(dec!(100), "Dinner", "A", ["A", "B", "C"], None).unwrap();
    ledger.add_expense(dec!(10), "Coffee", "B", ["A", "B", "C"], None).unwrap();

    let balances = ledger.balances();
    let plan = SettlementEngine::settle(&ledger);
    assert!(plan.transactions().iter().all(|t| t.amount > Decimal::ZERO));
    for residual in plan.apply_to(&balances).values() {
        assert!(residual.abs() < dec!(0.000001));
    }
}

#[test]
fn rejected_expense_is_atomic() {
    let mut ledger = six_person_trip();
    let before = ledger.balances();

    let err = ledger.add_expense(dec!(0), "Free", "Z", ["Y"], None).unwrap_err();
    assert!(matches!(err, LedgerError::Expense(ExpenseError::InvalidAmount { .. })));

    let err = ledger
        .add_expense(dec!(10), "Nobody", "Z", Vec::<&str>::new(), None)
        .unwrap_err();
    assert_eq!(err, LedgerError::Expense(ExpenseError::EmptyParticipants));

    assert_eq!(ledger.balances(), before);
    assert_eq!(ledger.expenses().len(), 6);
    assert!(matches!(
        ledger.participant(&id("Z")),
        Err(LedgerError::UnknownParticipant(_))
    ));
}

#[test]
fn weighted_and_on_behalf_expenses() {
    let mut ledger = Ledger::new();
    let weights: HashMap<ParticipantId, Decimal> =
        [(id("A"), dec!(1)), (id("B"), dec!(3))].into_iter().collect();
    ledger.add_expense(dec!(100), "Cab", "A", ["A", "B"], Some(&weights)).unwrap();
    ledger.add_expense(dec!(200), "Gift", "C", ["A", "B"], None).unwrap();

    // A: +75 - 100 = -25, B: -75 - 100 = -175, C: +200
    assert_eq!(ledger.balance(&id("A")).unwrap(), dec!(-25));
    assert_eq!(ledger.balance(&id("B")).unwrap(), dec!(-175));
    assert_eq!(ledger.balance(&id("C")).unwrap(), dec!(200));
    assert!(ledger.is_balanced());
}

/// Expense inputs load from the JSON format used by the CLI.
#[test]
fn expense_inputs_from_json() {
    let json = r#"[
        { "amount": "300", "description": "Snacks", "payer": "A", "participants": ["A", "B", "C"] },
        { "amount": "100", "payer": "A", "participants": ["A", "B"], "weights": { "A": "1", "B": "3" } }
    ]"#;
    let inputs: Vec<ExpenseInput> = serde_json::from_str(json).unwrap();
    assert_eq!(inputs[1].description, "");

    let mut ledger = Ledger::new();
    for input in &inputs {
        ledger.add_input(input).unwrap();
    }
    assert_eq!(ledger.balance(&id("A")).unwrap(), dec!(275));
    assert_eq!(ledger.balance(&id("B")).unwrap(), dec!(-175));
    assert_eq!(ledger.balance(&id("C")).unwrap(), dec!(-100));
}

/// Settlement output serializes with string amounts.
#[test]
fn settlement_plan_serializes() {
    let ledger = six_person_trip();
    let plan = SettlementEngine::settle(&ledger);
    let json = serde_json::to_string(&plan).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = &parsed["transactions"][0];
    assert_eq!(first["from"], "A");
    assert_eq!(first["to"], "D");
    let amount: Decimal = first["amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(amount, dec!(200));
}

#[test]
fn ledger_serializes_expense_log() {
    let ledger = six_person_trip();
    let parsed: serde_json::Value = serde_json::to_value(&ledger).unwrap();
    assert_eq!(parsed["expenses"].as_array().map(Vec::len), Some(6));
    assert_eq!(parsed["participants"][0]["id"], "A");
    assert!(parsed.get("index").is_none());
}
