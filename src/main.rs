//! splitwise-engine CLI
//!
//! Compute balances and settling payments for a set of shared expenses.
//!
//! # Usage
//!
//! ```bash
//! # Settle expenses from a JSON file
//! splitwise-engine settle --input expenses.json
//!
//! # Output as JSON
//! splitwise-engine settle --input expenses.json --format json
//!
//! # Who owes and who gets, without matching
//! splitwise-engine summary --input expenses.json
//!
//! # Generate a random trip for testing
//! splitwise-engine generate --participants 6 --expenses 20
//!
//! # Replay the built-in six-expense trip
//! splitwise-engine demo
//! ```

use rust_decimal_macros::dec;
use splitwise_engine::core::amount::format_amount;
use splitwise_engine::core::ledger::{ExpenseInput, Ledger};
use splitwise_engine::settlement::engine::SettlementEngine;
use splitwise_engine::settlement::summary::{SettlementSummary, Standing};
use splitwise_engine::simulation::trip::{generate_random_trip, TripConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"splitwise-engine — shared-expense balances and debt settlement

USAGE:
    splitwise-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute balances and the payments that settle them
    summary     Show who owes and who gets, without matching
    generate    Generate a random trip (for testing)
    demo        Replay the built-in six-expense trip
    help        Show this message

OPTIONS (settle, summary):
    --input <FILE>         Path to JSON expenses file
    --format <FORMAT>      Output format: text (default) or json (settle only)

OPTIONS (generate):
    --participants <N>     Number of participants (default: 6)
    --expenses <N>         Number of expenses (default: 12)
    --output <FILE>        Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG               Log filter, e.g. RUST_LOG=debug

EXAMPLES:
    splitwise-engine settle --input trip.json
    splitwise-engine settle --input trip.json --format json
    splitwise-engine generate --participants 4 --expenses 10 --output trip.json"#
    );
}

#[derive(serde::Deserialize)]
struct ExpensesFile {
    expenses: Vec<ExpenseInput>,
}

/// JSON output schema for settlement results.
#[derive(serde::Serialize)]
struct SettlementOutput {
    gross_total: String,
    total_outstanding: String,
    balanced: bool,
    balances: Vec<BalanceOutput>,
    transactions: Vec<TransactionOutput>,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    participant: String,
    balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct TransactionOutput {
    from: String,
    to: String,
    amount: String,
}

fn load_ledger(path: &str) -> Ledger {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: ExpensesFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "expenses": [
    {{ "amount": "300", "description": "Snacks", "payer": "A", "participants": ["A", "B", "C"] }},
    {{ "amount": "100", "payer": "A", "participants": ["A", "B"], "weights": {{ "A": "1", "B": "3" }} }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut ledger = Ledger::new();
    for (i, input) in file.expenses.iter().enumerate() {
        if let Err(e) = ledger.add_input(input) {
            eprintln!("Invalid expense #{} ('{}'): {}", i, input.description, e);
            process::exit(1);
        }
    }
    ledger
}

/// Parse `--input` and `--format` options shared by `settle` and `summary`.
fn parse_input_args(args: &[String]) -> (String, String) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    (path, format)
}

fn print_report(ledger: &Ledger) {
    println!("Transaction Summary:");
    print!("{}", SettlementSummary::from_ledger(ledger));
    println!("\nDetailed person-to-person transactions:");
    print!("{}", SettlementEngine::settle(ledger));
}

fn cmd_settle(args: &[String]) {
    let (path, format) = parse_input_args(args);
    let ledger = load_ledger(&path);

    if format == "json" {
        let balances = ledger
            .balances()
            .into_iter()
            .map(|(participant, balance)| BalanceOutput {
                participant: participant.to_string(),
                balance: format_amount(balance),
                status: Standing::of(balance).to_string(),
            })
            .collect();

        let transactions = SettlementEngine::settle(&ledger)
            .into_transactions()
            .into_iter()
            .map(|tx| TransactionOutput {
                from: tx.from.to_string(),
                to: tx.to.to_string(),
                amount: format_amount(tx.amount),
            })
            .collect();

        let output = SettlementOutput {
            gross_total: ledger.gross_total().to_string(),
            total_outstanding: ledger.total_outstanding().to_string(),
            balanced: ledger.is_balanced(),
            balances,
            transactions,
        };

        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_report(&ledger);
    }
}

fn cmd_summary(args: &[String]) {
    let (path, _) = parse_input_args(args);
    let ledger = load_ledger(&path);
    for line in ledger.transaction_summary() {
        println!("{}", line);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = TripConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--participants requires a number");
                        process::exit(1);
                    });
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        expenses: Vec<ExpenseInput>,
    }

    let output = OutputFile {
        expenses: generate_random_trip(&config),
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Error serializing trip: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            output.expenses.len(),
            config.participant_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn cmd_demo() {
    let trip = [
        (dec!(300), "A", vec!["A", "B", "C"]),
        (dec!(600), "B", vec!["C", "D", "E"]),
        (dec!(200), "C", vec!["A", "F"]),
        (dec!(500), "D", vec!["B", "E"]),
        (dec!(600), "E", vec!["C", "F"]),
        (dec!(900), "F", vec!["A", "B", "C"]),
    ];

    let mut ledger = Ledger::new();
    for (amount, payer, participants) in trip {
        if let Err(e) = ledger.add_expense(amount, "Snacks", payer, participants, None) {
            eprintln!("Invalid expense: {}", e);
            process::exit(1);
        }
    }
    print_report(&ledger);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "summary" => cmd_summary(rest),
        "generate" => cmd_generate(rest),
        "demo" => cmd_demo(),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
