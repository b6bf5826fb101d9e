use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use fintrak::{
    AccountForm, AccountKind, RecurringInterval, Transaction, TransactionType, create_account,
    create_transaction, initialize_db,
};

/// A utility for creating a test database for the FinTrak server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test accounts...");

    let everyday = create_account(
        &AccountForm {
            name: "Everyday".to_owned(),
            kind: AccountKind::Current,
            balance: 1_250.0,
            is_default: true,
        },
        &conn,
    )?;
    let savings = create_account(
        &AccountForm {
            name: "Savings".to_owned(),
            kind: AccountKind::Savings,
            balance: 8_000.0,
            is_default: false,
        },
        &conn,
    )?;

    println!("Creating test transactions...");

    let today = OffsetDateTime::now_utc().date();
    let days_ago = |days: i64| today - Duration::days(days);

    let transactions = [
        Transaction::build(everyday.id, TransactionType::Income, 4_200.0, days_ago(28))
            .description("Monthly salary")
            .category("salary")
            .recurring(Some(RecurringInterval::Monthly)),
        Transaction::build(everyday.id, TransactionType::Expense, 1_800.0, days_ago(27))
            .description("Rent")
            .category("housing")
            .recurring(Some(RecurringInterval::Monthly)),
        Transaction::build(everyday.id, TransactionType::Expense, 142.37, days_ago(12))
            .description("Weekly groceries at the supermarket down the road, plus snacks for the trip")
            .category("groceries"),
        Transaction::build(everyday.id, TransactionType::Expense, 15.99, days_ago(9))
            .description("Streaming subscription")
            .category("entertainment")
            .recurring(Some(RecurringInterval::Monthly)),
        Transaction::build(everyday.id, TransactionType::Expense, 6.5, days_ago(3))
            .description("Flat white")
            .category("food"),
        Transaction::build(everyday.id, TransactionType::Income, 350.0, days_ago(2))
            .description("Logo design")
            .category("freelance"),
        Transaction::build(everyday.id, TransactionType::Expense, 58.2, days_ago(1))
            .description("Fuel")
            .category("transportation"),
        Transaction::build(savings.id, TransactionType::Income, 500.0, days_ago(14))
            .description("Automatic transfer")
            .category("other-income")
            .recurring(Some(RecurringInterval::Weekly)),
        Transaction::build(savings.id, TransactionType::Income, 23.41, days_ago(1))
            .description("Interest")
            .category("investments"),
    ];

    for transaction in transactions {
        create_transaction(transaction, today, &conn)?;
    }

    println!("Success!");

    Ok(())
}
