use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use employee_ledger::{
    EmployeeRequest, RawNumber, TransactionRequest, create_employee, create_transaction,
    initialize_db,
};

/// A utility for creating a test database for the REST API server of employee_ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const EMPLOYEES: [(&str, &str, i64, &str); 4] = [
    ("1001", "سارة أحمد", 34, "الرياض"),
    ("1002", "محمد علي", 41, "جدة"),
    ("1003", "سامي خالد", 28, "الدمام"),
    ("1004", "ليلى حسن", 52, "مكة"),
];

const TRANSACTIONS: [(&str, i64, Option<&str>, &str); 4] = [
    ("إيداع", 1500, Some("7"), "راتب"),
    ("سحب", 300, Some("7"), "مصاريف"),
    ("إيداع", 250, None, "مكافأة"),
    ("رسوم", 20, None, "رسوم خدمة"),
];

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

    println!("Creating test employees...");

    let now = OffsetDateTime::now_utc();

    for (employee_id, name, age, address) in EMPLOYEES {
        create_employee(
            EmployeeRequest {
                employee_id: Some(employee_id.to_owned()),
                name: Some(name.to_owned()),
                age: Some(RawNumber::from(age)),
                address: Some(address.to_owned()),
                identity_type: Some("هوية وطنية".to_owned()),
                ..Default::default()
            },
            &conn,
        )?;

        for (days_ago, (transaction_type, amount, box_number, description)) in
            (1..).zip(TRANSACTIONS)
        {
            let time = now - Duration::days(days_ago * 7);

            create_transaction(
                employee_id,
                TransactionRequest {
                    amount: Some(RawNumber::from(amount)),
                    transaction_type: Some(transaction_type.to_owned()),
                    transaction_time: Some(time),
                    box_number: box_number.map(str::to_owned),
                    description: Some(description.to_owned()),
                },
                time,
                &conn,
            )?;
        }
    }

    println!("Success!");

    Ok(())
}
