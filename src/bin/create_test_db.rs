use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use finance_tracker::{
    Category, EmojiIcons, IconProvider, NewTransaction, PasswordHash, TransactionType,
    ValidatedPassword, create_transaction, create_user, initialize_db, reconcile,
};

/// A utility for creating a test database for the JSON API server of finance_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const TEST_EMAIL: &str = "test@example.com";
const TEST_PASSWORD: &str = "violet kettle drums over 9 tall ferns";

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

    println!("Creating test user {TEST_EMAIL} with the password \"{TEST_PASSWORD}\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(TEST_EMAIL, "Test", password_hash, &conn)?;

    println!("Creating default categories...");
    let categories = reconcile(user.id, &conn)?;
    for category in &categories {
        println!(
            "  {} {} ({})",
            EmojiIcons.render(category.icon),
            category.name,
            category.kind
        );
    }

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();
    let samples = [
        ("Salário", TransactionType::Income, "Monthly pay", 5000.0, 0),
        ("Moradia", TransactionType::Expense, "Rent", 1800.0, 1),
        ("Alimentação", TransactionType::Expense, "Groceries", 320.5, 3),
        ("Transporte", TransactionType::Expense, "Bus pass", 120.0, 5),
        ("Freelance", TransactionType::Income, "Website gig", 850.0, 35),
        ("Lazer", TransactionType::Expense, "Cinema", 45.0, 40),
        ("Alimentação", TransactionType::Expense, "Groceries", 298.9, 33),
    ];

    for (category_name, transaction_type, description, amount, days_ago) in samples {
        let category_id = find_category(&categories, category_name)?.id;

        create_transaction(
            NewTransaction {
                description: description.to_owned(),
                amount,
                transaction_type,
                date: today - Duration::days(days_ago),
                category_id,
            },
            user.id,
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}

fn find_category<'a>(categories: &'a [Category], name: &str) -> Result<&'a Category, String> {
    categories
        .iter()
        .find(|category| category.name.as_ref() == name)
        .ok_or_else(|| format!("The default category {name} is missing"))
}
