use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use despesas::{
    CategoryName, Database, NewExpense, create_expense, seed_default_categories,
};

/// A utility for creating a test database for the expenses REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const SAMPLE_EXPENSES: [(f64, &str, &str, i64); 5] = [
    (32.9, "Almoço", "Alimentação", 0),
    (4.5, "Passagem de ônibus", "Transporte", 1),
    (1500.0, "Aluguel", "Moradia", 3),
    (89.9, "Consulta", "Saúde", 7),
    (120.0, "Curso online", "Educação", 14),
];

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
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
    let database = Database::sqlite(Connection::open(output_path)?)?;
    let mut connection = database.acquire().await?;

    println!("Creating default categories...");
    seed_default_categories(&mut connection).await?;

    println!("Creating sample expenses...");
    let now = OffsetDateTime::now_utc();
    for (valor, descricao, categoria, days_ago) in SAMPLE_EXPENSES {
        let expense = NewExpense {
            valor,
            descricao: descricao.to_owned(),
            categoria: CategoryName::new(categoria)?,
            data_registro: Some(now - Duration::days(days_ago)),
        };
        create_expense(&expense, &mut connection).await?;
    }

    println!("Success!");

    Ok(())
}
