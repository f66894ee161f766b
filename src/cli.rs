//! Command-line surface for the ledger.
//!
//! Every command authenticates, loads the reference data and opens the configured ledger
//! store before doing its work, so a bad password or an unreachable reference source stops
//! the command before anything is read or written.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sales_ledger::{
    config::{load_config, settings::DEFAULT_CONFIG_PATH},
    core::{
        ConfiguredAuthenticator, EntryDraft, FilteredView, ItemSelection, QueryFilter,
        ReceiptFields, Session, export::write_csv, format_receipt,
    },
    errors::Result,
    models::{DATE_FORMAT, EntryStatus, ExpenseKind, LedgerEntry},
    reference::AnyReferenceSource,
    store::{AnyLedgerStore, LedgerStore},
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Parser)]
#[command(name = "sales-ledger")]
#[command(about = "Record sales and expenses, query the ledger and print receipts")]
#[command(version)]
pub struct Cli {
    /// Settings file
    #[arg(long, env = "LEDGER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Operator username
    #[arg(long, env = "LEDGER_USERNAME")]
    username: String,

    /// Operator password
    #[arg(long, env = "LEDGER_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a sale priced from the price list
    Sale {
        #[command(flatten)]
        common: EntryArgs,

        /// Product name
        #[arg(long)]
        product: String,

        /// Product variant
        #[arg(long)]
        kind: Option<String>,

        /// Units sold
        #[arg(long, default_value = "1")]
        quantity: u32,
    },

    /// Record an expense
    Expense {
        #[command(flatten)]
        common: EntryArgs,

        /// Expense category (Transporte, Alimentação, Hospedagem, Material, Outros)
        #[arg(long)]
        kind: Option<ExpenseKind>,

        /// Amount spent
        #[arg(long)]
        amount: Decimal,
    },

    /// Filter the ledger and show totals
    Query {
        /// First purchase date included
        #[arg(long, value_parser = parse_date)]
        from: NaiveDate,

        /// Last purchase date included
        #[arg(long, value_parser = parse_date)]
        to: NaiveDate,

        /// Restrict to these areas (repeatable)
        #[arg(long = "area")]
        areas: Vec<String>,

        /// Restrict to these congregations (repeatable)
        #[arg(long = "congregation")]
        congregations: Vec<String>,

        /// Restrict to these people (repeatable)
        #[arg(long = "person")]
        people: Vec<String>,

        /// Restrict to one payment status
        #[arg(long)]
        status: Option<EntryStatus>,

        /// Product name contains this text
        #[arg(long)]
        product: Option<String>,

        /// Write the matching entries to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Print the receipt for a ledger row
    Receipt {
        /// 1-based ledger row number
        #[arg(long)]
        row: usize,

        /// Write the receipt to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the choices the reference data offers
    Options {
        /// Show the kinds of this product
        #[arg(long)]
        product: Option<String>,

        /// Show the congregations of this area
        #[arg(long)]
        area: Option<String>,
    },
}

/// Form fields shared by sales and expenses.
#[derive(Args)]
struct EntryArgs {
    /// Purchase date (dd/mm/yyyy or yyyy-mm-dd)
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,

    #[arg(long)]
    area: String,

    #[arg(long)]
    congregation: String,

    #[arg(long)]
    person: String,

    /// Paid or Pending
    #[arg(long, default_value = "Pending")]
    status: EntryStatus,

    /// Required for paid entries
    #[arg(long, value_parser = parse_date)]
    payment_date: Option<NaiveDate>,

    /// Also write the receipt of the new entry to this file
    #[arg(long)]
    receipt: Option<PathBuf>,
}

impl EntryArgs {
    fn into_draft(self, item: ItemSelection) -> (EntryDraft, Option<PathBuf>) {
        let draft = EntryDraft {
            purchase_date: self.date,
            area: self.area,
            congregation: self.congregation,
            person: self.person,
            item,
            status: self.status,
            payment_date: self.payment_date,
        };
        (draft, self.receipt)
    }
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| format!("'{raw}' is not a date (use dd/mm/yyyy)"))
}

/// Runs one command against the configured ledger.
///
/// # Errors
/// Any configuration, authentication, reference, validation or store error.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let authenticator = ConfiguredAuthenticator::new(config.operators.clone());
    let source = AnyReferenceSource::from(&config.reference);
    let store = AnyLedgerStore::open(&config.ledger).await?;

    let session = Session::login(&authenticator, &cli.username, &cli.password, &source, store)?;

    match cli.command {
        Commands::Sale {
            common,
            product,
            kind,
            quantity,
        } => {
            let item = ItemSelection::Sale {
                product,
                kind,
                quantity,
            };
            let (draft, receipt) = common.into_draft(item);
            record(&session, &draft, receipt.as_deref()).await
        }
        Commands::Expense {
            common,
            kind,
            amount,
        } => {
            let (draft, receipt) = common.into_draft(ItemSelection::Expense { kind, amount });
            record(&session, &draft, receipt.as_deref()).await
        }
        Commands::Query {
            from,
            to,
            areas,
            congregations,
            people,
            status,
            product,
            export,
        } => {
            let filter = QueryFilter::new(from, to)
                .with_areas(areas)
                .with_congregations(congregations)
                .with_people(people)
                .with_status(status)
                .with_product_containing(product.as_deref());
            let view = session.run_query(&filter).await?;
            print_view(&view);

            if let Some(path) = export {
                write_csv(&view.entries, fs::File::create(&path)?)?;
                info!("Exported {} entries to {}", view.entries.len(), path.display());
            }
            Ok(())
        }
        Commands::Receipt { row, output } => {
            let text = session.receipt_for_row(row).await?;
            emit_receipt(&text, output.as_deref())
        }
        Commands::Options { product, area } => {
            print_options(&session, product.as_deref(), area.as_deref());
            Ok(())
        }
    }
}

async fn record<S: LedgerStore>(
    session: &Session<S>,
    draft: &EntryDraft,
    receipt: Option<&Path>,
) -> Result<()> {
    let entry = session.record(draft).await?;
    let text = format_receipt(&ReceiptFields::from_entry(&entry));
    emit_receipt(&text, receipt)
}

fn emit_receipt(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            println!("Receipt written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn print_entry(row: usize, entry: &LedgerEntry) {
    println!(
        "{row:>4}  {:<10}  {:<10} {:<12} {:<12} {:<14} {:<12} {:>4} x {:>9.2} = {:>10.2}  {}",
        entry.purchase_date.to_string(),
        entry.area,
        entry.congregation,
        entry.person,
        entry.product,
        entry.kind,
        entry.quantity,
        entry.unit_price,
        entry.total,
        entry.status,
    );
}

fn print_view(view: &FilteredView) {
    for (index, entry) in view.entries.iter().enumerate() {
        print_entry(index + 1, entry);
    }
    println!(
        "{} of {} entries, total {:.2}",
        view.entries.len(),
        view.rows_scanned,
        view.total
    );
    if view.unreadable_dates > 0 {
        println!(
            "{} entries skipped: purchase date unreadable",
            view.unreadable_dates
        );
    }

    println!("\nMonthly totals (whole ledger)");
    for month in &view.monthly {
        println!("  {}-{:02}  {:>12.2}", month.year, month.month, month.total);
    }
}

fn print_options<S>(session: &Session<S>, product: Option<&str>, area: Option<&str>)
where
    S: LedgerStore,
{
    let reference = session.reference();

    match product {
        Some(product) => println!(
            "Kinds of {product}: {}",
            reference.price_list.kinds_for(product).join(", ")
        ),
        None => println!("Products: {}", reference.price_list.items().join(", ")),
    }
    match area {
        Some(area) => println!(
            "Congregations in {area}: {}",
            reference.areas.congregations_in(area).join(", ")
        ),
        None => println!("Areas: {}", reference.areas.areas().join(", ")),
    }

    let people: Vec<String> = reference
        .roster
        .names()
        .into_iter()
        .map(|name| {
            let role = reference.roster.role_of(name).unwrap_or_default();
            format!("{name} ({role})")
        })
        .collect();
    println!("People: {}", people.join(", "));

    let expense_kinds: Vec<&str> = ExpenseKind::ALL.into_iter().map(ExpenseKind::as_str).collect();
    println!("Expense kinds: {}", expense_kinds.join(", "));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_date_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("05/03/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-03-05").unwrap(), expected);
        assert!(parse_date("March 5").is_err());
    }

    #[test]
    fn test_cli_parses_sale() {
        let cli = Cli::try_parse_from([
            "sales-ledger",
            "--username",
            "ana",
            "--password",
            "pw",
            "sale",
            "--date",
            "15/01/2024",
            "--area",
            "North",
            "--congregation",
            "Central",
            "--person",
            "Ana",
            "--product",
            "Bible",
            "--kind",
            "Large",
            "--quantity",
            "2",
            "--status",
            "Pago",
            "--payment-date",
            "2024-01-20",
        ])
        .unwrap();

        let Commands::Sale {
            common, quantity, ..
        } = cli.command
        else {
            panic!("expected a sale command");
        };
        assert_eq!(quantity, 2);
        assert_eq!(common.status, EntryStatus::Paid);
        assert_eq!(common.payment_date, NaiveDate::from_ymd_opt(2024, 1, 20));
    }

    #[test]
    fn test_cli_rejects_unknown_expense_kind() {
        let result = Cli::try_parse_from([
            "sales-ledger",
            "--username",
            "ana",
            "--password",
            "pw",
            "expense",
            "--date",
            "15/01/2024",
            "--area",
            "North",
            "--congregation",
            "Central",
            "--person",
            "Ana",
            "--kind",
            "Gasolina",
            "--amount",
            "10",
        ]);
        assert!(result.is_err());
    }
}
