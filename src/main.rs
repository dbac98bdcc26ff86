// spk-pdf: Generate SPK agreements and invoices for KOL campaigns

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use spk_pdf::compose::{compose_invoice, compose_spk};
use spk_pdf::format::{fmt_percent, format_long_date, idr, sanitize_filename};
use spk_pdf::layout::PageGeometry;
use spk_pdf::pdf::save_pdf;
use spk_pdf::{open_store, AppError, ContractForm, DocumentKind, InvoiceTotals, KeyValueStore, NumberingScheme};

// ============================================================================
// Constants
// ============================================================================

/// State file next to the working directory unless overridden
const DEFAULT_STATE_FILE: &str = ".spk-state.json";

const SPK_TITLE: &str = "Surat Perjanjian Kerjasama";
const INVOICE_TITLE: &str = "Invoice";

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate SPK agreements and invoices for KOL campaigns")]
struct Args {
    /// State file holding sequence counters and the last form
    #[arg(long, env = "SPK_STATE", default_value = DEFAULT_STATE_FILE, global = true)]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the cooperation agreement (SPK)
    Spk(GenerateArgs),
    /// Generate the invoice
    Invoice(GenerateArgs),
    /// Print the tax breakdown without issuing a document number
    Amounts {
        /// Form data (JSON), defaults to the last saved form
        #[arg(short, long)]
        form: Option<PathBuf>,
    },
    /// Forget the saved form; counters are kept
    Reset,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Form data (JSON), defaults to the last saved form
    #[arg(short, long)]
    form: Option<PathBuf>,

    /// Issue date (YYYY-MM-DD format), overrides the form
    #[arg(short, long)]
    date: Option<String>,

    /// Document numbering scheme
    #[arg(long, value_enum, default_value_t = NumberingScheme::Sequence)]
    numbering: NumberingScheme,

    /// Output filename (defaults to SPK_{kol}_{campaign}.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();
    let mut store = open_store(Some(args.state.as_path()));

    match args.command {
        Command::Spk(opts) => generate(DocumentKind::Spk, opts, store.as_mut()),
        Command::Invoice(opts) => generate(DocumentKind::Invoice, opts, store.as_mut()),
        Command::Amounts { form } => show_amounts(form.as_deref(), store.as_mut()),
        Command::Reset => {
            ContractForm::clear_snapshot(store.as_mut());
            println!("✓ Saved form cleared");
            Ok(())
        }
    }
}

fn generate(kind: DocumentKind, args: GenerateArgs, store: &mut dyn KeyValueStore) -> Result<(), AppError> {
    let mut form = load_form(args.form.as_deref(), store)?;
    if let Some(date) = parse_date(&args.date)? {
        form.set_issue_date(date);
    }
    if args.form.is_some() {
        form.inherit_numbers(&ContractForm::load_snapshot(store));
    }

    form.validate().map_err(AppError::Validation)?;

    let rates = form.rates();
    let amounts = form.amounts();
    let number = form.assign_number(kind, args.numbering, store);
    form.save_snapshot(store);

    let geometry = PageGeometry::default();
    let (document, title) = match kind {
        DocumentKind::Spk => (compose_spk(&form, &amounts, &number, geometry), SPK_TITLE),
        DocumentKind::Invoice => (compose_invoice(&form, &amounts, &rates, &number, geometry), INVOICE_TITLE),
    };

    let output_file = args.output.unwrap_or_else(|| default_output(kind, &form));
    save_pdf(&document, title, &output_file)?;

    println!("✓ Generated: {}", output_file.display());
    println!("  Number: {}", number);
    println!("  KOL: {}", form.kol_name);
    println!("  Date: {}", format_long_date(&form.spk_issue_date));
    println!("  Pages: {}", document.page_count());

    Ok(())
}

fn show_amounts(path: Option<&Path>, store: &mut dyn KeyValueStore) -> Result<(), AppError> {
    let form = load_form(path, store)?;
    if path.is_some() {
        form.save_snapshot(store);
    }
    let rates = form.rates();
    let amounts = form.amounts();
    let totals = InvoiceTotals::new(form.fee_input, form.reimburse, &amounts);

    println!("Fee input: {} ({})", idr(form.fee_input), if form.gross_up { "gross-up" } else { "non gross-up" });
    println!("  DPP (Gross): {}", idr(amounts.gross));
    println!("  PPh ({}): {}", fmt_percent(rates.withholding), idr(amounts.withholding));
    println!("  PPN ({}): {}", fmt_percent(rates.vat), idr(amounts.vat_amount));
    println!("  Net ke KOL: {}", idr(amounts.net_to_party));
    if form.reimburse > 0.0 {
        println!("  Total + reimburse: {}", idr(totals.total_payable));
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_date(date_str: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
    match date_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::DateError(s.clone())),
        None => Ok(None),
    }
}

/// Read the form file, or fall back to the saved snapshot.
fn load_form(path: Option<&Path>, store: &dyn KeyValueStore) -> Result<ContractForm, AppError> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .map_err(|e| AppError::FormError(format!("{}: {}", p.display(), e)))?;
            let form: ContractForm = serde_json::from_str(&content)
                .map_err(|e| AppError::FormError(format!("Invalid JSON: {}", e)))?;
            Ok(form)
        }
        None => Ok(ContractForm::load_snapshot(store)),
    }
}

fn default_output(kind: DocumentKind, form: &ContractForm) -> PathBuf {
    let label = match kind {
        DocumentKind::Spk => "SPK",
        DocumentKind::Invoice => "INVOICE",
    };
    PathBuf::from(format!(
        "{}_{}_{}.pdf",
        label,
        sanitize_filename(&form.kol_name, "KOL"),
        sanitize_filename(&form.campaign_name, "Campaign")
    ))
}
