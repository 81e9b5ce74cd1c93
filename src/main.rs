use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use quotation::config::{config_dir, init_config_dir, load_config, resolve_output_dir, resolve_path, storage_dir};
use quotation::pdf::{generate_pdf, load_asset};
use quotation::quotation::format_money;
use quotation::store::{get_quotation, load_quotation, put_quotation, save_quotation, DRAFT_QUOTATION_KEY};
use quotation::{
    Config, DirectoryDownload, Download, FileStore, HeaderField, ItemField, Quotation,
    QuotationError, Result,
};

#[derive(Parser)]
#[command(name = "quote")]
#[command(version, about = "Quotation builder with PDF export", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.quotation)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Start a new quotation, discarding the current draft
    New {
        /// Prefill the date with today's date
        #[arg(long)]
        today: bool,
    },

    /// Set a header field (quotationNumber, clientName, clientAddress, date)
    Set {
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Add, edit or remove line items
    Item {
        #[command(subcommand)]
        action: ItemCommand,
    },

    /// Set the flat tax amount
    Tax {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show the current draft
    Show,

    /// Save the current draft as the saved quotation
    Save,

    /// Replace the current draft with the saved quotation
    Restore,

    /// Render the current draft as a PDF
    Pdf {
        /// Custom output file path (default: output_dir/invoice.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ItemCommand {
    /// Append an empty line item
    Add,

    /// Set a line item field (description, quantity, unitPrice)
    Set {
        /// Item number as shown by 'show' (starting at 1)
        index: usize,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Remove a line item
    Remove {
        /// Item number as shown by 'show' (starting at 1)
        index: usize,
    },
}

/// Honour `RUST_LOG`, stay quiet otherwise so command output is clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    debug!(config_dir = %cfg_dir.display(), "using config directory");

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::New { today } => cmd_new(&cfg_dir, today),
        Commands::Set { field, value } => {
            let field: HeaderField = field.parse()?;
            edit_draft(&cfg_dir, |q| Ok(q.set_field(field, value)))
        }
        Commands::Item { action } => match action {
            ItemCommand::Add => edit_draft(&cfg_dir, |q| Ok(q.add_item())),
            ItemCommand::Set {
                index,
                field,
                value,
            } => {
                let field: ItemField = field.parse()?;
                edit_draft(&cfg_dir, |q| {
                    let index = item_index(q, index)?;
                    q.set_item_field(index, field, value)
                })
            }
            ItemCommand::Remove { index } => edit_draft(&cfg_dir, |q| {
                let index = item_index(q, index)?;
                q.remove_item(index)
            }),
        },
        Commands::Tax { value } => edit_draft(&cfg_dir, |q| Ok(q.set_tax(&value))),
        Commands::Show => cmd_show(&cfg_dir),
        Commands::Save => cmd_save(&cfg_dir),
        Commands::Restore => cmd_restore(&cfg_dir),
        Commands::Pdf { output } => cmd_pdf(&cfg_dir, output),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    init_config_dir(cfg_dir)?;

    println!("Initialized quotation config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit the document title and currency:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Fill in the quotation:                 quote set clientName \"Acme Inc.\"");
    println!("  3. Add line items:                        quote item set 1 quantity 2");
    println!();
    println!("Then render it:");
    println!("  quote pdf");

    Ok(())
}

fn open_store(cfg_dir: &Path) -> FileStore {
    FileStore::new(storage_dir(cfg_dir))
}

/// Current draft, or a fresh quotation when none has been started
fn load_draft(store: &FileStore) -> Result<Quotation> {
    Ok(get_quotation(store, DRAFT_QUOTATION_KEY)?.unwrap_or_default())
}

/// Apply one model operation to the draft, persist it and show the result
fn edit_draft<F>(cfg_dir: &Path, op: F) -> Result<()>
where
    F: FnOnce(&Quotation) -> Result<Quotation>,
{
    let config = load_config(cfg_dir)?;
    let mut store = open_store(cfg_dir);

    let draft = load_draft(&store)?;
    let next = op(&draft)?;
    put_quotation(&mut store, DRAFT_QUOTATION_KEY, &next)?;

    print_quotation(&next, &config);
    Ok(())
}

/// Translate a 1-based item number from the command line
fn item_index(quotation: &Quotation, number: usize) -> Result<usize> {
    let len = quotation.items().len();
    if number == 0 || number > len {
        return Err(QuotationError::ItemIndexOutOfRange { index: number, len });
    }
    Ok(number - 1)
}

/// Start over with a blank quotation
fn cmd_new(cfg_dir: &Path, today: bool) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let mut store = open_store(cfg_dir);

    let mut quotation = Quotation::new();
    if today {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        quotation = quotation.set_field(HeaderField::Date, date);
    }
    put_quotation(&mut store, DRAFT_QUOTATION_KEY, &quotation)?;

    println!("Started a new quotation");
    print_quotation(&quotation, &config);
    Ok(())
}

/// Show the current draft
fn cmd_show(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let store = open_store(cfg_dir);

    print_quotation(&load_draft(&store)?, &config);
    Ok(())
}

/// Save the current draft under the savedQuotation key
fn cmd_save(cfg_dir: &Path) -> Result<()> {
    load_config(cfg_dir)?;
    let mut store = open_store(cfg_dir);

    let draft = load_draft(&store)?;
    save_quotation(&mut store, &draft)?;

    println!("Quotation saved successfully!");
    Ok(())
}

/// Copy the saved quotation back into the draft
fn cmd_restore(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let mut store = open_store(cfg_dir);

    let saved = load_quotation(&store)?.ok_or(QuotationError::NoSavedQuotation)?;
    put_quotation(&mut store, DRAFT_QUOTATION_KEY, &saved)?;

    println!("Restored saved quotation");
    print_quotation(&saved, &config);
    Ok(())
}

/// Render the draft and hand the PDF to the download directory
fn cmd_pdf(cfg_dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let store = open_store(cfg_dir);
    let draft = load_draft(&store)?;

    // The logo is resolved up front so a missing file aborts before rendering
    let logo_path = config.pdf.logo.as_deref().map(|p| resolve_path(p, cfg_dir));
    let logo = load_asset(logo_path.as_deref())?;

    let bytes = generate_pdf(&draft, &logo, &config.render_settings())?;

    let (dir, filename) = match output {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let filename = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| config.pdf.filename.clone());
            (dir, filename)
        }
        None => (
            resolve_output_dir(&config.pdf.output_dir, cfg_dir),
            config.pdf.filename.clone(),
        ),
    };

    let mut download = DirectoryDownload::new(dir);
    let saved_to = download.deliver(&filename, &bytes)?;

    println!("Generated {}", filename);
    println!(
        "  Total:  {}",
        format_money(&config.quotation.currency_symbol, draft.total())
    );
    println!("  Saved:  {}", saved_to.display());

    Ok(())
}

// Table row struct for tabled
#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "QUANTITY")]
    quantity: String,
    #[tabled(rename = "UNIT PRICE")]
    unit_price: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

fn print_quotation(quotation: &Quotation, config: &Config) {
    let symbol = config.quotation.currency_symbol.as_str();

    println!("Quotation {}", quotation.quotation_number());
    println!("{}", "-".repeat(50));
    println!("Date:           {}", quotation.date());
    println!("Client Name:    {}", quotation.client_name());
    println!("Client Address: {}", quotation.client_address());
    println!();

    if quotation.items().is_empty() {
        println!("No items. Add one with 'quote item add'.");
    } else {
        let rows: Vec<ItemRow> = quotation
            .items()
            .iter()
            .enumerate()
            .map(|(idx, item)| ItemRow {
                index: idx + 1,
                description: item.description().to_string(),
                quantity: item.quantity().to_string(),
                unit_price: item.unit_price().to_string(),
                amount: format_money(symbol, item.amount()),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    println!();
    println!("Subtotal: {}", format_money(symbol, quotation.subtotal()));
    println!("Tax:      {}", format_money(symbol, quotation.tax()));
    println!("Total:    {}", format_money(symbol, quotation.total()));
}
