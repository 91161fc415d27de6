// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spending_lens::{
    import_file, ApiClient, Config, Credentials, DateRange, EmptySelection, FilterCriteria,
    ImportReport, Registration, SortDirection, SortKey, SortSpec, SpendingBasis, TransactionStore,
};

/// Spending Lens - explore where the money goes
#[derive(Parser)]
#[command(name = "spending-lens")]
#[command(about = "Personal finance transaction aggregator", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/spending-lens/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// What counts as spending: expenses-only or all-magnitudes
    #[arg(long, global = true)]
    basis: Option<SpendingBasis>,

    /// What an empty category selection shows: show-all or show-none
    #[arg(long, global = true)]
    empty_selection: Option<EmptySelection>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show balance, spending, trend and count
    Summary {
        /// CSV or JSON transaction file
        file: PathBuf,
    },

    /// Show spending per category, largest first
    Categories {
        file: PathBuf,
    },

    /// List transactions, optionally filtered and sorted
    List {
        file: PathBuf,

        /// Only these categories (repeatable)
        #[arg(short, long)]
        category: Vec<String>,

        /// First day to include (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Sort column
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },

    /// Print the chart series with unusual-spend markers
    Series {
        file: PathBuf,
    },

    /// Log in to the API and summarize the remote transactions
    Fetch {
        /// Username (overrides config); the password comes from SPENDING_LENS_PASSWORD
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Create an account on the API server
    Register {
        /// Username (overrides config); the password comes from SPENDING_LENS_PASSWORD
        #[arg(short, long)]
        username: Option<String>,

        /// Email address for the new account
        #[arg(short, long)]
        email: String,
    },

    /// Check whether the configured credentials open a session
    LoginStatus,

    /// Launch the terminal dashboard
    Ui {
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Category,
    Amount,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => SortKey::Date,
            SortArg::Category => SortKey::Category,
            SortArg::Amount => SortKey::Amount,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins, then --verbose, then info
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(basis) = cli.basis {
        config.policy.spending_basis = basis;
    }
    if let Some(policy) = cli.empty_selection {
        config.policy.empty_selection = policy;
    }

    match cli.command {
        Commands::Summary { ref file } => {
            let store = load_store(&config, file)?;
            print_summary(&store, cli.json)?;
        }
        Commands::Categories { ref file } => {
            let store = load_store(&config, file)?;
            print_categories(&store, cli.json)?;
        }
        Commands::List {
            ref file,
            ref category,
            ref from,
            ref to,
            sort,
            desc,
        } => {
            let mut store = load_store(&config, file)?;

            let mut criteria = FilterCriteria::new().with_categories(category.iter());
            if let (Some(from), Some(to)) = (from, to) {
                criteria = criteria.with_range(DateRange::parse(from, to)?);
            }
            store.set_criteria(criteria);

            let spec = sort.map(|key| {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                SortSpec::new(key.into(), direction)
            });
            print_list(&store, spec, cli.json)?;
        }
        Commands::Series { ref file } => {
            let store = load_store(&config, file)?;
            print_series(&store, cli.json)?;
        }
        Commands::Fetch { ref username } => {
            if let Some(username) = username {
                config.api.username = Some(username.clone());
            }
            let credentials = config.api.credentials();
            if config.api.username.is_some() && credentials.is_none() {
                bail!("SPENDING_LENS_PASSWORD is not set");
            }

            let client = ApiClient::from_config(&config.api)?;
            info!(url = %client.base_url(), "Fetching transactions");
            let report = client
                .load_transactions(credentials.as_ref())
                .await
                .context("Failed to fetch transactions")?;

            let store = store_from_report(&config, report);
            print_summary(&store, cli.json)?;
        }
        Commands::Register {
            ref username,
            ref email,
        } => {
            let username = username
                .clone()
                .or_else(|| config.api.username.clone())
                .context("No username given; pass --username or set SPENDING_LENS_USERNAME")?;
            let password = config
                .api
                .password
                .clone()
                .context("SPENDING_LENS_PASSWORD is not set")?;

            let client = ApiClient::from_config(&config.api)?;
            let registration = Registration::new(&username, email, &password);
            let created = client
                .register(&registration)
                .await
                .context("Failed to register")?;

            if cli.json {
                println!("{}", json!({ "registered": created, "username": username }));
            } else if created {
                println!("Registered {} at {}", username, client.base_url());
            } else {
                println!("Registration of {} was refused by {}", username, client.base_url());
            }
        }
        Commands::LoginStatus => {
            let client = ApiClient::from_config(&config.api)?;
            let logged_in = match config.api.credentials() {
                Some(credentials) => login_and_check(&client, &credentials).await?,
                None => client.login_status().await?,
            };

            if cli.json {
                println!("{}", json!({ "logged_in": logged_in }));
            } else if logged_in {
                println!("Logged in to {}", client.base_url());
            } else {
                println!("Not logged in to {}", client.base_url());
            }
        }
        Commands::Ui { ref file } => {
            let store = load_store(&config, file)?;
            run_ui_mode(store)?;
        }
    }

    Ok(())
}

fn load_store(config: &Config, file: &Path) -> Result<TransactionStore> {
    let report =
        import_file(file).with_context(|| format!("Failed to import {}", file.display()))?;
    Ok(store_from_report(config, report))
}

fn store_from_report(config: &Config, report: ImportReport) -> TransactionStore {
    for row in &report.rejected {
        warn!(line = row.line, reason = %row.reason, "Skipped row");
    }

    let mut store = TransactionStore::new(
        config.policy.spending_basis,
        config.policy.empty_selection,
    );
    store.load(report.transactions);
    store
}

async fn login_and_check(client: &ApiClient, credentials: &Credentials) -> Result<bool> {
    if !client.login(credentials).await? {
        return Ok(false);
    }
    let logged_in = client.login_status().await?;
    client.logout().await?;
    Ok(logged_in)
}

// ============================================================================
// OUTPUT
// ============================================================================

fn print_summary(store: &TransactionStore, as_json: bool) -> Result<()> {
    let summary = store.summary();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Balance:        {:>12.2}", summary.balance);
    println!("Total spending: {:>12.2}", summary.total_spending);
    println!("Trend:          {:>11.2}%", summary.trend);
    println!("Transactions:   {:>12}", summary.transaction_count);
    Ok(())
}

fn print_categories(store: &TransactionStore, as_json: bool) -> Result<()> {
    let aggregates = store.aggregates();
    let ranked = aggregates.ranked_categories();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No spending for basis '{}'", store.basis());
        return Ok(());
    }

    for entry in &ranked {
        println!(
            "{:<20} {:>12.2} {:>6.1}%",
            entry.category,
            entry.amount,
            aggregates.share_of(&entry.category)
        );
    }
    println!("{:<20} {:>12.2}", "TOTAL", aggregates.total_spending);
    Ok(())
}

fn print_list(store: &TransactionStore, spec: Option<SortSpec>, as_json: bool) -> Result<()> {
    let view = store.sorted_view(spec);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    for tx in &view {
        println!(
            "{}  {:<10} {:<16} {:>12.2}  {}",
            tx.date,
            tx.id,
            tx.category,
            tx.amount,
            tx.description.as_deref().unwrap_or("")
        );
    }
    println!("{} of {} transactions", view.len(), store.transactions().len());
    Ok(())
}

fn print_series(store: &TransactionStore, as_json: bool) -> Result<()> {
    let series = store.series();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    for (i, point) in series.points.iter().enumerate() {
        let marker = if point.unusual { "*" } else { " " };
        match series.trend_line.get(i) {
            Some(fitted) => println!(
                "{} {} {:>12.2}  trend {:>10.2}",
                point.date, marker, point.amount, fitted
            ),
            None => println!("{} {} {:>12.2}", point.date, marker, point.amount),
        }
    }
    if let Some(threshold) = series.threshold {
        println!("* above the 90th percentile ({:.2})", threshold);
    }
    println!("Slope: {:.4} per day", series.slope_per_day);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: TransactionStore) -> Result<()> {
    let mut app = ui::App::new(store);
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: TransactionStore) -> Result<()> {
    bail!("TUI mode not available; rebuild with --features tui")
}
