use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use charity_desk::config::{self, Config};
use charity_desk::currency::Currency;
use charity_desk::orphans::{list_orphans, OrphanQuery};
use charity_desk::output::{self, should_use_colors};
use charity_desk::records::{self, SnapshotPaths};
use charity_desk::roster::{build_roster, Pagination, RosterQuery, SortField, SortOrder};
use charity_desk::stats::{rank_donors, recent_aids, AidStats, DonationStats};
use charity_desk::{dates, matrix, scoring};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

const TOP_DONORS: usize = 5;
const RECENT_AIDS: usize = 50;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List beneficiaries ranked by priority score
    Roster {
        /// Match name, national id or phone (accents and case ignored)
        #[arg(short, long)]
        search: Option<String>,

        /// Only beneficiaries living in this city
        #[arg(long)]
        city: Option<String>,

        #[arg(long, value_enum, default_value_t = SortField::Priority)]
        sort: SortField,

        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,

        /// Page to show (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Show every row instead of one page
        #[arg(long)]
        all: bool,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,

        /// Write the full listing to a CSV file (defaults to roster_<date>.csv)
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        export: Option<String>,
    },
    /// List orphans with name, city, schooling and age filters
    Orphans {
        /// Match the orphan's name (accents and case ignored)
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        city: Option<String>,

        /// Schooling level, e.g. "primaire"
        #[arg(long)]
        schooling: Option<String>,

        /// Minimum age in years (inclusive)
        #[arg(long)]
        age_min: Option<i32>,

        /// Maximum age in years (inclusive)
        #[arg(long)]
        age_max: Option<i32>,

        /// Page to show (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Show every row instead of one page
        #[arg(long)]
        all: bool,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Monthly membership dues per donor for one year
    Matrix {
        /// Year to report (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,

        /// Write the matrix to a CSV file (defaults to matrix_<year>_<date>.csv)
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        export: Option<String>,
    },
    /// Donation totals, active donors and top donors
    Stats {
        /// Reporting currency (DH or EUR)
        #[arg(long)]
        currency: Option<Currency>,
    },
    /// Aid totals, active recipients and recent attributions
    Aid {
        /// Reporting currency (DH or EUR)
        #[arg(long)]
        currency: Option<Currency>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "charity-desk")]
#[command(about = "Beneficiary prioritization and donation reporting for a charity", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/charity-desk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory holding the table snapshots (beneficiaries.json, dependents.json, ...)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Initialize tracing from CHARITY_DESK_LOG, defaulting to "warn".
/// `--verbose` forces debug level.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CHARITY_DESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate priority tiers at startup
    let priority = config.priority.clone().unwrap_or_default();
    if let Err(errors) = scoring::validate_priority(&priority) {
        eprintln!("Priority config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let paths = config::snapshot_paths(&config, cli.data_dir.as_deref());
    debug!(?paths, "resolved snapshot locations");

    let use_colors = should_use_colors();
    let today = dates::today();

    let result = match cli.command {
        Commands::Roster {
            search,
            city,
            sort,
            order,
            page,
            all,
            tsv,
            export,
        } => {
            let query = RosterQuery {
                search,
                city,
                sort_by: sort,
                order,
            };
            let view = RosterView {
                page,
                all,
                tsv,
                export,
                verbose: cli.verbose,
                use_colors,
            };
            run_roster(&paths, &config, &priority, &query, &view, today)
        }
        Commands::Orphans {
            search,
            city,
            schooling,
            age_min,
            age_max,
            page,
            all,
            tsv,
        } => {
            let query = OrphanQuery {
                search,
                city,
                schooling,
                age_min,
                age_max,
            };
            run_orphans(&paths, &config, &query, page, all, tsv, use_colors, today)
        }
        Commands::Matrix { year, tsv, export } => {
            let year = year.unwrap_or_else(|| today.year());
            run_matrix(&paths, year, tsv, export, use_colors, today)
        }
        Commands::Stats { currency } => {
            let currency = currency.unwrap_or_else(|| config.display.currency());
            run_stats(&paths, currency, use_colors, today)
        }
        Commands::Aid { currency } => {
            let currency = currency.unwrap_or_else(|| config.display.currency());
            run_aid(&paths, currency, use_colors, today)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_DATA);
    }

    std::process::exit(EXIT_SUCCESS);
}

struct RosterView {
    page: usize,
    all: bool,
    tsv: bool,
    export: Option<String>,
    verbose: bool,
    use_colors: bool,
}

/// An empty `--export` value means "use the dated default name"
fn export_path(export: &str, stem: &str, today: chrono::NaiveDate) -> PathBuf {
    if export.is_empty() {
        output::default_export_name(stem, today)
    } else {
        PathBuf::from(export)
    }
}

fn run_roster(
    paths: &SnapshotPaths,
    config: &Config,
    priority: &scoring::PriorityConfig,
    query: &RosterQuery,
    view: &RosterView,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let beneficiaries = records::load_beneficiaries(&paths.beneficiaries)?;
    let dependents = records::load_dependents(&paths.dependents)?;
    let entries = build_roster(&beneficiaries, &dependents, query, priority, today);
    info!(
        matched = entries.len(),
        total = beneficiaries.len(),
        "roster built"
    );

    if let Some(export) = &view.export {
        let path = export_path(export, "roster", today);
        output::save_export(&path, |file| output::write_roster_csv(file, &entries))?;
        eprintln!("Exported {} rows to {}", entries.len(), path.display());
        return Ok(());
    }

    if view.tsv {
        let tsv = output::format_roster_tsv(&entries);
        if !tsv.is_empty() {
            println!("{}", tsv);
        }
        return Ok(());
    }

    let mut pagination = Pagination::new(entries.len(), config.display.page_size());
    let shown = if view.all {
        &entries[..]
    } else {
        if !pagination.go_to_page(view.page) && !entries.is_empty() {
            eprintln!(
                "Page {} out of range (1-{}), showing page 1",
                view.page,
                pagination.total_pages()
            );
        }
        pagination.page_of(&entries)
    };
    let offset = if view.all { 0 } else { pagination.offset() };

    println!(
        "{}",
        output::format_roster_table(shown, offset, view.use_colors)
    );

    if view.verbose {
        for entry in shown {
            println!();
            println!("{}", output::format_breakdown(entry, view.use_colors));
        }
    }

    if !view.all && pagination.total_pages() > 1 {
        println!();
        println!(
            "Page {}/{} ({} beneficiaries)",
            pagination.current_page,
            pagination.total_pages(),
            entries.len()
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_orphans(
    paths: &SnapshotPaths,
    config: &Config,
    query: &OrphanQuery,
    page: usize,
    all: bool,
    tsv: bool,
    use_colors: bool,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let dependents = records::load_dependents(&paths.dependents)?;
    let beneficiaries = records::load_beneficiaries(&paths.beneficiaries)?;
    let entries = list_orphans(&dependents, &beneficiaries, query, today);
    info!(matched = entries.len(), total = dependents.len(), "orphan listing built");

    if tsv {
        let tsv = output::format_orphan_tsv(&entries);
        if !tsv.is_empty() {
            println!("{}", tsv);
        }
        return Ok(());
    }

    let mut pagination = Pagination::new(entries.len(), config.display.page_size());
    if all {
        println!("{}", output::format_orphan_table(&entries, 0, use_colors));
        return Ok(());
    }

    if !pagination.go_to_page(page) && !entries.is_empty() {
        eprintln!(
            "Page {} out of range (1-{}), showing page 1",
            page,
            pagination.total_pages()
        );
    }
    println!(
        "{}",
        output::format_orphan_table(pagination.page_of(&entries), pagination.offset(), use_colors)
    );
    if pagination.total_pages() > 1 {
        println!();
        println!(
            "Page {}/{} ({} orphans)",
            pagination.current_page,
            pagination.total_pages(),
            entries.len()
        );
    }

    Ok(())
}

fn run_matrix(
    paths: &SnapshotPaths,
    year: i32,
    tsv: bool,
    export: Option<String>,
    use_colors: bool,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let transactions = records::load_transactions(&paths.transactions)?;
    let outcome = matrix::build_matrix(&transactions, year);

    if let (Some(export), false) = (&export, outcome.is_empty()) {
        let path = export_path(export, &format!("matrix_{}", year), today);
        output::save_export(&path, |file| output::write_matrix_csv(file, &outcome))?;
        eprintln!(
            "Exported {} donors to {}",
            outcome.rows().len(),
            path.display()
        );
        return Ok(());
    }

    if tsv && !outcome.is_empty() {
        println!("{}", output::format_matrix_tsv(&outcome));
    } else {
        println!("{}", output::format_matrix_table(&outcome, use_colors));
    }

    Ok(())
}

fn run_stats(
    paths: &SnapshotPaths,
    currency: Currency,
    use_colors: bool,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let transactions = records::load_transactions(&paths.transactions)?;
    let stats = DonationStats::compute(&transactions, today, currency);
    let ranked = rank_donors(&transactions, currency);
    let top = &ranked[..ranked.len().min(TOP_DONORS)];

    println!("{}", output::format_stats(&stats, top, use_colors));
    Ok(())
}

fn run_aid(
    paths: &SnapshotPaths,
    currency: Currency,
    use_colors: bool,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let aids = records::load_aids(&paths.aids)?;
    let programs = records::load_programs(&paths.programs)?;
    let beneficiaries = records::load_beneficiaries(&paths.beneficiaries)?;
    let dependents = records::load_dependents(&paths.dependents)?;

    let stats = AidStats::compute(&aids, today, currency);
    let recent = recent_aids(&aids, &programs, &beneficiaries, &dependents, RECENT_AIDS);

    println!("{}", output::format_aid_stats(&stats, &recent, use_colors));
    Ok(())
}
