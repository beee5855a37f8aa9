mod backend;
mod commands;
mod config;
mod error;

#[cfg(feature = "browse")]
mod browse;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use menubible_core::{SearchMode, ThemeName};
use tracing_subscriber::EnvFilter;

use crate::backend::{AppContext, Backend};
use crate::commands::ItemArgs;
use crate::config::{CliOverrides, load_config, resolve};

#[derive(Parser)]
#[command(name = "bible")]
#[command(about = "Browse and edit the restaurant menu bible", long_about = None)]
struct Cli {
    /// Backend: firestore or memory
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// JSON file of records for the memory backend
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Firestore project id
    #[arg(long, global = true)]
    project: Option<String>,

    /// Theme: dark, light or seasonal
    #[arg(long, global = true)]
    theme: Option<ThemeName>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[cfg(feature = "browse")]
    /// Open the interactive browser
    Browse {
        /// Start at a route, e.g. /category/Wines
        route: Option<String>,
    },

    /// List items, optionally of one category and type chip
    List {
        #[arg(long)]
        category: Option<String>,

        #[arg(long, requires = "category")]
        chip: Option<String>,
    },

    /// Show one item
    Show {
        id: String,

        /// Hide notes and trivia
        #[arg(long)]
        simple: bool,
    },

    /// Search items by name, category or allergen
    Search {
        term: String,

        #[arg(short, long, default_value = "name")]
        mode: SearchMode,
    },

    /// Print the category tree
    Catalog,

    /// Add an item (admin)
    Add {
        #[arg(long)]
        passcode: String,

        #[command(flatten)]
        item: ItemArgs,
    },

    /// Edit an item (admin)
    Edit {
        id: String,

        #[arg(long)]
        passcode: String,

        #[command(flatten)]
        item: ItemArgs,
    },

    /// Delete an item (admin)
    Delete {
        id: String,

        #[arg(long)]
        passcode: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// The browser owns the terminal, so its logs go to a file.
#[cfg(feature = "browse")]
fn init_file_logging() -> anyhow::Result<()> {
    let Some(path) = config::log_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "browse")]
    let interactive = matches!(cli.command, Command::Browse { .. });
    #[cfg(not(feature = "browse"))]
    let interactive = false;

    if interactive {
        #[cfg(feature = "browse")]
        init_file_logging()?;
    } else {
        init_stderr_logging();
    }

    let settings = resolve(
        load_config(),
        CliOverrides {
            backend: cli.backend,
            seed: cli.seed,
            project_id: cli.project,
            theme: cli.theme,
        },
    );
    let ctx = AppContext::open(settings)?;

    match cli.command {
        #[cfg(feature = "browse")]
        Command::Browse { route } => {
            let route = route.as_deref().map(menubible_core::Route::parse).unwrap_or_default();
            browse::run(ctx, route).await?;
        }
        Command::List { category, chip } => commands::list(&ctx, category, chip).await?,
        Command::Show { id, simple } => commands::show(&ctx, &id, simple).await?,
        Command::Search { term, mode } => commands::search_items(&ctx, &term, mode).await?,
        Command::Catalog => commands::print_catalog(),
        Command::Add { passcode, item } => commands::add(&ctx, &passcode, item).await?,
        Command::Edit { id, passcode, item } => commands::edit(&ctx, &passcode, &id, item).await?,
        Command::Delete { id, passcode, yes } => commands::delete(&ctx, &passcode, &id, yes).await?,
    }

    Ok(())
}
