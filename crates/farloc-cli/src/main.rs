mod commands;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{debug, error, info};
use tracing_appender::rolling;
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "farloc", version, about = "Persian localization key migration toolkit")]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Translations directory (overrides farloc.toml)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve extracted text matches into translation keys
    Resolve {
        /// JSON file with the extracted matches
        #[arg(long)]
        matches: PathBuf,
        /// Locale to resolve against (default: source_lang from config)
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        out_json: Option<PathBuf>,
        /// Write resolved entries into the source locale store
        #[arg(long, default_value_t = false)]
        apply: bool,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value_t = false)]
        no_backup: bool,
        /// Length ceiling for generated keys
        #[arg(long)]
        max_length: Option<usize>,
        /// Global key prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Ignore context hints from the matches
        #[arg(long, default_value_t = false)]
        no_context: bool,
    },

    /// Report values stored under more than one key
    ScanDups {
        #[arg(long)]
        lang: Option<String>,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Apply one explicit decision to one duplicate group
    Consolidate {
        #[arg(long)]
        lang: String,
        /// The duplicated value, as stored
        #[arg(long)]
        value: String,
        /// Keep this key, delete the other keys in the group
        #[arg(long, conflicts_with_all = ["rename_to", "keep_separate"])]
        keep: Option<String>,
        /// Move the value to a new key, delete all old keys
        #[arg(long, conflicts_with_all = ["keep", "keep_separate"])]
        rename_to: Option<String>,
        /// Record the group as intentionally separate
        #[arg(long, default_value_t = false, conflicts_with_all = ["keep", "rename_to"])]
        keep_separate: bool,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value_t = false)]
        no_backup: bool,
    },

    /// Check locale files for structural problems
    Check {
        #[arg(long)]
        lang: Option<String>,
    },

    /// Manage store snapshots
    Backup {
        #[command(subcommand)]
        cmd: BackupCommands,
    },
}

#[derive(Subcommand, Debug)]
enum BackupCommands {
    /// Snapshot the current locale files
    Create {
        #[arg(long, default_value = "manual backup")]
        description: String,
    },
    /// List snapshots, newest first
    List,
    /// Overwrite the store from a snapshot
    Restore {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Keep only the N newest snapshots
    Cleanup {
        #[arg(long, default_value_t = 5)]
        keep: usize,
    },
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily("logs", "farloc.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn run(cli: Cli, use_color: bool) -> Result<()> {
    let cmd_name = format!("{:?}", cli.cmd);
    info!("starting command: {}", cmd_name);
    debug!(dir = ?cli.dir);

    let dir = commands::resolve_store_dir(cli.dir.clone());
    let result = match cli.cmd {
        Commands::Resolve {
            matches,
            lang,
            out_json,
            apply,
            dry_run,
            no_backup,
            max_length,
            prefix,
            no_context,
        } => commands::resolve::run_resolve(commands::resolve::ResolveArgs {
            dir,
            matches,
            lang,
            out_json,
            apply,
            dry_run,
            no_backup,
            max_length,
            prefix,
            no_context,
            use_color,
        }),
        Commands::ScanDups { lang, format } => {
            commands::scan_dups::run_scan_dups(&dir, lang.as_deref(), &format, use_color)
        }
        Commands::Consolidate {
            lang,
            value,
            keep,
            rename_to,
            keep_separate,
            dry_run,
            no_backup,
        } => commands::consolidate::run_consolidate(commands::consolidate::ConsolidateArgs {
            dir,
            lang,
            value,
            keep,
            rename_to,
            keep_separate,
            dry_run,
            no_backup,
            use_color,
        }),
        Commands::Check { lang } => commands::check::run_check(&dir, lang.as_deref(), use_color),
        Commands::Backup { cmd } => match cmd {
            BackupCommands::Create { description } => {
                commands::backup::run_create(&dir, &description)
            }
            BackupCommands::List => commands::backup::run_list(&dir, use_color),
            BackupCommands::Restore { id } => commands::backup::run_restore(&dir, &id),
            BackupCommands::Delete { id } => commands::backup::run_delete(&dir, &id),
            BackupCommands::Cleanup { keep } => commands::backup::run_cleanup(&dir, keep),
        },
    };

    match &result {
        Ok(_) => info!("finished command: {}", cmd_name),
        Err(e) => error!("command {} failed: {:?}", cmd_name, e),
    }
    result
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    run(cli, use_color)
}
