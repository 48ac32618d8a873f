//! `graphconn` CLI - Command-line interface for the connection alias registry
//!
//! Provides commands for listing, adding, and removing connection aliases,
//! and for inspecting the resolved configuration.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use graphconn_core::config::{AppSettings, ConfigManager};
use graphconn_core::logging::DEFAULT_LOG_LEVEL;
use graphconn_core::{
    Alias, AliasRegistry, FnListener, IdleProbe, LoadOutcome, LoadReport, RegistryError,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// `graphconn` command-line interface for managing connection aliases
#[derive(Parser)]
#[command(name = "graphconn-cli")]
#[command(author, version, about = "graphconn command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List all aliases
    #[command(about = "List all connection aliases")]
    List {
        /// Output format for the alias list
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Add a new alias
    #[command(about = "Add a connection alias")]
    Add {
        /// Name for the new alias
        #[arg(short, long)]
        name: String,

        /// Database URI (bolt://host:7687, http://..., or a local store path)
        #[arg(short, long)]
        uri: String,

        /// Username for authentication
        #[arg(short = 'U', long)]
        user: Option<String>,

        /// Password for authentication
        #[arg(short, long)]
        password: Option<String>,

        /// Allow store format upgrades
        #[arg(long)]
        allow_upgrade: bool,

        /// Open the database read-only
        #[arg(long)]
        read_only: bool,
    },

    /// Remove an alias by name
    #[command(about = "Remove a connection alias")]
    Remove {
        /// Alias name
        name: String,

        /// URI of the alias, required when several aliases share the name
        #[arg(short, long)]
        uri: Option<String>,
    },

    /// Show resolved configuration paths and settings
    #[command(about = "Show the resolved configuration")]
    ShowConfig,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    #[default]
    Table,
    /// Output as JSON
    Json,
}

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other errors
    pub const GENERAL_ERROR: i32 = 1;
    /// The alias is in use by the running connection
    pub const ALIAS_IN_USE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// Several aliases share the requested name
    #[error("{count} aliases are named '{name}'; use --uri to pick one")]
    Ambiguous {
        /// The requested name
        name: String,
        /// How many aliases carry it
        count: usize,
    },

    /// Invalid alias definition
    #[error("Invalid alias: {0}")]
    Invalid(String),

    /// The alias belongs to the running connection
    #[error("Delete connection: {0}")]
    InUse(String),
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InUse(_) => exit_codes::ALIAS_IN_USE,
            Self::Config(_)
            | Self::AliasNotFound(_)
            | Self::Ambiguous { .. }
            | Self::Invalid(_) => exit_codes::GENERAL_ERROR,
        }
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AliasInUse { .. } => Self::InUse(err.to_string()),
            RegistryError::Codec(_) => Self::Config(err.to_string()),
            RegistryError::Config(e) => Self::Config(e.to_string()),
        }
    }
}

/// JSON view of an alias; the password is never printed
#[derive(Debug, Serialize)]
pub struct AliasOutput {
    /// Alias name
    pub name: String,
    /// Database URI
    pub uri: String,
    /// Username, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Whether a password is stored
    pub has_password: bool,
    /// Whether store upgrades are allowed
    pub allow_upgrade: bool,
    /// Whether the database is opened read-only
    pub read_only: bool,
}

impl From<&Alias> for AliasOutput {
    fn from(alias: &Alias) -> Self {
        Self {
            name: alias.name.clone(),
            uri: alias.uri.clone(),
            user_name: alias.user_name.clone(),
            has_password: alias.password.is_some(),
            allow_upgrade: alias.allow_upgrade,
            read_only: alias.read_only,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_manager = config_manager(cli.config.as_deref())?;
    let settings = config_manager.load_settings();
    init_logging(settings.as_ref().map_or(DEFAULT_LOG_LEVEL, |s| s.logging.level.as_str()));
    let settings =
        settings.map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))?;

    match cli.command {
        Commands::List { format } => cmd_list(&config_manager, &settings, format),
        Commands::Add {
            name,
            uri,
            user,
            password,
            allow_upgrade,
            read_only,
        } => {
            let mut alias = Alias::new(name, uri)
                .with_allow_upgrade(allow_upgrade)
                .with_read_only(read_only);
            alias.user_name = user;
            alias.password = password;
            cmd_add(&config_manager, &settings, alias)
        }
        Commands::Remove { name, uri } => {
            cmd_remove(&config_manager, &settings, &name, uri.as_deref())
        }
        Commands::ShowConfig => cmd_show_config(&config_manager, &settings),
    }
}

/// Initializes logging; `RUST_LOG` takes precedence over the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn config_manager(config_dir: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_dir {
        Some(dir) => Ok(ConfigManager::with_config_dir(dir.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Creates the registry and loads the alias file
fn open_registry(
    config_manager: &ConfigManager,
    settings: &AppSettings,
) -> Result<(AliasRegistry, LoadReport), CliError> {
    let mut registry = AliasRegistry::from_settings(config_manager, settings)
        .map_err(|e| CliError::Config(format!("Failed to resolve alias file: {e}")))?;

    let report = registry.load();
    if !report.skipped.is_empty() {
        eprintln!(
            "Warning: skipped {} invalid alias entries in {}",
            report.skipped.len(),
            registry.store().path().display()
        );
    }

    registry.register_listener(Arc::new(FnListener::new(|| {
        debug!("Alias set changed");
    })));

    Ok((registry, report))
}

/// Refuses to rewrite an alias file whose contents were not fully loaded
fn ensure_writable(registry: &AliasRegistry, report: &LoadReport) -> Result<(), CliError> {
    let path = registry.store().path().display();
    match report.outcome {
        LoadOutcome::Unreadable => {
            return Err(CliError::Config(format!(
                "Alias file {path} could not be read; not overwriting it"
            )));
        }
        LoadOutcome::Rejected => {
            return Err(CliError::Config(format!(
                "Alias file {path} is not a valid alias document; not overwriting it"
            )));
        }
        LoadOutcome::Missing | LoadOutcome::Loaded => {}
    }

    if !report.skipped.is_empty() {
        return Err(CliError::Config(format!(
            "Alias file {path} has {} invalid entries that would be lost; fix them first",
            report.skipped.len()
        )));
    }

    Ok(())
}

/// List aliases command handler
fn cmd_list(
    config_manager: &ConfigManager,
    settings: &AppSettings,
    format: OutputFormat,
) -> Result<(), CliError> {
    let (registry, _) = open_registry(config_manager, settings)?;
    let aliases = registry.sorted_aliases();

    match format {
        OutputFormat::Table => println!("{}", format_table(&aliases)),
        OutputFormat::Json => println!("{}", format_json(&aliases)?),
    }

    Ok(())
}

/// Format aliases as a table string
#[must_use]
pub fn format_table(aliases: &[&Alias]) -> String {
    if aliases.is_empty() {
        return "No aliases found.".to_string();
    }

    let mut output = String::new();

    let name_width = aliases
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let uri_width = aliases.iter().map(|a| a.uri.len()).max().unwrap_or(3).max(3);
    let user_width = aliases
        .iter()
        .filter_map(|a| a.user_name.as_ref().map(String::len))
        .max()
        .unwrap_or(4)
        .max(4);

    let _ = writeln!(
        output,
        "{:<name_width$}  {:<uri_width$}  {:<user_width$}  FLAGS",
        "NAME", "URI", "USER"
    );
    let _ = writeln!(
        output,
        "{:-<name_width$}  {:-<uri_width$}  {:-<user_width$}  -----",
        "", "", ""
    );

    for alias in aliases {
        let mut flags = Vec::new();
        if alias.read_only {
            flags.push("ro");
        }
        if alias.allow_upgrade {
            flags.push("upgrade");
        }
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<uri_width$}  {:<user_width$}  {}",
            alias.name,
            alias.uri,
            alias.user_name.as_deref().unwrap_or("-"),
            flags.join(",")
        );
    }

    output.trim_end().to_string()
}

/// Format aliases as JSON string
///
/// # Errors
///
/// Returns `CliError::Config` if JSON serialization fails.
pub fn format_json(aliases: &[&Alias]) -> Result<String, CliError> {
    let output: Vec<AliasOutput> = aliases.iter().map(|a| (*a).into()).collect();
    serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))
}

/// Add alias command handler
fn cmd_add(
    config_manager: &ConfigManager,
    settings: &AppSettings,
    alias: Alias,
) -> Result<(), CliError> {
    alias
        .validate()
        .map_err(|e| CliError::Invalid(e.to_string()))?;

    let (mut registry, report) = open_registry(config_manager, settings)?;
    ensure_writable(&registry, &report)?;

    let same_name = registry.find_by_name(&alias.name).len();
    let display = alias.to_string();
    if registry.add(alias) {
        registry.save()?;
        if same_name > 0 {
            println!("Added alias {display} (another alias already uses this name)");
        } else {
            println!("Added alias {display}");
        }
    } else {
        println!("Alias {display} already exists");
    }

    Ok(())
}

/// Picks the alias addressed by `name` and optional `uri`
fn select_alias(registry: &AliasRegistry, name: &str, uri: Option<&str>) -> Result<Alias, CliError> {
    let mut candidates = registry.find_by_name(name);
    if let Some(uri) = uri {
        candidates.retain(|a| a.uri == uri);
    }

    match candidates.as_slice() {
        [] => Err(CliError::AliasNotFound(match uri {
            Some(uri) => format!("{name} ({uri})"),
            None => name.to_string(),
        })),
        [alias] => Ok((*alias).clone()),
        many => Err(CliError::Ambiguous {
            name: name.to_string(),
            count: many.len(),
        }),
    }
}

/// Remove alias command handler
fn cmd_remove(
    config_manager: &ConfigManager,
    settings: &AppSettings,
    name: &str,
    uri: Option<&str>,
) -> Result<(), CliError> {
    let (mut registry, report) = open_registry(config_manager, settings)?;
    ensure_writable(&registry, &report)?;
    let alias = select_alias(&registry, name, uri)?;

    // No connection service runs inside the CLI process
    registry.remove(&alias, &IdleProbe)?;
    registry.save()?;

    println!("Removed alias {alias}");
    Ok(())
}

/// Show configuration command handler
fn cmd_show_config(config_manager: &ConfigManager, settings: &AppSettings) -> Result<(), CliError> {
    let (registry, report) = open_registry(config_manager, settings)?;

    println!("Config directory:  {}", config_manager.config_dir().display());
    println!("Alias file:        {}", registry.store().path().display());
    println!("Alias file state:  {:?}", report.outcome);
    println!("Aliases:           {}", report.loaded);
    println!("Log level:         {}", settings.logging.level);
    println!(
        "Load notification: {:?}",
        settings.registry.load_notification
    );

    Ok(())
}
