//! Argument parsing, session bootstrap, and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use plantwatch_api_models::endpoints;
use plantwatch_config::ClientConfig;
use plantwatch_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, init_logging};
use plantwatch_ui::HierarchyLevel;
use plantwatch_ui::core::outlook::{SortField, SortOrder};
use reqwest::Url;
use tracing::debug;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, parse_url};
use crate::commands::auth::{handle_login, handle_logout, handle_whoami};
use crate::commands::hierarchy::handle_hierarchy;
use crate::commands::list::handle_list;
use crate::commands::outlook::handle_outlook;
use crate::state::{FileStorage, default_state_dir};

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let trace_id = Uuid::new_v4().to_string();
    let _context = GlobalContextGuard::new(command_label(&cli.command), &trace_id);

    let result = match build_context(&cli, &trace_id) {
        Ok(ctx) => dispatch(cli.command, &ctx, cli.output).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn build_context(cli: &Cli, trace_id: &str) -> CliResult<AppContext> {
    let mut config = ClientConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::validation(format!("invalid configuration: {err}")))?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.to_string();
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    config
        .validate()
        .map_err(|err| CliError::validation(format!("invalid configuration: {err}")))?;

    let state_dir = cli.state_dir.clone().unwrap_or_else(default_state_dir);
    debug!(state_dir = %state_dir.display(), "session state directory");
    AppContext::new(config, FileStorage::new(state_dir), trace_id)
}

async fn dispatch(command: Command, ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    match command {
        Command::Login(args) => handle_login(ctx, &args).await,
        Command::Logout => {
            handle_logout(ctx);
            Ok(())
        }
        Command::Whoami => handle_whoami(ctx, format),
        Command::Hierarchy(command) => handle_hierarchy(ctx, command, format),
        Command::List(args) => handle_list(ctx, &args, format).await,
        Command::Outlook(args) => handle_outlook(ctx, args, format).await,
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Hierarchy(HierarchyCommand::Show) => "hierarchy_show",
        Command::Hierarchy(HierarchyCommand::Set(_)) => "hierarchy_set",
        Command::Hierarchy(HierarchyCommand::Clear(_)) => "hierarchy_clear",
        Command::Hierarchy(HierarchyCommand::Reset) => "hierarchy_reset",
        Command::Hierarchy(HierarchyCommand::Forget) => "hierarchy_forget",
        Command::List(_) => "list",
        Command::Outlook(_) => "outlook",
    }
}

#[derive(Parser)]
#[command(
    name = "plantwatch",
    about = "Command-line client for the Plantwatch maintenance dashboard"
)]
pub(crate) struct Cli {
    #[arg(long, global = true, value_parser = parse_url, help = "Override the API base URL")]
    api_url: Option<Url>,
    #[arg(
        long,
        global = true,
        env = "PLANTWATCH_STATE_DIR",
        help = "Directory holding the persisted session"
    )]
    state_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "HTTP timeout in seconds")]
    timeout: Option<u64>,
    #[arg(long, global = true, help = "JSON configuration document")]
    config: Option<PathBuf>,
    #[arg(long, global = true, env = "PLANTWATCH_LOG_FORMAT")]
    log_format: Option<LogFormat>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Sign in and store the session.
    Login(LoginArgs),
    /// Forget the session and the hierarchy selection.
    Logout,
    /// Show the stored session.
    Whoami,
    /// Inspect or change the hierarchy selection.
    #[command(subcommand)]
    Hierarchy(HierarchyCommand),
    /// List one page of an entity, scoped by the hierarchy selection.
    List(ListArgs),
    /// Condition-monitoring outlook for the selected scope.
    Outlook(OutlookArgs),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "PLANTWATCH_EMAIL")]
    pub(crate) email: String,
    #[arg(long, env = "PLANTWATCH_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum HierarchyCommand {
    /// Print the current selection.
    Show,
    /// Select an entity; lower levels are unset.
    Set(HierarchySetArgs),
    /// Unset a level and everything below it.
    Clear(HierarchyLevelArgs),
    /// Unset every level, keeping the stored entry.
    Reset,
    /// Unset every level and delete the stored entry.
    Forget,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct HierarchySetArgs {
    pub(crate) level: HierarchyLevel,
    pub(crate) id: i64,
    #[arg(long)]
    pub(crate) description: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct HierarchyLevelArgs {
    pub(crate) level: HierarchyLevel,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ListArgs {
    #[arg(value_enum)]
    pub(crate) entity: Entity,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long)]
    pub(crate) page_size: Option<u32>,
    #[arg(long)]
    pub(crate) code: Option<String>,
    #[arg(long)]
    pub(crate) description: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct OutlookArgs {
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long)]
    pub(crate) page_size: Option<u32>,
    #[arg(long, help = "Asset code filter")]
    pub(crate) code: Option<String>,
    #[arg(long, help = "Asset description filter")]
    pub(crate) description: Option<String>,
    #[arg(long, help = "Component code filter")]
    pub(crate) component_code: Option<String>,
    #[arg(long, help = "asset, type, component, or a technology key such as vib")]
    pub(crate) sort: Option<SortField>,
    #[arg(long, default_value = "asc", help = "asc, desc, or none")]
    pub(crate) order: SortOrder,
}

/// Entities reachable through `list`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Entity {
    Accounts,
    Plants,
    Areas,
    Systems,
    Assets,
    Components,
    Users,
    Roles,
    PlantFailures,
    PlantLubricants,
}

impl Entity {
    pub(crate) const fn resource(self) -> &'static str {
        match self {
            Self::Accounts => endpoints::ACCOUNTS,
            Self::Plants => endpoints::PLANTS,
            Self::Areas => endpoints::AREAS,
            Self::Systems => endpoints::SYSTEMS,
            Self::Assets => endpoints::ASSETS,
            Self::Components => endpoints::COMPONENTS,
            Self::Users => endpoints::USERS,
            Self::Roles => endpoints::ROLES,
            Self::PlantFailures => endpoints::PLANT_FAILURES,
            Self::PlantLubricants => endpoints::PLANT_LUBRICANTS,
        }
    }

    /// Hierarchy levels that narrow this listing.
    pub(crate) const fn scope(self) -> &'static [HierarchyLevel] {
        match self {
            Self::Accounts | Self::Roles => &[],
            Self::Plants | Self::Users => &[HierarchyLevel::Account],
            Self::Areas | Self::PlantFailures | Self::PlantLubricants => {
                &[HierarchyLevel::Account, HierarchyLevel::Plant]
            }
            Self::Systems => &[
                HierarchyLevel::Account,
                HierarchyLevel::Plant,
                HierarchyLevel::Area,
            ],
            Self::Assets | Self::Components => &HierarchyLevel::ALL,
        }
    }
}

/// Output format for commands that render structured data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
