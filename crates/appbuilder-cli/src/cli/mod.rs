//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use appbuilder_core::domain;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "appbuilder",
    bin_name = "appbuilder",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Multi-module application scaffolding",
    long_about = "AppBuilder generates a multi-module application skeleton and \
                  grows it one service at a time: fresh factory ids for the \
                  service models, merged configuration, and a POM module entry.",
    after_help = "EXAMPLES:\n\
        \x20 appbuilder new \"Order Book\" --group-id com.acme --artifact-prefix acme\n\
        \x20 appbuilder add-service \"Order Processor\" --app acme-orderbook --type processor --ha es\n\
        \x20 appbuilder ids acme-orderbook --application\n\
        \x20 appbuilder completions bash > /usr/share/bash-completion/completions/appbuilder",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new application skeleton.
    #[command(
        visible_alias = "n",
        about = "Create a new application",
        after_help = "EXAMPLES:\n\
            \x20 appbuilder new \"Order Book\" -g com.acme -a acme --rumi-version 4.0.1 \\\n\
            \x20     --bindings-version 4.0.1 --mgmt-version 4.0.0 --messaging kafka\n\
            \x20 appbuilder new \"Order Book\" --interactive"
    )]
    New(NewArgs),

    /// Add a service module to an existing application.
    #[command(
        visible_alias = "add",
        about = "Add a service to an application",
        after_help = "EXAMPLES:\n\
            \x20 appbuilder add-service \"Order Processor\" --type processor --ha es --clustered\n\
            \x20 appbuilder add-service \"Market Feed\" --app ./acme-orderbook --type driver"
    )]
    AddService(AddServiceArgs),

    /// Report unused factory ids.
    #[command(
        about = "Allocate free factory ids",
        after_help = "EXAMPLES:\n\
            \x20 appbuilder ids ./models --count 4\n\
            \x20 appbuilder ids ./acme-orderbook --application"
    )]
    Ids(IdsArgs),

    /// Merge configuration fragments into a configuration document.
    #[command(
        about = "Merge config fragments into a document",
        after_help = "EXAMPLES:\n\
            \x20 appbuilder inject conf/config.xml --fragments ./fragments --token ServiceName=orders\n\
            \x20 appbuilder inject conf/config.xml -f ./fragments --dry-run"
    )]
    Inject(InjectArgs),

    /// Inspect or export templates.
    #[command(
        about = "Template management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 appbuilder templates list\n\
            \x20 appbuilder templates export ./templates"
    )]
    Templates(TemplatesCommands),

    /// Initialise an AppBuilder configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 appbuilder init           # user config location\n\
            \x20 appbuilder init --local   # .appbuilder.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 appbuilder completions bash > ~/.local/share/bash-completion/completions/appbuilder\n\
            \x20 appbuilder completions zsh  > ~/.zfunc/_appbuilder\n\
            \x20 appbuilder completions fish > ~/.config/fish/completions/appbuilder.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the AppBuilder configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 appbuilder config get defaults.group_id\n\
            \x20 appbuilder config list\n\
            \x20 appbuilder config path"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Template package selection shared by commands that render templates.
#[derive(Debug, Clone, Args)]
pub struct TemplateArgs {
    /// Template package directory; overrides config and environment.
    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        help = "Template package directory (default: built-in templates)"
    )]
    pub templates_dir: Option<PathBuf>,
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `appbuilder new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Human-readable application name, e.g. `Order Book`.
    #[arg(value_name = "NAME", help = "Application name")]
    pub name: String,

    /// Directory the application root is created in.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        default_value = ".",
        help = "Parent directory of the new application"
    )]
    pub dir: PathBuf,

    /// Java package; defaults to `<group id>.<app token name>`.
    #[arg(short = 'p', long = "package", value_name = "PACKAGE", help = "Base package name")]
    pub package: Option<String>,

    #[arg(short = 'g', long = "group-id", value_name = "GROUP", help = "Maven group id")]
    pub group_id: Option<String>,

    #[arg(
        short = 'a',
        long = "artifact-prefix",
        value_name = "PREFIX",
        help = "Prefix of every artifact id"
    )]
    pub artifact_prefix: Option<String>,

    #[arg(long = "rumi-version", value_name = "VERSION", help = "Runtime version")]
    pub rumi_version: Option<String>,

    #[arg(long = "bindings-version", value_name = "VERSION", help = "Bindings version")]
    pub bindings_version: Option<String>,

    #[arg(long = "mgmt-version", value_name = "VERSION", help = "Management version")]
    pub mgmt_version: Option<String>,

    #[arg(short = 'e', long = "encoding", value_enum, help = "Message encoding")]
    pub encoding: Option<Encoding>,

    #[arg(short = 'm', long = "messaging", value_enum, help = "Messaging provider")]
    pub messaging: Option<Messaging>,

    #[arg(short = 'b', long = "build-tool", value_enum, help = "Build tool")]
    pub build_tool: Option<BuildTool>,

    #[command(flatten)]
    pub templates: TemplateArgs,

    /// Prompt for anything not given on the command line.
    #[arg(short = 'i', long = "interactive", help = "Prompt for missing values")]
    pub interactive: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── add-service ───────────────────────────────────────────────────────────────

/// Arguments for `appbuilder add-service`.
#[derive(Debug, Args)]
pub struct AddServiceArgs {
    /// Human-readable service name, e.g. `Order Processor`.
    #[arg(value_name = "NAME", help = "Service name")]
    pub name: String,

    /// Application root (the directory holding `.rumi`).
    #[arg(
        long = "app",
        value_name = "DIR",
        default_value = ".",
        help = "Application root directory"
    )]
    pub app: PathBuf,

    #[arg(short = 't', long = "type", value_enum, help = "Service type")]
    pub kind: ServiceKind,

    #[arg(long = "ha", value_enum, help = "High-availability model")]
    pub ha: Option<HaModel>,

    #[arg(long = "clustered", help = "Run the service as a cluster")]
    pub clustered: bool,

    #[arg(
        long = "partitions",
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of partitions"
    )]
    pub partitions: u32,

    /// Append configuration even when an equivalent element exists.
    #[arg(long = "always-append", help = "Do not skip duplicate configuration")]
    pub always_append: bool,

    #[command(flatten)]
    pub templates: TemplateArgs,
}

// ── ids ───────────────────────────────────────────────────────────────────────

/// Arguments for `appbuilder ids`.
#[derive(Debug, Args)]
pub struct IdsArgs {
    /// Directory to scan for model documents.
    #[arg(value_name = "DIR", default_value = ".", help = "Directory to scan")]
    pub path: PathBuf,

    #[arg(
        short = 'n',
        long = "count",
        value_name = "N",
        default_value_t = 2,
        help = "Minimum number of ids to return"
    )]
    pub count: usize,

    /// Treat DIR as an application root and only scan `src/main/models`.
    #[arg(long = "application", help = "Scan only model source directories")]
    pub application: bool,
}

// ── inject ────────────────────────────────────────────────────────────────────

/// Arguments for `appbuilder inject`.
#[derive(Debug, Args)]
pub struct InjectArgs {
    /// Configuration document to merge into.
    #[arg(value_name = "CONFIG", help = "Configuration document")]
    pub config: PathBuf,

    /// Fragment tree: every `config.xml` below it is one fragment, inserted
    /// at the path named by its parent directories.
    #[arg(
        short = 'f',
        long = "fragments",
        value_name = "DIR",
        help = "Directory of configuration fragments"
    )]
    pub fragments: PathBuf,

    /// Token substituted into fragments before parsing.
    #[arg(
        short = 't',
        long = "token",
        value_name = "KEY=VALUE",
        value_parser = parse_token,
        help = "Token to substitute, e.g. ServiceName=orders"
    )]
    pub tokens: Vec<(String, String)>,

    #[arg(long = "always-append", help = "Do not skip duplicate configuration")]
    pub always_append: bool,

    /// Print the merged document instead of writing it.
    #[arg(long = "dry-run", help = "Print the merged document to stdout")]
    pub dry_run: bool,
}

fn parse_token(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("token name cannot be empty".into());
    }
    Ok((key.to_string(), value.to_string()))
}

// ── templates ─────────────────────────────────────────────────────────────────

/// Subcommands for `appbuilder templates`.
#[derive(Debug, Subcommand)]
pub enum TemplatesCommands {
    /// Show which templates the active source provides.
    List(TemplateArgs),
    /// Write the built-in templates to a directory for customisation.
    Export {
        /// Destination directory.
        #[arg(value_name = "DIR")]
        dir: PathBuf,
        /// Write into a non-empty directory.
        #[arg(long = "force")]
        force: bool,
    },
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `appbuilder init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.appbuilder.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `appbuilder completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `appbuilder config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.group_id`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the user configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum BuildTool {
    Maven,
    Gradle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Encoding {
    Quark,
    Protobuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Messaging {
    Solace,
    #[value(name = "activemq", alias = "amq")]
    ActiveMq,
    Kafka,
}

/// Kind of service module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ServiceKind {
    Driver,
    Connector,
    Processor,
}

/// High-availability model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HaModel {
    /// State replication.
    #[value(name = "sr", alias = "state-replication")]
    StateReplication,
    /// Event sourcing.
    #[value(name = "es", alias = "event-sourcing")]
    EventSourcing,
}

impl From<BuildTool> for domain::BuildTool {
    fn from(value: BuildTool) -> Self {
        match value {
            BuildTool::Maven => Self::Maven,
            BuildTool::Gradle => Self::Gradle,
        }
    }
}

impl From<Encoding> for domain::EncodingType {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::Quark => Self::Quark,
            Encoding::Protobuf => Self::Protobuf,
        }
    }
}

impl From<Messaging> for domain::MessagingProvider {
    fn from(value: Messaging) -> Self {
        match value {
            Messaging::Solace => Self::Solace,
            Messaging::ActiveMq => Self::ActiveMq,
            Messaging::Kafka => Self::Kafka,
        }
    }
}

impl From<ServiceKind> for domain::ServiceType {
    fn from(value: ServiceKind) -> Self {
        match value {
            ServiceKind::Driver => Self::Driver,
            ServiceKind::Connector => Self::Connector,
            ServiceKind::Processor => Self::Processor,
        }
    }
}

impl From<HaModel> for domain::ServiceHaModel {
    fn from(value: HaModel) -> Self {
        match value {
            HaModel::StateReplication => Self::StateReplication,
            HaModel::EventSourcing => Self::EventSourcing,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
