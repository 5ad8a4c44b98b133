//! Clap derive structures for the `multimatic` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use multimatic_core::{DhwOperationMode, HeatingMode};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// multimatic -- read and control Vaillant multiMATIC heating systems
#[derive(Debug, Parser)]
#[command(
    name = "multimatic",
    version,
    about = "Read and control Vaillant multiMATIC heating systems",
    long_about = "Talks to the Vaillant multiMATIC cloud service.\n\n\
        Reads print JSON on stdout. Writes are queued, coalesced per target\n\
        and sent before the process exits.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "MULTIMATIC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "MULTIMATIC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Account username (overrides profile)
    #[arg(long, short = 'u', env = "MULTIMATIC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, env = "MULTIMATIC_BASE_URL", global = true, hide = true)]
    pub base_url: Option<String>,

    /// Facility serial number (overrides profile)
    #[arg(long, short = 'f', env = "MULTIMATIC_FACILITY", global = true)]
    pub facility: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MULTIMATIC_OUTPUT",
        default_value = "json",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MULTIMATIC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the facilities of the account
    #[command(alias = "fac")]
    Facilities,

    /// Show the merged state of a facility
    State,

    /// List the zones of a facility, or show one zone
    Zones(ZonesArgs),

    /// Show the HVAC overview of a facility
    Overview,

    /// Show recent facility events
    Events,

    /// Set a zone's heating setpoint temperature
    SetTemp(ZoneTemperatureArgs),

    /// Set a zone's reduced (setback) temperature
    SetReduced(ZoneTemperatureArgs),

    /// Set a zone's heating mode
    SetMode(ZoneModeArgs),

    /// Set a hot water circuit's target temperature
    SetDhwTemp(DhwTemperatureArgs),

    /// Set a hot water circuit's operation mode
    SetDhwMode(DhwModeArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Reads ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ZonesArgs {
    /// Zone id; omit to list all zones
    pub zone: Option<String>,

    /// Show the zone's weekly time program instead
    #[arg(long, requires = "zone")]
    pub timeprogram: bool,
}

// ── Writes ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ZoneTemperatureArgs {
    /// Zone id (e.g. Control_ZO1)
    pub zone: String,

    /// Temperature in °C
    pub temperature: f64,
}

#[derive(Debug, Args)]
pub struct ZoneModeArgs {
    /// Zone id (e.g. Control_ZO1)
    pub zone: String,

    /// AUTO, DAY, NIGHT or OFF
    pub mode: HeatingMode,
}

#[derive(Debug, Args)]
pub struct DhwTemperatureArgs {
    /// Hot water circuit id (e.g. Control_DHW)
    pub dhw: String,

    /// Temperature in °C
    pub temperature: f64,
}

#[derive(Debug, Args)]
pub struct DhwModeArgs {
    /// Hot water circuit id (e.g. Control_DHW)
    pub dhw: String,

    /// AUTO, ON or OFF
    pub mode: DhwOperationMode,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the loaded configuration (passwords masked)
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
