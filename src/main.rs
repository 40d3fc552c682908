// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use typocat::app_config::{self, Config};
use typocat::{Controller, Reporter};

const DEFAULT_CONFIG_PATH: &str = "typocat.json";

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Spell check every catalog under the locales directory (default command)
    Check(CheckArgs),

    /// Generate shell completions for typocat
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct CheckArgs {
    /// Configuration file path [default: typocat.json]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory searched for .po files
    #[arg(long, value_name = "DIR")]
    locales_dir: Option<PathBuf>,

    /// Directory holding <language>.txt ignore files
    #[arg(long, value_name = "DIR")]
    ignores_dir: Option<PathBuf>,

    /// Write per-language reports here (recreated on every run)
    #[arg(short, long, value_name = "DIR")]
    build_dir: Option<PathBuf>,

    /// Directory holding Hunspell .aff/.dic files
    #[arg(long, value_name = "DIR", env = "TYPOCAT_DICTIONARIES_DIR")]
    dictionaries_dir: Option<PathBuf>,

    /// Language of the message ids (e.g., 'en', 'en_US')
    #[arg(short, long)]
    default_language: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Exit with status 1 when any misspelling was reported
    #[arg(long)]
    strict: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,
}

/// typocat - spell checking for gettext catalogs
///
/// Checks message ids against the default-language dictionary and
/// translations against the dictionary of each catalog's language.
#[derive(Parser, Debug)]
#[command(name = "typocat")]
#[command(version)]
#[command(about = "Spell checker for gettext translation catalogs")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "typocat finds misspelled words in gettext .po catalogs.

EXAMPLES:
    typocat                                   # Check using typocat.json
    typocat -c tools/typocat.json --strict    # Fail the build on any finding
    typocat --locales-dir locale -d en_US     # Override config values
    typocat -b build/spelling                 # Also write <language>_output.txt files
    typocat completions bash > typocat.bash   # Generate bash completions

CONFIGURATION:
    Configuration is read from typocat.json by default. Command line flags
    override the values in the file.

DICTIONARIES:
    Hunspell <language>.aff/.dic pairs are read from dictionaries_dir
    (default /usr/share/hunspell). Words listed in <ignores_dir>/<language>.txt
    are always accepted.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    check: CheckArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::decoration(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<ExitCode> {
    // The logger filters nothing itself; the effective level is set with
    // log::set_max_level once the configuration is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "typocat", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Check(args)) => run_check(args),
        None => run_check(cli.check),
    }
}

fn run_check(options: CheckArgs) -> Result<ExitCode> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let config = load_config(&options)?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    let strict = options.strict;
    let controller = Controller::with_config(config).with_progress(!options.no_progress);

    let mut reporter = Reporter::stdout();
    let summary = controller.run(&mut reporter).context("Spell check failed")?;

    if strict && summary.has_findings() {
        info!("Strict mode: {} finding(s) reported", summary.total_findings());
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

// Load the configuration file, apply command line overrides and validate
fn load_config(options: &CheckArgs) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load config file: {}", DEFAULT_CONFIG_PATH))?,
        None => {
            warn!(
                "Config file not found at '{}', using defaults and command line options.",
                DEFAULT_CONFIG_PATH
            );
            Config::default()
        }
    };

    apply_overrides(&mut config, options);

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, options: &CheckArgs) {
    if let Some(locales_dir) = &options.locales_dir {
        config.locales_dir = locales_dir.clone();
    }
    if let Some(ignores_dir) = &options.ignores_dir {
        config.ignores_dir = ignores_dir.clone();
    }
    if let Some(build_dir) = &options.build_dir {
        config.build_dir = Some(build_dir.clone());
    }
    if let Some(dictionaries_dir) = &options.dictionaries_dir {
        config.dictionaries_dir = dictionaries_dir.clone();
    }
    if let Some(default_language) = &options.default_language {
        config.default_language = default_language.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
