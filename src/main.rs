//! musictl - import downloaded music into a curated library.
//!
//! The `import` command walks a download directory, splits CUE album images
//! into individual tracks with an external transcoder, names every file
//! `Artist - Album - NN - Title.ext` from its tags (or, failing that, from the
//! directory layout) and copies the result into a dated folder of the
//! library. Every copy is recorded in an append-only import log.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use musictl::config::Config;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::error::Error;
use std::fs::File;
use std::io;

mod cli;

#[derive(Parser)]
#[command(name = "musictl")]
#[command(about = "Import downloaded music and CUE album images into your library")]
#[command(version)]
struct Cli {
    /// Mirror diagnostics to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize musictl configuration
    Init {
        /// Library root (defaults to ~/Dropbox)
        #[arg(short, long)]
        base_path: Option<String>,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Import a directory of music into the library
    Import {
        /// Destination as <music directory>/<subdirectory>, e.g. collection/indie
        target: String,
        /// Directory to import from
        source: String,
        /// Answer yes to every confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the tracks a CUE sheet describes
    Cue {
        /// Path to the .cue file
        file: String,
    },
    /// Show recent imports
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "base_path",
            "music_directories",
            "music_extensions",
            "ignored_dirs",
            "import_log",
            "splitter_binary",
            "splitter_codec",
            "splitter_extension",
        ]))]
        key: String,
        /// Configuration value (lists are comma-separated)
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn Error>> {
    let log_file = std::env::temp_dir().join("musictl.log");
    let config = ConfigBuilder::new().build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(WriteLogger::new(
        LevelFilter::Debug,
        config.clone(),
        File::create(log_file)?,
    ));
    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Info,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    CombinedLogger::init(loggers)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Logging disabled: {e}");
    }

    match cli.command {
        Commands::Init { base_path } => {
            cli::init::handle_init(base_path.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Commands::Import {
            target,
            source,
            yes,
        } => {
            let config = Config::load()?;
            cli::import::handle_import(&config, &target, &source, yes)?;
        }
        Commands::Cue { file } => {
            cli::cue::handle_cue(&file)?;
        }
        Commands::History { limit } => {
            let config = Config::load()?;
            cli::history::handle_history(&config, limit)?;
        }
    }

    Ok(())
}
