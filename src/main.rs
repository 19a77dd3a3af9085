use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trackforge::commands::{self, GenerateOptions, InputKind};
use trackforge::{init_logging, BUILD_DATE, VERSION};

/// Generate 3D-printable tabletop tracker boards
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build every layer of a board and package the STL files
    Generate {
        /// Layout document (JSON or TOML), or a module list with --wire
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Treat the input as a serialized module list
        #[arg(long)]
        wire: bool,

        /// Settings file (defaults to the user configuration directory)
        #[arg(short, long, value_name = "PATH")]
        settings: Option<PathBuf>,

        /// Archive to write, or directory with --loose
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Write loose STL files instead of a zip archive
        #[arg(long)]
        loose: bool,

        /// Font file to use instead of the configured one
        #[arg(long, value_name = "PATH")]
        font: Option<PathBuf>,
    },

    /// Lay out a document and print the resulting module list
    Layout {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "PATH")]
        settings: Option<PathBuf>,

        /// Write the module list here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Write a settings file with default values
    InitSettings {
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the built-in slot rule tables
    Rulesets,

    /// List installed font families
    Fonts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::debug!("trackforge {} (built {})", VERSION, BUILD_DATE);

    match cli.command {
        Command::Generate {
            input,
            wire,
            settings,
            output,
            loose,
            font,
        } => {
            commands::generate(GenerateOptions {
                input,
                kind: if wire {
                    InputKind::Wire
                } else {
                    InputKind::Document
                },
                settings,
                output,
                loose,
                font,
            })
            .await
        }
        Command::Layout {
            input,
            settings,
            output,
        } => commands::layout(&input, settings.as_deref(), output.as_deref()).await,
        Command::InitSettings { path, force } => {
            let path = commands::init_settings(path.as_deref(), force)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Rulesets => commands::rulesets(),
        Command::Fonts => {
            commands::fonts();
            Ok(())
        }
    }
}
