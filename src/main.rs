// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, load credentials,
//   and hand the document to `app::run`.
// - `init` writes a config template instead of processing a document.

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use d2h_tools::api::UploadClient;
use d2h_tools::app::{self, RunOptions};
use d2h_tools::config;
use d2h_tools::document::TransformOptions;
use d2h_tools::encoding::SaveEncoding;
use d2h_tools::normalize::ImagePolicy;
use d2h_tools::output::DEFAULT_SUFFIX;
use d2h_tools::ui::SpinnerUploader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Upload local images referenced by an HTML document and adjust inline
/// CSS lengths.
#[derive(Parser, Debug)]
#[command(name = "d2htools", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    process: ProcessArgs,

    /// Path to the credential file (default: ~/.d2htools/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log upload progress and decisions.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a config template to fill in with your API details.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// HTML document to transform.
    file: Option<PathBuf>,

    /// Halve margin-left values.
    #[arg(short = 'm', long)]
    margin: bool,

    /// Double negative text-indent values.
    #[arg(short = 'i', long)]
    indent: bool,

    /// Resolve relative image paths against this directory.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Only add `max-width: 95%; height: auto;` to images.
    #[arg(long)]
    simple: bool,

    /// Replace `õ` with `ő` and `û` with `ű` before saving.
    #[arg(long)]
    fix_accents: bool,

    /// Save encoding; asks interactively when omitted.
    #[arg(long, value_enum)]
    encoding: Option<SaveEncoding>,

    /// Inserted before the extension of the output file name.
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    suffix: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(config::default_path);

    if let Some(Command::Init { force }) = cli.command {
        config::init(&config_path, force)?;
        println!(
            "A sample config file was created at {}. Please edit it with your API details.",
            config_path.display()
        );
        return Ok(());
    }

    let args = cli.process;
    let Some(file) = args.file else {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "the HTML document path is required",
            )
            .exit();
    };

    let config = config::load(&config_path)?;
    let client = UploadClient::from_config(&config).context("Failed to build HTTP client")?;
    let uploader = SpinnerUploader::new(client);

    let options = RunOptions {
        base_dir: args.base_dir,
        transform: TransformOptions {
            halve_margins: args.margin,
            double_negative_indents: args.indent,
            policy: if args.simple {
                ImagePolicy::Simple
            } else {
                ImagePolicy::PreserveWidth
            },
        },
        fix_accents: args.fix_accents,
        suffix: args.suffix,
        save_encoding: args.encoding,
    };

    app::run(&file, &uploader, &options)?;
    Ok(())
}
