mod commands;
mod formatting;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stagekit_core::{Error, Interrupt};
use tracing::Level;

#[derive(Parser)]
#[command(name = "stagekit")]
#[command(about = "Build and publish multi-project wasm workspaces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace root holding the projects and `stagekit.toml`
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one project, rebuilding missing or forced artifacts
    Build {
        project: String,
        /// Force a rebuild of the server binary
        #[arg(short = 'g', long, action)]
        native: bool,
        /// Force a rebuild of the wasm module
        #[arg(short = 'o', long, action)]
        wasm: bool,
        /// Build the wasm module with aggressive optimization
        #[arg(long, action)]
        release: bool,
        /// Run the dev server from the public folder afterwards
        #[arg(long, action)]
        run: bool,
    },
    /// Run a project's dev server until interrupted
    Serve {
        project: String,
        /// Arguments passed through to the server
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Build every project and assemble the distribution tree
    Publish {
        /// Projects to publish, overriding the configured list
        #[arg(long, value_delimiter = ',')]
        projects: Vec<String>,
        /// Build wasm modules with minimal optimization
        #[arg(long, action)]
        debug: bool,
        /// Force the server binaries to be rebuilt
        #[arg(long, action)]
        native: bool,
        #[arg(long, action)]
        no_dev_server: bool,
        #[arg(short = 'j', long)]
        parallel: Option<usize>,
        #[arg(long, action)]
        json: bool,
    },
}

fn run(cli: Cli, interrupt: &Interrupt) -> Result<()> {
    let workspace = commands::Workspace::load(cli.root)?;

    match cli.command {
        Commands::Build {
            project,
            native,
            wasm,
            release,
            run,
        } => commands::cmd_build(&workspace, &project, native, wasm, release, run, interrupt)?,
        Commands::Serve { project, args } => {
            commands::cmd_serve(&workspace, &project, &args, interrupt)?
        }
        Commands::Publish {
            projects,
            debug,
            native,
            no_dev_server,
            parallel,
            json,
        } => commands::cmd_publish(
            &workspace,
            projects,
            commands::PublishFlags {
                optimized: !debug,
                force_native: native,
                build_dev_server: !no_dev_server,
                parallel,
                json,
            },
            interrupt,
        )?,
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // Logs go to stderr so `publish --json` keeps stdout parseable.
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let interrupt = Interrupt::new();
    let handler_flag = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.trigger()) {
        formatting::print_error(&format!("Failed to set signal handler: {}", e));
        return ExitCode::FAILURE;
    }

    match run(cli, &interrupt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::Interrupted)) => {
            formatting::print_warning("Interrupted, stopping");
            ExitCode::from(130)
        }
        Err(e) => {
            formatting::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
