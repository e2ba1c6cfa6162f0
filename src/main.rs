use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use gin_sync::commands::CommandContext;
use gin_sync::common::config::{apply_overrides, load_config, ConfigOverrides};
use gin_sync::common::config_commands::{run_config_path, run_config_reset, run_config_show};
use gin_sync::logging::init_logging;
use gin_sync::ui::format::error_label;
use gin_sync::ui::StdoutTerminal;

#[derive(Parser, Debug)]
#[command(
    name = "gin-sync",
    version,
    about = "Synchronize a local working copy with a remote annexed repository"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Remote to talk to (overrides config)
    #[arg(long, global = true)]
    remote: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lock files, making them read-only and saving space
    Lock(TransferArgs),
    /// Unlock files for editing
    Unlock(TransferArgs),
    /// Download the content of files
    #[command(alias = "getc")]
    GetContent(TransferArgs),
    /// Remove local content of files that are safely stored on a remote
    #[command(alias = "rmc")]
    RemoveContent(TransferArgs),
    /// Push changes and upload file content to the remote
    Upload(TransferArgs),
    /// Download all new changes from the remote
    Download(DownloadArgs),
    /// Inspect or reset the configuration file
    #[command(subcommand)]
    Config(ConfigCmd),
}

#[derive(Args, Debug)]
struct TransferArgs {
    /// Print one JSON record per status update
    #[arg(long)]
    json: bool,

    /// Files or directories. All files under the current directory when omitted.
    paths: Vec<String>,
}

#[derive(Args, Debug)]
struct DownloadArgs {
    /// Print one JSON record per status update
    #[arg(long)]
    json: bool,

    /// Also download the content of every file
    #[arg(long)]
    content: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
    /// Print the config file location
    Path,
    /// Print the config file, or the defaults when it does not exist
    Show,
    /// Overwrite the config file with defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("Exiting with error: {:#}", err);
            let color = std::io::stderr().is_terminal();
            eprintln!("{} {:#}", error_label(color), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Config(cmd) = &cli.command {
        return match cmd {
            ConfigCmd::Path => run_config_path(),
            ConfigCmd::Show => run_config_show(),
            ConfigCmd::Reset { yes } => run_config_reset(*yes).map(|_| ()),
        };
    }

    let overrides = ConfigOverrides {
        remote: cli.remote,
        log_file: cli.log_file,
    };
    let config = apply_overrides(load_config()?, &overrides);
    init_logging(cli.verbose, config.log_file.as_deref())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), remote = %config.remote, "gin-sync starting");

    let json = match &cli.command {
        Command::Lock(args)
        | Command::Unlock(args)
        | Command::GetContent(args)
        | Command::RemoveContent(args)
        | Command::Upload(args) => args.json,
        Command::Download(args) => args.json,
        Command::Config(_) => false,
    };
    let mut ctx = CommandContext::new(config, json, StdoutTerminal::new());

    match cli.command {
        Command::Lock(args) => ctx.lock(args.paths).await,
        Command::Unlock(args) => ctx.unlock(args.paths).await,
        Command::GetContent(args) => ctx.get_content(args.paths).await,
        Command::RemoveContent(args) => ctx.remove_content(args.paths).await,
        Command::Upload(args) => ctx.upload(args.paths).await,
        Command::Download(args) => ctx.download(args.content).await,
        Command::Config(_) => Ok(()),
    }
}
