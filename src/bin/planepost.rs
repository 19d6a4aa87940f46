use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "planepost", version, about = "Post-process sampled simulation planes")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every plugin section of a YAML or JSON document.
    Run(RunArgs),
    /// Print the option schema of one plugin, or of all of them.
    Describe(DescribeArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Configuration document (`.yaml`, `.yml` or `.json`).
    config: PathBuf,

    /// Log per-frame progress.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct DescribeArgs {
    /// Plugin name; all plugins when omitted.
    plugin: Option<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Describe(args) => cmd_describe(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    init_tracing(args.verbose);
    let engine = planepost::Engine::builtin()?;
    let mut env = planepost::RunEnv::new();
    engine
        .run_file(&args.config, &mut env)
        .with_context(|| format!("run '{}'", args.config.display()))?;
    Ok(())
}

fn cmd_describe(args: DescribeArgs) -> anyhow::Result<()> {
    let engine = planepost::Engine::builtin()?;
    print!("{}", engine.describe(args.plugin.as_deref())?);
    Ok(())
}
