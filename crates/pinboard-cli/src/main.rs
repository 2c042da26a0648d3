use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "pinboard",
    version,
    about = "Attach molecules to pinned records and keep their audit trail"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true, default_value = ".")]
    dir: std::path::PathBuf,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::Context::load(&cli.dir)?;

    match &cli.command {
        commands::Commands::Attach(args) => commands::attach::run(args, &ctx, cli.format),
        commands::Commands::Detach(args) => commands::detach::run(args, &ctx, cli.format),
        commands::Commands::Attachment(args) => {
            commands::attachment::run(args, &ctx, cli.format)
        }
        commands::Commands::Event(args) => commands::event::run(args, &ctx),
        commands::Commands::Audit => commands::audit::run(&ctx, cli.format),
    }
}
