use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{find_matches::MatchArgs, generate::GenerateSubcommands};

mod demo;
mod find_matches;
mod generate;
mod output;
mod parsers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidate rides for a passenger query
    Match {
        #[command(flatten)]
        args: MatchArgs,
    },
    /// Run the sample commuter query against the built-in drivers
    Demo {
        #[arg(long)]
        json: bool,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Match { args } => find_matches::run(args).await?,
        Commands::Demo { json } => demo::run(json).await?,
        Commands::Generate { commands } => generate::run(commands)?,
    }

    Ok(())
}
