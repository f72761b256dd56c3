use std::path::PathBuf;

use carpool_matching::config::MatchConfig;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// JSON schema of the match config file
    JsonSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> anyhow::Result<()> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = schemars::schema_for!(MatchConfig);

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(out, serde_json::to_string_pretty(&schema)?)?;
        }
    }

    Ok(())
}
