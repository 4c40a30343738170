use std::path::PathBuf;

use clap::Subcommand;
use hydrosiren_core::{Config, ConfigError, CoreError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

pub fn run(action: ConfigAction, config_path: Option<PathBuf>) -> Result<(), CoreError> {
    let path = config_path.unwrap_or_else(Config::default_path);
    match action {
        ConfigAction::Show => {
            let config = Config::load(&path)?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
            print!("{rendered}");
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(ConfigError::SaveFailed {
                    path,
                    message: "file exists (use --force to overwrite)".into(),
                }
                .into());
            }
            Config::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
