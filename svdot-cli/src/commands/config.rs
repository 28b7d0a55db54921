//! Config command - print or write configuration

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;

pub fn execute(config: &Config, example: bool, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let selected = if example { Config::default() } else { config.clone() };
            selected.save_to_file(path)?;
            log::info!("Wrote configuration to {}", path.display());
        }
        None => {
            let content = if example {
                Config::example_toml()?
            } else {
                toml::to_string_pretty(config).context("Failed to serialize configuration")?
            };
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("svdot.toml");
        execute(&Config::default(), true, Some(&path)).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_write_effective_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effective.toml");
        let mut config = Config::default();
        config.render.width = 1024;
        execute(&config, false, Some(&path)).unwrap();

        assert_eq!(Config::load_from_file(&path).unwrap().render.width, 1024);
    }
}
