use crate::config::types::{Config, Settings};
use crate::error::{ConvertError, Result};
use std::path::Path;

/// Read, parse and validate the config file at `path`.
pub fn load_settings(path: &Path) -> Result<Settings> {
	let content =
		std::fs::read_to_string(path).map_err(|source| ConvertError::ConfigReadError {
			path: path.to_path_buf(),
			source,
		})?;

	let config = parse_config_str(&content, path)?;
	log::info!(
		"loaded {} ({} user rules)",
		path.display(),
		config.rules.len()
	);
	Ok(Settings::from_config(config, path))
}

/// Parse and validate config text; `path` is only used in errors.
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| ConvertError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;
	Ok(config)
}
