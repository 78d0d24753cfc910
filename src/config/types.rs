use crate::error::ConvertError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Prefix given to every converted table unless configured otherwise.
pub const DEFAULT_TABLE_PREFIX: &str = "temp_";

/// Lines read between two progress reports unless configured otherwise.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Contents of a file passed with `--config`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	/// Prefix prepended to dropped, created and inserted table names.
	#[serde(default)]
	pub table_prefix: Option<String>,

	/// Report progress every this many lines read.
	#[serde(default)]
	pub progress_interval: Option<u64>,

	/// Extra rules applied after the built-in pipeline, in order.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A user rule applied after the built-in rewrites.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Rule {
	/// Regex; matching lines are dropped from the output.
	pub skip_pattern: Option<String>,

	/// Sed-like substitution: "s/pattern/replacement/" or "s/pattern/replacement/g".
	pub rewrite: Option<String>,
}

/// A rule tagged with the file it was read from.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	pub rule: Rule,
	pub source: PathBuf,
}

/// Effective settings for one run.
///
/// The default value is what a run without `--config` uses: the built-in
/// pipeline with the `temp_` prefix and no extra rules.
#[derive(Debug, Clone)]
pub struct Settings {
	/// User rules, in file order.
	pub rules: Vec<RuleWithSource>,

	pub table_prefix: String,

	pub progress_interval: u64,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			rules: Vec::new(),
			table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
			progress_interval: DEFAULT_PROGRESS_INTERVAL,
		}
	}
}

impl Settings {
	/// Overlay a validated config read from `source` onto the defaults.
	pub fn from_config(config: Config, source: &Path) -> Self {
		let defaults = Settings::default();
		Settings {
			rules: config
				.rules
				.into_iter()
				.map(|rule| RuleWithSource {
					rule,
					source: source.to_path_buf(),
				})
				.collect(),
			table_prefix: config.table_prefix.unwrap_or(defaults.table_prefix),
			progress_interval: config
				.progress_interval
				.unwrap_or(defaults.progress_interval),
		}
	}
}

impl Rule {
	/// Exactly one of `skip_pattern` and `rewrite` must be set.
	pub fn validate(&self) -> Result<(), ConvertError> {
		match (&self.skip_pattern, &self.rewrite) {
			(Some(_), Some(_)) => Err(ConvertError::MutuallyExclusive {
				option1: "skip_pattern".to_string(),
				option2: "rewrite".to_string(),
			}),
			(None, None) => Err(ConvertError::EmptyRule),
			_ => Ok(()),
		}
	}
}

/// Table prefixes become part of identifiers, so only word characters are allowed.
pub fn validate_table_prefix(prefix: &str) -> Result<(), ConvertError> {
	if prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
		Ok(())
	} else {
		Err(ConvertError::InvalidSetting {
			key: "table-prefix".to_string(),
			reason: format!("'{prefix}' may only contain ASCII letters, digits and '_'"),
		})
	}
}

impl Config {
	pub fn validate(&self) -> Result<(), ConvertError> {
		if let Some(ref prefix) = self.table_prefix {
			validate_table_prefix(prefix)?;
		}

		if self.progress_interval == Some(0) {
			return Err(ConvertError::InvalidSetting {
				key: "progress-interval".to_string(),
				reason: "must be greater than zero".to_string(),
			});
		}

		self.rules.iter().try_for_each(Rule::validate)
	}
}
