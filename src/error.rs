use std::path::PathBuf;

/// Library-level structured errors for mysql2pg.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
	#[error("Input file not found: {path}")]
	InputNotFound { path: PathBuf },

	#[error("Failed to open input file: {path}")]
	InputOpen {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to create output file: {path}")]
	OutputCreate {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("I/O error while converting")]
	Io(#[from] std::io::Error),

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution '{input}': {reason}")]
	InvalidSubstitution { input: String, reason: String },

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("Rule must set one of skip_pattern or rewrite")]
	EmptyRule,

	#[error("Invalid value for {key}: {reason}")]
	InvalidSetting { key: String, reason: String },
}

/// Result type alias using ConvertError.
pub type Result<T> = std::result::Result<T, ConvertError>;
