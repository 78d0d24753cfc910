//! Optional settings file for mysql2pg.
//!
//! Nothing is read unless a file is passed with `--config`; without one the
//! converter runs the built-in pipeline with [`Settings::default`].

pub mod parser;
pub mod types;

pub use parser::{load_settings, parse_config_str};
pub use types::{
	Config, DEFAULT_PROGRESS_INTERVAL, DEFAULT_TABLE_PREFIX, Rule, RuleWithSource, Settings,
	validate_table_prefix,
};
