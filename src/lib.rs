//! mysql2pg - convert a MySQL dump into a PostgreSQL script, one line at a time.
//!
//! This library provides the core functionality for mysql2pg, including:
//! - The ordered rule pipeline (elision, type mapping, table renaming)
//! - Streaming conversion with lossy UTF-8 decoding and progress callbacks
//! - Optional TOML settings file passed with `--config`
//!
//! # Example
//!
//! ```no_run
//! use mysql2pg::convert::Converter;
//! use mysql2pg::rules::RuleSet;
//! use std::path::Path;
//!
//! let rules = RuleSet::builtin("temp_").unwrap();
//! let stats = Converter::new(rules)
//!     .convert_file(Path::new("peq.sql"), Path::new("peq.pg.sql"), |s| {
//!         println!("{} lines so far", s.lines_read);
//!     })
//!     .unwrap();
//!
//! println!("changed {} lines", stats.lines_changed);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod rules;

pub use error::{ConvertError, Result};
