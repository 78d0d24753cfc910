//! Dump conversion for mysql2pg.
//!
//! This module handles:
//! - Writing the PostgreSQL prologue
//! - Streaming lines through the rule pipeline
//! - Counting read and changed lines, with periodic progress callbacks

pub mod reader;

pub use reader::{LossyLines, RawLine, decode_lossy};

use crate::config::types::DEFAULT_PROGRESS_INTERVAL;
use crate::error::{ConvertError, Result};
use crate::rules::{LineOutcome, RuleSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Header written once at the top of every converted script.
pub const PROLOGUE: &str = "\
-- Converted PEQ Database for PostgreSQL
-- Original MySQL dump converted to PostgreSQL syntax

SET client_encoding = 'UTF8';
SET standard_conforming_strings = on;

";

/// Counters for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
	/// Input lines read, including elided ones.
	pub lines_read: u64,

	/// Emitted lines whose text differs from the input.
	pub lines_changed: u64,

	/// Input lines that produced no output.
	pub lines_elided: u64,
}

/// Streams a dump through a [`RuleSet`].
#[derive(Debug, Clone)]
pub struct Converter {
	rules: RuleSet,
	progress_interval: u64,
}

impl Converter {
	/// Converter over `rules`, reporting progress every 10,000 lines.
	pub fn new(rules: RuleSet) -> Self {
		Converter {
			rules,
			progress_interval: DEFAULT_PROGRESS_INTERVAL,
		}
	}

	/// Report progress every `interval` lines read. Zero is treated as one.
	pub fn with_progress_interval(mut self, interval: u64) -> Self {
		self.progress_interval = interval.max(1);
		self
	}

	/// Convert everything from `reader` into `writer`.
	///
	/// `on_progress` is called with the running totals each time the number
	/// of lines read reaches a multiple of the progress interval.
	pub fn convert<R, W, F>(
		&self,
		reader: R,
		writer: &mut W,
		mut on_progress: F,
	) -> Result<ConvertStats>
	where
		R: BufRead,
		W: Write,
		F: FnMut(&ConvertStats),
	{
		let mut stats = ConvertStats::default();

		writer.write_all(PROLOGUE.as_bytes())?;

		for line in LossyLines::new(reader) {
			let line = line?;
			stats.lines_read += 1;

			match self.rules.rewrite_line(&line.content) {
				LineOutcome::Elide => stats.lines_elided += 1,
				LineOutcome::Emit(text) => {
					if text != line.content {
						stats.lines_changed += 1;
					}
					writer.write_all(text.as_bytes())?;
					if line.terminated {
						writer.write_all(b"\n")?;
					}
				}
			}

			if stats.lines_read % self.progress_interval == 0 {
				on_progress(&stats);
			}
		}

		writer.flush()?;
		Ok(stats)
	}

	/// Convert the file at `input` into a new file at `output`.
	///
	/// The input is checked before the output is created, so a missing input
	/// never truncates an existing output file.
	pub fn convert_file<F>(
		&self,
		input: &Path,
		output: &Path,
		on_progress: F,
	) -> Result<ConvertStats>
	where
		F: FnMut(&ConvertStats),
	{
		if !input.is_file() {
			return Err(ConvertError::InputNotFound {
				path: input.to_path_buf(),
			});
		}

		let input_file = File::open(input).map_err(|source| ConvertError::InputOpen {
			path: input.to_path_buf(),
			source,
		})?;
		let output_file = File::create(output).map_err(|source| ConvertError::OutputCreate {
			path: output.to_path_buf(),
			source,
		})?;

		log::info!("converting {} -> {}", input.display(), output.display());

		let reader = BufReader::with_capacity(256 * 1024, input_file);
		let mut writer = BufWriter::with_capacity(256 * 1024, output_file);
		let stats = self.convert(reader, &mut writer, on_progress)?;

		log::info!(
			"{} lines read, {} changed, {} elided",
			stats.lines_read,
			stats.lines_changed,
			stats.lines_elided
		);

		Ok(stats)
	}
}
