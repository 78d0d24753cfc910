use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

use mysql2pg::config::{Settings, load_settings, validate_table_prefix};
use mysql2pg::convert::Converter;
use mysql2pg::error::ConvertError;
use mysql2pg::rules::{RuleSet, rule_sources};

#[derive(Parser)]
#[command(name = "mysql2pg")]
#[command(
	author,
	version,
	about = "Convert a MySQL dump into a PostgreSQL-compatible SQL script"
)]
struct Cli {
	/// MySQL dump to read
	input: PathBuf,

	/// PostgreSQL script to write (overwritten if it exists)
	output: PathBuf,

	/// Load settings and extra rules from this TOML file
	#[arg(short, long, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Prefix for converted table names (overrides configuration)
	#[arg(long, value_name = "PREFIX")]
	table_prefix: Option<String>,

	/// Do not print progress lines
	#[arg(short, long)]
	quiet: bool,

	/// Increase log verbosity (-v, -vv)
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	setup_logger(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn setup_logger(verbose: u8) {
	use env_logger::Env;
	let level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	if !cli.input.is_file() {
		return Err(ConvertError::InputNotFound { path: cli.input }.into());
	}

	let mut settings = match cli.config {
		Some(ref path) => {
			load_settings(path).with_context(|| format!("Failed to load {}", path.display()))?
		}
		None => Settings::default(),
	};

	if let Some(prefix) = cli.table_prefix {
		validate_table_prefix(&prefix)?;
		settings.table_prefix = prefix;
	}

	let rules = RuleSet::from_config(&settings).context("Failed to compile rules")?;
	if rules.user_rule_count() > 0 {
		log::info!(
			"{} user rules from {:?}",
			rules.user_rule_count(),
			rule_sources(&settings)
		);
	}

	let converter = Converter::new(rules).with_progress_interval(settings.progress_interval);

	let quiet = cli.quiet;
	let stats = converter.convert_file(&cli.input, &cli.output, |s| {
		if !quiet {
			println!(
				"Processed {} lines, converted {} lines",
				s.lines_read, s.lines_changed
			);
		}
	})?;

	println!(
		"Conversion complete: {} lines processed, {} lines converted",
		stats.lines_read, stats.lines_changed
	);

	Ok(ExitCode::SUCCESS)
}
