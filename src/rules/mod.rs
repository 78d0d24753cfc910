//! Line rewriting rules for mysql2pg.
//!
//! This module handles:
//! - Elision of MySQL-only statements (comments, session settings, locks)
//! - Ordered regex substitutions (table renames, type mapping, quoting)
//! - Extra user rules loaded from configuration

pub mod matcher;
pub mod rewriter;

pub use matcher::{LineMatcher, SkipRule, builtin_skip_rules, find_skip_rule};
pub use rewriter::{RewriteStep, Substitution, TYPE_MAPPINGS, builtin_steps};

use crate::config::types::{RuleWithSource, Settings};
use crate::error::{ConvertError, Result};
use std::borrow::Cow;
use std::path::PathBuf;

/// What happens to a line after the pipeline has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
	/// The line produces no output.
	Elide,

	/// The line is written with the given content.
	Emit(String),
}

/// A config-supplied rule compiled for matching.
#[derive(Debug, Clone)]
pub enum CompiledRule {
	/// Elide lines matching the pattern.
	Skip(SkipRule),

	/// Rewrite lines with a sed-like substitution.
	Rewrite(Substitution),
}

impl CompiledRule {
	/// Compile a rule from a RuleWithSource.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Self> {
		rws.rule.validate()?;

		if let Some(ref pattern) = rws.rule.skip_pattern {
			let regex = matcher::compile_regex(pattern)?;
			return Ok(CompiledRule::Skip(SkipRule {
				name: format!("{} ({})", pattern, rws.source.display()),
				matcher: LineMatcher::Pattern(regex),
			}));
		}

		if let Some(ref rewrite) = rws.rule.rewrite {
			return Ok(CompiledRule::Rewrite(Substitution::parse(rewrite)?));
		}

		Err(ConvertError::EmptyRule)
	}
}

/// Compile the user rules of a run, in file order.
pub fn compile_rules(config: &Settings) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(CompiledRule::from_rule_with_source)
		.collect()
}

/// The complete, ordered rule pipeline applied to every line.
#[derive(Debug, Clone)]
pub struct RuleSet {
	skip_rules: Vec<SkipRule>,
	steps: Vec<RewriteStep>,
	user_rules: Vec<CompiledRule>,
}

impl RuleSet {
	/// Built-in rules only, renaming tables with `table_prefix`.
	pub fn builtin(table_prefix: &str) -> Result<Self> {
		Ok(RuleSet {
			skip_rules: builtin_skip_rules(),
			steps: builtin_steps(table_prefix)?,
			user_rules: Vec::new(),
		})
	}

	/// Built-in rules configured from `config`, followed by its user rules.
	pub fn from_config(config: &Settings) -> Result<Self> {
		let mut rules = Self::builtin(&config.table_prefix)?;
		rules.user_rules = compile_rules(config)?;
		Ok(rules)
	}

	/// Number of user rules appended after the built-ins.
	pub fn user_rule_count(&self) -> usize {
		self.user_rules.len()
	}

	/// Run the pipeline over the content of one line (without its terminator).
	pub fn rewrite_line(&self, line: &str) -> LineOutcome {
		if let Some(rule) = find_skip_rule(&self.skip_rules, line) {
			log::debug!("elided by {}: {}", rule.name, line);
			return LineOutcome::Elide;
		}

		let mut current = Cow::Borrowed(line);
		for step in &self.steps {
			let replaced = match step.apply(&current) {
				Cow::Owned(text) => Some(text),
				Cow::Borrowed(_) => None,
			};
			if let Some(text) = replaced {
				current = Cow::Owned(text);
			}
		}

		for rule in &self.user_rules {
			match rule {
				CompiledRule::Skip(skip) => {
					if skip.matcher.matches(&current) {
						log::debug!("elided by user rule {}: {}", skip.name, line);
						return LineOutcome::Elide;
					}
				}
				CompiledRule::Rewrite(sub) => {
					let replaced = match sub.apply(&current) {
						Cow::Owned(text) => Some(text),
						Cow::Borrowed(_) => None,
					};
					if let Some(text) = replaced {
						current = Cow::Owned(text);
					}
				}
			}
		}

		LineOutcome::Emit(current.into_owned())
	}
}

/// Where a user rule came from, for display.
pub fn rule_sources(config: &Settings) -> Vec<PathBuf> {
	config.rules.iter().map(|r| r.source.clone()).collect()
}
