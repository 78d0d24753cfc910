use crate::error::{ConvertError, Result};
use crate::rules::matcher::{LineMatcher, compile_regex};
use regex::Regex;
use std::borrow::Cow;

/// A regex substitution over one line.
#[derive(Debug, Clone)]
pub struct Substitution {
	/// Short identifier used in debug logging.
	pub name: String,

	/// The pattern to match.
	pub pattern: Regex,

	/// The replacement string (`$1` / `${name}` expand capture groups).
	pub replacement: String,

	/// Whether to replace all occurrences (global flag).
	pub global: bool,
}

impl Substitution {
	/// Build a global substitution from a regex and replacement.
	pub fn new(name: &str, pattern: &str, replacement: impl Into<String>) -> Result<Self> {
		Ok(Substitution {
			name: name.to_string(),
			pattern: compile_regex(pattern)?,
			replacement: replacement.into(),
			global: true,
		})
	}

	/// Parse a substitution string in sed-like format: "s/pattern/replacement/" or "s/pattern/replacement/g"
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| ConvertError::InvalidSubstitution {
			input: input.to_string(),
			reason: reason.to_string(),
		};

		// Must start with 's'
		let rest = input
			.strip_prefix('s')
			.ok_or_else(|| invalid("must start with 's'"))?;

		// Get the delimiter (character after 's')
		let delimiter = rest.chars().next().ok_or_else(|| invalid("too short"))?;

		let parts = split_by_delimiter(&rest[delimiter.len_utf8()..], delimiter);

		if parts.len() < 2 {
			return Err(invalid("must have pattern and replacement"));
		}

		let pattern_str = &parts[0];
		let replacement = parts[1].clone();
		let flags = parts.get(2).map(String::as_str).unwrap_or("");

		Ok(Substitution {
			name: input.to_string(),
			pattern: compile_regex(pattern_str)?,
			replacement,
			global: flags.contains('g'),
		})
	}

	/// Apply this substitution to a string, borrowing when nothing matched.
	pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
		if self.global {
			self.pattern.replace_all(input, self.replacement.as_str())
		} else {
			self.pattern.replace(input, self.replacement.as_str())
		}
	}
}

/// One or more substitutions that share a guard.
///
/// The guard is checked once against the line as it enters the step, so a
/// substitution that rewrites the guarded text does not disable its siblings.
#[derive(Debug, Clone)]
pub struct RewriteStep {
	/// Condition the line must satisfy before any substitution is tried.
	pub guard: Option<LineMatcher>,

	/// Substitutions applied in order.
	pub substitutions: Vec<Substitution>,
}

impl RewriteStep {
	/// An unguarded step with a single substitution.
	pub fn single(substitution: Substitution) -> Self {
		RewriteStep {
			guard: None,
			substitutions: vec![substitution],
		}
	}

	/// A step that only runs on lines matching `guard`.
	pub fn guarded(guard: LineMatcher, substitutions: Vec<Substitution>) -> Self {
		RewriteStep {
			guard: Some(guard),
			substitutions,
		}
	}

	/// Check the guard, if any.
	pub fn applies_to(&self, line: &str) -> bool {
		self.guard.as_ref().is_none_or(|g| g.matches(line))
	}

	/// Run every substitution of this step over `line`.
	pub fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
		if !self.applies_to(line) {
			return Cow::Borrowed(line);
		}

		let mut current = Cow::Borrowed(line);
		for sub in &self.substitutions {
			let replaced = match sub.apply(&current) {
				Cow::Owned(text) => Some(text),
				Cow::Borrowed(_) => None,
			};
			if let Some(text) = replaced {
				current = Cow::Owned(text);
			}
		}
		current
	}
}

/// Split a string by a delimiter, respecting backslash escapes.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();
	let mut escape_next = false;

	while let Some(c) = chars.next() {
		if escape_next {
			current.push(c);
			escape_next = false;
		} else if c == '\\' {
			// Check if we're escaping the delimiter
			if chars.peek() == Some(&delimiter) {
				escape_next = true;
			} else {
				current.push(c);
			}
		} else if c == delimiter {
			parts.push(current);
			current = String::new();
		} else {
			current.push(c);
		}
	}

	parts.push(current);

	parts
}

/// MySQL column types and their PostgreSQL counterparts.
///
/// Each entry is `(name, pattern, replacement)`. Every pattern is anchored on a
/// word boundary and lowercase, so already-converted uppercase types never match
/// again. Display widths and precisions are dropped except for `varchar`.
pub const TYPE_MAPPINGS: &[(&str, &str, &str)] = &[
	("int", r"\bint\(\d+\)", "INTEGER"),
	("tinyint", r"\btinyint\(\d+\)", "SMALLINT"),
	("smallint", r"\bsmallint\(\d+\)", "SMALLINT"),
	("mediumint", r"\bmediumint\(\d+\)", "INTEGER"),
	("bigint", r"\bbigint\(\d+\)", "BIGINT"),
	("float", r"\bfloat\(\d+,\d+\)", "REAL"),
	("double", r"\bdouble\(\d+,\d+\)", "DOUBLE PRECISION"),
	("decimal", r"\bdecimal\(\d+,\d+\)", "DECIMAL"),
	("varchar", r"\bvarchar\((\d+)\)", "VARCHAR(${1})"),
	("text", r"\btext\b", "TEXT"),
	("longtext", r"\blongtext\b", "TEXT"),
	("mediumtext", r"\bmediumtext\b", "TEXT"),
	("tinytext", r"\btinytext\b", "TEXT"),
	("datetime", r"\bdatetime\b", "TIMESTAMP"),
	("timestamp", r"\btimestamp\b", "TIMESTAMP"),
];

/// Escape `$` so a literal can be embedded in a regex replacement.
fn escape_replacement(literal: &str) -> String {
	literal.replace('$', "$$")
}

/// The built-in rewrite steps in application order.
///
/// `table_prefix` is prepended to every table name that is dropped, created or
/// inserted into, so converted tables do not collide with existing ones.
pub fn builtin_steps(table_prefix: &str) -> Result<Vec<RewriteStep>> {
	let prefix = escape_replacement(table_prefix);
	let mut steps = Vec::with_capacity(TYPE_MAPPINGS.len() + 6);

	steps.push(RewriteStep::single(Substitution::new(
		"drop-table",
		r"DROP TABLE IF EXISTS `([^`]+)`;",
		format!("DROP TABLE IF EXISTS {prefix}${{1}} CASCADE;"),
	)?));
	steps.push(RewriteStep::guarded(
		LineMatcher::Contains("CREATE TABLE"),
		vec![
			Substitution::new(
				"create-table",
				r"CREATE TABLE `([^`]+)`",
				format!("CREATE TEMPORARY TABLE {prefix}${{1}}"),
			)?,
			Substitution::new("table-options", r"\) ENGINE=\w+ DEFAULT CHARSET=\w+;", ");")?,
		],
	));

	for &(name, pattern, replacement) in TYPE_MAPPINGS {
		steps.push(RewriteStep::single(Substitution::new(
			name,
			pattern,
			replacement,
		)?));
	}

	// No identity clause replaces AUTO_INCREMENT.
	steps.push(RewriteStep::single(Substitution::new(
		"auto-increment",
		r"\bAUTO_INCREMENT\b",
		"",
	)?));
	steps.push(RewriteStep::single(Substitution::new(
		"unsigned",
		r"\bUNSIGNED\b",
		"",
	)?));
	steps.push(RewriteStep::single(Substitution::new(
		"backticks",
		r"`([^`]+)`",
		"${1}",
	)?));
	steps.push(RewriteStep::guarded(
		LineMatcher::StartsWith("INSERT INTO "),
		vec![Substitution::new(
			"insert-table",
			r"INSERT INTO ([a-zA-Z_]+)",
			format!("INSERT INTO {prefix}${{1}}"),
		)?],
	));

	Ok(steps)
}
