use crate::error::{ConvertError, Result};
use regex::Regex;

/// A condition evaluated against the text of a single line.
#[derive(Debug, Clone)]
pub enum LineMatcher {
	/// The line begins with the given literal.
	StartsWith(&'static str),

	/// The line contains the given literal anywhere.
	Contains(&'static str),

	/// Every inner matcher holds.
	All(Vec<LineMatcher>),

	/// The line matches a user-supplied regex.
	Pattern(Regex),
}

impl LineMatcher {
	/// Check whether this matcher holds for `line`.
	pub fn matches(&self, line: &str) -> bool {
		match self {
			LineMatcher::StartsWith(prefix) => line.starts_with(prefix),
			LineMatcher::Contains(needle) => line.contains(needle),
			LineMatcher::All(matchers) => matchers.iter().all(|m| m.matches(line)),
			LineMatcher::Pattern(regex) => regex.is_match(line),
		}
	}
}

/// A rule that elides a whole line when its matcher holds.
#[derive(Debug, Clone)]
pub struct SkipRule {
	/// Short identifier used in debug logging.
	pub name: String,

	/// Condition that triggers elision.
	pub matcher: LineMatcher,
}

impl SkipRule {
	fn new(name: &str, matcher: LineMatcher) -> Self {
		SkipRule {
			name: name.to_string(),
			matcher,
		}
	}
}

/// Session statements that have no meaning in the target database.
const SESSION_SETTINGS: &[(&str, &str)] = &[
	("user-variable", "SET @"),
	("connection-names", "SET NAMES"),
	("client-charset", "SET character_set_client"),
	("foreign-key-checks", "SET FOREIGN_KEY_CHECKS"),
	("unique-checks", "SET UNIQUE_CHECKS"),
	("sql-mode", "SET SQL_MODE"),
	("time-zone", "SET TIME_ZONE"),
	("sql-notes", "SET SQL_NOTES"),
];

/// The built-in elision rules in priority order.
pub fn builtin_skip_rules() -> Vec<SkipRule> {
	let mut rules = vec![
		SkipRule::new("versioned-comment", LineMatcher::StartsWith("/*!")),
		SkipRule::new("line-comment", LineMatcher::StartsWith("--")),
	];

	rules.extend(
		SESSION_SETTINGS
			.iter()
			.map(|&(name, needle)| SkipRule::new(name, LineMatcher::Contains(needle))),
	);

	rules.push(SkipRule::new(
		"create-database",
		LineMatcher::All(vec![
			LineMatcher::Contains("CREATE DATABASE"),
			LineMatcher::Contains("IF NOT EXISTS"),
		]),
	));
	rules.push(SkipRule::new("use-database", LineMatcher::StartsWith("USE ")));
	// Also catches UNLOCK TABLES.
	rules.push(SkipRule::new("lock-tables", LineMatcher::Contains("LOCK TABLES")));
	rules.push(SkipRule::new(
		"set-client-charset",
		LineMatcher::All(vec![
			LineMatcher::StartsWith("SET "),
			LineMatcher::Contains("character_set_client"),
		]),
	));

	rules
}

/// Find the first skip rule that matches `line`.
pub fn find_skip_rule<'a>(rules: &'a [SkipRule], line: &str) -> Option<&'a SkipRule> {
	rules.iter().find(|rule| rule.matcher.matches(line))
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| ConvertError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}
