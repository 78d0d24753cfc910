#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn mysql2pg_cmd() -> assert_cmd::Command {
	assert_cmd::Command::cargo_bin("mysql2pg").unwrap()
}

const PROLOGUE: &str = "\
-- Converted PEQ Database for PostgreSQL
-- Original MySQL dump converted to PostgreSQL syntax

SET client_encoding = 'UTF8';
SET standard_conforming_strings = on;

";

const DUMP: &str = "\
-- MySQL dump 10.13  Distrib 5.7.33, for Linux (x86_64)
--
-- Host: localhost    Database: peq
/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;
/*!40101 SET NAMES utf8 */;
SET NAMES utf8;
SET FOREIGN_KEY_CHECKS=0;
CREATE DATABASE /*!32312 IF NOT EXISTS*/ `peq`;
USE `peq`;
DROP TABLE IF EXISTS `npc_types`;
CREATE TABLE `npc_types` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `name` text NOT NULL,
  `level` tinyint(2) UNSIGNED NOT NULL DEFAULT '0',
  `hp` bigint(20) NOT NULL DEFAULT '0',
  `walkspeed` float(10,2) NOT NULL,
  `attack_delay` double(10,4) NOT NULL,
  `updated` datetime DEFAULT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=latin1;
LOCK TABLES `npc_types` WRITE;
INSERT INTO `npc_types` VALUES (1,'Guard',10,100,1.25,30.0000,NULL);
UNLOCK TABLES;
";

const EXPECTED_BODY: &str = "\
DROP TABLE IF EXISTS temp_npc_types CASCADE;
CREATE TEMPORARY TABLE temp_npc_types (
  id INTEGER NOT NULL ,
  name TEXT NOT NULL,
  level SMALLINT  NOT NULL DEFAULT '0',
  hp BIGINT NOT NULL DEFAULT '0',
  walkspeed REAL NOT NULL,
  attack_delay DOUBLE PRECISION NOT NULL,
  updated TIMESTAMP DEFAULT NULL,
  PRIMARY KEY (id)
) ENGINE=InnoDB DEFAULT CHARSET=latin1;
INSERT INTO temp_npc_types VALUES (1,'Guard',10,100,1.25,30.0000,NULL);
";

fn write_dump(dir: &Path, content: &[u8]) -> std::path::PathBuf {
	let path = dir.join("dump.sql");
	fs::write(&path, content).unwrap();
	path
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn test_help_flag() {
	mysql2pg_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Convert a MySQL dump"));
}

#[test]
fn test_version_flag() {
	mysql2pg_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("mysql2pg"));
}

#[test]
fn test_no_args_shows_usage() {
	mysql2pg_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_one_arg_shows_usage() {
	mysql2pg_cmd()
		.arg("only-input.sql")
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_three_args_shows_usage() {
	let temp_dir = tempfile::tempdir().unwrap();

	mysql2pg_cmd()
		.args(["a.sql", "b.sql", "c.sql"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));

	assert!(!temp_dir.path().join("b.sql").exists());
}

#[test]
fn test_missing_input_creates_no_output() {
	let temp_dir = tempfile::tempdir().unwrap();
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.arg(temp_dir.path().join("missing.sql"))
		.arg(&output)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Input file not found"));

	assert!(!output.exists());
}

#[test]
fn test_missing_input_leaves_existing_output_alone() {
	let temp_dir = tempfile::tempdir().unwrap();
	let output = temp_dir.path().join("out.sql");
	fs::write(&output, "keep me\n").unwrap();

	mysql2pg_cmd()
		.arg(temp_dir.path().join("missing.sql"))
		.arg(&output)
		.assert()
		.failure();

	assert_eq!(fs::read_to_string(&output).unwrap(), "keep me\n");
}

#[test]
fn test_invalid_table_prefix_rejected() {
	let temp_dir = tempfile::tempdir().unwrap();
	let input = write_dump(temp_dir.path(), DUMP.as_bytes());

	mysql2pg_cmd()
		.args(["--table-prefix", "bad-prefix"])
		.arg(&input)
		.arg(temp_dir.path().join("out.sql"))
		.assert()
		.failure()
		.stderr(predicate::str::contains("table-prefix"));
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn test_converts_dump() {
	let temp_dir = tempfile::tempdir().unwrap();
	let input = write_dump(temp_dir.path(), DUMP.as_bytes());
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.arg(&input)
		.arg(&output)
		.assert()
		.success()
		.stdout(predicate::str::contains(
			"Conversion complete: 23 lines processed, 11 lines converted",
		));

	let content = fs::read_to_string(&output).unwrap();
	assert_eq!(content, format!("{PROLOGUE}{EXPECTED_BODY}"));
}

#[test]
fn test_output_is_overwritten() {
	let temp_dir = tempfile::tempdir().unwrap();
	let input = write_dump(temp_dir.path(), b"SELECT 1;\n");
	let output = temp_dir.path().join("out.sql");
	fs::write(&output, "old\n".repeat(50)).unwrap();

	mysql2pg_cmd()
		.arg(&input)
		.arg(&output)
		.assert()
		.success();

	assert_eq!(
		fs::read_to_string(&output).unwrap(),
		format!("{PROLOGUE}SELECT 1;\n")
	);
}

#[test]
fn test_invalid_utf8_does_not_abort() {
	let temp_dir = tempfile::tempdir().unwrap();
	let input = write_dump(
		temp_dir.path(),
		b"INSERT INTO `item` VALUES (1,'Caf\xe9 \xff');\nSELECT 1;\n",
	);
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.arg(&input)
		.arg(&output)
		.assert()
		.success()
		.stdout(predicate::str::contains("2 lines processed"));

	assert_eq!(
		fs::read_to_string(&output).unwrap(),
		format!("{PROLOGUE}INSERT INTO temp_item VALUES (1,'Caf ');\nSELECT 1;\n")
	);
}

#[test]
fn test_progress_every_ten_thousand_lines() {
	let temp_dir = tempfile::tempdir().unwrap();
	let input = write_dump(temp_dir.path(), "SELECT 1;\n".repeat(20_001).as_bytes());
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.arg(&input)
		.arg(&output)
		.assert()
		.success()
		.stdout(predicate::str::contains("Processed 10000 lines, converted 0 lines"))
		.stdout(predicate::str::contains("Processed 20000 lines, converted 0 lines"))
		.stdout(predicate::str::contains("Processed 20001").not());
}

#[test]
fn test_quiet_suppresses_progress() {
	let temp_dir = tempfile::tempdir().unwrap();
	let input = write_dump(temp_dir.path(), "SELECT 1;\n".repeat(10_000).as_bytes());
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.arg("--quiet")
		.arg(&input)
		.arg(&output)
		.assert()
		.success()
		.stdout(predicate::str::contains("Processed").not())
		.stdout(predicate::str::contains("Conversion complete"));
}

#[test]
fn test_table_prefix_flag() {
	let temp_dir = tempfile::tempdir().unwrap();
	let input = write_dump(temp_dir.path(), b"INSERT INTO item VALUES (1,2,3);\n");
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.args(["--table-prefix", "peq_"])
		.arg(&input)
		.arg(&output)
		.assert()
		.success();

	assert!(
		fs::read_to_string(&output)
			.unwrap()
			.ends_with("INSERT INTO peq_item VALUES (1,2,3);\n")
	);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_in_working_directory_is_not_read() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".mysql2pg.toml"),
		"table-prefix = \"zz_\"\n",
	)
	.unwrap();
	write_dump(temp_dir.path(), b"INSERT INTO `item` VALUES (1);\n");

	mysql2pg_cmd()
		.args(["dump.sql", "out.sql"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	assert_eq!(
		fs::read_to_string(temp_dir.path().join("out.sql")).unwrap(),
		format!("{PROLOGUE}INSERT INTO temp_item VALUES (1);\n")
	);
}

#[test]
fn test_malformed_config_in_working_directory_is_ignored() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".mysql2pg.toml"), "invalid toml [[[").unwrap();
	write_dump(temp_dir.path(), b"SELECT 1;\n");

	mysql2pg_cmd()
		.args(["dump.sql", "out.sql"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("1 lines processed"));
}

#[test]
fn test_missing_input_reported_before_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config = temp_dir.path().join("broken.toml");
	fs::write(&config, "invalid toml [[[").unwrap();
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.arg("--config")
		.arg(&config)
		.arg(temp_dir.path().join("missing.sql"))
		.arg(&output)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Input file not found"))
		.stderr(predicate::str::contains("broken.toml").not());

	assert!(!output.exists());
}

#[test]
fn test_config_rules_and_prefix_apply() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config = temp_dir.path().join("mig.toml");
	fs::write(
		&config,
		r#"
table-prefix = "mig_"

[[rules]]
skip_pattern = "^INSERT INTO mig_logs\\b"

[[rules]]
rewrite = "s/ ENGINE=InnoDB DEFAULT CHARSET=latin1//g"
"#,
	)
	.unwrap();
	let input = write_dump(
		temp_dir.path(),
		b"INSERT INTO `logs` VALUES (1);\nINSERT INTO `item` VALUES (1);\n) ENGINE=InnoDB DEFAULT CHARSET=latin1;\n",
	);
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.arg("--config")
		.arg(&config)
		.arg(&input)
		.arg(&output)
		.assert()
		.success()
		.stdout(predicate::str::contains("3 lines processed, 2 lines converted"));

	assert_eq!(
		fs::read_to_string(&output).unwrap(),
		format!("{PROLOGUE}INSERT INTO mig_item VALUES (1);\n);\n")
	);
}

#[test]
fn test_explicit_config_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config = temp_dir.path().join("custom.toml");
	fs::write(&config, "progress-interval = 2\n").unwrap();
	let input = write_dump(temp_dir.path(), "SELECT 1;\n".repeat(4).as_bytes());

	mysql2pg_cmd()
		.arg("--config")
		.arg(&config)
		.arg(&input)
		.arg(temp_dir.path().join("out.sql"))
		.assert()
		.success()
		.stdout(predicate::str::contains("Processed 2 lines"))
		.stdout(predicate::str::contains("Processed 4 lines"));
}

#[test]
fn test_invalid_config_fails() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config = temp_dir.path().join("broken.toml");
	fs::write(&config, "invalid toml [[[").unwrap();
	let input = write_dump(temp_dir.path(), b"SELECT 1;\n");
	let output = temp_dir.path().join("out.sql");

	mysql2pg_cmd()
		.arg("--config")
		.arg(&config)
		.arg(&input)
		.arg(&output)
		.assert()
		.failure()
		.stderr(predicate::str::contains("broken.toml"));

	assert!(!output.exists());
}
