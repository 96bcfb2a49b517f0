use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let out = test.run_ok(&["init"])?;
    assert!(out.contains("Created"));
    assert!(test.root().join(".transcatrc.json").exists());

    let content = test.read_file(".transcatrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["sourceLanguage"], "en");
    assert_eq!(parsed["dataRoot"], "./data");
    assert_eq!(parsed["exportThreshold"], "draft");
    assert!(parsed["projects"].is_array());
    assert!(content.contains("\n  \""), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".transcatrc.json", "{}")?;

    let output = test.run(&["init"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains(".transcatrc.json already exists"));
    assert_eq!(test.read_file(".transcatrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.run_ok(&["init"])?;
    test.write_file("content/guide.md", "# Getting Started\n")?;

    test.run_ok(&["extract"])?;

    let catalog = test.read_json("data/source-strings.json")?;
    assert_eq!(catalog["meta"]["totalStrings"], 1);

    Ok(())
}
