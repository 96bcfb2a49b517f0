use anyhow::Result;

use crate::{CliTest, stdout};

const FAQ: &str = "# FAQ\n\n- Attack\n- Defense\n";

#[test]
fn test_extract_writes_catalog_and_snapshot() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;

    let out = test.run_ok(&["extract"])?;
    assert!(out.contains("Wrote catalog"));
    assert!(out.contains("3 strings"));
    assert!(out.contains("First catalog generation."));

    let catalog = test.read_json("data/source-strings.json")?;
    let section = &catalog["sections"]["app/content/faq"];
    assert_eq!(section["sourceFile"], "content/faq.md");
    assert_eq!(section["strings"][1]["id"], "app.content.faq.list_item.1");
    assert_eq!(section["strings"][1]["en"], "Attack");
    assert_eq!(section["strings"][1]["hash"].as_str().map(str::len), Some(8));

    let version = catalog["meta"]["version"].as_str().unwrap_or_default();
    let snapshot = format!("data/snapshots/source-strings-{version}.json");
    assert!(test.root().join(snapshot).exists());

    Ok(())
}

#[test]
fn test_extract_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;

    let out = test.run_ok(&["extract", "--dry-run"])?;
    assert!(out.contains("Would write catalog"));
    assert!(!test.root().join("data").exists());

    Ok(())
}

#[test]
fn test_second_extract_reports_changes() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    let first = test.read_json("data/source-strings.json")?;

    test.write_file("content/faq.md", "# FAQ\n\n- Melee Attack\n- Defense\n- Magic\n")?;
    let out = test.run_ok(&["extract"])?;

    assert!(out.contains("Changes since"));
    assert!(out.contains("  added    1\n"));
    assert!(out.contains("+ app.content.faq.list_item.3"));
    assert!(out.contains("  changed  1\n"));
    assert!(out.contains("~ app.content.faq.list_item.1"));

    let second = test.read_json("data/source-strings.json")?;
    assert_ne!(first["meta"]["version"], second["meta"]["version"]);

    Ok(())
}

#[test]
fn test_extract_is_deterministic() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    let first = test.read_json("data/source-strings.json")?;
    test.run_ok(&["extract"])?;
    let second = test.read_json("data/source-strings.json")?;

    assert_eq!(first["sections"], second["sections"]);

    let out = test.run_ok(&["diff"])?;
    assert!(out.contains("  unchanged3\n"));

    Ok(())
}

#[test]
fn test_malformed_file_is_reported_and_skipped() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".transcatrc.json",
        r#"{
          "languages": ["ko"],
          "projects": [{"name": "app", "scans": [{"dir": "src", "format": "vue"}]}]
        }"#,
    )?;
    test.write_file(
        "src/App.vue",
        r#"<template><button title="Save changes">Save</button></template>"#,
    )?;
    test.write_file("src/Broken.vue", "<template><div>Hello</div>")?;

    let output = test.run(&["extract"])?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("extraction-failed"));
    assert!(out.contains("--> src/Broken.vue"));
    assert!(out.contains("1 problems (1 error, 0 warnings)"));

    let catalog = test.read_json("data/source-strings.json")?;
    assert_eq!(catalog["meta"]["totalStrings"], 2);
    assert!(catalog["sections"].get("app/vue/Broken").is_none());

    Ok(())
}

#[test]
fn test_catalog_not_written_without_snapshot() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    // A file where the snapshot directory belongs.
    test.write_file("data/snapshots", "")?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(crate::stderr(&output).contains("Failed to write catalog snapshot"));
    assert!(!test.root().join("data/source-strings.json").exists());

    Ok(())
}
