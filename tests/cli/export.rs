use anyhow::Result;
use serde_json::json;

use crate::{CliTest, stdout};

const FAQ: &str = "# FAQ\n\n- Attack\n";
const ATTACK: &str = "app.content.faq.list_item.1";

fn approve(test: &CliTest, id: &str, text: &str) -> Result<()> {
    test.run_ok(&["review", "--lang", "ko", "edit", id, text])?;
    test.run_ok(&["review", "--lang", "ko", "set-status", id, "submitted"])?;
    test.run_ok(&["review", "--lang", "ko", "set-status", id, "approved"])?;
    Ok(())
}

#[test]
fn test_export_writes_nested_and_flat_files() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", ATTACK, "공격"])?;

    let out = test.run_ok(&["export"])?;
    assert!(out.contains("Wrote"));
    assert!(out.contains("(app, 1 string)"));
    assert!(out.contains("Threshold: draft"));

    let nested = test.read_json("data/exports/app/ko.json")?;
    assert_eq!(nested, json!({"faq": {"1": "공격"}}));

    let flat = test.read_json("data/exports/app/ko-flat.json")?;
    assert_eq!(flat["_meta"]["language"], "ko");
    assert_eq!(
        flat["strings"][ATTACK],
        json!({"en": "Attack", "ko": "공격", "status": "draft"})
    );

    Ok(())
}

#[test]
fn test_threshold_filters_entries() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", ATTACK, "공격"])?;

    test.run_ok(&["export", "--threshold", "approved"])?;

    let nested = test.read_json("data/exports/app/ko.json")?;
    assert_eq!(nested, json!({}));

    Ok(())
}

#[test]
fn test_export_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;

    let out = test.run_ok(&["export", "--dry-run"])?;
    assert!(out.contains("Would write"));
    assert!(!test.root().join("data/exports").exists());

    Ok(())
}

#[test]
fn test_colliding_paths_are_withheld() -> Result<()> {
    let test = CliTest::with_content("content/a/faq.md", FAQ)?;
    test.write_file("content/b/faq.md", "# Other FAQ\n\n- Defense\n")?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", "app.content.a.faq.list_item.1", "공격"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", "app.content.b.faq.list_item.1", "방어"])?;

    let output = test.run(&["export"])?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("export-collision"));
    assert!(out.contains("2 withheld"));

    let nested = test.read_json("data/exports/app/ko.json")?;
    assert_eq!(nested, json!({}));

    Ok(())
}

#[test]
fn test_changed_source_leaves_approved_export() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    approve(&test, ATTACK, "공격")?;

    // Unchanged re-extraction keeps the translation.
    test.run_ok(&["extract"])?;
    test.run_ok(&["sync"])?;
    test.run_ok(&["export", "--threshold", "approved"])?;
    assert_eq!(
        test.read_json("data/exports/app/ko.json")?,
        json!({"faq": {"1": "공격"}})
    );

    // Changed text is held back even before the store is synced.
    test.write_file("content/faq.md", "# FAQ\n\n- Melee Attack\n")?;
    test.run_ok(&["extract"])?;
    let out = test.run_ok(&["export", "--threshold", "approved"])?;
    assert!(out.contains("unsynced"));
    assert_eq!(test.read_json("data/exports/app/ko.json")?, json!({}));

    test.run_ok(&["sync"])?;
    test.run_ok(&["export", "--threshold", "approved"])?;
    assert_eq!(test.read_json("data/exports/app/ko.json")?, json!({}));
    let store = test.read_json("data/translations/ko.json")?;
    assert_eq!(store[ATTACK]["status"], "needs_review");

    Ok(())
}
