use anyhow::Result;

use crate::{CliTest, stdout};

const FAQ: &str = "# FAQ\n\n- Attack\n";
const ATTACK: &str = "app.content.faq.list_item.1";

#[test]
fn test_sync_creates_store_entries() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;

    let out = test.run_ok(&["sync"])?;
    assert!(out.contains("ko (new)"));
    assert!(out.contains("strings:  2 new"));

    let store = test.read_json("data/translations/ko.json")?;
    assert_eq!(store["_meta"]["code"], "ko");
    assert_eq!(store["_meta"]["language"], "Korean");
    assert_eq!(store[ATTACK]["status"], "untranslated");
    assert!(!test.root().join("data/translations/ko.json.lock").exists());

    let out = test.run_ok(&["sync"])?;
    assert!(out.contains("strings:  up to date"));

    Ok(())
}

#[test]
fn test_sync_without_catalog_is_an_error() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;

    let output = test.run(&["sync"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(crate::stderr(&output).contains("transcat extract"));

    Ok(())
}

#[test]
fn test_sync_rejects_unknown_language() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;

    let output = test.run(&["sync", "--lang", "ja"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(crate::stderr(&output).contains("Language 'ja' is not configured"));

    Ok(())
}

#[test]
fn test_source_change_downgrades_approved_translation() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", ATTACK, "공격"])?;
    test.run_ok(&["review", "--lang", "ko", "set-status", ATTACK, "submitted"])?;
    test.run_ok(&["review", "--lang", "ko", "set-status", ATTACK, "approved"])?;

    test.write_file("content/faq.md", "# FAQ\n\n- Melee Attack\n")?;
    test.run_ok(&["extract"])?;
    let output = test.run(&["sync"])?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("1 need review again"));
    assert!(out.contains("stale-translation"));
    assert!(out.contains("--> ko:app.content.faq.list_item.1"));

    let store = test.read_json("data/translations/ko.json")?;
    assert_eq!(store[ATTACK]["status"], "needs_review");
    assert_eq!(store[ATTACK]["text"], "공격");

    Ok(())
}

#[test]
fn test_removed_string_is_orphaned_and_restored() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", ATTACK, "공격"])?;

    test.write_file("content/faq.md", "# FAQ\n")?;
    test.run_ok(&["extract"])?;
    let out = test.run_ok(&["sync"])?;
    assert!(out.contains("1 orphaned"));

    let store = test.read_json("data/translations/ko.json")?;
    assert_eq!(store[ATTACK]["orphaned"], true);
    assert_eq!(store[ATTACK]["text"], "공격");
    assert_eq!(store[ATTACK]["status"], "draft");

    test.write_file("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    let out = test.run_ok(&["sync"])?;
    assert!(out.contains("1 restored"));

    let store = test.read_json("data/translations/ko.json")?;
    assert!(store[ATTACK].get("orphaned").is_none());
    assert_eq!(store[ATTACK]["status"], "draft");

    Ok(())
}

#[test]
fn test_translate_without_provider_is_an_error() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;

    let output = test.run(&["translate", "--lang", "ko"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(crate::stderr(&output).contains("No translation provider configured"));
    assert!(!test.root().join("data/translations/ko.json").exists());

    Ok(())
}

#[test]
fn test_missing_snapshot_still_catches_source_change() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", ATTACK, "공격"])?;
    test.run_ok(&["review", "--lang", "ko", "set-status", ATTACK, "submitted"])?;
    std::fs::remove_dir_all(test.root().join("data/snapshots"))?;

    test.write_file("content/faq.md", "# FAQ\n\n- Melee Attack\n")?;
    test.run_ok(&["extract"])?;
    let out = test.run_ok(&["sync"])?;

    assert!(out.contains("missing-snapshot"));
    assert!(out.contains("unverified"));
    assert!(!out.contains("stale-translation"));
    let store = test.read_json("data/translations/ko.json")?;
    assert_eq!(store[ATTACK]["status"], "needs_review");

    test.run_ok(&["review", "--lang", "ko", "edit", ATTACK, "근접 공격"])?;
    test.run_ok(&["export"])?;
    let nested = test.read_json("data/exports/app/ko.json")?;
    assert_eq!(nested["faq"]["1"], "근접 공격");

    Ok(())
}
