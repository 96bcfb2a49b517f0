use anyhow::Result;

use crate::{CliTest, stdout};

const FAQ: &str = "# FAQ\n\n- Attack\n";
const ATTACK: &str = "app.content.faq.list_item.1";

#[test]
fn test_edit_moves_entry_to_draft() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;

    let out = test.run_ok(&["review", "--lang", "ko", "edit", ATTACK, "공격"])?;
    assert!(out.contains("ko app.content.faq.list_item.1: untranslated -> draft"));

    let store = test.read_json("data/translations/ko.json")?;
    assert_eq!(store[ATTACK]["text"], "공격");
    assert_eq!(store[ATTACK]["status"], "draft");

    Ok(())
}

#[test]
fn test_skipping_to_approved_is_rejected() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["sync"])?;
    let before = test.read_file("data/translations/ko.json")?;

    let output = test.run(&["review", "--lang", "ko", "set-status", ATTACK, "approved"])?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("review-rejected"));
    assert!(out.contains("unchanged (untranslated)"));
    assert_eq!(test.read_file("data/translations/ko.json")?, before);

    Ok(())
}

#[test]
fn test_unknown_id_is_rejected() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;

    let output = test.run(&["review", "--lang", "ko", "edit", "app.content.nope.text.0", "x"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("review-rejected"));
    assert!(!test.root().join("data/translations/ko.json").exists());

    Ok(())
}

#[test]
fn test_backward_move_needs_force() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", ATTACK, "공격"])?;
    test.run_ok(&["review", "--lang", "ko", "set-status", ATTACK, "submitted"])?;

    let output = test.run(&["review", "--lang", "ko", "set-status", ATTACK, "draft"])?;
    assert_eq!(output.status.code(), Some(1));

    test.run_ok(&["review", "--lang", "ko", "set-status", ATTACK, "draft", "--force"])?;
    let store = test.read_json("data/translations/ko.json")?;
    assert_eq!(store[ATTACK]["status"], "draft");

    Ok(())
}
