use anyhow::Result;

use crate::CliTest;

const FAQ: &str = "# FAQ\n\n- Attack\n- Defense\n";

#[test]
fn test_status_before_extract() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;

    let out = test.run_ok(&["status"])?;
    assert!(out.contains("No catalog yet"));

    Ok(())
}

#[test]
fn test_status_counts_per_language() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["review", "--lang", "ko", "edit", "app.content.faq.list_item.1", "공격"])?;

    let out = test.run_ok(&["status"])?;
    let lines: Vec<&str> = out.lines().collect();

    assert!(lines[0].starts_with("Catalog "));
    assert!(lines[0].ends_with("(3 strings)"));
    assert!(lines[1].starts_with("lang  name"));
    assert!(lines[1].contains("untranslated  needs_review  draft"));
    assert!(lines[1].ends_with(">= draft"));
    // ko, Korean, 2 untranslated, 0 needs_review, 1 draft, 0, 0, 0 orphaned, 1 exportable
    let cells: Vec<&str> = lines[2].split_whitespace().collect();
    assert_eq!(cells, vec!["ko", "Korean", "2", "0", "1", "0", "0", "0", "1"]);
    assert!(!out.contains("behind the catalog"));

    Ok(())
}

#[test]
fn test_status_flags_store_behind_catalog() -> Result<()> {
    let test = CliTest::with_content("content/faq.md", FAQ)?;
    test.run_ok(&["extract"])?;
    test.run_ok(&["sync"])?;
    test.write_file("content/faq.md", "# FAQ\n\n- Attack\n- Defense\n- Magic\n")?;
    test.run_ok(&["extract"])?;

    let out = test.run_ok(&["status"])?;
    assert!(out.contains("ko is behind the catalog (1 string without entry"));

    Ok(())
}
