use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use catdb::{list, list_items, update_from_files};

// X < Y в порядке байтов id
const X: &str = "00000000000000000000000000000001";
const Y: &str = "ffffffffffffffffffffffffffffffff";

fn build_db(prefix: &str) -> Result<PathBuf> {
    let root = unique_root(prefix);
    fs::create_dir_all(&root)?;
    // X только под en и de, Y — под neutral
    let f = root.join("messages.catalog");
    fs::write(
        &f,
        format!(
            "-- {x} en\nSubject: x-en\n\nEnglish X\n\n-- {x} de\nSubject: x-de\n\nGerman X\n\n-- {y}\nDefined-By: test\nSubject: y\n\nNeutral Y\n",
            x = X,
            y = Y
        ),
    )?;
    let db = root.join("messages.cat");
    update_from_files(&db, &[f])?;
    Ok(db)
}

#[test]
fn full_list_emits_one_entry_per_id_in_id_order() -> Result<()> {
    let db = build_db("dedup")?;
    let mut out = Vec::new();
    list(&mut out, &db, true, Some("en_US.UTF-8"))?;
    let text = String::from_utf8(out)?;

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2, "ровно по одной строке на id:\n{}", text);
    assert_eq!(lines[0], format!("{} n/a: x-en", X));
    assert_eq!(lines[1], format!("{} test: y", Y));
    Ok(())
}

#[test]
fn list_without_matching_locale_still_emits_every_id() -> Result<()> {
    let db = build_db("nolocale")?;
    // X не имеет neutral записи: при C-локали выводится его первая запись (de)
    let mut out = Vec::new();
    list(&mut out, &db, true, None)?;
    let text = String::from_utf8(out)?;

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("{} n/a: x-de", X));
    Ok(())
}

#[test]
fn full_dump_renders_marker_and_payload() -> Result<()> {
    let db = build_db("dump")?;
    let mut out = Vec::new();
    list(&mut out, &db, false, None)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains(&format!("-- {}\nDefined-By: test\nSubject: y\n\nNeutral Y\n", Y)));
    Ok(())
}

#[test]
fn list_items_is_fail_soft_and_reports_first_error() -> Result<()> {
    let db = build_db("items")?;
    let items = vec![
        "not-an-id".to_string(),
        X.to_string(),
        "deadbeefdeadbeefdeadbeefdeadbeef".to_string(),
    ];
    let mut out = Vec::new();
    let res = list_items(&mut out, &db, true, &items, Some("en"));
    let text = String::from_utf8(out)?;

    // валидный id всё равно выведен
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with(X));
    // итог несёт первую ошибку (парсинг 'not-an-id')
    let err = res.unwrap_err();
    assert!(err.to_string().contains("not-an-id"), "{:#}", err);
    Ok(())
}

#[test]
fn list_items_not_found_alone_is_the_error() -> Result<()> {
    let db = build_db("items-miss")?;
    let items = vec![Y.to_string(), "deadbeefdeadbeefdeadbeefdeadbeef".to_string()];
    let mut out = Vec::new();
    let res = list_items(&mut out, &db, true, &items, None);
    let text = String::from_utf8(out)?;

    assert_eq!(text.lines().count(), 1);
    let err = res.unwrap_err();
    assert!(err.to_string().contains("no catalog entry"), "{:#}", err);
    Ok(())
}

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("catdb-list-{}-{}-{}", prefix, pid, t))
}
