//! Импорт одного текстового *.catalog файла в merge-таблицу.
//!
//! Грамматика источника:
//! - маркер новой записи: строка `-- <32 hex>` (плюс опциональный язык через
//!   пробел), распознаётся только в начале файла или после пустой строки;
//! - всё до следующего маркера — payload записи;
//! - строки, начинающиеся с '#' или ';', пропускаются целиком;
//! - подряд идущие пустые строки внутри payload'а схлопываются в одну,
//!   хвостовые отбрасываются (флаг "pending blank");
//! - строка, похожая на маркер, но с не-hex id — обычный payload.
//!
//! Язык записи: явный тег на маркере перекрывает язык файла (из имени,
//! `*.de.catalog`); совпадение с языком файла — предупреждение и тег
//! отбрасывается; расхождение — предупреждение, берётся явный тег.
//!
//! Все фатальные ошибки (payload до первого маркера, запись без payload'а,
//! тег вне [1, 31]) — ParseError с путём и номером строки; импорт файла
//! прерывается целиком.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::build::merge::{insert_entry, CatalogKey, CatalogMap};
use crate::consts::{COMMENT_CHARS, MAX_LANG_LEN};
use crate::error::ParseError;
use crate::id128::MessageId;
use crate::lang::file_default_lang;

pub fn import_file(map: &mut CatalogMap, path: &Path) -> Result<()> {
    let f = File::open(path).with_context(|| format!("open catalog source {}", path.display()))?;
    let reader = BufReader::new(f);

    let deflang = file_default_lang(path);
    if let Some(ref l) = deflang {
        debug!("file {} has default language {}", path.display(), l);
    }

    let mut current: Option<MessageId> = None;
    let mut lang: Option<String> = None;
    let mut payload = String::new();
    let mut empty_line = true;
    let mut n = 0u32;

    for line in reader.lines() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        n += 1;

        if line.is_empty() {
            empty_line = true;
            continue;
        }
        if COMMENT_CHARS.contains(&line.as_bytes()[0]) {
            continue;
        }

        if empty_line {
            if let Some((id, explicit)) = parse_marker(&line) {
                if let Some(prev) = current {
                    flush_entry(map, path, n, prev, &mut lang, deflang.as_deref(), &mut payload)?;
                }
                lang = entry_lang(path, n, explicit, deflang.as_deref())?;
                current = Some(id);
                empty_line = false;
                continue;
            }
        }

        // Payload-строка
        if current.is_none() {
            return Err(ParseError::new(path, n, "got payload before ID").into());
        }
        if empty_line {
            payload.push('\n');
        }
        payload.push_str(&line);
        payload.push('\n');
        empty_line = false;
    }

    if let Some(prev) = current {
        flush_entry(map, path, n, prev, &mut lang, deflang.as_deref(), &mut payload)?;
    }

    Ok(())
}

/// Распознать маркер записи. None — строка не маркер (в т.ч. не-hex id).
/// Возвращает id и сырой явный тег языка (после trim), если он был.
fn parse_marker(line: &str) -> Option<(MessageId, Option<&str>)> {
    let rest = line.strip_prefix("-- ")?;
    let hex = rest.get(..32)?;
    if rest.len() > 32 && rest.as_bytes()[32] != b' ' {
        return None;
    }
    let id = MessageId::parse_hex32(hex)?;
    let explicit = if rest.len() > 32 {
        Some(rest[33..].trim())
    } else {
        None
    };
    Some((id, explicit))
}

/// Разрешить язык записи относительно языка файла. Ok(None) — берём default.
fn entry_lang(
    path: &Path,
    line: u32,
    explicit: Option<&str>,
    deflang: Option<&str>,
) -> Result<Option<String>> {
    let t = match explicit {
        None => return Ok(None),
        Some(t) => t,
    };
    if t.is_empty() {
        return Err(ParseError::new(path, line, "language too short").into());
    }
    if t.len() > MAX_LANG_LEN {
        return Err(ParseError::new(path, line, "language too long").into());
    }
    if let Some(def) = deflang {
        if t == def {
            warn!("[{}:{}] language specified unnecessarily", path.display(), line);
            return Ok(None);
        }
        warn!("[{}:{}] language differs from default for file", path.display(), line);
    }
    Ok(Some(t.to_string()))
}

fn flush_entry(
    map: &mut CatalogMap,
    path: &Path,
    line: u32,
    id: MessageId,
    lang: &mut Option<String>,
    deflang: Option<&str>,
    payload: &mut String,
) -> Result<()> {
    if payload.is_empty() {
        return Err(ParseError::new(path, line, "no payload text").into());
    }
    let language = lang
        .take()
        .or_else(|| deflang.map(str::to_string))
        .unwrap_or_default();
    insert_entry(map, CatalogKey { id, language }, std::mem::take(payload));
    Ok(())
}
