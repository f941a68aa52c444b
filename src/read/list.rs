//! Перечисление каталога и выборочный вывод записей.

use anyhow::{anyhow, Result};
use log::{error, info};
use std::io::Write;
use std::path::Path;

use super::{get, Catalog};
use crate::build::merge::split_headers;
use crate::id128::MessageId;

/// Значение pseudo-заголовка из header-блока payload'а: первое вхождение,
/// без ведущих пробелов, до конца строки.
fn find_header<'a>(payload: &'a str, name: &str) -> Option<&'a str> {
    let (headers, _) = split_headers(payload);
    for line in headers.lines() {
        if let Some(v) = line.strip_prefix(name) {
            return Some(v.trim_start());
        }
    }
    None
}

/// Вывести одну запись: однострочно ("<id> <Defined-By>: <Subject>", с "n/a"
/// вместо отсутствующего заголовка) или целиком ("-- <id>" + payload).
pub(crate) fn dump_entry(
    w: &mut dyn Write,
    id: MessageId,
    payload: &str,
    oneline: bool,
) -> Result<()> {
    if oneline {
        let subject = find_header(payload, "Subject:").unwrap_or("n/a");
        let defined_by = find_header(payload, "Defined-By:").unwrap_or("n/a");
        writeln!(w, "{} {}: {}", id, defined_by, subject)?;
    } else {
        writeln!(w, "-- {}\n{}", id, payload)?;
    }
    Ok(())
}

/// Перечислить каталог: по одной записи на id, в порядке таблицы (то есть
/// по возрастанию id). Payload выбирается тем же locale fallback'ом, что и
/// точечный lookup; если цепочка промахивается (id есть только под другими
/// языками), выводится первая запись этого id.
pub fn list(w: &mut dyn Write, database: &Path, oneline: bool, locale: Option<&str>) -> Result<()> {
    let cat = Catalog::open(database)?;

    let mut last: Option<MessageId> = None;
    for idx in 0..cat.n_records() {
        let id = cat.record_id(idx);
        if last == Some(id) {
            continue;
        }
        last = Some(id);

        let payload = match cat.find(id, locale)? {
            Some(p) => p,
            None => cat.record_payload(idx)?,
        };
        dump_entry(w, id, payload, oneline)?;
    }
    Ok(())
}

/// Выборочный вывод по явному списку id. Fail-soft: ошибка парсинга или
/// отсутствие записи логируются per-id, обработка продолжается; результат
/// несёт первую встреченную ошибку.
pub fn list_items(
    w: &mut dyn Write,
    database: &Path,
    oneline: bool,
    items: &[String],
    locale: Option<&str>,
) -> Result<()> {
    let mut first_err: Option<anyhow::Error> = None;

    for item in items {
        let id = match item.parse::<MessageId>() {
            Ok(id) => id,
            Err(e) => {
                error!("failed to parse id128 '{}': {:#}", item, e);
                first_err.get_or_insert(e);
                continue;
            }
        };
        match get(database, id, locale) {
            Ok(Some(payload)) => dump_entry(w, id, &payload, oneline)?,
            Ok(None) => {
                // не ошибка для lookup'а, но для явно запрошенного id — отказ
                info!("no catalog entry for '{}'", item);
                first_err.get_or_insert(anyhow!("no catalog entry for '{}'", item));
            }
            Err(e) => {
                error!("failed to retrieve catalog entry for '{}': {:#}", item, e);
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
