//! Build pipeline: текстовые источники -> merge-таблица -> бинарный каталог.
//!
//! Сборка строго последовательная, fail-fast: первая фатальная ошибка в любом
//! файле прерывает всё, целевой путь остаётся нетронутым (старый каталог,
//! если был, продолжает работать). Два одновременных сборщика на один путь
//! не координируются — последний rename выигрывает; это ответственность
//! вызывающего кода.

pub mod import;
pub mod merge;
pub mod writer;

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::conf;
use merge::{CatalogKey, CatalogMap};
use writer::{CatalogRecord, StringPool};

/// Собрать каталог из *.catalog файлов, найденных в `dirs` (под `root`).
pub fn update(database: &Path, root: Option<&Path>, dirs: &[PathBuf]) -> Result<()> {
    let files = conf::catalog_files(root, dirs)?;
    update_from_files(database, &files)
}

/// Собрать каталог из явного упорядоченного списка файлов.
/// Порядок файлов определяет precedence при merge записей.
pub fn update_from_files(database: &Path, files: &[PathBuf]) -> Result<()> {
    let mut map = CatalogMap::new();
    for f in files {
        debug!("reading catalog source '{}'", f.display());
        import::import_file(&mut map, f).with_context(|| format!("import {}", f.display()))?;
    }

    if map.is_empty() {
        info!("no catalog entries, {} not written", database.display());
        return Ok(());
    }
    debug!("found {} catalog entries", map.len());

    // Offset'ы назначаем в отсортированном порядке ключей: одинаковый набор
    // источников даёт байт-в-байт одинаковый файл, и таблица записей выходит
    // уже в требуемом порядке (id bytes, затем language bytes).
    let mut entries: Vec<(CatalogKey, String)> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        a.id.as_bytes()
            .cmp(b.id.as_bytes())
            .then_with(|| a.language.as_bytes().cmp(b.language.as_bytes()))
    });

    let mut pool = StringPool::new();
    let mut records = Vec::with_capacity(entries.len());
    for (key, payload) in entries {
        let offset = pool.add(&payload);
        records.push(CatalogRecord {
            id: key.id,
            language: key.language,
            offset,
        });
    }

    let total = writer::write_catalog(database, &records, &pool)?;
    debug!(
        "{}: wrote {} records, {} bytes of strings, {} bytes total",
        database.display(),
        records.len(),
        pool.len(),
        total
    );
    Ok(())
}
