//! Сериализация каталога: string pool с дедупликацией + атомарная запись.
//!
//! Файл публикуется через tmp+rename в целевом каталоге, затем best-effort
//! fsync родителя. Любая ошибка на любом шаге удаляет tmp; по целевому пути
//! никогда не виден частично записанный файл.

use anyhow::{anyhow, Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::consts::{CATALOG_HDR_SIZE, CATALOG_RECORD_SIZE, LANG_FIELD_SIZE, MAX_LANG_LEN};
use crate::id128::MessageId;
use crate::util::fsync_parent_dir;

/// Пул NUL-терминированных строк. Байт-идентичные payload'ы хранятся один
/// раз: add() возвращает существующий offset вместо повторного append'а.
#[derive(Default)]
pub struct StringPool {
    buf: Vec<u8>,
    index: HashMap<String, u64>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, s: &str) -> u64 {
        if let Some(&off) = self.index.get(s) {
            return off;
        }
        let off = self.buf.len() as u64;
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        self.index.insert(s.to_string(), off);
        off
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Одна запись таблицы, до сериализации.
#[derive(Debug, Clone)]
pub struct CatalogRecord {
    pub id: MessageId,
    pub language: String,
    pub offset: u64,
}

/// Записать каталог (header + record table + string pool) в `database`.
/// Записи должны быть уже отсортированы по (id bytes, language bytes).
/// Возвращает итоговый размер файла.
pub fn write_catalog(database: &Path, records: &[CatalogRecord], pool: &StringPool) -> Result<u64> {
    if let Some(parent) = database.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }

    let tmp = tmp_path(database);
    let _ = fs::remove_file(&tmp); // best-effort

    let r = write_catalog_contents(&tmp, database, records, pool);
    if r.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    r
}

fn write_catalog_contents(
    tmp: &Path,
    database: &Path,
    records: &[CatalogRecord],
    pool: &StringPool,
) -> Result<u64> {
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(tmp)
        .with_context(|| format!("open catalog tmp {}", tmp.display()))?;

    // header
    f.write_all(crate::consts::CATALOG_MAGIC)?;
    f.write_u32::<LittleEndian>(0)?; // compatible_flags
    f.write_u32::<LittleEndian>(0)?; // incompatible_flags
    f.write_u64::<LittleEndian>(CATALOG_HDR_SIZE as u64)?;
    f.write_u64::<LittleEndian>(records.len() as u64)?;
    f.write_u64::<LittleEndian>(CATALOG_RECORD_SIZE as u64)?;

    // record table
    for rec in records {
        if rec.language.len() > MAX_LANG_LEN {
            return Err(anyhow!(
                "language tag too long for record {}: '{}'",
                rec.id,
                rec.language
            ));
        }
        f.write_all(rec.id.as_bytes())?;
        let mut lang = [0u8; LANG_FIELD_SIZE];
        lang[..rec.language.len()].copy_from_slice(rec.language.as_bytes());
        f.write_all(&lang)?;
        f.write_u64::<LittleEndian>(rec.offset)?;
    }

    // string pool
    f.write_all(pool.as_bytes())?;

    f.flush()?;
    f.sync_all()
        .with_context(|| format!("sync catalog tmp {}", tmp.display()))?;

    // Каталог читают все, не только сборщик.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        f.set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    fs::rename(tmp, database)
        .with_context(|| format!("rename {} -> {}", tmp.display(), database.display()))?;
    let _ = fsync_parent_dir(database);

    let size = CATALOG_HDR_SIZE as u64
        + records.len() as u64 * CATALOG_RECORD_SIZE as u64
        + pool.len() as u64;
    Ok(size)
}

fn tmp_path(database: &Path) -> PathBuf {
    let name = database
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    database.with_file_name(format!("{}.tmp", name))
}
