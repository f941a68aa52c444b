//! Чтение бинарного каталога: mmap + binary search с locale fallback.
//!
//! Каталог после publish неизменяем, поэтому read-path обходится без
//! какой-либо синхронизации: сколько угодно читателей поверх одного файла.
//! Mapping живёт ровно столько, сколько живёт Catalog; верхнеуровневые
//! операции (get/list) открывают его на время вызова и отпускают на выходе.
//!
//! Валидация при открытии — до первого доверенного байта: magic, нулевые
//! incompatible-флаги, минимальные header_size/record_size, размер файла не
//! меньше header + stride * n_records. Любое несоответствие — FormatError
//! ("база повреждена"), не IO-ошибка.

pub mod list;

use anyhow::{Context, Result};
use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use std::cmp::Ordering;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::consts::{
    CATALOG_HDR_SIZE, CATALOG_MAGIC, CATALOG_RECORD_SIZE, HDR_OFF_HEADER_SIZE,
    HDR_OFF_INCOMPAT_FLAGS, HDR_OFF_N_RECORDS, HDR_OFF_RECORD_SIZE, LANG_FIELD_SIZE,
    RECORD_OFF_ID, RECORD_OFF_LANG, RECORD_OFF_OFFSET,
};
use crate::error::FormatError;
use crate::id128::MessageId;
use crate::lang::fallback_chain;

/// Открытый (замапленный) каталог, только чтение.
pub struct Catalog {
    path: PathBuf,
    map: Mmap,
    header_size: u64,
    n_records: u64,
    record_size: u64,
}

impl Catalog {
    pub fn open(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open catalog {}", path.display()))?;
        let len = f
            .metadata()
            .with_context(|| format!("stat catalog {}", path.display()))?
            .len();
        if len < CATALOG_HDR_SIZE as u64 {
            return Err(FormatError::new(path, "file smaller than header").into());
        }

        // Safety: файл открыт read-only; опубликованный каталог неизменяем
        // (писатель публикует только через rename нового файла).
        let map = unsafe { Mmap::map(&f) }
            .with_context(|| format!("mmap catalog {}", path.display()))?;

        if &map[..CATALOG_MAGIC.len()] != CATALOG_MAGIC {
            return Err(FormatError::new(path, "bad magic").into());
        }
        let incompat = LittleEndian::read_u32(&map[HDR_OFF_INCOMPAT_FLAGS..]);
        if incompat != 0 {
            return Err(FormatError::new(
                path,
                format!("unknown incompatible flags 0x{:08x}", incompat),
            )
            .into());
        }
        let header_size = LittleEndian::read_u64(&map[HDR_OFF_HEADER_SIZE..]);
        let n_records = LittleEndian::read_u64(&map[HDR_OFF_N_RECORDS..]);
        let record_size = LittleEndian::read_u64(&map[HDR_OFF_RECORD_SIZE..]);

        if header_size < CATALOG_HDR_SIZE as u64 {
            return Err(FormatError::new(path, "declared header size too small").into());
        }
        if record_size < CATALOG_RECORD_SIZE as u64 {
            return Err(FormatError::new(path, "declared record size too small").into());
        }
        if n_records == 0 {
            // пустой каталог никогда не пишется, значит это повреждение
            return Err(FormatError::new(path, "no records").into());
        }
        let table_bytes = n_records
            .checked_mul(record_size)
            .and_then(|t| t.checked_add(header_size))
            .ok_or_else(|| FormatError::new(path, "record table size overflow"))?;
        if len < table_bytes {
            return Err(FormatError::new(
                path,
                format!("file truncated ({} < {} bytes of header+records)", len, table_bytes),
            )
            .into());
        }

        Ok(Self {
            path: path.to_path_buf(),
            map,
            header_size,
            n_records,
            record_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn n_records(&self) -> u64 {
        self.n_records
    }

    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    pub fn record_size(&self) -> u64 {
        self.record_size
    }

    pub fn file_len(&self) -> u64 {
        self.map.len() as u64
    }

    /// Размер string pool (всё после таблицы записей).
    pub fn strings_len(&self) -> u64 {
        self.file_len() - self.header_size - self.n_records * self.record_size
    }

    /// Слот записи по индексу. Возвращаются только известные ведущие поля:
    /// stride в файле может быть больше (writer нового формата), хвост слота
    /// игнорируется.
    fn record(&self, idx: u64) -> &[u8] {
        debug_assert!(idx < self.n_records);
        let start = (self.header_size + idx * self.record_size) as usize;
        &self.map[start..start + CATALOG_RECORD_SIZE]
    }

    pub fn record_id(&self, idx: u64) -> MessageId {
        let slot = self.record(idx);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&slot[RECORD_OFF_ID..RECORD_OFF_ID + 16]);
        MessageId::from_bytes(bytes)
    }

    /// Ключ записи (id, language) по индексу; язык — до первого NUL.
    pub fn record_key(&self, idx: u64) -> (MessageId, String) {
        let lang = String::from_utf8_lossy(record_lang(self.record(idx))).into_owned();
        (self.record_id(idx), lang)
    }

    fn record_offset(&self, idx: u64) -> u64 {
        LittleEndian::read_u64(&self.record(idx)[RECORD_OFF_OFFSET..])
    }

    /// Точный поиск (id, language) по таблице. Шаг — заявленный в header
    /// stride, сравнение — (id bytes, language bytes).
    fn search(&self, id: &MessageId, lang: &[u8]) -> Option<u64> {
        let mut lo = 0u64;
        let mut hi = self.n_records;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let slot = self.record(mid);
            let ord = slot[RECORD_OFF_ID..RECORD_OFF_ID + 16]
                .cmp(&id.as_bytes()[..])
                .then_with(|| record_lang(slot).cmp(lang));
            match ord {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    /// Поиск payload'а для id по цепочке fallback'а локали; первый успешный
    /// кандидат выигрывает. Ok(None) — записи нет, это не ошибка.
    pub fn find(&self, id: MessageId, locale: Option<&str>) -> Result<Option<&str>> {
        for cand in fallback_chain(locale) {
            if let Some(idx) = self.search(&id, cand.as_bytes()) {
                return self.payload_at(self.record_offset(idx)).map(Some);
            }
        }
        Ok(None)
    }

    /// Разыменовать offset в string pool. Offset'ы приходят из файла и не
    /// доверяются: проверяем границы и наличие NUL до конца mapping'а.
    fn payload_at(&self, offset: u64) -> Result<&str> {
        let base = self.header_size + self.n_records * self.record_size;
        let start = base
            .checked_add(offset)
            .filter(|&s| s < self.file_len())
            .ok_or_else(|| FormatError::new(&self.path, "string offset out of range"))?;
        let tail = &self.map[start as usize..];
        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| FormatError::new(&self.path, "unterminated string"))?;
        std::str::from_utf8(&tail[..end])
            .map_err(|_| FormatError::new(&self.path, "payload is not valid UTF-8").into())
    }

    /// Payload конкретной записи (без locale fallback'а).
    pub(crate) fn record_payload(&self, idx: u64) -> Result<&str> {
        self.payload_at(self.record_offset(idx))
    }
}

// Язык слота: 32-байтовое поле до первого NUL.
fn record_lang(slot: &[u8]) -> &[u8] {
    let field = &slot[RECORD_OFF_LANG..RECORD_OFF_LANG + LANG_FIELD_SIZE];
    match field.iter().position(|&b| b == 0) {
        Some(n) => &field[..n],
        None => field,
    }
}

/// Точечный lookup: открыть каталог, найти текст, скопировать наружу.
/// Mapping живёт только внутри вызова.
pub fn get(database: &Path, id: MessageId, locale: Option<&str>) -> Result<Option<String>> {
    let cat = Catalog::open(database)?;
    Ok(cat.find(id, locale)?.map(str::to_string))
}
