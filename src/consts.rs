//! Общие константы формата каталога (header, records, string pool, источники).

// -------- Catalog file --------
pub const CATALOG_MAGIC: &[u8; 8] = &[b'R', b'H', b'H', b'H', b'K', b'S', b'L', b'P'];

// Формат header (LE):
// [magic8][compatible_flags u32][incompatible_flags u32]
// [header_size u64][n_records u64][record_size u64]
//
// header_size/record_size пишутся в файл, чтобы новый writer мог
// расширять структуры, не ломая старых читателей: читатель шагает по
// заявленному stride и читает только известные ведущие поля.
pub const CATALOG_HDR_SIZE: usize = 40; // уже выровнен по 8

pub const HDR_OFF_MAGIC: usize = 0;
pub const HDR_OFF_COMPAT_FLAGS: usize = 8;
pub const HDR_OFF_INCOMPAT_FLAGS: usize = 12;
pub const HDR_OFF_HEADER_SIZE: usize = 16;
pub const HDR_OFF_N_RECORDS: usize = 24;
pub const HDR_OFF_RECORD_SIZE: usize = 32;

// Формат записи (LE):
// [id 16B][language 32B, NUL-padded][offset u64]
// offset — смещение внутри string pool, не в файле.
pub const CATALOG_RECORD_SIZE: usize = 56;

pub const RECORD_OFF_ID: usize = 0;
pub const RECORD_OFF_LANG: usize = 16;
pub const RECORD_OFF_OFFSET: usize = 48;

// Язык: фиксированный 32-байтовый буфер, максимум 31 видимый байт.
// Пустая строка = language-neutral запись.
pub const LANG_FIELD_SIZE: usize = 32;
pub const MAX_LANG_LEN: usize = 31;

// -------- Source files --------
pub const CATALOG_SUFFIX: &str = ".catalog";

// Строки, начинающиеся с этих символов, целиком пропускаются при импорте.
pub const COMMENT_CHARS: &[u8] = b"#;";
