//! Ошибки каталога.
//!
//! Транспорт ошибок — anyhow, но две категории оформлены конкретными типами,
//! чтобы вызывающий код мог отличить их через downcast_ref:
//! - ParseError  — битый текстовый источник (прерывает импорт всего файла);
//! - FormatError — бинарный каталог не прошёл валидацию ("база повреждена",
//!                 а не "база отсутствует"; IO-ошибки остаются обычными).
//!
//! NotFound категорией не является: успешный поиск без результата — Ok(None).

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ParseError {
    pub path: PathBuf,
    pub line: u32,
    pub msg: String,
}

impl ParseError {
    pub fn new(path: &Path, line: u32, msg: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            line,
            msg: msg.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.path.display(), self.line, self.msg)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
pub struct FormatError {
    pub path: PathBuf,
    pub what: String,
}

impl FormatError {
    pub fn new(path: &Path, what: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            what: what.into(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupt catalog {}: {}", self.path.display(), self.what)
    }
}

impl std::error::Error for FormatError {}
