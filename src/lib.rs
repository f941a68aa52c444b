// Базовые модули
pub mod consts;
pub mod error;
pub mod id128;
pub mod lang;

// Сборка и чтение каталога
pub mod build; // src/build/{mod,import,merge,writer}.rs
pub mod read;  // src/read/{mod,list}.rs

// Поиск исходных *.catalog файлов (каталоги в порядке precedence)
pub mod conf;

// Утилиты (fsync_parent_dir, ...)
pub mod util;

// Удобные реэкспорты
pub use build::{update, update_from_files};
pub use error::{FormatError, ParseError};
pub use id128::MessageId;
pub use read::list::{list, list_items};
pub use read::{get, Catalog};
