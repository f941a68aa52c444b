use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для сборки и чтения бинарных message-каталогов
#[derive(Parser, Debug)]
#[command(name = "catdb", version, about = "Message catalog build/query CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Rebuild the binary catalog from *.catalog source directories
    ///
    /// Пример:
    ///   catdb update --database ./messages.cat ./catalog.d ./extra.d
    Update {
        #[arg(long)]
        database: PathBuf,
        /// Префикс: каталоги источников берутся относительно него
        #[arg(long)]
        root: Option<PathBuf>,
        /// Каталоги с *.catalog файлами (в порядке precedence)
        dirs: Vec<PathBuf>,
    },
    /// Look up one entry by its 128-bit id
    Get {
        #[arg(long)]
        database: PathBuf,
        /// 32 hex-символа (или UUID с дефисами)
        id: String,
        /// Явная локаль; по умолчанию LC_ALL/LC_MESSAGES/LANG
        #[arg(long)]
        locale: Option<String>,
    },
    /// List all entries, or only the given ids
    List {
        #[arg(long)]
        database: PathBuf,
        /// Однострочный вывод: "<id> <Defined-By>: <Subject>"
        #[arg(long, default_value_t = false)]
        oneline: bool,
        #[arg(long)]
        locale: Option<String>,
        /// Явные id; без них листится весь каталог
        ids: Vec<String>,
    },
    /// Print catalog header summary (use --json for JSON)
    Status {
        #[arg(long)]
        database: PathBuf,
        /// JSON output (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }
}
