use anyhow::Result;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod cmd_get;
mod cmd_list;
mod cmd_status;
mod cmd_update;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — warn: сами данные утилита
    // печатает в stdout, лог нужен для диагностики импорта/поиска.
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Update { database, root, dirs } =>
            cmd_update::exec(database, root, dirs),

        cli::Cmd::Get { database, id, locale } =>
            cmd_get::exec(database, id, locale),

        cli::Cmd::List { database, oneline, locale, ids } =>
            cmd_list::exec(database, oneline, locale, ids),

        cli::Cmd::Status { database, json } =>
            cmd_status::exec(database, json),
    }
}
