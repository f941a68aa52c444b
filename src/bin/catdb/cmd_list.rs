use anyhow::Result;
use std::path::PathBuf;

use catdb::lang::current_message_locale;

pub fn exec(database: PathBuf, oneline: bool, locale: Option<String>, ids: Vec<String>) -> Result<()> {
    let locale = locale.or_else(current_message_locale);
    let stdout = std::io::stdout();
    let mut w = stdout.lock();

    if ids.is_empty() {
        catdb::list(&mut w, &database, oneline, locale.as_deref())
    } else {
        catdb::list_items(&mut w, &database, oneline, &ids, locale.as_deref())
    }
}
