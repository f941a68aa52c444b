use anyhow::{anyhow, Result};
use std::path::PathBuf;

use catdb::lang::current_message_locale;
use catdb::MessageId;

pub fn exec(database: PathBuf, id: String, locale: Option<String>) -> Result<()> {
    let id: MessageId = id.parse()?;
    let locale = locale.or_else(current_message_locale);

    match catdb::get(&database, id, locale.as_deref())? {
        Some(text) => {
            print!("{}", text);
            Ok(())
        }
        None => Err(anyhow!("no catalog entry for {}", id)),
    }
}
