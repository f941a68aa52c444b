use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use catdb::Catalog;

pub fn exec(database: PathBuf, json_out: bool) -> Result<()> {
    let cat = Catalog::open(&database)?;

    if json_out {
        let obj = json!({
            "database": database.display().to_string(),
            "records": cat.n_records(),
            "header_size": cat.header_size(),
            "record_size": cat.record_size(),
            "strings_bytes": cat.strings_len(),
            "file_bytes": cat.file_len(),
        });
        println!("{}", obj);
        return Ok(());
    }

    println!("Catalog {}", database.display());
    println!("  records       = {}", cat.n_records());
    println!("  header_size   = {}", cat.header_size());
    println!("  record_size   = {}", cat.record_size());
    println!("  strings_bytes = {}", cat.strings_len());
    println!("  file_bytes    = {}", cat.file_len());
    Ok(())
}
