use anyhow::Result;
use std::path::PathBuf;

use catdb::build;

pub fn exec(database: PathBuf, root: Option<PathBuf>, dirs: Vec<PathBuf>) -> Result<()> {
    build::update(&database, root.as_deref(), &dirs)
}
