//! Поиск исходных *.catalog файлов по списку каталогов.
//!
//! Файлы с одинаковым именем маскируются: более ранний каталог в списке
//! выигрывает. Итоговый список упорядочен по имени файла — это и есть
//! порядок импорта (а значит и precedence при merge записей).

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::consts::CATALOG_SUFFIX;

/// Собрать упорядоченный список *.catalog файлов из `dirs`.
/// `root` — необязательный префикс (каталоги трактуются относительно него);
/// отсутствующие каталоги молча пропускаются.
pub fn catalog_files(root: Option<&Path>, dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut by_name: BTreeMap<OsString, PathBuf> = BTreeMap::new();

    for dir in dirs {
        let dir = match root {
            Some(r) => r.join(strip_root_slash(dir)),
            None => dir.clone(),
        };
        let rd = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(_) => continue,
        };
        for ent in rd {
            let ent = ent.with_context(|| format!("read dir {}", dir.display()))?;
            let name = ent.file_name();
            match name.to_str() {
                Some(s) if s.ends_with(CATALOG_SUFFIX) => {}
                _ => continue,
            }
            let ft = ent
                .file_type()
                .with_context(|| format!("stat {}", ent.path().display()))?;
            if ft.is_dir() {
                continue;
            }
            by_name.entry(name).or_insert_with(|| ent.path());
        }
    }

    Ok(by_name.into_values().collect())
}

// "/usr/lib/catalog" под root'ом должен стать "<root>/usr/lib/catalog",
// а не абсолютным путём, затирающим root при join.
fn strip_root_slash(p: &Path) -> PathBuf {
    p.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn unique_root(prefix: &str) -> PathBuf {
        let pid = std::process::id();
        let t = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("catdb-{}-{}-{}", prefix, pid, t))
    }

    #[test]
    fn earlier_dir_masks_later_same_name() {
        let root = unique_root("conf");
        let d1 = root.join("one");
        let d2 = root.join("two");
        fs::create_dir_all(&d1).unwrap();
        fs::create_dir_all(&d2).unwrap();
        fs::write(d1.join("a.catalog"), "x").unwrap();
        fs::write(d2.join("a.catalog"), "y").unwrap();
        fs::write(d2.join("b.catalog"), "z").unwrap();
        fs::write(d2.join("ignored.txt"), "-").unwrap();

        let files = catalog_files(None, &[d1.clone(), d2.clone()]).unwrap();
        assert_eq!(files, vec![d1.join("a.catalog"), d2.join("b.catalog")]);
    }

    #[test]
    fn missing_dir_is_skipped() {
        let root = unique_root("conf-miss");
        let files = catalog_files(None, &[root.join("nope")]).unwrap();
        assert!(files.is_empty());
    }
}
