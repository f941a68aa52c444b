//! Языковые теги и цепочка fallback'а локали.
//!
//! Тег — 1..=31 байт, без внутренних NUL; пустая строка обозначает
//! language-neutral запись и сортируется раньше любых непустых тегов.

use std::path::Path;

use crate::consts::{CATALOG_SUFFIX, MAX_LANG_LEN};

/// Язык файла по его имени: `messages.de.catalog` -> "de".
/// Нет dot-сегмента перед суффиксом (или он пуст/длиннее 31) — языка нет.
pub fn file_default_lang(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(CATALOG_SUFFIX)?;
    let (_, lang) = stem.rsplit_once('.')?;
    if lang.is_empty() || lang.len() > MAX_LANG_LEN {
        return None;
    }
    Some(lang.to_string())
}

/// Отрезать суффикс кодировки/модификатора: "de_DE.UTF-8" -> "de_DE",
/// "sr@latin" -> "sr".
pub fn normalize_locale(loc: &str) -> &str {
    match loc.find(['.', '@']) {
        Some(pos) => &loc[..pos],
        None => loc,
    }
}

/// Кандидаты языка для lookup'а, от более специфичного к менее:
/// 1) нормализованный тег; 2) без территории (до '_'); 3) пустой (neutral).
/// Для C/POSIX/unset — сразу только neutral.
pub fn fallback_chain(locale: Option<&str>) -> Vec<String> {
    let mut chain = Vec::with_capacity(3);
    if let Some(loc) = locale {
        if !loc.is_empty() && loc != "C" && loc != "POSIX" {
            let base = truncate_lang(normalize_locale(loc));
            if let Some((lang, _)) = base.split_once('_') {
                if !lang.is_empty() {
                    chain.push(base.to_string());
                    chain.push(lang.to_string());
                } else {
                    chain.push(base.to_string());
                }
            } else if !base.is_empty() {
                chain.push(base.to_string());
            }
        }
    }
    chain.push(String::new());
    chain
}

// Тег длиннее поля записи не может совпасть ни с чем, но и паниковать на
// чужом LC_ALL нельзя — обрезаем по границе символа.
fn truncate_lang(s: &str) -> &str {
    if s.len() <= MAX_LANG_LEN {
        return s;
    }
    let mut end = MAX_LANG_LEN;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Текущая message-локаль процесса: LC_ALL > LC_MESSAGES > LANG.
pub fn current_message_locale() -> Option<String> {
    for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(v) = std::env::var(var) {
            if !v.is_empty() {
                return Some(v);
            }
        }
    }
    None
}
