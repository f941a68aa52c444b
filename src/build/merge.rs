//! Merge-таблица: накопление записей по ключу (id, language).
//!
//! Ключ сравнивается побайтно (id bytes + language bytes), без какой-либо
//! locale-aware нормализации. Повторный ключ не перезаписывает запись, а
//! дополняет её: поздние источники добавляют заголовки (например, переведённый
//! `Subject:` в per-language overlay), тело остаётся за ранним источником.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::id128::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub id: MessageId,
    /// Пустая строка — language-neutral запись.
    pub language: String,
}

pub type CatalogMap = HashMap<CatalogKey, String>;

/// Разбить payload на (headers, body).
///
/// Заголовки — подряд идущие непустые строки с завершающим '\n'; body
/// начинается с первой пустой строки (разделитель входит в body, так что
/// headers_a + headers_b + body снова корректный payload). Хвост без '\n'
/// тоже относится к body.
pub fn split_headers(payload: &str) -> (&str, &str) {
    let bytes = payload.as_bytes();
    let mut pos = 0;
    loop {
        match bytes[pos..].iter().position(|&c| c == b'\n') {
            None => break,    // незавершённая строка -> body
            Some(0) => break, // пустая строка -> конец заголовков
            Some(n) => pos += n + 1,
        }
    }
    payload.split_at(pos)
}

/// Слить две записи одного ключа: заголовки раннего payload'а, затем заголовки
/// позднего (дубликаты ключей заголовков сохраняются — потребитель берёт
/// первое вхождение), body — первый непустой, ранний выигрывает.
pub fn combine_entries(earlier: &str, later: &str) -> String {
    let (h1, b1) = split_headers(earlier);
    let (h2, b2) = split_headers(later);

    let mut out = String::with_capacity(earlier.len() + later.len());
    out.push_str(h1);
    out.push_str(h2);
    if !b1.is_empty() {
        out.push_str(b1);
    } else {
        out.push_str(b2);
    }
    out
}

/// Вставить запись в таблицу; при коллизии ключа — merge.
pub fn insert_entry(map: &mut CatalogMap, key: CatalogKey, payload: String) {
    match map.entry(key) {
        Entry::Occupied(mut e) => {
            let merged = combine_entries(e.get(), &payload);
            e.insert(merged);
        }
        Entry::Vacant(v) => {
            v.insert(payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain() {
        let (h, b) = split_headers("Subject: x\n\nBody\n");
        assert_eq!(h, "Subject: x\n");
        assert_eq!(b, "\nBody\n");
    }

    #[test]
    fn split_headers_only() {
        // без пустой строки весь текст — заголовки
        let (h, b) = split_headers("Body B\n");
        assert_eq!(h, "Body B\n");
        assert_eq!(b, "");
    }

    #[test]
    fn split_unterminated_tail_is_body() {
        let (h, b) = split_headers("Key: v\nrest");
        assert_eq!(h, "Key: v\n");
        assert_eq!(b, "rest");
    }

    #[test]
    fn combine_keeps_early_headers_first_and_early_body() {
        let a = "Subject: A\n\nBody A\n";
        let b = "Defined-By: B\n\nBody B\n";
        assert_eq!(combine_entries(a, b), "Subject: A\nDefined-By: B\n\nBody A\n");
    }

    #[test]
    fn combine_takes_later_body_when_early_has_none() {
        let a = "Subject: A\n";
        let b = "Defined-By: B\n\nBody B\n";
        assert_eq!(combine_entries(a, b), "Subject: A\nDefined-By: B\n\nBody B\n");
    }

    #[test]
    fn duplicate_header_keys_are_retained() {
        let a = "Subject: one\n\nBody\n";
        let b = "Subject: two\n";
        assert_eq!(combine_entries(a, b), "Subject: one\nSubject: two\n\nBody\n");
    }

    #[test]
    fn insert_then_merge() {
        let mut map = CatalogMap::new();
        let key = CatalogKey {
            id: MessageId::from_bytes([7; 16]),
            language: "en".to_string(),
        };
        insert_entry(&mut map, key.clone(), "Subject: A\n\nBody A\n".to_string());
        insert_entry(&mut map, key.clone(), "Defined-By: B\n".to_string());
        assert_eq!(map[&key], "Subject: A\nDefined-By: B\n\nBody A\n");
    }
}
