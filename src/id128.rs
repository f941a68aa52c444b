//! 128-битный идентификатор сообщения.
//!
//! Каноничная текстовая форма — 32 hex-символа в нижнем регистре. Парсер
//! принимает также верхний регистр и 36-символьную UUID-форму с дефисами.
//! Сравнение — побайтно, старший байт первым (derive Ord по [u8; 16]).

use anyhow::{anyhow, Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub [u8; 16]);

impl MessageId {
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Строгий парс: ровно 32 hex-символа, без дефисов.
    /// Используется маркером entry в импортёре (там формат фиксированный).
    pub fn parse_hex32(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() != 32 {
            return None;
        }
        let mut out = [0u8; 16];
        for (i, pair) in b.chunks_exact(2).enumerate() {
            out[i] = (nibble(pair[0])? << 4) | nibble(pair[1])?;
        }
        Some(Self(out))
    }
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl FromStr for MessageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() == 32 {
            return Self::parse_hex32(s).ok_or_else(|| anyhow!("invalid id128 '{}'", s));
        }
        // UUID-форма: 8-4-4-4-12
        if s.len() == 36 {
            let b = s.as_bytes();
            if b[8] == b'-' && b[13] == b'-' && b[18] == b'-' && b[23] == b'-' {
                let mut hex = String::with_capacity(32);
                for (i, &c) in b.iter().enumerate() {
                    if !matches!(i, 8 | 13 | 18 | 23) {
                        hex.push(c as char);
                    }
                }
                return Self::parse_hex32(&hex).ok_or_else(|| anyhow!("invalid id128 '{}'", s));
            }
        }
        Err(anyhow!("invalid id128 '{}'", s))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
