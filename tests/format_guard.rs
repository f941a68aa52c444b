use anyhow::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use catdb::consts::{CATALOG_HDR_SIZE, CATALOG_MAGIC, CATALOG_RECORD_SIZE};
use catdb::{get, update_from_files, Catalog, FormatError, MessageId};

const ID: &str = "0123456789abcdef0123456789abcdef";

fn build_sample(prefix: &str) -> Result<PathBuf> {
    let root = unique_root(prefix);
    fs::create_dir_all(&root)?;
    let f = root.join("one.catalog");
    fs::write(&f, format!("-- {}\nSubject: s\n\nhello\n", ID))?;
    let db = root.join("messages.cat");
    update_from_files(&db, &[f])?;
    Ok(db)
}

fn patch_at(db: &PathBuf, offset: u64, bytes: &[u8]) -> Result<()> {
    let mut f = OpenOptions::new().write(true).open(db)?;
    f.seek(SeekFrom::Start(offset))?;
    f.write_all(bytes)?;
    f.sync_all()?;
    Ok(())
}

fn expect_format_error<T>(res: Result<T>) {
    match res {
        Ok(_) => panic!("expected FormatError, got Ok"),
        Err(e) => assert!(
            e.downcast_ref::<FormatError>().is_some(),
            "expected FormatError, got: {:#}",
            e
        ),
    }
}

#[test]
fn bad_magic_is_rejected() -> Result<()> {
    let db = build_sample("magic")?;
    patch_at(&db, 0, b"X")?;
    expect_format_error(Catalog::open(&db));
    Ok(())
}

#[test]
fn incompatible_flag_bit_is_rejected() -> Result<()> {
    let db = build_sample("incompat")?;
    // incompatible_flags: u32 по смещению 12
    patch_at(&db, 12, &[0x01, 0x00, 0x00, 0x00])?;
    expect_format_error(Catalog::open(&db));
    Ok(())
}

#[test]
fn truncated_table_is_rejected() -> Result<()> {
    let db = build_sample("trunc")?;
    let table_end = (CATALOG_HDR_SIZE + CATALOG_RECORD_SIZE) as u64;
    let f = OpenOptions::new().write(true).open(&db)?;
    f.set_len(table_end - 1)?;
    f.sync_all()?;
    expect_format_error(Catalog::open(&db));
    Ok(())
}

#[test]
fn file_smaller_than_header_is_rejected() -> Result<()> {
    let root = unique_root("tiny");
    fs::create_dir_all(&root)?;
    let db = root.join("messages.cat");
    fs::write(&db, b"RHHH")?;
    expect_format_error(Catalog::open(&db));
    Ok(())
}

#[test]
fn string_offset_past_end_is_rejected_on_lookup() -> Result<()> {
    let db = build_sample("stroff")?;
    // offset первой записи: header + id16 + lang32
    let off = (CATALOG_HDR_SIZE + 48) as u64;
    patch_at(&db, off, &u64::MAX.to_le_bytes())?;

    let id: MessageId = ID.parse()?;
    expect_format_error(get(&db, id, None));
    Ok(())
}

// Writer нового формата может писать записи шире компилированных 56 байт;
// читатель обязан шагать по stride из header'а и игнорировать хвост слота.
#[test]
fn larger_record_stride_is_tolerated() -> Result<()> {
    let root = unique_root("stride");
    fs::create_dir_all(&root)?;
    let db = root.join("messages.cat");

    let id: MessageId = ID.parse()?;
    let stride = 64u64;

    let mut buf = Vec::new();
    buf.extend_from_slice(CATALOG_MAGIC);
    buf.write_u32::<LittleEndian>(0)?; // compatible_flags
    buf.write_u32::<LittleEndian>(0)?; // incompatible_flags
    buf.write_u64::<LittleEndian>(CATALOG_HDR_SIZE as u64)?;
    buf.write_u64::<LittleEndian>(1)?; // n_records
    buf.write_u64::<LittleEndian>(stride)?;
    // запись: id + пустой язык + offset 0 + 8 неизвестных хвостовых байт
    buf.extend_from_slice(id.as_bytes());
    buf.extend_from_slice(&[0u8; 32]);
    buf.write_u64::<LittleEndian>(0)?;
    buf.extend_from_slice(&[0xEE; 8]);
    // string pool
    buf.extend_from_slice(b"Hello stride\n\0");
    fs::write(&db, &buf)?;

    let cat = Catalog::open(&db)?;
    assert_eq!(cat.record_size(), stride);
    assert_eq!(get(&db, id, None)?.as_deref(), Some("Hello stride\n"));
    Ok(())
}

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("catdb-fmt-{}-{}-{}", prefix, pid, t))
}
