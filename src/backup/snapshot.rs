//! Snapshot file encoding and atomic file replacement

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KvdbError, Result};
use crate::storage::Namespaces;

/// File magic
pub const MAGIC: &[u8; 4] = b"KVDB";

/// Current format version
pub const FORMAT_VERSION: u16 = 1;

/// Header size: magic (4) + version (2) + crc (4)
pub const HEADER_SIZE: usize = 10;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    namespaces: &'a Namespaces,
}

#[derive(Deserialize)]
struct SnapshotData {
    namespaces: Namespaces,
}

/// Encode a collection into snapshot bytes
pub fn encode(namespaces: &Namespaces) -> Result<Vec<u8>> {
    let payload = bincode::serialize(&SnapshotRef { namespaces })?;
    let crc = crc32fast::hash(&payload);

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    bytes.extend_from_slice(&crc.to_be_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode snapshot bytes, verifying header and checksum
pub fn decode(bytes: &[u8]) -> Result<Namespaces> {
    if bytes.len() < HEADER_SIZE {
        return Err(KvdbError::SnapshotCorrupted(format!(
            "truncated header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    if &bytes[0..4] != MAGIC {
        return Err(KvdbError::SnapshotCorrupted("bad magic".to_string()));
    }

    let version = u16::from_be_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(KvdbError::SnapshotCorrupted(format!(
            "unsupported format version {}",
            version
        )));
    }

    let stored_crc = u32::from_be_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
    let payload = &bytes[HEADER_SIZE..];
    let actual_crc = crc32fast::hash(payload);
    if stored_crc != actual_crc {
        return Err(KvdbError::SnapshotCorrupted(format!(
            "checksum mismatch: stored {:08x}, computed {:08x}",
            stored_crc, actual_crc
        )));
    }

    let data: SnapshotData = bincode::deserialize(payload)
        .map_err(|e| KvdbError::SnapshotCorrupted(format!("undecodable payload: {}", e)))?;
    Ok(data.namespaces)
}

/// Load a snapshot file
///
/// A missing or zero-length file yields `Ok(None)`; anything unreadable or
/// malformed is an error.
pub fn load(path: &Path) -> Result<Option<Namespaces>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if bytes.is_empty() {
        return Ok(None);
    }

    decode(&bytes).map(Some)
}

/// Atomically replace `path` with `bytes`
///
/// Writes `<path>.tmp`, syncs it, then renames it over `path`.
pub fn save(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
