// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Import of a picked item into the private cache directory.
//
// Blocking I/O throughout; the plugin runs it on `spawn_blocking`.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use docpick_bridge::traits::{NativeContentResolver, PlatformBridge};
use docpick_core::PickerConfig;
use docpick_core::error::Result;
use docpick_core::naming;
use docpick_core::types::ContentUri;

/// A picked item materialised on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFile {
    /// Absolute path of the temporary copy.
    pub path: PathBuf,
    /// Name the item was resolved to.
    pub display_name: String,
    pub bytes: u64,
}

/// An import nobody has taken delivery of yet.
///
/// The copy is deleted on drop unless [`claim`](Self::claim) was called, so a
/// caller that goes away while the copy runs leaves nothing behind.
#[derive(Debug)]
pub struct UnclaimedImport {
    file: ImportedFile,
    claimed: bool,
}

impl UnclaimedImport {
    pub fn new(file: ImportedFile) -> Self {
        Self {
            file,
            claimed: false,
        }
    }

    pub fn claim(mut self) -> ImportedFile {
        self.claimed = true;
        self.file.clone()
    }
}

impl Drop for UnclaimedImport {
    fn drop(&mut self) {
        if self.claimed {
            return;
        }
        warn!(path = %self.file.path.display(), "import finished with no caller, removing copy");
        if let Err(e) = std::fs::remove_file(&self.file.path) {
            warn!(path = %self.file.path.display(), error = %e, "could not remove unclaimed copy");
        }
    }
}

/// Display name for `uri`: provider metadata, else last path segment.
///
/// A failing metadata query is not fatal; it only costs the pretty name.
pub fn resolve_display_name<R>(resolver: &R, uri: &ContentUri) -> String
where
    R: NativeContentResolver + ?Sized,
{
    let metadata = match resolver.query_display_name(uri) {
        Ok(name) => name,
        Err(e) => {
            warn!(uri = %uri, error = %e, "display name query failed, using path segment");
            None
        }
    };
    let name = naming::resolve_display_name(metadata, uri.as_str());
    debug!(uri = %uri, name = %name, "resolved display name");
    name
}

/// Copy `reader` into `writer` through a `chunk_size` buffer, then flush.
pub fn copy_in_chunks<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..read])?;
        total += read as u64;
    }
    writer.flush()?;
    Ok(total)
}

/// Stream `reader` into a new temp file in `dir` named after `display_name`.
///
/// The file is only kept once the copy has fully succeeded; on error the
/// partial file is removed.
pub fn copy_to_temp(
    reader: &mut dyn Read,
    dir: &Path,
    display_name: &str,
    chunk_size: usize,
) -> Result<(PathBuf, u64)> {
    let prefix = naming::temp_file_prefix(display_name);
    let mut file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix("")
        .tempfile_in(dir)?;

    let bytes = copy_in_chunks(reader, &mut file, chunk_size)?;

    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok((std::path::absolute(&path)?, bytes))
}

/// Resolve, open and copy a picked item.
pub fn import_picked<B>(bridge: &B, uri: &ContentUri, config: &PickerConfig) -> Result<ImportedFile>
where
    B: PlatformBridge + ?Sized,
{
    let display_name = resolve_display_name(bridge, uri);

    let mut dir = bridge.cache_dir()?;
    if let Some(sub) = &config.cache_subdir {
        dir.push(sub);
        std::fs::create_dir_all(&dir)?;
    }

    let mut input = bridge.open_input_stream(uri)?;
    let (path, bytes) = copy_to_temp(input.as_mut(), &dir, &display_name, config.copy_chunk_size)?;

    info!(
        uri = %uri,
        name = %display_name,
        path = %path.display(),
        bytes,
        "imported picked file"
    );

    Ok(ImportedFile {
        path,
        display_name,
        bytes,
    })
}
