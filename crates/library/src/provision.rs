use crate::error::{LibraryError, Result};
use crate::store::{LibraryStore, MATERIALS_FILE};
use std::fs;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Component, Path, PathBuf};

/// Official archive of the complete parts library.
pub const DEFAULT_LIBRARY_URL: &str = "https://library.ldraw.org/library/updates/complete.zip";

/// Top-level directory the official archive nests everything under.
const ARCHIVE_TOP_DIR: &str = "ldraw";

/// Outcome of [`ensure_provisioned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provision {
    /// The library was already present; nothing was touched.
    Ready,
    /// The archive was downloaded and extracted.
    Fetched,
}

/// One-time library bootstrap: download and extract the parts library
/// into `root` unless it is already provisioned. Must complete before
/// any pack request is served; idempotent once the library is present.
pub fn ensure_provisioned(root: &Path, url: &str) -> Result<Provision> {
    let store = LibraryStore::new(root);
    if store.is_provisioned() {
        log::debug!("library already provisioned at {}", root.display());
        return Ok(Provision::Ready);
    }

    log::info!("provisioning library from {url} into {}", root.display());
    fs::create_dir_all(root)?;
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = response.bytes()?;
    extract_archive(Cursor::new(bytes), root)?;

    if store.is_provisioned() {
        Ok(Provision::Fetched)
    } else {
        Err(LibraryError::Unavailable {
            path: root.join(MATERIALS_FILE),
            source: io::Error::new(
                io::ErrorKind::NotFound,
                "materials file missing after extraction",
            ),
        })
    }
}

/// Extract a library archive into `dest`, stripping the archive's
/// `ldraw/` top-level directory. Entries that would escape `dest` are
/// refused outright.
fn extract_archive<R: Read + Seek>(reader: R, dest: &Path) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader)?;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(safe) = entry.enclosed_name() else {
            return Err(LibraryError::UnsafeArchivePath(entry.name().to_string()));
        };
        let Some(rel) = strip_top_dir(&safe) else {
            continue;
        };
        let target = dest.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
    }
    log::info!("extracted library archive into {}", dest.display());
    Ok(())
}

/// Drop the archive's `ldraw/` wrapper component when present. Returns
/// `None` for the wrapper directory entry itself.
fn strip_top_dir(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    let Some(Component::Normal(first)) = components.next() else {
        return None;
    };
    if !first.eq_ignore_ascii_case(ARCHIVE_TOP_DIR) {
        return Some(path.to_path_buf());
    }
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn archive(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn extraction_strips_the_ldraw_wrapper_directory() {
        let temp = tempdir().unwrap();
        let zip = archive(&[
            ("ldraw/LDConfig.ldr", "0 // materials\n"),
            ("ldraw/parts/3001.dat", "0 brick\n"),
            ("ldraw/p/stud.dat", "0 stud\n"),
        ]);

        extract_archive(zip, temp.path()).unwrap();

        let store = LibraryStore::new(temp.path());
        assert!(store.is_provisioned());
        assert_eq!(store.materials().unwrap(), "0 // materials\n");
        assert!(temp.path().join("parts/3001.dat").is_file());
        assert!(temp.path().join("p/stud.dat").is_file());
    }

    #[test]
    fn unwrapped_entries_extract_as_is() {
        let temp = tempdir().unwrap();
        let zip = archive(&[("LDConfig.ldr", "0\n")]);

        extract_archive(zip, temp.path()).unwrap();
        assert!(temp.path().join("LDConfig.ldr").is_file());
    }

    #[test]
    fn escaping_entries_are_refused() {
        let temp = tempdir().unwrap();
        let zip = archive(&[("../evil.dat", "0\n")]);

        let err = extract_archive(zip, temp.path()).unwrap_err();
        assert!(matches!(err, LibraryError::UnsafeArchivePath(_)));
        assert!(!temp.path().parent().unwrap().join("evil.dat").exists());
    }

    #[test]
    fn provisioned_library_is_left_untouched() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(MATERIALS_FILE), "0\n").unwrap();

        // URL is never dereferenced when the library is already present.
        let outcome = ensure_provisioned(temp.path(), "http://invalid.invalid/none.zip").unwrap();
        assert_eq!(outcome, Provision::Ready);
    }
}
