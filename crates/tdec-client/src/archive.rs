//! Unpacking of multi-structure ZIP exports.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use tdec_core::STRUCTURE_FILE_EXTENSION;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::ClientError;

/// Every `.pdb` entry of `bytes`, keyed by its name without directories.
///
/// Other entries are ignored. A base name already taken gets a numeric
/// suffix (`x.pdb`, `x_2.pdb`, ...), so every structure entry is kept.
///
/// # Errors
///
/// [`ClientError::ArchiveError`] when the archive cannot be read, an entry is
/// not UTF-8, or no structure file is present.
pub fn unpack_structure_archive(bytes: &[u8]) -> Result<BTreeMap<String, String>, ClientError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ClientError::ArchiveError(format!("invalid ZIP archive: {e}")))?;
    debug!(entries = archive.len(), "reading export archive");

    let mut files = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ClientError::ArchiveError(format!("entry {index}: {e}")))?;
        let name = entry.name().to_string();
        if entry.is_dir() || !name.ends_with(STRUCTURE_FILE_EXTENSION) {
            continue;
        }

        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| ClientError::ArchiveError(format!("{name}: {e}")))?;
        let base_name = name.rsplit('/').next().unwrap_or(&name);
        let key = unique_name(&files, base_name);
        if key != base_name {
            warn!(entry = %name, renamed = %key, "duplicate structure file name in archive");
        }
        files.insert(key, content);
    }

    if files.is_empty() {
        return Err(ClientError::ArchiveError(
            "archive contains no structure files".into(),
        ));
    }
    debug!(structures = files.len(), "export archive unpacked");
    Ok(files)
}

fn unique_name(taken: &BTreeMap<String, String>, base_name: &str) -> String {
    if !taken.contains_key(base_name) {
        return base_name.to_string();
    }
    let stem = base_name
        .strip_suffix(STRUCTURE_FILE_EXTENSION)
        .unwrap_or(base_name);
    (2..)
        .map(|n| format!("{stem}_{n}{STRUCTURE_FILE_EXTENSION}"))
        .find(|candidate| !taken.contains_key(candidate))
        .unwrap_or_else(|| base_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn keeps_structure_files_by_base_name() {
        let bytes = archive(&[
            ("out/3dec_1abc.pdb", "ATOM 1\n"),
            ("out/3dec_2xyz.pdb", "ATOM 2\n"),
            ("out/manifest.json", "{}"),
        ]);
        let files = unpack_structure_archive(&bytes).unwrap();
        assert_eq!(
            files.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["3dec_1abc.pdb", "3dec_2xyz.pdb"]
        );
        assert_eq!(files["3dec_2xyz.pdb"], "ATOM 2\n");
    }

    #[test]
    fn same_base_name_in_different_directories_keeps_both() {
        let bytes = archive(&[
            ("a/x.pdb", "MODEL A\n"),
            ("b/x.pdb", "MODEL B\n"),
            ("c/y.pdb", "MODEL C\n"),
        ]);
        let files = unpack_structure_archive(&bytes).unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(files["x.pdb"], "MODEL A\n");
        assert_eq!(files["x_2.pdb"], "MODEL B\n");
        assert_eq!(files["y.pdb"], "MODEL C\n");
    }

    #[test]
    fn archive_without_structures_fails() {
        let bytes = archive(&[("readme.txt", "nothing here")]);
        assert!(matches!(
            unpack_structure_archive(&bytes),
            Err(ClientError::ArchiveError(_))
        ));
    }

    #[test]
    fn garbage_fails() {
        assert!(matches!(
            unpack_structure_archive(b"PK not really"),
            Err(ClientError::ArchiveError(_))
        ));
    }
}
