//! Helpers for commands that write structures to disk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tdec_client::DecisionClient;
use tdec_core::{NamingAttribute, STRUCTURE_FILE_EXTENSION, StructureNaming};

/// One structure file written by `export` or `project load`.
#[derive(Debug, Serialize)]
pub struct WrittenStructure {
    pub structure_id: Option<i64>,
    pub name: String,
    pub path: String,
}

/// Final object name for one structure, fetching the internal id first when
/// that is the chosen attribute. A failed lookup falls back to the external
/// code.
pub async fn object_name(
    client: &DecisionClient,
    naming: StructureNaming,
    structure_id: Option<i64>,
    attribute: NamingAttribute,
) -> String {
    let naming = match (attribute, structure_id) {
        (NamingAttribute::InternalId, Some(id)) => {
            let internal_id = client.structure_internal_id(id).await.unwrap_or_else(|error| {
                tracing::warn!(structure_id = id, %error, "internal id lookup failed");
                None
            });
            naming.with_internal_id(internal_id)
        }
        _ => naming,
    };
    naming.object_name(attribute)
}

/// Names already written in one command run; later duplicates get a
/// numeric suffix.
#[derive(Debug, Default)]
pub struct OutputDir {
    root: PathBuf,
    used: HashSet<String>,
}

impl OutputDir {
    pub fn create(root: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("failed to create {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
            used: HashSet::new(),
        })
    }

    /// Claim a unique name based on `name`.
    pub fn claim(&mut self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut counter = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{name}_{counter}");
            counter += 1;
        }
        candidate
    }

    /// Write `contents` as `<name>.pdb`, claiming a unique name first.
    pub fn write_structure(
        &mut self,
        structure_id: Option<i64>,
        name: &str,
        contents: &str,
    ) -> anyhow::Result<WrittenStructure> {
        let name = self.claim(name);
        let path = self.root.join(format!("{name}{STRUCTURE_FILE_EXTENSION}"));
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "structure written");
        Ok(WrittenStructure {
            structure_id,
            name,
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_names_get_suffixes() {
        let mut dir = OutputDir::default();
        assert_eq!(dir.claim("1ABC"), "1ABC");
        assert_eq!(dir.claim("1ABC"), "1ABC_2");
        assert_eq!(dir.claim("1ABC"), "1ABC_3");
        assert_eq!(dir.claim("2XYZ"), "2XYZ");
    }

    #[test]
    fn writes_pdb_files_under_root() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("out");
        let mut dir = OutputDir::create(&root).unwrap();

        let first = dir.write_structure(Some(101), "apo", "ATOM\n").unwrap();
        let second = dir.write_structure(Some(102), "apo", "HETATM\n").unwrap();

        assert_eq!(first.name, "apo");
        assert_eq!(second.name, "apo_2");
        assert_eq!(std::fs::read_to_string(root.join("apo.pdb")).unwrap(), "ATOM\n");
        assert_eq!(std::fs::read_to_string(root.join("apo_2.pdb")).unwrap(), "HETATM\n");
    }
}
