//! File-backed document store.
//!
//! Every record is one YAML document stored at:
//!
//! ```text
//! <data_dir>/
//!   <collection>/
//!     <s1>/
//!       <s2>/
//!         <id>.yaml
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the record id.
//!
//! There are no transactions and no locks. Each write replaces one file via a temporary
//! sibling and a rename, so readers never see a half-written document, but two writes to
//! different records are independent: a crash between them leaves the first one applied.

use crate::constants::DOCUMENT_EXTENSION;
use crate::error::{CareError, CareResult};
use carebook_uuid::RecordId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A record type that can be kept in the [`DocumentStore`].
pub trait Document: Serialize + DeserializeOwned {
    /// Collection directory name under the data directory.
    const COLLECTION: &'static str;

    fn id(&self) -> RecordId;
}

/// Handle on the data directory. Cheap to clone.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    data_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn collection_dir<D: Document>(&self) -> PathBuf {
        self.data_dir.join(D::COLLECTION)
    }

    fn document_path<D: Document>(&self, id: RecordId) -> PathBuf {
        id.sharded_file(&self.collection_dir::<D>(), DOCUMENT_EXTENSION)
    }

    /// Stores a new document.
    ///
    /// # Errors
    ///
    /// Returns [`CareError::RecordExists`] if a document with the same id is already stored,
    /// or an I/O / serialisation error.
    pub fn insert<D: Document>(&self, doc: &D) -> CareResult<()> {
        let path = self.document_path::<D>(doc.id());
        if path.exists() {
            return Err(CareError::RecordExists(doc.id().to_string()));
        }
        write_document(&path, doc)
    }

    /// Loads a document by id, or `None` if it does not exist.
    pub fn get<D: Document>(&self, id: RecordId) -> CareResult<Option<D>> {
        let path = self.document_path::<D>(id);
        if !path.is_file() {
            return Ok(None);
        }
        read_document(&path).map(Some)
    }

    /// Re-reads a document, applies `change` and writes it back.
    ///
    /// Returns the updated document. The read and the write are not atomic with respect to
    /// other writers.
    pub fn update<D: Document>(
        &self,
        id: RecordId,
        not_found: CareError,
        change: impl FnOnce(&mut D),
    ) -> CareResult<D> {
        let path = self.document_path::<D>(id);
        if !path.is_file() {
            return Err(not_found);
        }
        let mut doc: D = read_document(&path)?;
        change(&mut doc);
        write_document(&path, &doc)?;
        Ok(doc)
    }

    /// Returns every document in the collection for which `keep` returns true.
    ///
    /// Order is unspecified. Documents that fail to parse are logged and skipped.
    pub fn list<D: Document>(&self, keep: impl Fn(&D) -> bool) -> CareResult<Vec<D>> {
        let mut docs = Vec::new();
        let collection_dir = self.collection_dir::<D>();

        let s1_iter = match fs::read_dir(&collection_dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(docs),
            Err(e) => return Err(CareError::FileRead(e)),
        };

        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let doc_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for entry in doc_iter.flatten() {
                    let path = entry.path();
                    let is_document = path.is_file()
                        && path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION);
                    if !is_document {
                        continue;
                    }

                    match read_document::<D>(&path) {
                        Ok(doc) if keep(&doc) => docs.push(doc),
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!("skipping unreadable document {}: {}", path.display(), e)
                        }
                    }
                }
            }
        }

        Ok(docs)
    }
}

fn read_document<D: DeserializeOwned>(path: &Path) -> CareResult<D> {
    let raw = fs::read_to_string(path).map_err(CareError::FileRead)?;
    serde_yaml::from_str(&raw).map_err(CareError::YamlDeserialization)
}

fn write_document<D: Serialize>(path: &Path, doc: &D) -> CareResult<()> {
    let raw = serde_yaml::to_string(doc).map_err(CareError::YamlSerialization)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(CareError::StorageDirCreation)?;
    }

    let tmp = path.with_extension(format!("{}.tmp-{}", DOCUMENT_EXTENSION, RecordId::new()));
    fs::write(&tmp, raw).map_err(CareError::FileWrite)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        CareError::FileWrite(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: RecordId,
        body: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> RecordId {
            self.id
        }
    }

    fn note(body: &str) -> Note {
        Note {
            id: RecordId::new(),
            body: body.into(),
        }
    }

    #[test]
    fn test_insert_then_get() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        let n = note("hello");

        store.insert(&n).unwrap();

        let loaded: Note = store.get(n.id).unwrap().unwrap();
        assert_eq!(loaded, n);
        assert!(n
            .id
            .sharded_file(&temp.path().join("notes"), "yaml")
            .is_file());
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        let n = note("once");

        store.insert(&n).unwrap();
        assert!(matches!(store.insert(&n), Err(CareError::RecordExists(_))));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        assert!(store.get::<Note>(RecordId::new()).unwrap().is_none());
    }

    #[test]
    fn test_update_applies_change() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        let n = note("draft");
        store.insert(&n).unwrap();

        let updated: Note = store
            .update(n.id, CareError::PrescriptionNotFound, |doc: &mut Note| {
                doc.body = "final".into()
            })
            .unwrap();

        assert_eq!(updated.body, "final");
        let loaded: Note = store.get(n.id).unwrap().unwrap();
        assert_eq!(loaded.body, "final");
    }

    #[test]
    fn test_list_filters_and_skips_invalid_documents() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        store.insert(&note("keep me")).unwrap();
        store.insert(&note("drop me")).unwrap();

        let junk = RecordId::new().sharded_file(&temp.path().join("notes"), "yaml");
        fs::create_dir_all(junk.parent().unwrap()).unwrap();
        fs::write(&junk, "id: [unterminated").unwrap();

        let kept: Vec<Note> = store.list(|n: &Note| n.body.starts_with("keep")).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].body, "keep me");

        let all: Vec<Note> = store.list(|_: &Note| true).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_list_missing_collection_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(&temp.path().join("absent"));
        assert!(store.list::<Note>(|_| true).unwrap().is_empty());
    }
}
