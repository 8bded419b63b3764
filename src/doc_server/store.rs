use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("{0:?} is not a plain document name")]
    InvalidName(String),
    #[error("no document named {0} was found")]
    NotFound(String),
    #[error("error while editing document {0}")]
    Edit(String),
}

/// Documents in a single directory, looked up by lower-cased file name.
#[derive(Debug, Clone)]
pub struct DocStore {
    root: PathBuf,
}

impl DocStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, doc_name: &str) -> Result<PathBuf, DocError> {
        let normalized = doc_name.to_lowercase();
        let path = Path::new(&normalized);
        match path.file_name() {
            Some(file_name) if file_name == path.as_os_str() => Ok(self.root.join(file_name)),
            _ => Err(DocError::InvalidName(doc_name.to_owned())),
        }
    }

    pub async fn read(&self, doc_name: &str) -> Result<String, DocError> {
        let path = self.path_for(doc_name)?;
        tokio::fs::read_to_string(&path).await.map_err(|err| {
            tracing::error!(path = %path.display(), error = %err, "failed to read document");
            DocError::NotFound(doc_name.to_owned())
        })
    }

    /// Replaces the first occurrence of `old` with `new` and returns the
    /// updated contents.
    pub async fn edit(&self, doc_name: &str, old: &str, new: &str) -> Result<String, DocError> {
        let path = self.path_for(doc_name)?;
        let contents = tokio::fs::read_to_string(&path).await.map_err(|err| {
            tracing::error!(path = %path.display(), error = %err, "failed to read document");
            DocError::Edit(doc_name.to_owned())
        })?;

        let updated = contents.replacen(old, new, 1);
        tokio::fs::write(&path, &updated).await.map_err(|err| {
            tracing::error!(path = %path.display(), error = %err, "failed to write document");
            DocError::Edit(doc_name.to_owned())
        })?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, DocStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }
        let store = DocStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn names_are_lower_cased() {
        let (_dir, store) = store_with(&[("todo.txt", "buy milk")]);
        assert_eq!(store.read("TODO.txt").await.unwrap(), "buy milk");
    }

    #[tokio::test]
    async fn missing_document_names_the_document() {
        let (_dir, store) = store_with(&[]);
        let err = store.read("nope.md").await.unwrap_err();
        assert_eq!(err.to_string(), "no document named nope.md was found");
    }

    #[test]
    fn paths_outside_the_store_are_rejected() {
        let store = DocStore::new("/srv/docs");
        assert!(matches!(store.path_for("../secret"), Err(DocError::InvalidName(_))));
        assert!(matches!(store.path_for("a/b.txt"), Err(DocError::InvalidName(_))));
        assert!(matches!(store.path_for(".."), Err(DocError::InvalidName(_))));
        assert_eq!(
            store.path_for("Notes.MD").unwrap(),
            PathBuf::from("/srv/docs/notes.md")
        );
    }

    #[tokio::test]
    async fn edit_replaces_first_occurrence_only() {
        let (dir, store) = store_with(&[("plan.md", "step one, step one")]);
        let updated = store.edit("plan.md", "one", "two").await.unwrap();
        assert_eq!(updated, "step two, step one");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("plan.md")).unwrap(),
            "step two, step one"
        );
    }

    #[tokio::test]
    async fn edit_of_missing_document_fails() {
        let (_dir, store) = store_with(&[]);
        assert!(matches!(
            store.edit("plan.md", "a", "b").await,
            Err(DocError::Edit(name)) if name == "plan.md"
        ));
    }
}
