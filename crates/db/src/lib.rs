//! Whole-document JSON persistence.
//!
//! A [`JsonFile`] holds a single JSON array on disk. Every load reads the
//! full document and every save rewrites it; there is no log and no partial
//! update. Saves go through a sibling temporary file followed by a rename so
//! readers never observe a half-written document.

use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

const EMPTY_DOCUMENT: &str = "[]";

/// Errors raised while reading or writing a JSON document.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> DbError + '_ {
    move |source| DbError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A JSON array of `T` stored in a single file.
#[derive(Debug, Clone)]
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open the document at `path`, creating parent directories and an empty
    /// array when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        if !path.exists() {
            tracing::info!(
                target: "bookshelf-db",
                path = %path.display(),
                "initializing empty document"
            );
            fs::write(&path, EMPTY_DOCUMENT).map_err(io_error(&path))?;
        }

        Ok(Self {
            path,
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the whole document. A zero-length file decodes as an
    /// empty collection.
    pub fn load(&self) -> DbResult<Vec<T>> {
        let raw = fs::read_to_string(&self.path).map_err(io_error(&self.path))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|source| DbError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Encode `items` and replace the document with it.
    pub fn save(&self, items: &[T]) -> DbResult<()> {
        let encoded = serde_json::to_vec(items)?;
        let tmp_path = self.tmp_path();

        {
            let mut tmp = fs::File::create(&tmp_path).map_err(io_error(&tmp_path))?;
            tmp.write_all(&encoded).map_err(io_error(&tmp_path))?;
            tmp.sync_all().map_err(io_error(&tmp_path))?;
        }

        fs::rename(&tmp_path, &self.path).map_err(io_error(&self.path))?;

        tracing::debug!(
            target: "bookshelf-db",
            path = %self.path.display(),
            count = items.len(),
            bytes = encoded.len(),
            "document saved"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
