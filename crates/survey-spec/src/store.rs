use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::record::{ResponseRecord, StoredMeta, SurveyDocument};

/// Persistence collaborator for submitted surveys.
///
/// Every insert creates a new document; there is no update or merge.
pub trait ResponseStore {
    fn insert(&mut self, document: &SurveyDocument) -> Result<StoredMeta, StoreError>;
    fn fetch_all(&self) -> Result<Vec<ResponseRecord>, StoreError>;
}

impl<S: ResponseStore + ?Sized> ResponseStore for &mut S {
    fn insert(&mut self, document: &SurveyDocument) -> Result<StoredMeta, StoreError> {
        (**self).insert(document)
    }

    fn fetch_all(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        (**self).fetch_all()
    }
}

fn stamp(document: &SurveyDocument) -> Result<(StoredMeta, Value), StoreError> {
    let meta = StoredMeta {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let mut value = serde_json::to_value(document)?;
    if let Value::Object(map) = &mut value {
        map.insert("_id".into(), Value::String(meta.id.clone()));
        map.insert("createdAt".into(), Value::String(meta.created_at.clone()));
    }
    Ok((meta, value))
}

/// Store kept in memory; useful for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw documents, which need not follow the current schema.
    pub fn with_documents(documents: Vec<Value>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ResponseStore for MemoryStore {
    fn insert(&mut self, document: &SurveyDocument) -> Result<StoredMeta, StoreError> {
        let (meta, value) = stamp(document)?;
        self.documents.push(value);
        Ok(meta)
    }

    fn fetch_all(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        Ok(self
            .documents
            .iter()
            .cloned()
            .map(ResponseRecord::from_value)
            .collect())
    }
}

/// Append-only JSON-lines file, one document per line.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResponseStore for JsonlStore {
    fn insert(&mut self, document: &SurveyDocument) -> Result<StoredMeta, StoreError> {
        let (meta, value) = stamp(document)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut line = serde_json::to_string(&value)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(meta)
    }

    /// A missing file reads as an empty store; blank lines are skipped.
    fn fetch_all(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(&line)?;
            records.push(ResponseRecord::from_value(value));
        }
        Ok(records)
    }
}
