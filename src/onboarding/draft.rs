//! Draft store: the in-progress answer set of one wizard instance.
//!
//! The draft is a plain bag of values keyed by field name. It performs no
//! validation; shape and content checks belong to the controller boundary and
//! the step validator.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::registry::{FieldKind, WizardDefinition};

/// Metadata of an attached file. The bytes stay on disk until submission.
#[derive(Debug, PartialEq, Eq)]
pub struct FileMeta {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub media_type: String,
}

/// Shared handle to an attached file. Cloning is cheap and keeps identity,
/// so draft snapshots never copy file contents.
#[derive(Debug, Clone)]
pub struct FileHandle {
    inner: Arc<FileMeta>,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>, name: &str, size: u64, media_type: &str) -> Self {
        Self {
            inner: Arc::new(FileMeta {
                path: path.into(),
                name: name.to_string(),
                size,
                media_type: media_type.to_string(),
            }),
        }
    }

    /// Attach a file from disk, reading its size and guessing the media type
    /// from the extension unless one is given.
    pub async fn from_path(path: &Path, media_type: Option<&str>) -> std::io::Result<Self> {
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let media_type = media_type
            .map(str::to_string)
            .unwrap_or_else(|| guess_media_type(path).to_string());
        Ok(Self::new(path, &name, meta.len(), &media_type))
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn size(&self) -> u64 {
        self.inner.size
    }

    pub fn media_type(&self) -> &str {
        &self.inner.media_type
    }

    /// Whether two handles refer to the same attachment.
    pub fn ptr_eq(&self, other: &FileHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner == other.inner
    }
}

impl Serialize for FileHandle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("FileHandle", 3)?;
        s.serialize_field("name", self.name())?;
        s.serialize_field("size", &self.size())?;
        s.serialize_field("media_type", self.media_type())?;
        s.end()
    }
}

fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// A value held in the draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Bool(bool),
    List(Vec<String>),
    File(FileHandle),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Empty string, empty list, unticked box. Files are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Bool(b) => !b,
            Self::List(items) => items.is_empty(),
            Self::File(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }

    /// Name of the value shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list",
            Self::File(_) => "file",
        }
    }

    /// Whether this value shape is legal for a field kind.
    pub fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (
                Self::Text(_),
                FieldKind::Text | FieldKind::Date | FieldKind::Numeric | FieldKind::Select
            ) | (Self::List(_), FieldKind::MultiSelect)
                | (Self::Bool(_), FieldKind::Checkbox)
                | (Self::File(_), FieldKind::File)
        )
    }

    /// The value a freshly rendered field of this kind starts with.
    pub fn empty_for(kind: FieldKind) -> Option<Value> {
        match kind {
            FieldKind::Text | FieldKind::Date | FieldKind::Numeric | FieldKind::Select => {
                Some(Self::Text(String::new()))
            }
            FieldKind::MultiSelect => Some(Self::List(Vec::new())),
            FieldKind::Checkbox => Some(Self::Bool(false)),
            FieldKind::File => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<FileHandle> for Value {
    fn from(f: FileHandle) -> Self {
        Self::File(f)
    }
}

/// Scalar input as it arrives over JSON. Files are attached separately.
/// Numbers are kept as their text form, the way a numeric input holds them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
}

impl From<FieldInput> for Value {
    fn from(input: FieldInput) -> Self {
        match input {
            FieldInput::Bool(b) => Value::Bool(b),
            FieldInput::Number(n) => Value::Text(n.to_string()),
            FieldInput::Text(s) => Value::Text(s),
            FieldInput::List(items) => Value::List(items),
        }
    }
}

/// Ordered copy of every draft value, handed to the submission gateway.
pub type DraftSnapshot = BTreeMap<String, Value>;

/// Accumulated answers of one wizard instance.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    values: HashMap<String, Value>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft seeded with every field's empty value.
    pub fn seeded(definition: &WizardDefinition) -> Self {
        let values = definition
            .fields()
            .filter_map(|f| Value::empty_for(f.kind).map(|v| (f.name.clone(), v)))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Insert or overwrite a value. No coercion happens here.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Attach a file, replacing any earlier attachment for the field.
    pub fn set_file(&mut self, name: &str, handle: FileHandle) {
        self.values.insert(name.to_string(), Value::File(handle));
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
