//! File selection entities

use serde::{Deserialize, Deserializer, Serialize};

/// A file chosen for the task, with the model's justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub path: String,
    #[serde(default)]
    pub reason: String,
    /// The file is needed for reference only and should not be edited.
    #[serde(default)]
    pub readonly: bool,
}

impl SelectedFile {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
            readonly: false,
        }
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// A staged file the model decided it does not need.
///
/// Accepts either a bare path string or a `{ "path", "reason" }` object on
/// the wire, since models produce both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredFile {
    pub path: String,
    pub reason: String,
}

impl IgnoredFile {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl<'de> Deserialize<'de> for IgnoredFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Path(String),
            Entry {
                path: String,
                #[serde(default)]
                reason: String,
            },
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Path(path) => IgnoredFile::new(path, ""),
            Wire::Entry { path, reason } => IgnoredFile::new(path, reason),
        })
    }
}

/// The part of a file that is relevant to the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileExtract {
    pub path: String,
    pub extract: String,
}

impl FileExtract {
    pub fn new(path: impl Into<String>, extract: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extract: extract.into(),
        }
    }
}

/// A requested file as shown to the model: its contents, or the reason it
/// could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedFile {
    pub path: String,
    pub contents: Result<String, String>,
}

impl InspectedFile {
    pub fn readable(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: Ok(contents.into()),
        }
    }

    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: Err(reason.into()),
        }
    }
}

/// Terminal artifact of the staged file-selection protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelection {
    pub files: Vec<SelectedFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extracts: Vec<FileExtract>,
}

impl FileSelection {
    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }
}
