use serde::{Deserialize, Serialize};

/// Pull request data the rules are evaluated against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrContext {
    /// PR title
    #[serde(default)]
    pub title: String,

    /// PR description
    #[serde(default)]
    pub body: String,

    /// Source (head) branch name
    #[serde(default)]
    pub branch: String,

    /// Paths of changed files, in the order reported by the forge
    #[serde(default)]
    pub changed_files: Vec<String>,

    /// Structured file records, only used for file analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileChange>>,
}

/// A single changed file as reported by the GitHub files API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub filename: String,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default)]
    pub additions: u64,

    #[serde(default)]
    pub deletions: u64,

    #[serde(default)]
    pub changes: u64,
}

fn default_status() -> String {
    "unknown".to_string()
}

impl PrContext {
    /// Create a context with no changed files
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            branch: branch.into(),
            changed_files: Vec::new(),
            files: None,
        }
    }

    pub fn with_changed_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changed_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files(mut self, files: Vec<FileChange>) -> Self {
        self.files = Some(files);
        self
    }
}

impl FileChange {
    pub fn new(filename: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: status.into(),
            additions: 0,
            deletions: 0,
            changes: 0,
        }
    }
}
