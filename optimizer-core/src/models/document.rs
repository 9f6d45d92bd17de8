use serde::{Deserialize, Serialize};

/// Largest document the upload step accepts, in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// A file handed over by the file picker. Only the display name and the
/// byte size are consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub size_bytes: u64,
}

impl DocumentRef {
    pub fn new(
        name: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    pub fn exceeds(
        &self,
        limit_bytes: u64,
    ) -> bool {
        self.size_bytes > limit_bytes
    }
}

/// Outcome of document processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReceipt {
    pub name: String,
    pub message: String,
}
