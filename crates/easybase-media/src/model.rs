//! Media metadata models
//!
//! Folders form a tree below the media root; `None` as a parent means the
//! root itself. Paths are slash-delimited, relative to the root, and always
//! start and end with `/` (`/` for the root, `/a/b/` for a nested folder).

use chrono::{DateTime, Utc};
use easybase_store::Entity;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Path of the media root.
pub const ROOT_PATH: &str = "/";

/// A folder below the media root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaFolder {
    /// Unique identifier
    pub id: Uuid,

    /// Single path component
    pub folder_name: String,

    /// Containing folder; `None` for top-level folders
    pub parent_id: Option<Uuid>,

    /// Path of this folder, e.g. `/a/b/`
    pub folder_path: String,

    /// When the folder was created
    pub created_at: DateTime<Utc>,
}

impl MediaFolder {
    /// Create a folder inside the folder at `parent_path`.
    pub fn new(folder_name: impl Into<String>, parent_id: Option<Uuid>, parent_path: &str) -> Self {
        let folder_name = folder_name.into();
        Self {
            id: Uuid::now_v7(),
            folder_path: format!("{}{}/", parent_path, folder_name),
            folder_name,
            parent_id,
            created_at: Utc::now(),
        }
    }
}

impl Entity for MediaFolder {
    type Key = (Option<Uuid>, String);
    type Parent = Option<Uuid>;
    const NAME: &'static str = "MediaFolder";

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.parent_id, self.folder_name.clone())
    }

    fn parent(&self) -> Self::Parent {
        self.parent_id
    }
}

/// A stored file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaFile {
    /// Unique identifier
    pub id: Uuid,

    /// Single path component
    pub file_name: String,

    /// MIME type reported by the uploader
    pub content_type: String,

    /// Containing folder; `None` for files at the root
    pub folder_id: Option<Uuid>,

    /// Path of the containing folder
    pub file_path: String,

    /// Bytes written to disk
    pub size_bytes: u64,

    /// When the file was stored
    pub created_at: DateTime<Utc>,
}

impl MediaFile {
    /// Path of the file relative to the root, e.g. `/a/b/photo.png`.
    pub fn relative_path(&self) -> String {
        format!("{}{}", self.file_path, self.file_name)
    }
}

impl Entity for MediaFile {
    type Key = (Option<Uuid>, String);
    type Parent = Option<Uuid>;
    const NAME: &'static str = "MediaFile";

    fn id(&self) -> Uuid {
        self.id
    }

    fn key(&self) -> Self::Key {
        (self.folder_id, self.file_name.clone())
    }

    fn parent(&self) -> Self::Parent {
        self.folder_id
    }
}

/// Folder listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderSummary {
    /// Folder id
    pub folder_id: Uuid,
    /// Single path component
    pub folder_name: String,
}

impl From<MediaFolder> for FolderSummary {
    fn from(folder: MediaFolder) -> Self {
        Self {
            folder_id: folder.id,
            folder_name: folder.folder_name,
        }
    }
}

/// Public view of a stored file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDetails {
    /// Single path component
    pub file_name: String,
    /// When the file was stored
    pub created_at: DateTime<Utc>,
    /// URL prefix + folder path + file name
    pub url: String,
}

/// One file handed to [`crate::MediaStore::add_files`].
pub struct Upload {
    /// Name to store the file under
    pub file_name: String,
    /// MIME type reported by the uploader
    pub content_type: String,
    body: Box<dyn AsyncRead + Send + Unpin>,
}

impl Upload {
    /// Upload streamed from any async reader.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        body: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            body: Box::new(body),
        }
    }

    /// Upload of an in-memory buffer.
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(file_name, content_type, std::io::Cursor::new(bytes.into()))
    }

    pub(crate) fn into_body(self) -> Box<dyn AsyncRead + Send + Unpin> {
        self.body
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Result of [`crate::MediaStore::add_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No uploads were given.
    Empty,
    /// Files whose bytes reached disk. Failed files are absent.
    Stored(Vec<MediaFile>),
}

impl UploadOutcome {
    /// Stored files, empty for [`UploadOutcome::Empty`].
    pub fn files(&self) -> &[MediaFile] {
        match self {
            Self::Empty => &[],
            Self::Stored(files) => files,
        }
    }
}
