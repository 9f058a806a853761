//! # EasyBase Media
//!
//! Folder and file storage for the EasyBase platform.
//!
//! ## Overview
//!
//! The easybase-media crate handles:
//! - **Folders**: A tree of named folders mirrored as directories under the
//!   media root
//! - **Uploads**: Streamed, best-effort writes of file batches
//! - **Listings**: Paged folder summaries and file details with public URLs
//! - **Deletes**: Files, whole folder trees, and raw root-relative paths,
//!   all confined to the canonical media root
//!
//! ## Layout
//!
//! ```text
//! <root_dir>/                 folder_path "/"
//!   ├─ avatars/               folder_path "/avatars/"
//!   │    └─ me.png            url "<url_prefix>/avatars/me.png"
//!   └─ logo.svg               url "<url_prefix>/logo.svg"
//! ```
//!
//! ## Configuration
//!
//! [`MediaConfig::from_env`] reads `EASYBASE_MEDIA_ROOT` (default
//! `upload`) and `EASYBASE_MEDIA_URL_PREFIX` (default `media`).

pub mod config;
pub mod error;
pub mod model;
pub mod store;

// Re-export main types
pub use config::{ConfigError, MediaConfig};
pub use error::{MediaError, MediaResult};
pub use model::{FileDetails, FolderSummary, MediaFile, MediaFolder, Upload, UploadOutcome};
pub use store::MediaStore;
