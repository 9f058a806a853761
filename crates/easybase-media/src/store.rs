//! Media store
//!
//! Folders and files live on disk under the configured media root, with
//! their metadata in repositories. Every delete is checked against the
//! canonical root before anything is removed.

use easybase_store::{Entity, MemoryRepository, Page, PageRequest, Repository};
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::error::{MediaError, MediaResult};
use crate::model::{
    FileDetails, FolderSummary, MediaFile, MediaFolder, Upload, UploadOutcome, ROOT_PATH,
};

/// Chunk size of streamed writes.
const WRITE_BUFFER_SIZE: usize = 8 * 1024;

/// Folder and file storage under one media root.
///
/// # Example
///
/// ```rust,no_run
/// use easybase_media::{MediaConfig, MediaStore, Upload};
///
/// async fn example() {
///     let store = MediaStore::in_memory(MediaConfig::default());
///     let folder_id = store.create_folder("avatars", None).await.unwrap();
///
///     let outcome = store
///         .add_files(Some(folder_id), vec![Upload::from_bytes("me.png", "image/png", vec![0u8; 16])])
///         .await
///         .unwrap();
///     let details = store.file_details(outcome.files()[0].id).await.unwrap();
///     assert_eq!(details.url, "media/avatars/me.png");
/// }
/// ```
#[derive(Clone)]
pub struct MediaStore {
    config: MediaConfig,
    folders: Arc<dyn Repository<MediaFolder>>,
    files: Arc<dyn Repository<MediaFile>>,
}

impl std::fmt::Debug for MediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MediaStore {
    /// Create a store over metadata repositories.
    pub fn new(
        config: MediaConfig,
        folders: Arc<dyn Repository<MediaFolder>>,
        files: Arc<dyn Repository<MediaFile>>,
    ) -> Self {
        Self {
            config,
            folders,
            files,
        }
    }

    /// Create a store with in-memory metadata.
    pub fn in_memory(config: MediaConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryRepository::<MediaFolder>::new()),
            Arc::new(MemoryRepository::<MediaFile>::new()),
        )
    }

    /// Store configuration.
    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// On-disk location of a slash-delimited path relative to the root.
    fn disk_path(&self, relative: &str) -> PathBuf {
        self.config.root_dir.join(relative.trim_start_matches('/'))
    }

    async fn folder(&self, folder_id: Uuid) -> MediaResult<MediaFolder> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| MediaError::not_found(MediaFolder::NAME, folder_id))
    }

    /// Path of a folder, or of the root for `None`.
    async fn folder_path(&self, folder_id: Option<Uuid>) -> MediaResult<String> {
        match folder_id {
            Some(id) => Ok(self.folder(id).await?.folder_path),
            None => Ok(ROOT_PATH.to_string()),
        }
    }

    /// Create a folder under `parent_id` (`None` for the root) and its
    /// directory. Returns the new folder id.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is not a single path component or the
    ///   parent already holds a folder of that name
    /// - `NotFound` if the parent does not exist
    #[instrument(skip(self))]
    pub async fn create_folder(&self, folder_name: &str, parent_id: Option<Uuid>) -> MediaResult<Uuid> {
        validate_component(folder_name, "folder name")?;
        let parent_path = self.folder_path(parent_id).await?;

        if self
            .folders
            .exists_by_key(&(parent_id, folder_name.to_string()))
            .await?
        {
            return Err(MediaError::Validation(format!(
                "folder {} already exists",
                folder_name
            )));
        }

        let folder = MediaFolder::new(folder_name, parent_id, &parent_path);
        fs::create_dir_all(self.disk_path(&folder.folder_path)).await?;
        let folder = self.folders.insert(folder).await?;

        info!(folder_id = %folder.id, folder_path = %folder.folder_path, "Media folder created");
        Ok(folder.id)
    }

    /// One page of the folders directly under `parent_id` (`None` for the
    /// root).
    pub async fn folders_in(
        &self,
        parent_id: Option<Uuid>,
        request: &PageRequest,
    ) -> MediaResult<Page<FolderSummary>> {
        debug!(?parent_id, page = request.page, "Listing media folders");
        let page = self.folders.find_page_by_parent(&parent_id, request).await?;
        Ok(page.map(FolderSummary::from))
    }

    /// Store uploads in a folder (`None` for the root).
    ///
    /// Every name is validated before anything is written. Bytes are then
    /// streamed to disk one file at a time; a file whose write fails is
    /// logged and left out of the result while the others continue. A file
    /// that already exists at the same path is overwritten.
    #[instrument(skip(self, uploads), fields(count = uploads.len()))]
    pub async fn add_files(
        &self,
        folder_id: Option<Uuid>,
        uploads: Vec<Upload>,
    ) -> MediaResult<UploadOutcome> {
        if uploads.is_empty() {
            return Ok(UploadOutcome::Empty);
        }
        for upload in &uploads {
            validate_component(&upload.file_name, "file name")?;
        }

        let file_path = self.folder_path(folder_id).await?;
        let directory = self.disk_path(&file_path);
        fs::create_dir_all(&directory).await?;

        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let file_name = upload.file_name.clone();
            let content_type = upload.content_type.clone();
            let target = directory.join(&file_name);

            let size_bytes = match write_stream(&target, upload.into_body()).await {
                Ok(size) => size,
                Err(e) => {
                    warn!(file_name = %file_name, error = %e, "Failed to write upload, skipping");
                    if let Err(e) = fs::remove_file(&target).await {
                        if e.kind() != ErrorKind::NotFound {
                            debug!(file_name = %file_name, error = %e, "Partial upload left on disk");
                        }
                    }
                    continue;
                }
            };

            let file = self
                .record_file(folder_id, &file_path, file_name, content_type, size_bytes)
                .await?;
            stored.push(file);
        }

        info!(stored = stored.len(), file_path = %file_path, "Uploads stored");
        Ok(UploadOutcome::Stored(stored))
    }

    /// Insert or refresh the metadata of a written file.
    async fn record_file(
        &self,
        folder_id: Option<Uuid>,
        file_path: &str,
        file_name: String,
        content_type: String,
        size_bytes: u64,
    ) -> MediaResult<MediaFile> {
        let existing = self
            .files
            .find_by_key(&(folder_id, file_name.clone()))
            .await?;

        let file = match existing {
            Some(mut file) => {
                file.content_type = content_type;
                file.size_bytes = size_bytes;
                file.created_at = chrono::Utc::now();
                self.files.update(file).await?
            }
            None => {
                self.files
                    .insert(MediaFile {
                        id: Uuid::now_v7(),
                        file_name,
                        content_type,
                        folder_id,
                        file_path: file_path.to_string(),
                        size_bytes,
                        created_at: chrono::Utc::now(),
                    })
                    .await?
            }
        };
        Ok(file)
    }

    fn details(&self, file: &MediaFile) -> FileDetails {
        FileDetails {
            file_name: file.file_name.clone(),
            created_at: file.created_at,
            url: self.config.file_url(&file.file_path, &file.file_name),
        }
    }

    /// Public details of one file.
    pub async fn file_details(&self, file_id: Uuid) -> MediaResult<FileDetails> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| MediaError::not_found(MediaFile::NAME, file_id))?;
        Ok(self.details(&file))
    }

    /// One page of the files directly in `folder_id` (`None` for the root).
    pub async fn files_in(
        &self,
        folder_id: Option<Uuid>,
        request: &PageRequest,
    ) -> MediaResult<Page<FileDetails>> {
        debug!(?folder_id, page = request.page, "Listing media files");
        let page = self.files.find_page_by_parent(&folder_id, request).await?;
        Ok(page.map(|file| self.details(&file)))
    }

    /// Delete a file from disk, then its metadata.
    #[instrument(skip(self))]
    pub async fn delete_file(&self, file_id: Uuid) -> MediaResult<()> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| MediaError::not_found(MediaFile::NAME, file_id))?;

        self.delete_from_root(&file.relative_path()).await?;
        self.files.delete(file_id).await?;

        info!(file_id = %file_id, file_name = %file.file_name, "Media file deleted");
        Ok(())
    }

    /// Delete a folder with every descendant folder and file: the directory
    /// tree first, then the metadata.
    #[instrument(skip(self))]
    pub async fn delete_folder(&self, folder_id: Uuid) -> MediaResult<()> {
        let folder = self.folder(folder_id).await?;

        let mut tree = vec![folder_id];
        let mut queue = VecDeque::from([folder_id]);
        while let Some(current) = queue.pop_front() {
            for child in self.folders.find_by_parent(&Some(current)).await? {
                tree.push(child.id);
                queue.push_back(child.id);
            }
        }

        self.delete_from_root(&folder.folder_path).await?;

        let mut file_count = 0;
        for id in &tree {
            for file in self.files.find_by_parent(&Some(*id)).await? {
                self.files.delete(file.id).await?;
                file_count += 1;
            }
        }
        // Children before parents
        for id in tree.iter().rev() {
            self.folders.delete(*id).await?;
        }

        info!(
            folder_path = %folder.folder_path,
            folders = tree.len(),
            files = file_count,
            "Media folder deleted"
        );
        Ok(())
    }

    /// Remove a file or directory tree at a path relative to the root.
    ///
    /// A symlink as the final component is removed itself, never the
    /// entry it points to. Returns `false` if nothing exists there.
    ///
    /// # Errors
    ///
    /// `OutsideRoot` if the path contains non-normal components, names the
    /// root itself, or its canonical parent is not inside the canonical
    /// root. The error never names the resolved path.
    pub async fn delete_from_root(&self, relative_path: &str) -> MediaResult<bool> {
        let relative = Path::new(relative_path.trim_start_matches('/'));
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            warn!("Rejected media delete with path traversal");
            return Err(MediaError::OutsideRoot);
        }
        let (Some(name), Some(parent)) = (relative.file_name(), relative.parent()) else {
            warn!("Rejected media delete of the media root");
            return Err(MediaError::OutsideRoot);
        };

        let Some(root) = canonicalize_existing(&self.config.root_dir).await? else {
            return Ok(false);
        };
        let Some(parent) = canonicalize_existing(&root.join(parent)).await? else {
            debug!("Media delete target does not exist");
            return Ok(false);
        };
        if !parent.starts_with(&root) {
            warn!("Rejected media delete resolving outside the media root");
            return Err(MediaError::OutsideRoot);
        }

        let target = parent.join(name);
        let metadata = match fs::symlink_metadata(&target).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Media delete target does not exist");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&target).await?;
        } else {
            // Files and symlinks alike; a link goes, its target stays
            fs::remove_file(&target).await?;
        }
        Ok(true)
    }
}

/// Canonicalize a path, mapping "does not exist" to `None`.
async fn canonicalize_existing(path: &Path) -> MediaResult<Option<PathBuf>> {
    match fs::canonicalize(path).await {
        Ok(canonical) => Ok(Some(canonical)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Stream a body to `path` in fixed-size chunks. Returns the bytes written.
async fn write_stream(
    path: &Path,
    mut body: Box<dyn AsyncRead + Send + Unpin>,
) -> std::io::Result<u64> {
    let mut file = fs::File::create(path).await?;
    let mut buffer = vec![0u8; WRITE_BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let read = body.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read]).await?;
        written += read as u64;
    }

    file.flush().await?;
    Ok(written)
}

/// Require a single, non-empty path component.
fn validate_component(name: &str, what: &str) -> MediaResult<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(MediaError::Validation(format!("invalid {}: {:?}", what, name)))
    }
}
