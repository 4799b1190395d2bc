use crate::keys::{
    is_partial, numbered_file_name, report_file_name, PARTIAL_PREFIX, PARTIAL_SUFFIX,
};
use crate::listing::{matches_search, paginate, sort_newest_first};
use crate::mime::content_type_for;
use crate::paths::{escapes_root, is_safe_relative};
use crate::traits::{FileStore, StorageError, StorageResult, StoredFile, StoredReport};
use acuda_core::models::{FilePage, FileQuery, StoredFileEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Numbered names tried after the plain report name is taken.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Local filesystem file store
#[derive(Clone, Debug)]
pub struct LocalFileStore {
    base_path: PathBuf,
}

impl LocalFileStore {
    /// Create a new LocalFileStore rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalFileStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Folder of the user owning `ruta`.
    pub fn user_root(&self, ruta: &str) -> StorageResult<PathBuf> {
        if !is_safe_relative(ruta) {
            return Err(StorageError::InvalidRoot(format!(
                "User folder must be a relative path without '..': {}",
                ruta
            )));
        }
        Ok(self.base_path.join(ruta))
    }

    /// Map `name` to a regular file inside `root`.
    ///
    /// Existence first, then the lexical check, then the symlink-resolved check.
    async fn resolve(&self, root: &Path, name: &str) -> StorageResult<PathBuf> {
        let candidate = root.join(name);

        if !fs::try_exists(&candidate).await.unwrap_or(false) {
            return Err(StorageError::NotFound(name.to_string()));
        }

        if escapes_root(root, &candidate) {
            tracing::warn!(
                root = %root.display(),
                requested = %name,
                "Rejected file request outside user folder"
            );
            return Err(StorageError::AccessDenied(name.to_string()));
        }

        let root_canonical = fs::canonicalize(root).await?;
        let canonical = fs::canonicalize(&candidate).await?;
        if !canonical.starts_with(&root_canonical) {
            tracing::warn!(
                root = %root_canonical.display(),
                resolved = %canonical.display(),
                "Rejected symlink leading outside user folder"
            );
            return Err(StorageError::AccessDenied(name.to_string()));
        }

        let metadata = fs::metadata(&canonical).await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        Ok(canonical)
    }

    /// Read one directory entry into a listing row. Anything but a regular file is skipped.
    async fn entry_for(root: &Path, entry: &fs::DirEntry) -> StorageResult<Option<StoredFileEntry>> {
        let metadata = match fs::symlink_metadata(entry.path()).await {
            Ok(metadata) => metadata,
            // Removed since read_dir returned it
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Ok(None);
        }

        let Ok(nombre) = entry.file_name().into_string() else {
            return Ok(None);
        };
        if is_partial(&nombre) {
            return Ok(None);
        }

        let created = metadata.created().or_else(|_| metadata.modified())?;

        Ok(Some(StoredFileEntry {
            ruta: root.join(&nombre).display().to_string(),
            nombre,
            fecha_creacion: DateTime::<Utc>::from(created),
            tamano: metadata.len(),
        }))
    }
}

/// Write `data` to a hidden sibling file, then move it under the first free report name.
/// A failed write never leaves a visible partial PDF, and an existing report is never
/// overwritten.
fn persist_report(root: &Path, base_name: &str, data: &[u8]) -> StorageResult<(String, PathBuf)> {
    let write_failed = |e: std::io::Error| {
        StorageError::WriteFailed(format!("Failed to write report in {}: {}", root.display(), e))
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(root)
        .map_err(write_failed)?;
    tmp.write_all(data).map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;

    let mut name = base_name.to_string();
    let mut attempt = 0;
    loop {
        let path = root.join(&name);
        match tmp.persist_noclobber(&path) {
            Ok(_) => return Ok((name, path)),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                tmp = e.file;
                attempt += 1;
                name = numbered_file_name(base_name, attempt);
            }
            Err(e) => return Err(write_failed(e.error)),
        }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn list_files(&self, ruta: &str, query: &FileQuery) -> StorageResult<FilePage> {
        let root = self.user_root(ruta)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&root).await.unwrap_or(false) {
            fs::create_dir_all(&root).await?;
            tracing::info!(path = %root.display(), "Created user folder");
            return Ok(paginate(Vec::new(), query));
        }

        let root = fs::canonicalize(&root).await?;
        let mut dir = fs::read_dir(&root).await?;
        let mut entries = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            if let Some(file) = Self::entry_for(&root, &entry).await? {
                if matches_search(&file.nombre, &query.search) {
                    entries.push(file);
                }
            }
        }

        sort_newest_first(&mut entries);
        let page = paginate(entries, query);

        tracing::debug!(
            path = %root.display(),
            total = page.total,
            page = page.pagina,
            returned = page.documentos.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Listed user folder"
        );

        Ok(page)
    }

    async fn write_report(&self, ruta: &str, data: &[u8]) -> StorageResult<StoredReport> {
        let root = self.user_root(ruta)?;
        fs::create_dir_all(&root).await?;

        let base_name = report_file_name(Utc::now());
        let start = std::time::Instant::now();

        let data_owned = data.to_vec();
        let (name, path) =
            tokio::task::spawn_blocking(move || persist_report(&root, &base_name, &data_owned))
                .await
                .map_err(|e| StorageError::WriteFailed(format!("Report write task failed: {}", e)))??;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Report saved to user folder"
        );

        Ok(StoredReport { name, path })
    }

    async fn open(&self, ruta: &str, name: &str) -> StorageResult<StoredFile> {
        let root = self.user_root(ruta)?;
        let path = self.resolve(&root, name).await?;

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;
        let size = file.metadata().await?.len();

        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(path = %path_display, error = %e, "Failed to read file chunk");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        tracing::info!(path = %path.display(), size_bytes = size, "Streaming stored file");

        Ok(StoredFile {
            name: name.to_string(),
            size,
            content_type: content_type_for(name),
            stream: Box::pin(stream),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn read_all(file: StoredFile) -> Vec<u8> {
        let mut stream = file.stream;
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_missing_folder_is_created_and_empty() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();

        let page = store
            .list_files("usuarios/ana", &FileQuery::default())
            .await
            .unwrap();

        assert!(page.documentos.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.pagina, 1);
        assert_eq!(page.total_paginas, 0);
        assert!(dir.path().join("usuarios/ana").is_dir());
    }

    #[tokio::test]
    async fn test_write_then_list_and_open() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();

        let report = store.write_report("ana", b"%PDF-1.4 test").await.unwrap();
        assert!(report.name.starts_with("parte_respuesta_alarma_"));
        assert!(report.name.ends_with(".pdf"));

        let page = store.list_files("ana", &FileQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.documentos[0].nombre, report.name);
        assert_eq!(page.documentos[0].tamano, 13);

        let file = store.open("ana", &report.name).await.unwrap();
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.size, 13);
        assert_eq!(read_all(file).await, b"%PDF-1.4 test");
    }

    #[test]
    fn test_report_names_never_collide() {
        let dir = tempdir().unwrap();
        let base = "parte_respuesta_alarma_2026-10-19T08-15-30-123Z.pdf";

        let (first, _) = persist_report(dir.path(), base, b"uno").unwrap();
        let (second, _) = persist_report(dir.path(), base, b"dos").unwrap();
        let (third, path) = persist_report(dir.path(), base, b"tres").unwrap();

        assert_eq!(first, base);
        assert_eq!(second, "parte_respuesta_alarma_2026-10-19T08-15-30-123Z-1.pdf");
        assert_eq!(third, "parte_respuesta_alarma_2026-10-19T08-15-30-123Z-2.pdf");
        assert_eq!(std::fs::read(dir.path().join(base)).unwrap(), b"uno");
        assert_eq!(std::fs::read(path).unwrap(), b"tres");

        // Only the three reports remain; no partial files are left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[tokio::test]
    async fn test_listing_hides_partial_reports() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();
        let root = dir.path().join("ana");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join(".parte_en_curso_Xy12ab.part"), b"%PDF-1.4 a medias").unwrap();
        std::fs::write(root.join("parte.pdf"), b"%PDF-1.4").unwrap();

        let page = store.list_files("ana", &FileQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.documentos[0].nombre, "parte.pdf");
    }

    #[tokio::test]
    async fn test_entry_removed_after_read_dir_is_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("ana");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("efimero.pdf"), b"x").unwrap();

        let mut entries = fs::read_dir(&root).await.unwrap();
        let entry = entries.next_entry().await.unwrap().unwrap();
        std::fs::remove_file(root.join("efimero.pdf")).unwrap();

        let row = LocalFileStore::entry_for(&root, &entry).await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_listing_skips_directories_and_filters() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();
        let root = dir.path().join("ana");
        std::fs::create_dir_all(root.join("subcarpeta")).unwrap();
        std::fs::write(root.join("Informe_Enero.pdf"), b"a").unwrap();
        std::fs::write(root.join("notas.txt"), b"b").unwrap();

        let all = store.list_files("ana", &FileQuery::default()).await.unwrap();
        assert_eq!(all.total, 2);

        let query = FileQuery {
            search: "informe".to_string(),
            ..FileQuery::default()
        };
        let filtered = store.list_files("ana", &query).await.unwrap();
        assert_eq!(filtered.total, 1);
        assert_eq!(filtered.documentos[0].nombre, "Informe_Enero.pdf");
    }

    #[tokio::test]
    async fn test_listing_is_stable_without_writes() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();
        let root = dir.path().join("ana");
        std::fs::create_dir_all(&root).unwrap();
        for i in 0..5 {
            std::fs::write(root.join(format!("doc{}.pdf", i)), b"x").unwrap();
        }

        let first = store.list_files("ana", &FileQuery::default()).await.unwrap();
        let second = store.list_files("ana", &FileQuery::default()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();
        std::fs::create_dir_all(dir.path().join("ana")).unwrap();

        let result = store.open("ana", "no_existe.pdf").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));

        let result = store.open("ana", "../../etc/passwd-does-not-exist").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_traversal_to_existing_file_is_denied() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();
        std::fs::create_dir_all(dir.path().join("ana")).unwrap();
        std::fs::create_dir_all(dir.path().join("bob")).unwrap();
        std::fs::write(dir.path().join("bob/secreto.pdf"), b"x").unwrap();

        let result = store.open("ana", "../bob/secreto.pdf").await;
        assert!(matches!(result, Err(StorageError::AccessDenied(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_outside_folder_is_denied() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        std::fs::write(outside.path().join("secreto.txt"), b"x").unwrap();

        let store = LocalFileStore::new(dir.path()).await.unwrap();
        let root = dir.path().join("ana");
        std::fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(outside.path().join("secreto.txt"), root.join("enlace.txt"))
            .unwrap();

        let result = store.open("ana", "enlace.txt").await;
        assert!(matches!(result, Err(StorageError::AccessDenied(_))));

        let page = store.list_files("ana", &FileQuery::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();
        std::fs::create_dir_all(dir.path().join("ana/carpeta")).unwrap();

        let result = store.open("ana", "carpeta").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unsafe_user_folder_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path()).await.unwrap();

        let result = store.list_files("../otro", &FileQuery::default()).await;
        assert!(matches!(result, Err(StorageError::InvalidRoot(_))));

        let result = store.write_report("/tmp", b"x").await;
        assert!(matches!(result, Err(StorageError::InvalidRoot(_))));
    }
}
