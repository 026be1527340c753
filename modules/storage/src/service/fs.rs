use crate::service::{StorageBackend, StoreError};
use anyhow::Context;
use bytes::Bytes;
use futures::Stream;
use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};
use tempfile::{tempdir, TempDir};
use tokio::{
    fs::{create_dir_all, File, OpenOptions},
    io::AsyncWriteExt,
};
use tokio_util::io::ReaderStream;

/// A filesystem backed store
///
/// ## Layout
///
/// The layout of the filesystem is as follows:
///
/// ```ignore
/// <base>/
///   <container>/
///     <path> # file, possibly nested
/// ```
///
/// Containers keep unrelated content apart, the path within a container is
/// chosen by the caller.
#[derive(Clone, Debug)]
pub struct FileSystemBackend {
    base: PathBuf,
}

impl FileSystemBackend {
    pub async fn new(base: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let base = base.into();

        create_dir_all(&base)
            .await
            .with_context(|| format!("unable to create storage base: {}", base.display()))?;

        Ok(Self { base })
    }

    /// Create a new storage for testing
    pub async fn for_test() -> anyhow::Result<(Self, TempDir)> {
        let dir = tempdir()?;

        Self::new(dir.path()).await.map(|result| (result, dir))
    }

    /// Resolve a container and path to a location under the base directory.
    ///
    /// Only plain path components are accepted, so a location can never
    /// escape the base.
    fn target(&self, container: &str, path: &str) -> Result<PathBuf, std::io::Error> {
        let mut target = self.base.clone();

        for component in Path::new(container)
            .components()
            .chain(Path::new(path).components())
        {
            match component {
                Component::Normal(part) => target.push(part),
                _ => {
                    return Err(std::io::Error::new(
                        ErrorKind::InvalidInput,
                        format!("invalid storage location: {container}/{path}"),
                    ))
                }
            }
        }

        Ok(target)
    }
}

impl StorageBackend for FileSystemBackend {
    type Error = std::io::Error;

    async fn store(
        &self,
        container: &str,
        path: &str,
        data: Bytes,
        overwrite: bool,
    ) -> Result<(), StoreError<Self::Error>> {
        let target = self.target(container, path).map_err(StoreError::Backend)?;

        if let Some(parent) = target.parent() {
            create_dir_all(parent).await.map_err(StoreError::Backend)?;
        }

        let mut file = if overwrite {
            File::create(&target).await.map_err(StoreError::Backend)?
        } else {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
            {
                Ok(file) => file,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    return Err(StoreError::AlreadyExists(format!("{container}/{path}")))
                }
                Err(err) => return Err(StoreError::Backend(err)),
            }
        };

        file.write_all(&data).await.map_err(StoreError::Backend)?;

        // ensure we have all bytes on disk before the file is observable

        file.flush().await.map_err(StoreError::Backend)?;

        Ok(())
    }

    async fn exists(&self, container: &str, path: &str) -> Result<bool, Self::Error> {
        let target = self.target(container, path)?;

        // only a regular file counts, anything else is not a stored blob
        match tokio::fs::metadata(&target).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn retrieve(
        self,
        container: String,
        path: String,
    ) -> Result<Option<impl Stream<Item = Result<Bytes, Self::Error>>>, Self::Error> {
        let target = self.target(&container, &path)?;

        log::debug!("opening file: {}", target.display());

        let file = match File::open(&target).await {
            Ok(file) => Some(file),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(err),
        };

        Ok(file.map(ReaderStream::new))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test(tokio::test)]
    async fn store_and_retrieve() {
        let (backend, dir) = FileSystemBackend::for_test().await.unwrap();

        backend
            .store("certs", "SHA-256/cafe.cer", Bytes::from_static(b"Hello World"), false)
            .await
            .expect("store must succeed");

        let target = dir.path().join("certs").join("SHA-256").join("cafe.cer");
        assert!(target.exists());

        let data = backend
            .retrieve_buf("certs".into(), "SHA-256/cafe.cer".into())
            .await
            .unwrap()
            .expect("content must be present");
        assert_eq!(&data[..], b"Hello World");
    }

    #[test(tokio::test)]
    async fn store_existing() {
        let (backend, _dir) = FileSystemBackend::for_test().await.unwrap();

        backend
            .store("certs", "a.cer", Bytes::from_static(b"first"), false)
            .await
            .unwrap();

        let err = backend
            .store("certs", "a.cer", Bytes::from_static(b"second"), false)
            .await
            .expect_err("second store must conflict");
        assert!(matches!(err, StoreError::AlreadyExists(_)));

        // the first content must be untouched
        let data = backend
            .clone()
            .retrieve_buf("certs".into(), "a.cer".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&data[..], b"first");

        // with the overwrite flag the content gets replaced
        backend
            .store("certs", "a.cer", Bytes::from_static(b"second"), true)
            .await
            .unwrap();
        let data = backend
            .retrieve_buf("certs".into(), "a.cer".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&data[..], b"second");
    }

    #[test(tokio::test)]
    async fn exists() {
        let (backend, _dir) = FileSystemBackend::for_test().await.unwrap();

        assert!(!backend.exists("certs", "missing.cer").await.unwrap());

        backend
            .store("certs", "present.cer", Bytes::from_static(b"x"), false)
            .await
            .unwrap();

        assert!(backend.exists("certs", "present.cer").await.unwrap());
    }

    #[test(tokio::test)]
    async fn retrieve_missing() {
        let (backend, _dir) = FileSystemBackend::for_test().await.unwrap();

        let result = backend
            .retrieve_buf("certs".into(), "nope.cer".into())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[test(tokio::test)]
    async fn rejects_traversal() {
        let (backend, _dir) = FileSystemBackend::for_test().await.unwrap();

        let err = backend
            .store("certs", "../escape.cer", Bytes::from_static(b"x"), false)
            .await
            .expect_err("traversal must be rejected");
        match err {
            StoreError::Backend(inner) => assert_eq!(inner.kind(), ErrorKind::InvalidInput),
            err => panic!("unexpected error: {err:?}"),
        }

        let err = backend
            .exists("/etc", "passwd")
            .await
            .expect_err("absolute container must be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
