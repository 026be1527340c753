use super::*;
use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};

/// A common backend, dispatching to the ones we support.
///
/// This is required due to the "can't turn into object" problem, which we
/// encounter for this trait (due to using async traits and function level
/// type arguments). The only alternative would be to propagate the specific
/// type up to the root level. However, that would also mean that actix
/// handlers would be required to know about that full type to extract it as
/// application data.
///
/// NOTE: Right now we only have one type (filesystem), this is where an
/// object store would slot in.
#[derive(Clone, Debug)]
pub enum DispatchBackend {
    Filesystem(fs::FileSystemBackend),
}

impl StorageBackend for DispatchBackend {
    type Error = anyhow::Error;

    async fn store(
        &self,
        container: &str,
        path: &str,
        data: Bytes,
        overwrite: bool,
    ) -> Result<(), StoreError<Self::Error>> {
        match self {
            Self::Filesystem(backend) => backend
                .store(container, path, data, overwrite)
                .await
                .map_err(Self::map_err),
        }
    }

    async fn exists(&self, container: &str, path: &str) -> Result<bool, Self::Error> {
        match self {
            Self::Filesystem(backend) => backend
                .exists(container, path)
                .await
                .map_err(anyhow::Error::from),
        }
    }

    async fn retrieve(
        self,
        container: String,
        path: String,
    ) -> Result<Option<impl Stream<Item = Result<Bytes, Self::Error>>>, Self::Error> {
        match self {
            Self::Filesystem(backend) => backend
                .retrieve(container, path)
                .await
                .map(|stream| stream.map(|stream| stream.map_err(anyhow::Error::from).boxed()))
                .map_err(anyhow::Error::from),
        }
    }
}

impl DispatchBackend {
    /// convert any backend error to [`anyhow::Error`].
    fn map_err<B>(error: StoreError<B>) -> StoreError<anyhow::Error>
    where
        B: std::error::Error + Send + Sync + 'static,
    {
        match error {
            StoreError::AlreadyExists(location) => StoreError::AlreadyExists(location),
            StoreError::Backend(err) => StoreError::Backend(anyhow::Error::from(err)),
        }
    }
}

impl From<fs::FileSystemBackend> for DispatchBackend {
    fn from(value: fs::FileSystemBackend) -> Self {
        Self::Filesystem(value)
    }
}
