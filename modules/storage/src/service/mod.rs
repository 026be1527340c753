pub mod dispatch;
pub mod fs;

use bytes::{Bytes, BytesMut};
use futures::{Stream, TryStreamExt};
use std::fmt::Debug;
use std::future::Future;

#[derive(Debug, thiserror::Error)]
pub enum StoreError<B: Debug> {
    #[error("destination already exists: {0}")]
    AlreadyExists(String),
    #[error("backend error: {0}")]
    Backend(#[source] B),
}

pub trait StorageBackend {
    type Error: Debug;

    /// Store a file under `container`/`path`.
    ///
    /// With `overwrite` unset, the operation fails with
    /// [`StoreError::AlreadyExists`] when the destination is already present.
    fn store(
        &self,
        container: &str,
        path: &str,
        data: Bytes,
        overwrite: bool,
    ) -> impl Future<Output = Result<(), StoreError<Self::Error>>>;

    /// Check whether a file is present under `container`/`path`.
    fn exists(
        &self,
        container: &str,
        path: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Retrieve the content as an async stream
    ///
    /// Takes the backend by value so that the stream does not borrow it.
    /// Backends are cheap to clone.
    fn retrieve(
        self,
        container: String,
        path: String,
    ) -> impl Future<Output = Result<Option<impl Stream<Item = Result<Bytes, Self::Error>>>, Self::Error>>;

    /// Retrieve the content as a byte buffer
    ///
    /// NOTE: The default implementation falls back to an in-memory buffer.
    fn retrieve_buf(
        self,
        container: String,
        path: String,
    ) -> impl Future<Output = Result<Option<Bytes>, Self::Error>>
    where
        Self: Sized,
    {
        async {
            Ok(match self.retrieve(container, path).await? {
                Some(stream) => Some(stream.try_collect::<BytesMut>().await?.freeze()),
                None => None,
            })
        }
    }
}
