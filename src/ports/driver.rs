use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{
    errors::DriverResult,
    models::{ObjectInfo, WriteOptions},
    value_objects::UrlTtl,
};

/// Port for object storage backends.
///
/// Every backend adapter implements the same contract. Read operations
/// report a missing object as a normal outcome (`None` / `false`); every
/// other backend failure surfaces as a [`DriverError`](crate::DriverError).
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    /// Registry name of the backend behind this driver
    fn backend(&self) -> &'static str;

    /// Whether the container exists and can be reached with the
    /// configured credentials. Never fails: any error yields `false`.
    async fn is_accessible(&self, container: &str) -> bool;

    /// Fetch object metadata without its payload
    async fn get_info(&self, container: &str, key: &str) -> DriverResult<Option<ObjectInfo>>;

    /// Fetch the whole object payload
    async fn get_as_bytes(&self, container: &str, key: &str) -> DriverResult<Option<Bytes>>;

    /// Stream the object to `dest`. Returns `false` without touching
    /// `dest` when the object does not exist.
    async fn get_as_local_file(
        &self,
        container: &str,
        key: &str,
        dest: &Path,
    ) -> DriverResult<bool>;

    /// Signed, time-limited download URL
    async fn get_read_url(&self, container: &str, key: &str, ttl: UrlTtl) -> DriverResult<String>;

    /// Signed, time-limited upload URL
    async fn get_write_url(&self, container: &str, key: &str, ttl: UrlTtl)
        -> DriverResult<String>;

    /// Unsigned URL for objects stored as public-read. Pure string
    /// construction; no network access.
    fn build_public_url(&self, container: &str, key: &str) -> String;

    /// Delete an object. Deleting a missing key succeeds.
    async fn delete(&self, container: &str, key: &str) -> DriverResult<()>;

    /// Copy an object, possibly across containers
    async fn copy(
        &self,
        src_container: &str,
        src_key: &str,
        dst_container: &str,
        dst_key: &str,
    ) -> DriverResult<()>;

    /// Store `payload` as the whole object
    async fn put_from_bytes(
        &self,
        payload: Bytes,
        container: &str,
        key: &str,
        options: WriteOptions,
    ) -> DriverResult<()>;

    /// Store the contents of the local file at `path` as the whole object
    async fn put_from_local_file(
        &self,
        path: &Path,
        container: &str,
        key: &str,
        options: WriteOptions,
    ) -> DriverResult<()>;
}
