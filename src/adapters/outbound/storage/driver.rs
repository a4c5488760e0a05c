use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::{signer::Signer as _, Attribute, GetOptions, ObjectStore as _};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};

use super::{
    client::{coordinates, object_path, ClientCache, ClientFactory, ContainerClient},
    error::{absent_if_not_found, backend_failure, local_io_failure},
    memory::MemoryClientFactory,
    s3::{S3ClientFactory, S3Config},
};
use crate::{
    domain::{
        errors::{DriverError, DriverResult},
        models::{ObjectInfo, SignedUrlMethod, WriteOptions, DEFAULT_CONTENT_TYPE},
        value_objects::{ContainerName, ObjectKey, UrlTtl},
    },
    ports::Driver,
};

/// Driver implemented over the `object_store` crate.
///
/// Each operation is a single backend exchange; retries belong to the
/// transport configured by the [`ClientFactory`].
pub struct ObjectStoreDriver {
    clients: ClientCache,
}

impl ObjectStoreDriver {
    pub fn new(factory: impl ClientFactory) -> Self {
        Self {
            clients: ClientCache::new(Box::new(factory)),
        }
    }

    /// S3-style driver. Fails fast on malformed configuration.
    pub fn s3(config: S3Config) -> DriverResult<Self> {
        Ok(Self::new(S3ClientFactory::new(config)?))
    }

    /// In-process driver for tests and development
    pub fn in_memory() -> Self {
        Self::new(MemoryClientFactory::new())
    }

    fn client(&self, container: &ContainerName) -> DriverResult<Arc<ContainerClient>> {
        self.clients.get(container)
    }

    async fn put(
        &self,
        payload: Bytes,
        container: &ContainerName,
        key: &ObjectKey,
        options: &WriteOptions,
    ) -> DriverResult<()> {
        let client = self.client(container)?;
        debug!(
            container = %container,
            key = %key,
            bytes = payload.len(),
            public = options.is_public,
            "PUT object"
        );

        client.writer().put(key, payload, options).await
    }

    async fn sign(
        &self,
        container: &str,
        key: &str,
        ttl: UrlTtl,
        method: SignedUrlMethod,
    ) -> DriverResult<String> {
        let (container, key) = coordinates(container, key)?;
        let client = self.client(&container)?;
        let signer = client.signer().ok_or_else(|| {
            DriverError::new(format!(
                "the {} backend cannot sign URLs",
                self.clients.factory().backend()
            ))
        })?;

        debug!(
            container = %container,
            key = %key,
            method = %method,
            ttl_secs = ttl.as_secs(),
            "Signing URL"
        );

        let url = signer
            .signed_url(method.as_http(), &object_path(&key)?, ttl.as_duration())
            .await
            .map_err(|e| backend_failure(&format!("sign {} URL", method), e))?;

        Ok(url.to_string())
    }
}

impl std::fmt::Debug for ObjectStoreDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreDriver")
            .field("backend", &self.clients.factory().backend())
            .finish()
    }
}

#[async_trait]
impl Driver for ObjectStoreDriver {
    fn backend(&self) -> &'static str {
        self.clients.factory().backend()
    }

    async fn is_accessible(&self, container: &str) -> bool {
        let container = match ContainerName::new(container) {
            Ok(container) => container,
            Err(e) => {
                debug!(container, error = %e, "Container name rejected");
                return false;
            }
        };

        let client = match self.client(&container) {
            Ok(client) => client,
            Err(e) => {
                warn!(container = %container, error = %e, "Container client unavailable");
                return false;
            }
        };

        debug!(container = %container, "Probing container");
        let mut listing = client.reader().list(None);
        match listing.next().await {
            Some(Err(e)) => {
                warn!(container = %container, error = %e, "Container is not accessible");
                false
            }
            _ => true,
        }
    }

    async fn get_info(&self, container: &str, key: &str) -> DriverResult<Option<ObjectInfo>> {
        let (container, key) = coordinates(container, key)?;
        let client = self.client(&container)?;
        debug!(container = %container, key = %key, "HEAD object");

        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let result = client
            .reader()
            .get_opts(&object_path(&key)?, options)
            .await
            .map_err(|e| backend_failure("fetch object metadata", e));
        let Some(result) = absent_if_not_found(result)? else {
            return Ok(None);
        };

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| AsRef::<str>::as_ref(value).to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let meta = result.meta;

        Ok(Some(ObjectInfo::new(
            self.build_public_url(container.as_str(), key.as_str()),
            content_type,
            meta.size,
            meta.e_tag.as_deref().unwrap_or_default(),
            meta.last_modified,
        )))
    }

    async fn get_as_bytes(&self, container: &str, key: &str) -> DriverResult<Option<Bytes>> {
        let (container, key) = coordinates(container, key)?;
        let client = self.client(&container)?;
        debug!(container = %container, key = %key, "GET object");

        let result = client
            .reader()
            .get(&object_path(&key)?)
            .await
            .map_err(|e| backend_failure("read object", e));
        let Some(result) = absent_if_not_found(result)? else {
            return Ok(None);
        };

        let payload = result
            .bytes()
            .await
            .map_err(|e| backend_failure("read object payload", e))?;

        Ok(Some(payload))
    }

    async fn get_as_local_file(
        &self,
        container: &str,
        key: &str,
        dest: &Path,
    ) -> DriverResult<bool> {
        let (container, key) = coordinates(container, key)?;
        let client = self.client(&container)?;
        debug!(container = %container, key = %key, dest = %dest.display(), "GET object to file");

        let result = client
            .reader()
            .get(&object_path(&key)?)
            .await
            .map_err(|e| backend_failure("read object", e));
        let Some(result) = absent_if_not_found(result)? else {
            return Ok(false);
        };

        let mut file = fs::File::create(dest)
            .await
            .map_err(|e| local_io_failure("create", dest, e))?;

        let mut stream = result.into_stream();
        let written: DriverResult<()> = async {
            while let Some(chunk) = stream
                .try_next()
                .await
                .map_err(|e| backend_failure("stream object payload", e))?
            {
                file.write_all(&chunk)
                    .await
                    .map_err(|e| local_io_failure("write", dest, e))?;
            }
            file.flush()
                .await
                .map_err(|e| local_io_failure("flush", dest, e))
        }
        .await;
        drop(file);

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(dest).await {
                debug!(dest = %dest.display(), error = %cleanup, "Partial download not removed");
            }
            return Err(e);
        }

        Ok(true)
    }

    async fn get_read_url(&self, container: &str, key: &str, ttl: UrlTtl) -> DriverResult<String> {
        self.sign(container, key, ttl, SignedUrlMethod::Read).await
    }

    async fn get_write_url(
        &self,
        container: &str,
        key: &str,
        ttl: UrlTtl,
    ) -> DriverResult<String> {
        self.sign(container, key, ttl, SignedUrlMethod::Write).await
    }

    fn build_public_url(&self, container: &str, key: &str) -> String {
        self.clients.factory().public_url(container, key)
    }

    async fn delete(&self, container: &str, key: &str) -> DriverResult<()> {
        let (container, key) = coordinates(container, key)?;
        let client = self.client(&container)?;
        debug!(container = %container, key = %key, "DELETE object");

        let result = client
            .reader()
            .delete(&object_path(&key)?)
            .await
            .map_err(|e| backend_failure("delete object", e));
        absent_if_not_found(result)?;

        Ok(())
    }

    async fn copy(
        &self,
        src_container: &str,
        src_key: &str,
        dst_container: &str,
        dst_key: &str,
    ) -> DriverResult<()> {
        let (src_container, src_key) = coordinates(src_container, src_key)?;
        let (dst_container, dst_key) = coordinates(dst_container, dst_key)?;
        debug!(
            src = %format!("{}/{}", src_container, src_key),
            dst = %format!("{}/{}", dst_container, dst_key),
            "COPY object"
        );

        if src_container == dst_container {
            let client = self.client(&src_container)?;
            return client.writer().copy(&src_key, &dst_key).await;
        }

        // The backend client is bound to one container, so a cross-container
        // copy goes through the caller: read the source, write the destination.
        let source = self.client(&src_container)?;
        let destination = self.client(&dst_container)?;

        let result = source
            .reader()
            .get(&object_path(&src_key)?)
            .await
            .map_err(|e| backend_failure("read copy source", e))?;
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| AsRef::<str>::as_ref(value).to_string());
        let payload = result
            .bytes()
            .await
            .map_err(|e| backend_failure("read copy source payload", e))?;

        let options = WriteOptions {
            content_type,
            is_public: false,
        };
        destination
            .writer()
            .put(&dst_key, payload, &options)
            .await
            .map_err(|e| e.context("failed to write copy destination"))
    }

    async fn put_from_bytes(
        &self,
        payload: Bytes,
        container: &str,
        key: &str,
        options: WriteOptions,
    ) -> DriverResult<()> {
        let (container, key) = coordinates(container, key)?;
        self.put(payload, &container, &key, &options).await
    }

    async fn put_from_local_file(
        &self,
        path: &Path,
        container: &str,
        key: &str,
        options: WriteOptions,
    ) -> DriverResult<()> {
        let (container, key) = coordinates(container, key)?;
        let contents = fs::read(path)
            .await
            .map_err(|e| local_io_failure("read", path, e))?;

        self.put(Bytes::from(contents), &container, &key, &options)
            .await
    }
}
