use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    path::Path as ObjectPath, signer::Signer, Attribute, ObjectStore as ObjectStoreBackend,
    PutOptions, PutPayload,
};
use tracing::info;

use super::error::backend_failure;
use crate::domain::{
    errors::{DriverError, DriverResult, ValidationError},
    models::WriteOptions,
    value_objects::{ContainerName, ObjectKey},
};

/// Write side of a container client.
///
/// Implementations apply the access-control policy selected by
/// [`WriteOptions::is_public`] as part of the signed request.
#[async_trait]
pub trait ContainerWriter: Send + Sync + std::fmt::Debug + 'static {
    async fn put(
        &self,
        key: &ObjectKey,
        payload: Bytes,
        options: &WriteOptions,
    ) -> DriverResult<()>;

    /// Server-side copy inside the container. The copy is private.
    async fn copy(&self, from: &ObjectKey, to: &ObjectKey) -> DriverResult<()>;
}

/// Writer over an `object_store` backend without access-control semantics
#[derive(Debug)]
pub struct StoreWriter {
    store: Arc<dyn ObjectStoreBackend>,
}

impl StoreWriter {
    pub fn new(store: Arc<dyn ObjectStoreBackend>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContainerWriter for StoreWriter {
    async fn put(
        &self,
        key: &ObjectKey,
        payload: Bytes,
        options: &WriteOptions,
    ) -> DriverResult<()> {
        let mut put_options = PutOptions::default();
        if let Some(content_type) = &options.content_type {
            put_options
                .attributes
                .insert(Attribute::ContentType, content_type.clone().into());
        }

        self.store
            .put_opts(&object_path(key)?, PutPayload::from(payload), put_options)
            .await
            .map_err(|e| backend_failure("store object", e))?;
        Ok(())
    }

    async fn copy(&self, from: &ObjectKey, to: &ObjectKey) -> DriverResult<()> {
        self.store
            .copy(&object_path(from)?, &object_path(to)?)
            .await
            .map_err(|e| backend_failure("copy object", e))
    }
}

/// Backend handles bound to a single container
#[derive(Clone, Debug)]
pub struct ContainerClient {
    reader: Arc<dyn ObjectStoreBackend>,
    writer: Arc<dyn ContainerWriter>,
    signer: Option<Arc<dyn Signer>>,
}

impl ContainerClient {
    /// A client that reads and writes through one store
    pub fn uniform(store: Arc<dyn ObjectStoreBackend>) -> Self {
        Self::new(store.clone(), Arc::new(StoreWriter::new(store)))
    }

    pub fn new(reader: Arc<dyn ObjectStoreBackend>, writer: Arc<dyn ContainerWriter>) -> Self {
        Self {
            reader,
            writer,
            signer: None,
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub(crate) fn reader(&self) -> &dyn ObjectStoreBackend {
        self.reader.as_ref()
    }

    pub(crate) fn writer(&self) -> &dyn ContainerWriter {
        self.writer.as_ref()
    }

    pub(crate) fn signer(&self) -> Option<&dyn Signer> {
        self.signer.as_deref()
    }
}

/// Builds backend clients for containers of one storage vendor.
///
/// Construction of a client must not touch the network.
pub trait ClientFactory: Send + Sync + 'static {
    /// Registry name of the backend
    fn backend(&self) -> &'static str;

    fn connect(&self, container: &ContainerName) -> DriverResult<ContainerClient>;

    /// Unsigned locator of an object stored as public-read
    fn public_url(&self, container: &str, key: &str) -> String;
}

/// Clients are built once per container and reused for every later call
pub(crate) struct ClientCache {
    factory: Box<dyn ClientFactory>,
    clients: RwLock<HashMap<ContainerName, Arc<ContainerClient>>>,
}

impl ClientCache {
    pub(crate) fn new(factory: Box<dyn ClientFactory>) -> Self {
        Self {
            factory,
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn factory(&self) -> &dyn ClientFactory {
        self.factory.as_ref()
    }

    pub(crate) fn get(&self, container: &ContainerName) -> DriverResult<Arc<ContainerClient>> {
        {
            let clients = self
                .clients
                .read()
                .map_err(|e| DriverError::new(format!("Failed to acquire read lock: {}", e)))?;
            if let Some(client) = clients.get(container) {
                return Ok(client.clone());
            }
        }

        let mut clients = self
            .clients
            .write()
            .map_err(|e| DriverError::new(format!("Failed to acquire write lock: {}", e)))?;

        // Another caller may have connected while we waited for the lock
        if let Some(client) = clients.get(container) {
            return Ok(client.clone());
        }

        let client = Arc::new(self.factory.connect(container)?);
        info!(
            backend = self.factory.backend(),
            container = %container,
            "Created container client"
        );
        clients.insert(container.clone(), client.clone());
        Ok(client)
    }
}

/// Percent-encode each key segment, keeping the separators
pub(crate) fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Backend path addressing exactly `key`, with no re-encoding of its characters
pub(crate) fn object_path(key: &ObjectKey) -> DriverResult<ObjectPath> {
    ObjectPath::parse(key.as_str())
        .map_err(|e| ValidationError::ObjectKeyUnaddressable(e.to_string()).into())
}

/// Validated coordinates of one object
pub(crate) fn coordinates(container: &str, key: &str) -> DriverResult<(ContainerName, ObjectKey)> {
    Ok((ContainerName::new(container)?, ObjectKey::new(key)?))
}
