use std::sync::Arc;

use object_store::memory::InMemory;

use super::client::{encode_key, ClientFactory, ContainerClient};
use crate::domain::{errors::DriverResult, value_objects::ContainerName};

pub const BACKEND_NAME: &str = "memory";

/// In-process backend: every container is a fresh `InMemory` store.
///
/// There are no ACLs and no URL signing; public and private writes land
/// in the same store. A container exists as soon as it is named, so
/// `is_accessible` holds for every valid container name.
#[derive(Debug, Default, Clone)]
pub struct MemoryClientFactory;

impl MemoryClientFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ClientFactory for MemoryClientFactory {
    fn backend(&self) -> &'static str {
        BACKEND_NAME
    }

    fn connect(&self, _container: &ContainerName) -> DriverResult<ContainerClient> {
        Ok(ContainerClient::uniform(Arc::new(InMemory::new())))
    }

    fn public_url(&self, container: &str, key: &str) -> String {
        format!("memory://{}/{}", container, encode_key(key))
    }
}
