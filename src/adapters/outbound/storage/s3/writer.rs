use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client};
use bytes::Bytes;

use crate::adapters::outbound::storage::{
    client::{encode_key, ContainerWriter},
    error::backend_failure,
};
use crate::domain::{
    errors::DriverResult,
    models::WriteOptions,
    value_objects::{ContainerName, ObjectKey},
};

/// Writes through the S3 SDK so the canned ACL travels as a signed header
#[derive(Debug, Clone)]
pub struct S3Writer {
    client: Client,
    bucket: String,
}

impl S3Writer {
    pub fn new(client: Client, container: &ContainerName) -> Self {
        Self {
            client,
            bucket: container.as_str().to_string(),
        }
    }

    fn acl(is_public: bool) -> ObjectCannedAcl {
        if is_public {
            ObjectCannedAcl::PublicRead
        } else {
            ObjectCannedAcl::Private
        }
    }
}

#[async_trait]
impl ContainerWriter for S3Writer {
    async fn put(
        &self,
        key: &ObjectKey,
        payload: Bytes,
        options: &WriteOptions,
    ) -> DriverResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .acl(Self::acl(options.is_public))
            .set_content_type(options.content_type.clone())
            .body(ByteStream::from(payload))
            .send()
            .await
            .map_err(|e| backend_failure("store object", e))?;

        Ok(())
    }

    async fn copy(&self, from: &ObjectKey, to: &ObjectKey) -> DriverResult<()> {
        // The copy source header is a URL path and must be percent-encoded
        let source = format!("{}/{}", self.bucket, encode_key(from.as_str()));

        self.client
            .copy_object()
            .bucket(&self.bucket)
            .key(to.as_str())
            .copy_source(source)
            .acl(Self::acl(false))
            .send()
            .await
            .map_err(|e| backend_failure("copy object", e))?;

        Ok(())
    }
}
