// Backend failure classification
pub mod error;

// Driver implementation and its client seam
pub mod client;
pub mod driver;

// Provider-specific implementations
pub mod memory;
pub mod s3;

// Re-export key types
pub use client::{ClientFactory, ContainerClient, ContainerWriter, StoreWriter};
pub use driver::ObjectStoreDriver;
pub use memory::MemoryClientFactory;
pub use s3::{new_driver, S3ClientFactory, S3Config, S3Writer};
