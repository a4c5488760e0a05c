pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

// Re-export key types for convenience

// Domain types - value objects, models and errors
pub use domain::{
    ContainerName,
    DriverError,
    DriverResult,
    // Models
    ObjectInfo,
    // Value objects
    ObjectKey,
    SignedUrlMethod,
    UrlTtl,
    ValidationError,
    WriteOptions,
};

// Port types - the storage capability contract
pub use ports::Driver;

// Adapter types - backend implementations
pub use adapters::outbound::storage::{
    new_driver, ClientFactory, ContainerClient, ContainerWriter, MemoryClientFactory,
    ObjectStoreDriver, S3ClientFactory, S3Config, S3Writer, StoreWriter,
};

// Configuration and backend selection
pub use app::{create_driver, create_driver_from_env, AppError, DriverConfig};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_driver, new_driver, Driver, DriverConfig, DriverError, DriverResult, ObjectInfo,
        ObjectStoreDriver, S3Config, UrlTtl, WriteOptions,
    };
}
