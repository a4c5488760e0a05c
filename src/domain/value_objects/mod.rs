mod container_name;
mod object_key;
mod url_ttl;

pub use container_name::ContainerName;
pub use object_key::ObjectKey;
pub use url_ttl::UrlTtl;
