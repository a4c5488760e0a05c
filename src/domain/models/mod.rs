pub mod object_info;
pub mod write_options;

pub use object_info::*;
pub use write_options::*;
