mod builder;
mod lock;
mod mutex;
mod status;

pub use builder::*;
pub use lock::*;
pub(crate) use mutex::*;
pub use status::*;
