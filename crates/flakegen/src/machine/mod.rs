mod env;
mod interface;
#[cfg(feature = "network")]
mod network;

pub use env::*;
pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "network")))]
#[cfg(feature = "network")]
pub use network::*;
