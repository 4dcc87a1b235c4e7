//! Server pool configuration model

mod store;
mod types;

pub use store::*;
pub use types::*;
