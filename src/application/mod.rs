// Application layer - use cases and orchestration over the storage traits.

pub mod config;
pub mod entries;
pub mod error;
pub mod service;
pub mod users;

pub use config::*;
pub use entries::*;
pub use error::*;
pub use service::*;
pub use users::*;
