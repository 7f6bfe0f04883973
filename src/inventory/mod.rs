pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod schedule;
pub mod shutdown;
pub mod sync;

pub use error::{ErrorKind, Result, SyncError};
