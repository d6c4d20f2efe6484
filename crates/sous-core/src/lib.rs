pub mod chime;
pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod paths;
pub mod recipe;
pub mod session;
pub mod store;
pub mod ticker;
pub mod timer;
pub mod types;

pub use error::{Result, SousError};
