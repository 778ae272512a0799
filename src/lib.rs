pub mod app;
pub mod app_dirs;
pub mod config;
pub mod corpus;
pub mod error;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod ui;

pub use error::{Error, Result};
