pub mod assistant;
pub mod commands;
pub mod config;
pub mod error;
pub mod io;
pub mod network;
pub mod paths;
pub mod scaffold;
pub mod scripts;
pub mod spa;
pub mod templates;
pub mod tools;

pub use error::{Result, SpecifyError};
