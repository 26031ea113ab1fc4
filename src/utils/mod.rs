pub mod config;
pub mod discovery;
pub mod runner;

pub use config::*;
pub use discovery::*;
pub use runner::*;
