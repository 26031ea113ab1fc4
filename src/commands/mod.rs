pub mod build;
pub mod plan;

pub use build::build;
pub use plan::plan;
