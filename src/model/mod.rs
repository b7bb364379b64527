pub mod catalog;
pub mod config;
pub mod task;

pub use catalog::{Catalog, Label, Project, Section};
pub use config::{Config, SyncConfig, UiConfig};
pub use task::{Due, Priority, Task};
