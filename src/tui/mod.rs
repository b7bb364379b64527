pub mod app;
pub mod cursor;
pub mod mutation;
pub mod projection;
pub mod theme;

mod input;
mod render;

pub use app::run;
