pub mod date_time;
pub mod describe;
mod file_loader;

pub use file_loader::{FileLoader, SourceLoader};
