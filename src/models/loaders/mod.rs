pub mod toml_loader;

pub use toml_loader::{load_schema_file, save_schema_file};
