pub mod loaders;
pub mod payload;

pub use loaders::toml_loader::load_parent_ids;
pub use payload::project_files;
