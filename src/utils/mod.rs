pub mod config;
pub mod env;
pub mod logger;
pub mod wordflow_toml;

pub use config::*;
pub use env::{apply_env_to_opts, apply_env_with, load_dotenv};
pub use logger::setup_logging;
pub use wordflow_toml::{apply_file_to_opts, load_config_file, load_wordflow_toml};
