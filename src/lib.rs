pub mod cli;
pub mod commands;
pub mod document;
pub mod errors;
pub mod models;
pub mod render;
pub mod state;
pub mod stats;
pub mod storage;
pub mod visualize;

pub use cli::{Cli, run};
pub use state::AppState;
pub use storage::resolve_root;
