pub mod json_loader;
pub mod toml_loader;

pub use json_loader::load_question_bank;
pub use toml_loader::{load_all_plans, load_plan};
