pub mod commands;

pub use commands::get_or_create::{get_or_create, NAME_MAX_LENGTH};
