pub mod get_or_create;
