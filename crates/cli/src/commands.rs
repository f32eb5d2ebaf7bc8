pub mod fetch;
pub mod generate;
pub mod install;
pub mod list;
pub mod packages;
