// Library modules for gifcast
// This allows tests to access internal modules

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod render;
pub mod search;

#[cfg(test)]
pub mod test_utils;
