pub mod adapters;
pub mod config;
pub mod error;
pub mod links;
pub mod passwords;
pub mod render;
pub mod web;

#[cfg(test)]
pub(crate) mod testutil;
