pub mod aggregate;
pub mod assemble;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod expander;
pub mod packer;
pub mod render;
pub mod types;

#[cfg(test)]
mod fixtures;
