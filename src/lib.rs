#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod selectors;
pub mod sites;
pub mod tools;
pub mod types;


pub use config::Settings;
pub use error::{Result, ShopError};
pub use sites::Extractor;
pub use types::*;
