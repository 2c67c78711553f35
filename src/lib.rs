pub mod aggregate;
pub mod api;
pub mod config;
pub mod dataset;
pub mod discovery;
pub mod errors;
pub mod export;
pub mod flex_id;
pub mod league;
pub mod normalize;
pub mod parser;
pub mod pipeline;

pub use errors::{Result, ShotError};
