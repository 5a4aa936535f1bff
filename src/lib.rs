pub mod analyzers;
pub mod cleaner;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod join;
pub mod output;
pub mod parser;
pub mod remap;
pub mod types;
