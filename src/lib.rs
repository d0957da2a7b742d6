pub mod catalog;
pub mod config;
pub mod evaluation;
pub mod geo;
pub mod lookup;
pub mod output;
pub mod server;
pub mod valuation;
pub mod verdict;
