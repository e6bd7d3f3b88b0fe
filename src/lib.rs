pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod normalizer;
pub mod storage;
pub mod utils;
