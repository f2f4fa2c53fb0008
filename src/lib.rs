pub mod config;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod importer;
pub mod logging;
pub mod normalize;
pub mod schedule;
pub mod store;
