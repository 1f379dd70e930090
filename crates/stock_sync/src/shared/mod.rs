pub mod batch;
pub mod config;
pub mod error;
pub mod inventory;
pub mod logger;
pub mod marketplaces;
pub mod normalize;
pub mod reconcile;
