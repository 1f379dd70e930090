pub mod executor;

pub use executor::{build_uploaders, run_passes, run_sync};
