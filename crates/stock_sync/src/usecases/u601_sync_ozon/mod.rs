pub mod executor;
pub mod ozon_api_client;

pub use executor::OzonSyncExecutor;
pub use ozon_api_client::OzonApiClient;
