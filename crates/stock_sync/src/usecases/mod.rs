pub mod u600_run_sync;
pub mod u601_sync_ozon;
pub mod u602_sync_yandex;
