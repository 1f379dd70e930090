use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::{SyncError, SyncResult};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    pub inventory: InventoryConfig,
    pub ozon: OzonConfig,
    pub yandex: YandexConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Откуда брать файл остатков
#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    pub archive_url: String,
    /// Локальный архив вместо скачивания
    #[serde(default)]
    pub archive_path: Option<String>,
    /// Имя таблицы внутри архива
    pub sheet_file: String,
    /// Номер строки заголовка (с нуля)
    pub header_row: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OzonConfig {
    pub enabled: bool,
    pub base_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub seller_token: String,
    pub page_limit: u32,
    pub stock_batch: usize,
    pub price_batch: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct YandexConfig {
    pub enabled: bool,
    pub base_url: String,
    #[serde(default)]
    pub token: String,
    pub page_limit: u32,
    pub stock_batch: usize,
    pub price_batch: usize,
    #[serde(default)]
    pub campaigns: Vec<YandexCampaign>,
}

/// Кампания (магазин) Яндекс Маркета со своим складом
#[derive(Debug, Deserialize, Clone)]
pub struct YandexCampaign {
    pub name: String,
    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub warehouse_id: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Каталог для подробного лога запросов к API (не пишется, если не задан)
    #[serde(default)]
    pub api_log_dir: Option<String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[http]
timeout_secs = 30

[inventory]
archive_url = "https://timeworld.ru/upload/files/ostatki.zip"
sheet_file = "ostatki.xls"
header_row = 17

[ozon]
enabled = true
base_url = "https://api-seller.ozon.ru"
page_limit = 1000
stock_batch = 100
price_batch = 1000

[yandex]
enabled = true
base_url = "https://api.partner.market.yandex.ru"
page_limit = 200
stock_batch = 2000
price_batch = 500

[[yandex.campaigns]]
name = "FBS"

[[yandex.campaigns]]
name = "DBS"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory
/// 3. Falls back to embedded default config
///
/// После загрузки поверх файла накладываются переменные окружения
/// с секретами и идентификаторами.
pub fn load_config() -> SyncResult<Config> {
    let mut config = match find_config_file() {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            let contents = std::fs::read_to_string(&path)?;
            parse_config(&contents)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            parse_config(DEFAULT_CONFIG)?
        }
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config.validate()?;
    Ok(config)
}

fn find_config_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    candidates.push(Path::new("config.toml").to_path_buf());

    for path in candidates {
        if path.exists() {
            return Some(path);
        }
        tracing::debug!("config.toml not found at: {}", path.display());
    }
    None
}

pub fn parse_config(contents: &str) -> SyncResult<Config> {
    toml::from_str(contents).map_err(|e| SyncError::Config(e.to_string()))
}

/// Переменные окружения, которые читались прежними скриптами:
/// SELLER_TOKEN, CLIENT_ID (Ozon), MARKET_TOKEN, FBS_ID, DBS_ID,
/// WAREHOUSE_FBS_ID, WAREHOUSE_DBS_ID (Яндекс).
pub fn apply_env_overrides<F>(config: &mut Config, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = env("SELLER_TOKEN") {
        config.ozon.seller_token = v;
    }
    if let Some(v) = env("CLIENT_ID") {
        config.ozon.client_id = v;
    }
    if let Some(v) = env("MARKET_TOKEN") {
        config.yandex.token = v;
    }

    for campaign in &mut config.yandex.campaigns {
        let suffix = campaign.name.to_uppercase();
        if let Some(v) = env(&format!("{}_ID", suffix)) {
            campaign.campaign_id = v;
        }
        if let Some(v) = env(&format!("WAREHOUSE_{}_ID", suffix)) {
            campaign.warehouse_id = v;
        }
    }
}

impl Config {
    pub fn validate(&self) -> SyncResult<()> {
        let positive = [
            ("http.timeout_secs", self.http.timeout_secs as usize),
            ("ozon.page_limit", self.ozon.page_limit as usize),
            ("ozon.stock_batch", self.ozon.stock_batch),
            ("ozon.price_batch", self.ozon.price_batch),
            ("yandex.page_limit", self.yandex.page_limit as usize),
            ("yandex.stock_batch", self.yandex.stock_batch),
            ("yandex.price_batch", self.yandex.price_batch),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(SyncError::Config(format!("{} must be greater than zero", name)));
            }
        }

        if self.ozon.enabled {
            if self.ozon.client_id.trim().is_empty() {
                return Err(SyncError::Config(
                    "Client-Id is required for OZON API (CLIENT_ID)".into(),
                ));
            }
            if self.ozon.seller_token.trim().is_empty() {
                return Err(SyncError::Config(
                    "Api-Key is required for OZON API (SELLER_TOKEN)".into(),
                ));
            }
        }

        if self.yandex.enabled {
            if self.yandex.token.trim().is_empty() {
                return Err(SyncError::Config(
                    "Bearer token is required for Yandex Market API (MARKET_TOKEN)".into(),
                ));
            }
            if self.yandex.campaigns.is_empty() {
                return Err(SyncError::Config(
                    "Yandex Market is enabled but no campaigns are configured".into(),
                ));
            }
            for campaign in &self.yandex.campaigns {
                if campaign.campaign_id.trim().is_empty() || campaign.warehouse_id.trim().is_empty()
                {
                    return Err(SyncError::Config(format!(
                        "Yandex campaign '{}' needs campaign_id and warehouse_id",
                        campaign.name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.inventory.header_row, 17);
        assert_eq!(config.ozon.stock_batch, 100);
        assert_eq!(config.ozon.price_batch, 1000);
        assert_eq!(config.yandex.stock_batch, 2000);
        assert_eq!(config.yandex.price_batch, 500);
        assert_eq!(config.yandex.campaigns.len(), 2);
        assert!(config.logging.api_log_dir.is_none());
    }

    #[test]
    fn test_default_config_requires_credentials() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert!(matches!(config.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_env_overrides_fill_credentials() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        apply_env_overrides(
            &mut config,
            env_from(&[
                ("SELLER_TOKEN", "ozon-key"),
                ("CLIENT_ID", "123"),
                ("MARKET_TOKEN", "ym-token"),
                ("FBS_ID", "11"),
                ("DBS_ID", "22"),
                ("WAREHOUSE_FBS_ID", "101"),
                ("WAREHOUSE_DBS_ID", "202"),
            ]),
        );

        assert_eq!(config.ozon.seller_token, "ozon-key");
        assert_eq!(config.ozon.client_id, "123");
        assert_eq!(config.yandex.campaigns[0].campaign_id, "11");
        assert_eq!(config.yandex.campaigns[1].warehouse_id, "202");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_rejected() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        config.ozon.enabled = false;
        config.yandex.enabled = false;
        config.ozon.stock_batch = 0;
        assert!(matches!(config.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        config.ozon.enabled = false;
        config.yandex.enabled = false;
        assert!(config.validate().is_ok());

        config.http.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_yandex_without_campaigns_rejected() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        config.ozon.enabled = false;
        config.yandex.token = "ym-token".into();
        config.yandex.campaigns.clear();
        assert!(matches!(config.validate(), Err(SyncError::Config(_))));
    }
}
