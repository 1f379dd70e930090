use thiserror::Error;

/// Ошибки синхронизации
#[derive(Debug, Error)]
pub enum SyncError {
    /// Сеть, скачивание архива, распаковка, файловая система
    #[error("I/O error: {0}")]
    Io(String),

    /// Маркетплейс ответил не-2xx статусом
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// Неразбираемое количество, пустая цена, битая таблица
    #[error("Format error: {0}")]
    Format(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SyncError::Timeout(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout(e.to_string())
        } else {
            SyncError::Io(e.to_string())
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(e: std::io::Error) -> Self {
        SyncError::Io(e.to_string())
    }
}

impl From<zip::result::ZipError> for SyncError {
    fn from(e: zip::result::ZipError) -> Self {
        SyncError::Io(format!("archive: {}", e))
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Format(format!("JSON: {}", e))
    }
}

impl From<calamine::Error> for SyncError {
    fn from(e: calamine::Error) -> Self {
        SyncError::Format(format!("spreadsheet: {}", e))
    }
}
