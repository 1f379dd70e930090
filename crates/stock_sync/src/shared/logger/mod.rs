use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Подробный журнал обмена с API маркетплейса (запросы, статусы, тела ответов).
///
/// Пишется в отдельный файл рядом с основным логом, только если задан
/// `logging.api_log_dir`. Ключи и токены в журнал не попадают.
#[derive(Debug, Clone, Default)]
pub struct ApiRequestLog {
    path: Option<PathBuf>,
}

impl ApiRequestLog {
    pub fn new(dir: Option<&str>, file_name: &str) -> Self {
        let path = dir.map(|d| Path::new(d).join(file_name));
        if let Some(dir) = dir {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Cannot create API log dir {}: {}", dir, e);
            }
        }
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Записать в лог-файл
    pub fn write(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
    }
}

/// Первые 500 символов тела ответа для сообщений об ошибках
pub fn preview(body: &str) -> String {
    let preview: String = body.chars().take(500).collect();
    if preview.len() < body.len() {
        format!("{}...", preview)
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_only_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let log = ApiRequestLog::new(Some(dir_str), "ozon_api_requests.log");
        log.write("=== REQUEST ===");
        let contents = std::fs::read_to_string(dir.path().join("ozon_api_requests.log")).unwrap();
        assert!(contents.contains("=== REQUEST ==="));

        ApiRequestLog::disabled().write("ignored");
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short"), "short");
        let long = "я".repeat(600);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 503);
    }
}
