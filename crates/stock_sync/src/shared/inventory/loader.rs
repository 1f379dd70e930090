use contracts::domain::inventory::InventoryRecord;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::sheet::read_sheet;
use crate::shared::config::InventoryConfig;
use crate::shared::error::{SyncError, SyncResult};

/// Загрузчик файла остатков поставщика (zip-архив с таблицей)
pub struct InventoryLoader {
    client: reqwest::Client,
    config: InventoryConfig,
}

impl InventoryLoader {
    pub fn new(config: InventoryConfig, timeout: std::time::Duration) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Io(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Скачать (или прочитать с диска) архив и разобрать таблицу остатков
    pub async fn load(&self) -> SyncResult<Vec<InventoryRecord>> {
        let started_at = std::time::Instant::now();

        let archive = match &self.config.archive_path {
            Some(path) => {
                tracing::info!("Reading inventory archive from {}", path);
                std::fs::read(path)?
            }
            None => self.download().await?,
        };

        let records =
            extract_and_parse(&archive, &self.config.sheet_file, self.config.header_row)?;

        tracing::info!(
            "Inventory loaded: {} records, elapsed_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }

    async fn download(&self) -> SyncResult<Vec<u8>> {
        let url = &self.config.archive_url;
        tracing::info!("Downloading inventory archive: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!("Inventory download failed with status {}", status);
            return Err(SyncError::Io(format!(
                "inventory download from {} failed with status {}",
                url, status
            )));
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Распаковывает таблицу во временный каталог и читает её.
pub fn extract_and_parse(
    archive: &[u8],
    sheet_file: &str,
    header_row: u32,
) -> SyncResult<Vec<InventoryRecord>> {
    extract_and_parse_in(archive, sheet_file, header_row, &std::env::temp_dir())
}

/// То же, но временный каталог создаётся внутри `parent`.
/// Каталог удаляется при выходе из функции на любом пути, включая ошибку разбора.
fn extract_and_parse_in(
    archive: &[u8],
    sheet_file: &str,
    header_row: u32,
    parent: &Path,
) -> SyncResult<Vec<InventoryRecord>> {
    let dir = tempfile::tempdir_in(parent)?;
    let sheet_path = extract_sheet(archive, sheet_file, dir.path())?;
    let records = read_sheet(&sheet_path, header_row);
    dir.close()?;
    records
}

/// Достать из архива файл `sheet_file` (в корне или во вложенной папке)
pub fn extract_sheet(archive: &[u8], sheet_file: &str, target_dir: &Path) -> SyncResult<PathBuf> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;

    let entry_name = zip
        .file_names()
        .find(|name| *name == sheet_file || name.ends_with(&format!("/{}", sheet_file)))
        .map(str::to_string)
        .ok_or_else(|| SyncError::Io(format!("'{}' not found in inventory archive", sheet_file)))?;

    // Имя берём только последним компонентом, чтобы не выйти за пределы каталога
    let file_name = Path::new(sheet_file)
        .file_name()
        .ok_or_else(|| SyncError::Io(format!("invalid sheet file name '{}'", sheet_file)))?;
    let target = target_dir.join(file_name);

    let mut entry = zip.by_name(&entry_name)?;
    let mut out = std::fs::File::create(&target)?;
    let written = std::io::copy(&mut entry, &mut out)?;
    tracing::debug!("Extracted {} ({} bytes) to {}", entry_name, written, target.display());

    Ok(target)
}
