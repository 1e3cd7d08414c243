use crate::core::shutdown::ShutdownSignal;
use crate::domain::model::Port;
use crate::domain::ports::PortUpserter;
use crate::utils::error::{PortsError, Result};
use serde::de::{self, Deserializer as _, MapAccess, Visitor};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const CANCELLED: &str = "port import cancelled";

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub upserted: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl ImportSummary {
    pub fn processed(&self) -> usize {
        self.upserted + self.failed
    }
}

/// 逐筆讀取 `{ "<unloc>": { ... }, ... }` 格式的 JSON 檔並交給 service upsert
///
/// 整個檔案不會一次載入記憶體：每次只解碼一個 key/value。
/// 解碼錯誤會中止匯入；單筆 upsert 失敗只記錄 log 並繼續下一筆。
/// 每筆開始前檢查 [`ShutdownSignal`]，收到停止要求時正常結束。
pub struct FileImporter<S: PortUpserter> {
    service: S,
    shutdown: ShutdownSignal,
}

impl<S: PortUpserter> FileImporter<S> {
    pub fn new(service: S) -> Self {
        Self::with_shutdown(service, ShutdownSignal::new())
    }

    pub fn with_shutdown(service: S, shutdown: ShutdownSignal) -> Self {
        Self { service, shutdown }
    }

    pub fn upsert_ports<P: AsRef<Path>>(&self, path: P) -> Result<ImportSummary> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PortsError::IoError {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!("📥 Importing ports from {}", path.display());
        // file 在離開此函式時關閉，不論成功、錯誤或中止
        self.upsert_from_reader(BufReader::new(file))
    }

    pub fn upsert_from_reader<R: Read>(&self, reader: R) -> Result<ImportSummary> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        let mut progress = Progress::default();

        let outcome = (&mut de).deserialize_map(PortsVisitor {
            importer: self,
            progress: &mut progress,
        });

        match outcome {
            Ok(()) => {
                de.end().map_err(|e| PortsError::format(None, e))?;
            }
            Err(_) if progress.summary.cancelled => {
                tracing::info!("Graceful shutdown requested, stopping port processing.");
            }
            Err(e) => return Err(PortsError::format(progress.current.take(), e)),
        }

        let summary = progress.summary;
        tracing::info!(
            "✅ Port import finished: {} upserted, {} failed{}",
            summary.upserted,
            summary.failed,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        Ok(summary)
    }

    fn upsert(&self, port: &Port, summary: &mut ImportSummary) {
        match self.service.upsert_port(port) {
            Ok(()) => {
                summary.upserted += 1;
                tracing::debug!("Successfully upserted port with unloc {}", port.unloc);
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!("❌ Error upserting port with unloc {}: {}", port.unloc, e);
            }
        }
    }
}

#[derive(Default)]
struct Progress {
    summary: ImportSummary,
    /// key whose value is being decoded
    current: Option<String>,
}

struct PortsVisitor<'a, S: PortUpserter> {
    importer: &'a FileImporter<S>,
    progress: &'a mut Progress,
}

impl<'de, S: PortUpserter> Visitor<'de> for PortsVisitor<'_, S> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object mapping unloc codes to ports")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        loop {
            if self.importer.shutdown.is_requested() {
                self.progress.summary.cancelled = true;
                return Err(de::Error::custom(CANCELLED));
            }

            let Some(unloc) = map.next_key::<String>()? else {
                return Ok(());
            };
            if unloc.is_empty() {
                return Err(de::Error::custom(format!(
                    "empty unloc key after {} records",
                    self.progress.summary.processed()
                )));
            }

            self.progress.current = Some(unloc);
            let mut port: Port = map.next_value()?;
            port.unloc = self.progress.current.take().unwrap_or_default();

            self.importer.upsert(&port, &mut self.progress.summary);
        }
    }
}
