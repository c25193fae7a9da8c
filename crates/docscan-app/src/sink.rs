//! 파일 캡처 싱크.
//!
//! 최종 캡처 JPEG을 출력 디렉토리에 저장한다.

use docscan_core::error::CoreError;
use docscan_core::models::capture::CaptureResult;
use docscan_core::ports::sink::CaptureSink;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// 저장 결과 (세션 종료 후 main에서 확인)
#[derive(Debug, Clone, Default)]
pub struct SinkReport {
    pub saved: Option<PathBuf>,
    pub failures: u32,
    pub closed: bool,
}

/// 디스크 저장 싱크
pub struct FileCaptureSink {
    output_dir: PathBuf,
    report: Arc<Mutex<SinkReport>>,
}

impl FileCaptureSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            report: Arc::new(Mutex::new(SinkReport::default())),
        }
    }

    /// 저장 결과 공유 핸들
    pub fn report(&self) -> Arc<Mutex<SinkReport>> {
        self.report.clone()
    }

    /// 캡처 결과를 파일로 저장하고 경로 반환
    pub fn save(&self, result: &CaptureResult) -> Result<PathBuf, CoreError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name(result));
        std::fs::write(&path, &result.data)?;
        Ok(path)
    }

    fn update(&self, f: impl FnOnce(&mut SinkReport)) {
        match self.report.lock() {
            Ok(mut report) => f(&mut report),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

/// `scan_YYYYMMDD_HHMMSS_mmm.jpg`
fn file_name(result: &CaptureResult) -> String {
    let ext = match result.mime_type.as_str() {
        "image/png" => "png",
        _ => "jpg",
    };
    format!(
        "scan_{}.{ext}",
        result.captured_at.format("%Y%m%d_%H%M%S_%3f")
    )
}

impl CaptureSink for FileCaptureSink {
    fn on_captured(&mut self, result: CaptureResult) -> Result<(), CoreError> {
        let path = self.save(&result).map_err(|e| {
            error!("캡처 저장 실패 {}: {e}", self.output_dir.display());
            e
        })?;
        info!(
            "캡처 저장: {} ({}x{}, {} bytes)",
            path.display(),
            result.width,
            result.height,
            result.data.len()
        );
        self.update(|r| r.saved = Some(path));
        Ok(())
    }

    fn on_capture_failed(&mut self, error: &CoreError) {
        warn!("캡처 실패, 다시 시도 대기: {error}");
        self.update(|r| r.failures += 1);
    }

    fn on_closed(&mut self) {
        info!("캡처 없이 세션 종료");
        self.update(|r| r.closed = true);
    }
}

/// 출력 디렉토리 결정 (CLI > 설정 > 현재 디렉토리)
pub fn resolve_output_dir(cli: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    cli.or(configured)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
