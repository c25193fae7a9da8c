//! 영상 소스 어댑터.
//!
//! - [`ScreenFrameSource`]: xcap 기반 모니터 캡처
//! - [`ImageSequenceSource`]: 디렉토리의 이미지 파일을 순환 재생 (오프라인 실행/테스트용)

use docscan_core::error::CoreError;
use docscan_core::models::frame::Frame;
use docscan_core::ports::source::FrameSource;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xcap::Monitor;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

// ============================================================
// 스크린 캡처 소스
// ============================================================

/// 모니터 화면을 영상 소스로 사용
pub struct ScreenFrameSource {
    /// None이면 주 모니터
    monitor_index: Option<usize>,
    resolved: Option<usize>,
    sequence: u64,
}

impl ScreenFrameSource {
    pub fn new(monitor_index: Option<usize>) -> Self {
        Self {
            monitor_index,
            resolved: None,
            sequence: 0,
        }
    }

    fn monitors() -> Result<Vec<Monitor>, CoreError> {
        Monitor::all()
            .map_err(|e| CoreError::SourceUnavailable(format!("모니터 목록 조회 실패: {e}")))
    }

    fn grab(&mut self) -> Result<Frame, CoreError> {
        let index = self
            .resolved
            .ok_or_else(|| CoreError::SourceUnavailable("소스가 열리지 않음".to_string()))?;

        let monitor = Self::monitors()?
            .into_iter()
            .nth(index)
            .ok_or_else(|| CoreError::Processing(format!("모니터 인덱스 {index} 없음")))?;

        let image = monitor
            .capture_image()
            .map_err(|e| CoreError::Processing(format!("스크린 캡처 실패: {e}")))?;

        self.sequence += 1;
        Ok(Frame::new(self.sequence, image))
    }
}

impl FrameSource for ScreenFrameSource {
    fn open(&mut self) -> Result<(), CoreError> {
        let monitors = Self::monitors()?;
        if monitors.is_empty() {
            return Err(CoreError::SourceUnavailable(
                "모니터를 찾을 수 없음".to_string(),
            ));
        }

        let index = match self.monitor_index {
            Some(i) if i < monitors.len() => i,
            Some(i) => {
                return Err(CoreError::SourceUnavailable(format!(
                    "모니터 인덱스 {i} 없음 (총 {}개)",
                    monitors.len()
                )))
            }
            None => monitors
                .iter()
                .position(|m| m.is_primary().unwrap_or(false))
                .unwrap_or(0),
        };

        info!("스크린 소스 열림: 모니터 #{index}");
        self.resolved = Some(index);
        Ok(())
    }

    fn current_frame(&mut self) -> Result<Frame, CoreError> {
        self.grab()
    }

    fn native_resolution_frame(&mut self) -> Result<Frame, CoreError> {
        // 스크린 캡처는 항상 원본 해상도
        self.grab()
    }

    fn release(&mut self) {
        if self.resolved.take().is_some() {
            debug!("스크린 소스 해제");
        }
    }
}

// ============================================================
// 이미지 시퀀스 소스
// ============================================================

/// 이미지 목록을 틱마다 하나씩 순환 재생하는 소스.
///
/// 각 이미지는 `frames_per_image` 틱 동안 반복된다.
pub struct ImageSequenceSource {
    dir: Option<PathBuf>,
    images: Vec<RgbaImage>,
    frames_per_image: u32,
    cursor: u64,
    opened: bool,
}

impl ImageSequenceSource {
    /// 디렉토리 기반 소스 (파일은 `open()`에서 로드)
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            images: Vec::new(),
            frames_per_image: 1,
            cursor: 0,
            opened: false,
        }
    }

    /// 메모리 이미지 기반 소스
    pub fn from_images(images: Vec<RgbaImage>) -> Self {
        Self {
            dir: None,
            images,
            frames_per_image: 1,
            cursor: 0,
            opened: false,
        }
    }

    pub fn with_frames_per_image(mut self, frames: u32) -> Self {
        self.frames_per_image = frames.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn load_dir(dir: &Path) -> Result<Vec<RgbaImage>, CoreError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CoreError::SourceUnavailable(format!("디렉토리 열기 실패 {}: {e}", dir.display()))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut images = Vec::with_capacity(paths.len());
        for path in &paths {
            match image::open(path) {
                Ok(img) => images.push(img.to_rgba8()),
                Err(e) => warn!("이미지 로드 실패 {}: {e}", path.display()),
            }
        }
        Ok(images)
    }

    fn index_for(&self, cursor: u64) -> usize {
        ((cursor / self.frames_per_image as u64) % self.images.len() as u64) as usize
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.opened && !self.images.is_empty() {
            Ok(())
        } else {
            Err(CoreError::SourceUnavailable("소스가 열리지 않음".to_string()))
        }
    }
}

impl FrameSource for ImageSequenceSource {
    fn open(&mut self) -> Result<(), CoreError> {
        if let Some(dir) = &self.dir {
            self.images = Self::load_dir(dir)?;
        }
        if self.images.is_empty() {
            return Err(CoreError::SourceUnavailable("재생할 이미지 없음".to_string()));
        }
        self.cursor = 0;
        self.opened = true;
        info!("이미지 시퀀스 소스 열림: {}장", self.images.len());
        Ok(())
    }

    fn current_frame(&mut self) -> Result<Frame, CoreError> {
        self.ensure_open()?;
        let image = self.images[self.index_for(self.cursor)].clone();
        self.cursor += 1;
        Ok(Frame::new(self.cursor, image))
    }

    fn native_resolution_frame(&mut self) -> Result<Frame, CoreError> {
        self.ensure_open()?;
        // 마지막으로 공급한 프레임과 같은 이미지
        let cursor = self.cursor.saturating_sub(1);
        Ok(Frame::new(cursor, self.images[self.index_for(cursor)].clone()))
    }

    fn release(&mut self) {
        if self.opened {
            self.opened = false;
            if self.dir.is_some() {
                self.images.clear();
            }
            debug!("이미지 시퀀스 소스 해제");
        }
    }
}
