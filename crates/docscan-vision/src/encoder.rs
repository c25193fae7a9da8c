//! JPEG 인코더.
//!
//! 원본 해상도 프레임을 고품질 JPEG 정지 이미지로 인코딩한다.

use chrono::Utc;
use docscan_core::error::CoreError;
use docscan_core::models::capture::CaptureResult;
use docscan_core::models::frame::Frame;
use docscan_core::ports::vision::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// 최종 캡처 기본 품질
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

pub const JPEG_MIME: &str = "image/jpeg";

/// JPEG 인코딩 (알파 채널은 버림)
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, CoreError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(CoreError::Encode("빈 이미지".to_string()));
    }

    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|e| CoreError::Encode(format!("JPEG 인코딩 실패: {e}")))?;

    debug!(
        "JPEG 인코딩: {}x{} → {} bytes (품질 {}, 압축률 {:.1}%)",
        w,
        h,
        buf.len(),
        quality,
        (buf.len() as f32 / (w as f32 * h as f32 * 3.0)) * 100.0
    );

    Ok(buf)
}

/// `ImageEncoder` 구현: JPEG
#[derive(Debug, Clone, Copy)]
pub struct JpegFrameEncoder {
    quality: u8,
}

impl JpegFrameEncoder {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegFrameEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageEncoder for JpegFrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<CaptureResult, CoreError> {
        let data = encode_jpeg(frame.image(), self.quality)?;
        Ok(CaptureResult {
            data,
            mime_type: JPEG_MIME.to_string(),
            width: frame.width(),
            height: frame.height(),
            captured_at: Utc::now(),
        })
    }
}
