//! 영상 프레임 모델.
//!
//! 영상 소스가 틱마다 한 장씩 공급하는 RGBA 픽셀 버퍼.
//! 코어는 해당 틱이 끝나면 프레임을 보관하지 않는다.

use chrono::{DateTime, Utc};
use image::RgbaImage;

use crate::error::CoreError;

/// RGBA 프레임 (불변)
#[derive(Debug, Clone)]
pub struct Frame {
    /// 소스 내 프레임 일련번호
    pub sequence: u64,
    /// 획득 시각
    pub captured_at: DateTime<Utc>,
    image: RgbaImage,
}

impl Frame {
    /// RGBA 이미지로 프레임 생성
    pub fn new(sequence: u64, image: RgbaImage) -> Self {
        Self {
            sequence,
            captured_at: Utc::now(),
            image,
        }
    }

    /// 원시 RGBA 바이트로 프레임 생성.
    ///
    /// 버퍼 길이가 `width * height * 4`와 다르면 `CoreError::Processing`.
    pub fn from_raw(
        sequence: u64,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        let image = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            CoreError::Processing(format!(
                "RGBA 버퍼 크기 불일치: {width}x{height} → 기대 {expected}B, 실제 {actual}B"
            ))
        })?;
        Ok(Self::new(sequence, image))
    }

    /// 너비 (픽셀)
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// 높이 (픽셀)
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 전체 면적 (픽셀 수)
    pub fn area(&self) -> f64 {
        self.width() as f64 * self.height() as f64
    }

    /// 빈 프레임 여부 (너비 또는 높이 0)
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// 픽셀 버퍼 참조
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_accepts_matching_buffer() {
        let frame = Frame::from_raw(7, 4, 3, vec![0u8; 4 * 3 * 4]).unwrap();
        assert_eq!(frame.sequence, 7);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.area(), 12.0);
        assert!(!frame.is_empty());
    }

    #[test]
    fn from_raw_rejects_short_buffer() {
        let result = Frame::from_raw(0, 10, 10, vec![0u8; 10]);
        assert!(matches!(result, Err(CoreError::Processing(_))));
    }

    #[test]
    fn zero_sized_frame_is_empty() {
        let frame = Frame::new(0, RgbaImage::new(0, 5));
        assert!(frame.is_empty());
    }
}
