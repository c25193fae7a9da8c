//! 감지용 프레임 축소.
//!
//! fast_image_resize 기반 고속 리사이즈. 감지는 축소 프레임에서 수행하고
//! 최종 캡처만 원본 해상도를 쓴다.

use docscan_core::error::CoreError;
use fast_image_resize::{images::Image as FirImage, ResizeAlg, ResizeOptions, Resizer};
use image::RgbaImage;
use tracing::trace;

/// 최대 너비 기준 감지 해상도 계산 (비율 유지, 0이면 원본 유지)
pub fn detection_size(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if max_width == 0 || width <= max_width || width == 0 {
        return (width, height);
    }
    let scaled_h = (height as u64 * max_width as u64 / width as u64).max(1) as u32;
    (max_width, scaled_h)
}

/// 고속 리사이즈 (바이리니어)
pub fn fast_resize(image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage, CoreError> {
    let (src_w, src_h) = image.dimensions();

    // 동일 크기면 복제 반환
    if src_w == width && src_h == height {
        return Ok(image.clone());
    }

    if src_w == 0 || src_h == 0 {
        return Err(CoreError::Processing("소스 이미지 크기 0".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(CoreError::Processing("목표 이미지 크기 0".to_string()));
    }

    let src_image = FirImage::from_vec_u8(
        src_w,
        src_h,
        image.as_raw().clone(),
        fast_image_resize::PixelType::U8x4,
    )
    .map_err(|e| CoreError::Processing(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(width, height, fast_image_resize::PixelType::U8x4);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));

    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::Processing(format!("리사이즈 실패: {e}")))?;

    trace!("감지 프레임 축소: {}x{} → {}x{}", src_w, src_h, width, height);

    RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Processing("결과 이미지 생성 실패".to_string()))
}
