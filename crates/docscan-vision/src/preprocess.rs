//! 전처리: 그레이스케일 변환 + 가우시안 블러.
//!
//! 센서 노이즈와 종이 질감에서 에지가 검출되지 않도록 에지 추출 전에 평활화한다.

use image::{DynamicImage, GrayImage, RgbaImage};
use imageproc::filter::separable_filter_equal;

/// 커널 크기에서 시그마 자동 계산 (`0.3 * ((k - 1) * 0.5 - 1) + 0.8`)
///
/// k = 5 → 1.1
pub fn sigma_for_kernel(kernel_size: u32) -> f32 {
    let k = kernel_size.max(1) as f32;
    (0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8).max(0.1)
}

/// RGBA → 휘도(그레이스케일)
pub fn to_grayscale(image: &RgbaImage) -> GrayImage {
    DynamicImage::ImageRgba8(image.clone()).to_luma8()
}

/// 정규화된 1차원 가우시안 커널. 길이는 `kernel_size` (짝수면 다음 홀수).
pub fn gaussian_kernel(kernel_size: u32) -> Vec<f32> {
    let size = kernel_size.max(1) | 1;
    let sigma = sigma_for_kernel(size);
    let radius = (size / 2) as i32;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// 그레이스케일 → `kernel_size`×`kernel_size` 가우시안 블러 (분리형)
pub fn blur(gray: &GrayImage, kernel_size: u32) -> GrayImage {
    separable_filter_equal(gray, &gaussian_kernel(kernel_size))
}

/// 그레이스케일 변환 후 블러까지 한 번에
pub fn preprocess(image: &RgbaImage, kernel_size: u32) -> GrayImage {
    blur(&to_grayscale(image), kernel_size)
}
