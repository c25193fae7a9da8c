//! docscan-vision 성능 벤치마크
//!
//! 실행: cargo bench -p docscan-vision
//!
//! 벤치마크 대상:
//! - 감지 프레임 축소 (fast_resize)
//! - 감지 파이프라인 전체 (EdgeQuadDetector)
//! - 최종 캡처 JPEG 인코딩 (encode_jpeg)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docscan_core::config::DetectionConfig;
use docscan_vision::detector::EdgeQuadDetector;
use docscan_vision::{encoder, resize};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use std::hint::black_box;

/// 어두운 노이즈 배경 위 밝은 문서 모양 사각형
fn create_document_frame(width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::from_fn(width, height, |x, y| {
        let n = ((x as u8).wrapping_mul(7) ^ (y as u8).wrapping_mul(13)) % 12;
        Rgba([20 + n, 20 + n, 24 + n, 255])
    });
    let (w, h) = (width as i32, height as i32);
    let corners = [
        Point::new(w / 5, h / 6),
        Point::new(w * 4 / 5, h / 5),
        Point::new(w * 3 / 4, h * 5 / 6),
        Point::new(w / 4, h * 4 / 5),
    ];
    draw_polygon_mut(&mut img, &corners, Rgba([235, 232, 228, 255]));
    img
}

/// 감지 프레임 축소 벤치마크
fn bench_downscale(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection_downscale");

    for (src_w, src_h) in [(1280, 720), (1920, 1080), (3840, 2160)] {
        group.throughput(Throughput::Elements((src_w * src_h) as u64));
        let img = create_document_frame(src_w, src_h);
        let (dw, dh) = resize::detection_size(src_w, src_h, 640);

        group.bench_with_input(
            BenchmarkId::new("resize", format!("{}x{}", src_w, src_h)),
            &img,
            |b, img| {
                b.iter(|| black_box(resize::fast_resize(img, dw, dh)));
            },
        );
    }

    group.finish();
}

/// 감지 파이프라인 벤치마크 (축소 → 블러 → Canny → 윤곽선 → 분류)
fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_detection");

    for (width, height) in [(640, 480), (1280, 720), (1920, 1080)] {
        group.throughput(Throughput::Elements((width * height) as u64));
        let img = create_document_frame(width, height);
        let detector = EdgeQuadDetector::new(DetectionConfig::default());

        group.bench_with_input(
            BenchmarkId::new("detect", format!("{}x{}", width, height)),
            &img,
            |b, img| {
                b.iter(|| black_box(detector.detect_image(img)));
            },
        );
    }

    group.finish();
}

/// 최종 캡처 JPEG 인코딩 벤치마크
fn bench_jpeg_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("jpeg_encoding");

    for (width, height) in [(1280, 720), (1920, 1080)] {
        group.throughput(Throughput::Elements((width * height) as u64));
        let img = create_document_frame(width, height);

        group.bench_with_input(
            BenchmarkId::new("q95", format!("{}x{}", width, height)),
            &img,
            |b, img| {
                b.iter(|| black_box(encoder::encode_jpeg(img, 95)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_downscale, bench_detect, bench_jpeg_encode);
criterion_main!(benches);
