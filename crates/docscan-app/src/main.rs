//! # docscan-app
//!
//! DOCSCAN 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 캡처 세션 실행, 라이프사이클 관리.

mod lifecycle;
mod sink;
mod surface;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use docscan_core::config::ScanConfig;
use docscan_core::config_manager::ConfigManager;
use docscan_core::ports::source::FrameSource;
use docscan_session::event_bus::{EventBus, SessionEvent};
use docscan_session::runner::{SessionHandle, SessionOutcome, SessionPorts, SessionRunner};
use docscan_vision::detector::EdgeQuadDetector;
use docscan_vision::encoder::JpegFrameEncoder;
use docscan_vision::source::{ImageSequenceSource, ScreenFrameSource};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;
use crate::sink::{resolve_output_dir, FileCaptureSink};
use crate::surface::ConsoleSurface;

/// 영상 소스 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// 모니터 화면 (xcap)
    Screen,
    /// 디렉토리의 이미지 파일 순환 재생
    Images,
}

/// DOCSCAN 문서 자동 촬영기
///
/// 문서 경계가 일정 시간 안정적으로 감지되면 카운트다운 후 자동 촬영한다.
/// 실행 중 Enter를 누르면 즉시 수동 촬영, `q` 입력 시 종료.
#[derive(Parser, Debug)]
#[command(name = "docscan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 영상 소스
    #[arg(long, value_enum, default_value = "screen")]
    source: SourceKind,

    /// 이미지 디렉토리 (`--source images`)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// 이미지 한 장당 반복 틱 수 (`--source images`)
    #[arg(long, default_value = "1")]
    frames_per_image: u32,

    /// 모니터 인덱스 (기본: 주 모니터)
    #[arg(long)]
    monitor: Option<usize>,

    /// 캡처 저장 디렉토리
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 안정화 임계값 (틱)
    #[arg(long)]
    stability_ticks: Option<u32>,

    /// 카운트다운 (초)
    #[arg(long)]
    countdown_seconds: Option<u32>,

    /// JPEG 품질 (1-100)
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// 오버레이 PNG 저장 경로
    #[arg(long)]
    overlay_out: Option<PathBuf>,

    /// 오버레이 캔버스 크기 (예: 1920x1080)
    #[arg(long, default_value = "1920x1080", value_parser = parse_size)]
    overlay_size: (u32, u32),
}

/// `WxH` 파싱
fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("WxH 형식이어야 함: {s}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("너비 파싱 실패: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("높이 파싱 실패: {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("크기는 0보다 커야 함: {s}"));
    }
    Ok((w, h))
}

/// 설정 파일 로드 (`--config` 우선)
fn load_config(path: Option<PathBuf>) -> Result<ConfigManager> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path.clone())
            .with_context(|| format!("설정 파일 로드 실패: {}", path.display()))?,
        None => ConfigManager::new().or_else(|e| {
            warn!("기본 설정 경로 사용 불가, 현재 디렉토리 사용: {e}");
            ConfigManager::with_path(PathBuf::from("docscan.json"))
        })?,
    };
    info!("설정 파일: {}", manager.config_path().display());
    Ok(manager)
}

/// CLI 오버라이드 적용 (파일에는 저장하지 않음)
fn apply_overrides(mut config: ScanConfig, args: &Args) -> Result<ScanConfig> {
    if let Some(ticks) = args.stability_ticks {
        config.arbiter.stability_threshold_ticks = ticks;
    }
    if let Some(seconds) = args.countdown_seconds {
        config.arbiter.countdown_seconds = seconds;
    }
    if let Some(quality) = args.jpeg_quality {
        config.capture.jpeg_quality = quality;
    }
    config
        .validate()
        .map_err(|e| anyhow!("잘못된 설정값: {e}"))?;
    Ok(config)
}

fn build_source(args: &Args) -> Result<Box<dyn FrameSource>> {
    match args.source {
        SourceKind::Screen => Ok(Box::new(ScreenFrameSource::new(args.monitor))),
        SourceKind::Images => {
            let dir = args
                .input
                .clone()
                .ok_or_else(|| anyhow!("--source images에는 --input 디렉토리가 필요함"))?;
            Ok(Box::new(
                ImageSequenceSource::from_dir(dir).with_frames_per_image(args.frames_per_image),
            ))
        }
    }
}

/// 표준 입력: Enter → 수동 촬영, `q` → 종료
///
/// 읽기가 블로킹이므로 런타임 밖 스레드에서 돈다.
fn spawn_stdin_reader(handle: SessionHandle) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "q" | "quit" => {
                    handle.close();
                    break;
                }
                _ => {
                    if handle.request_manual_capture().is_err() {
                        break;
                    }
                }
            }
        }
        debug!("표준 입력 리더 종료");
    });
}

/// 세션 이벤트 콘솔 출력
fn spawn_event_printer(events: &EventBus) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match event {
                SessionEvent::CountdownStarted {
                    remaining_seconds, ..
                } => println!("  문서 고정됨, {remaining_seconds}초 후 자동 촬영"),
                SessionEvent::CountdownCancelled { .. } => println!("  문서를 놓쳐 카운트다운 취소"),
                SessionEvent::Captured {
                    trigger,
                    width,
                    height,
                    ..
                } => println!("  촬영 완료 ({trigger:?}, {width}x{height})"),
                SessionEvent::CaptureFailed { reason, .. } => {
                    println!("  촬영 실패, 다시 감지합니다: {reason}")
                }
                _ => {}
            }
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "docscan={},docscan_app={},docscan_core={},docscan_vision={},docscan_session={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("DOCSCAN 시작");

    let config_manager = load_config(args.config.clone())?;
    let config = apply_overrides(config_manager.get(), &args)?;

    let output_dir = resolve_output_dir(
        args.output_dir.as_deref(),
        config.capture.output_dir.as_deref(),
    );
    let sink = FileCaptureSink::new(&output_dir);
    let report = sink.report();

    let mut surface = ConsoleSurface::new();
    if let Some(path) = args.overlay_out.clone() {
        let (w, h) = args.overlay_size;
        surface = surface.with_overlay_dump(w, h, path);
    }

    let ports = SessionPorts {
        source: build_source(&args)?,
        detector: Box::new(EdgeQuadDetector::new(config.detection.clone())),
        encoder: Box::new(JpegFrameEncoder::new(config.capture.jpeg_quality)),
        surface: Box::new(surface),
        sink: Box::new(sink),
    };

    let events = EventBus::default();
    spawn_event_printer(&events);
    let (runner, handle) = SessionRunner::with_event_bus(&config.arbiter, ports, events);
    info!("세션 {} 준비, 저장 위치: {}", handle.session_id(), output_dir.display());

    // OS 시그널 → 세션 종료
    let lifecycle = Arc::new(LifecycleManager::new());
    {
        let lifecycle = lifecycle.clone();
        tokio::spawn(async move { lifecycle.wait_for_signal().await });
    }
    {
        let handle = handle.clone();
        let mut shutdown_rx = lifecycle.subscribe();
        tokio::spawn(async move {
            while shutdown_rx.changed().await.is_ok() {
                if *shutdown_rx.borrow() {
                    handle.close();
                    break;
                }
            }
        });
    }

    spawn_stdin_reader(handle.clone());

    println!();
    println!("  문서를 화면 안에 맞추면 자동으로 촬영합니다.");
    println!("  Enter: 즉시 촬영   q: 종료   Ctrl+C: 종료");
    println!();

    let outcome = runner
        .run()
        .await
        .map_err(|e| anyhow!("캡처 세션 실패: {e}"))?;

    match outcome {
        SessionOutcome::Captured(trigger) => {
            let saved = report
                .lock()
                .map_err(|_| anyhow!("싱크 상태 잠금 실패"))?
                .saved
                .clone();
            let path = saved.ok_or_else(|| anyhow!("촬영 완료 보고를 받았지만 저장 경로가 없음"))?;
            println!("  저장됨: {} ({trigger:?})", path.display());
        }
        SessionOutcome::Closed => println!("  촬영 없이 종료"),
    }

    info!("DOCSCAN 종료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_accepts_wxh() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("640X480"), Ok((640, 480)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x10").is_err());
    }

    #[test]
    fn args_parse_defaults() {
        let args = Args::parse_from(["docscan"]);
        assert_eq!(args.source, SourceKind::Screen);
        assert_eq!(args.log_level, "info");
        assert_eq!(args.overlay_size, (1920, 1080));
        assert_eq!(args.frames_per_image, 1);
    }

    #[test]
    fn overrides_are_validated() {
        let args = Args::parse_from(["docscan", "--stability-ticks", "5", "--jpeg-quality", "80"]);
        let config = apply_overrides(ScanConfig::default(), &args).unwrap();
        assert_eq!(config.arbiter.stability_threshold_ticks, 5);
        assert_eq!(config.capture.jpeg_quality, 80);

        let bad = Args::parse_from(["docscan", "--countdown-seconds", "0"]);
        assert!(apply_overrides(ScanConfig::default(), &bad).is_err());
    }

    #[test]
    fn images_source_requires_input_dir() {
        let args = Args::parse_from(["docscan", "--source", "images"]);
        assert!(build_source(&args).is_err());
    }

    #[test]
    fn config_file_is_created_at_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("docscan.json");
        let manager = load_config(Some(path.clone())).unwrap();
        assert_eq!(manager.config_path(), path.as_path());
        assert!(path.exists());
    }
}
