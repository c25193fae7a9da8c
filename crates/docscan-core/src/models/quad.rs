//! 문서 경계 기하 모델.
//!
//! 윤곽선 단순화 결과를 담는 [`Polygon`]과, 꼭짓점이 정확히 4개일 때만
//! 만들어지는 [`QuadCandidate`]를 정의한다.

use serde::{Deserialize, Serialize};

/// 프레임 픽셀 좌표 (정수)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 단순화된 다각형
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// 꼭짓점 수
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 닫힌 다각형 면적 (신발끈 공식, 절댓값)
    pub fn area(&self) -> f64 {
        shoelace_area(&self.points)
    }

    /// 닫힌 다각형 둘레
    pub fn perimeter(&self) -> f64 {
        closed_perimeter(&self.points)
    }

    /// 볼록 다각형 여부 (연속한 세 점의 외적 부호가 모두 같음)
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0i64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            let cross = (b.x - a.x) as i64 * (c.y - b.y) as i64
                - (b.y - a.y) as i64 * (c.x - b.x) as i64;
            if cross == 0 {
                continue;
            }
            if sign == 0 {
                sign = cross.signum();
            } else if sign != cross.signum() {
                return false;
            }
        }
        sign != 0
    }

    /// 4점 정제.
    ///
    /// 꼭짓점이 정확히 4개이고 볼록할 때만 좌상→우상→우하→좌하 순서로 정렬해 반환하고,
    /// 그 외에는 `None`. 오목한 사각형은 각도 정렬 시 다른 도형으로 재연결되므로 거부한다.
    pub fn to_quad(&self) -> Option<[Point; 4]> {
        let corners: [Point; 4] = self.points.as_slice().try_into().ok()?;
        if !self.is_convex() {
            return None;
        }
        Some(order_corners(corners))
    }
}

/// 문서 경계 후보 (단일 틱 동안만 유효)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadCandidate {
    /// 좌상, 우상, 우하, 좌하
    pub corners: [Point; 4],
    /// 원본 윤곽선이 감싸는 면적 (픽셀²)
    pub area: f64,
}

impl QuadCandidate {
    /// 꼭짓점 순서를 정규화해 후보 생성
    pub fn new(corners: [Point; 4], area: f64) -> Self {
        Self {
            corners: order_corners(corners),
            area,
        }
    }

    /// 축소 프레임 좌표를 원본 좌표로 변환
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let corners = self.corners.map(|p| {
            Point::new(
                (p.x as f64 * sx).round() as i32,
                (p.y as f64 * sy).round() as i32,
            )
        });
        Self {
            corners,
            area: self.area * sx * sy,
        }
    }
}

/// 꼭짓점을 중심 기준 각도로 정렬한 뒤 x+y가 가장 작은 점(좌상)부터 시작하도록 회전
fn order_corners(mut corners: [Point; 4]) -> [Point; 4] {
    let cx = corners.iter().map(|p| p.x as f64).sum::<f64>() / 4.0;
    let cy = corners.iter().map(|p| p.y as f64).sum::<f64>() / 4.0;

    // 화면 좌표계(y 아래 방향)에서 atan2 오름차순 = 시계 방향
    corners.sort_by(|a, b| {
        let ta = (a.y as f64 - cy).atan2(a.x as f64 - cx);
        let tb = (b.y as f64 - cy).atan2(b.x as f64 - cx);
        ta.total_cmp(&tb)
    });

    let start = corners
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| p.x + p.y)
        .map(|(i, _)| i)
        .unwrap_or(0);
    corners.rotate_left(start);
    corners
}

fn shoelace_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    (twice as f64 / 2.0).abs()
}

fn closed_perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| {
            let dx = (b.x - a.x) as f64;
            let dy = (b.y - a.y) as f64;
            (dx * dx + dy * dy).sqrt()
        })
        .sum()
}
