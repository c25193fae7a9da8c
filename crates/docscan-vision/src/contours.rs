//! 윤곽선 추출 + 다각형 근사.
//!
//! 에지 맵에서 바깥쪽 닫힌 경계만 추출하고(내부/중첩 윤곽선 제외),
//! Douglas-Peucker로 꼭짓점을 줄인다.

use docscan_core::models::quad::{Point, Polygon};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

/// 외곽 경계만 추출 (부모가 없는 Outer 경계)
pub fn find_external_contours(edges: &GrayImage) -> Vec<Vec<Point>> {
    find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points.iter().map(|p| Point::new(p.x, p.y)).collect())
        .collect()
}

/// 닫힌 곡선 Douglas-Peucker 근사.
///
/// 곡선에서 서로 가장 먼 두 점을 고정점으로 잡아 두 개의 열린 사슬로 나눈 뒤
/// 각각 단순화한다. `epsilon` 이내로 벗어나는 점은 병합된다.
pub fn approximate_polygon(contour: &[Point], epsilon: f64) -> Polygon {
    let n = contour.len();
    if n < 3 {
        return Polygon::new(contour.to_vec());
    }

    let a = farthest_from(contour, contour[0]);
    let b = farthest_from(contour, contour[a]);
    if a == b || contour[a] == contour[b] {
        return Polygon::new(vec![contour[0]]);
    }

    let forward = chain(contour, a, b);
    let backward = chain(contour, b, a);

    let mut points = Vec::with_capacity(8);
    simplify_open(&forward, epsilon, &mut points);
    simplify_open(&backward, epsilon, &mut points);
    Polygon::new(points)
}

/// 닫힌 곡선 둘레
pub fn arc_length(contour: &[Point]) -> f64 {
    Polygon::new(contour.to_vec()).perimeter()
}

fn dist2(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    dx * dx + dy * dy
}

fn farthest_from(contour: &[Point], origin: Point) -> usize {
    contour
        .iter()
        .enumerate()
        .max_by(|(_, p), (_, q)| dist2(origin, **p).total_cmp(&dist2(origin, **q)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// `from`에서 `to`까지(양 끝 포함) 순환 인덱스로 잘라낸 사슬
fn chain(contour: &[Point], from: usize, to: usize) -> Vec<Point> {
    let n = contour.len();
    let len = (to + n - from) % n;
    (0..=len).map(|i| contour[(from + i) % n]).collect()
}

/// 선분 (a, b)까지의 수직 거리. a == b면 점 간 거리.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let norm = (dx * dx + dy * dy).sqrt();
    if norm == 0.0 {
        return dist2(p, a).sqrt();
    }
    ((p.y - a.y) as f64 * dx - (p.x - a.x) as f64 * dy).abs() / norm
}

/// 열린 사슬 단순화. 시작점은 포함, 끝점은 다음 사슬의 시작점이므로 제외한다.
fn simplify_open(chain: &[Point], epsilon: f64, out: &mut Vec<Point>) {
    let last = chain.len() - 1;
    let mut keep = vec![false; chain.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (idx, max_dist) = (start + 1..end)
            .map(|i| (i, perpendicular_distance(chain[i], chain[start], chain[end])))
            .max_by(|x, y| x.1.total_cmp(&y.1))
            .unwrap_or((start, 0.0));

        if max_dist > epsilon {
            keep[idx] = true;
            stack.push((start, idx));
            stack.push((idx, end));
        }
    }

    out.extend(
        chain[..last]
            .iter()
            .zip(&keep[..last])
            .filter(|(_, k)| **k)
            .map(|(p, _)| *p),
    );
}
