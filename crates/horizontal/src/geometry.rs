//! Planar convex polygon clipping for overlap areas.

use rstar::AABB;

pub(crate) type Point = [f64; 2];

/// A simple polygon with counterclockwise vertices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Polygon {
    pts: Vec<Point>,
}

fn cross(a: Point, b: Point, p: Point) -> f64 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

fn intersect(p: Point, q: Point, a: Point, b: Point) -> Point {
    let dp = cross(a, b, p);
    let dq = cross(a, b, q);
    let t = dp / (dp - dq);
    [p[0] + t * (q[0] - p[0]), p[1] + t * (q[1] - p[1])]
}

impl Polygon {
    /// Build from vertices in either winding; the result is counterclockwise.
    pub(crate) fn new(mut pts: Vec<Point>) -> Self {
        if signed_area(&pts) < 0.0 {
            pts.reverse();
        }
        Self { pts }
    }

    pub(crate) fn area(&self) -> f64 {
        signed_area(&self.pts).abs()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pts.len() < 3
    }

    pub(crate) fn translate(&self, dx: f64) -> Self {
        Self {
            pts: self.pts.iter().map(|p| [p[0] + dx, p[1]]).collect(),
        }
    }

    pub(crate) fn envelope(&self) -> AABB<Point> {
        let mut lo = [f64::INFINITY; 2];
        let mut hi = [f64::NEG_INFINITY; 2];
        for p in &self.pts {
            for k in 0..2 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
        }
        AABB::from_corners(lo, hi)
    }

    /// Intersection with the convex polygon `clip` (Sutherland-Hodgman).
    pub(crate) fn clip(&self, clip: &Polygon) -> Polygon {
        let mut output = self.pts.clone();
        let n = clip.pts.len();
        for k in 0..n {
            if output.is_empty() {
                break;
            }
            let a = clip.pts[k];
            let b = clip.pts[(k + 1) % n];
            let input = std::mem::take(&mut output);
            let m = input.len();
            for idx in 0..m {
                let cur = input[idx];
                let prev = input[(idx + m - 1) % m];
                let cur_in = cross(a, b, cur) >= 0.0;
                let prev_in = cross(a, b, prev) >= 0.0;
                if cur_in {
                    if !prev_in {
                        output.push(intersect(prev, cur, a, b));
                    }
                    output.push(cur);
                } else if prev_in {
                    output.push(intersect(prev, cur, a, b));
                }
            }
        }
        Polygon { pts: output }
    }
}

fn signed_area(pts: &[Point]) -> f64 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let p = pts[i];
        let q = pts[(i + 1) % n];
        twice += p[0] * q[1] - q[0] * p[1];
    }
    0.5 * twice
}
