//! Ear-clipping triangulation of simple polygons.

use crate::core::types::Vec2;

/// Twice the signed area; positive for counter-clockwise winding.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Triangulate a simple polygon given in either winding.
///
/// Returned triangles index into `points` and are always counter-clockwise.
/// Self-intersecting input does not panic: when no ear can be found the
/// current vertex is clipped anyway so the loop always terminates.
pub fn triangulate(points: &[Vec2]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area(points) < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    let mut i = 0usize;
    let mut stalled = 0usize;

    while remaining.len() > 3 {
        let m = remaining.len();
        let a = remaining[(i + m - 1) % m];
        let b = remaining[i];
        let c = remaining[(i + 1) % m];

        // a full lap without an ear means the input is not simple; clip anyway
        if stalled >= m || is_ear(points, &remaining, a, b, c) {
            triangles.push([a, b, c]);
            remaining.remove(i);
            if i >= remaining.len() {
                i = 0;
            }
            stalled = 0;
        } else {
            i = (i + 1) % m;
            stalled += 1;
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn is_ear(points: &[Vec2], remaining: &[usize], a: usize, b: usize, c: usize) -> bool {
    let (pa, pb, pc) = (points[a], points[b], points[c]);
    if cross(pa, pb, pc) <= 1e-12 {
        return false;
    }

    remaining.iter().all(|&k| {
        if k == a || k == b || k == c {
            return true;
        }
        let p = points[k];
        if p == pa || p == pb || p == pc {
            return true;
        }
        !point_in_triangle(p, pa, pb, pc)
    })
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}
