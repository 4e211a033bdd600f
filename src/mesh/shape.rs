//! 2D outline paths built from line, quadratic and cubic segments.

use crate::core::types::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
enum PathSegment {
    Line(Vec2),
    Quadratic { control: Vec2, to: Vec2 },
    Cubic { control1: Vec2, control2: Vec2, to: Vec2 },
}

/// A closed planar outline. The path implicitly closes back to its start.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    start: Vec2,
    segments: Vec<PathSegment>,
}

impl Shape {
    /// Start a new outline at `start`.
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        let to = Vec2::new(x, y);
        self.segments.push(PathSegment::Line(to));
        self
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        let to = Vec2::new(x, y);
        self.segments.push(PathSegment::Quadratic {
            control: Vec2::new(cx, cy),
            to,
        });
        self
    }

    pub fn bezier_curve_to(
        &mut self,
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    ) -> &mut Self {
        let to = Vec2::new(x, y);
        self.segments.push(PathSegment::Cubic {
            control1: Vec2::new(c1x, c1y),
            control2: Vec2::new(c2x, c2y),
            to,
        });
        self
    }

    /// Sample the outline into a polygon.
    ///
    /// Lines contribute their end point, curves contribute `curve_segments`
    /// evenly spaced samples. Consecutive duplicates and a closing point equal
    /// to the start are dropped.
    pub fn outline(&self, curve_segments: u32) -> Vec<Vec2> {
        let divisions = curve_segments.max(1);
        let mut points = vec![self.start];
        let mut from = self.start;

        for segment in &self.segments {
            match *segment {
                PathSegment::Line(to) => {
                    points.push(to);
                    from = to;
                }
                PathSegment::Quadratic { control, to } => {
                    for k in 1..=divisions {
                        let t = k as f32 / divisions as f32;
                        points.push(quadratic_point(from, control, to, t));
                    }
                    from = to;
                }
                PathSegment::Cubic { control1, control2, to } => {
                    for k in 1..=divisions {
                        let t = k as f32 / divisions as f32;
                        points.push(cubic_point(from, control1, control2, to, t));
                    }
                    from = to;
                }
            }
        }

        points.dedup_by(|b, a| a.distance_squared(*b) < 1e-12);
        while points.len() > 1 && points[points.len() - 1].distance_squared(points[0]) < 1e-12 {
            points.pop();
        }
        points
    }
}

fn quadratic_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let k = 1.0 - t;
    p0 * (k * k) + p1 * (2.0 * k * t) + p2 * (t * t)
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let k = 1.0 - t;
    p0 * (k * k * k) + p1 * (3.0 * k * k * t) + p2 * (3.0 * k * t * t) + p3 * (t * t * t)
}
