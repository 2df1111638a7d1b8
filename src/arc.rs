use crate::{BBox, Cubic, Curve, CurveFlattenIter, Line, PI, Point, Scalar, Transform};
use std::fmt;

/// Circular arc
///
/// Angles are in radians, measured from the positive x-axis in a y-down coordinate
/// system, so a `clockwise` arc is the one with increasing angle.
#[derive(Clone, Copy, PartialEq)]
pub struct Arc {
    center: Point,
    radius: Scalar,
    start_angle: Scalar,
    end_angle: Scalar,
    clockwise: bool,
}

impl fmt::Debug for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arc center:{:?} radius:{:?} start:{:.3?} end:{:.3?} clockwise:{}",
            self.center, self.radius, self.start_angle, self.end_angle, self.clockwise,
        )
    }
}

impl Arc {
    pub fn new(
        center: impl Into<Point>,
        radius: Scalar,
        start_angle: Scalar,
        end_angle: Scalar,
        clockwise: bool,
    ) -> Self {
        Self {
            center: center.into(),
            radius,
            start_angle,
            end_angle,
            clockwise,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> Scalar {
        self.radius
    }

    pub fn start_angle(&self) -> Scalar {
        self.start_angle
    }

    pub fn end_angle(&self) -> Scalar {
        self.end_angle
    }

    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    /// Signed angle covered by the arc when going from start to end.
    ///
    /// Clockwise arcs have a sweep in `[0, 2π]` and counter-clockwise arcs in `[-2π, 0]`.
    /// Angular distance of at least a full turn in the requested direction produces a
    /// full circle, otherwise the end angle wraps around to be reachable.
    pub fn sweep(&self) -> Scalar {
        let delta = self.end_angle - self.start_angle;
        let turn = 2.0 * PI;
        if self.clockwise {
            if delta >= turn {
                turn
            } else if delta < 0.0 {
                delta.rem_euclid(turn)
            } else {
                delta
            }
        } else if delta <= -turn {
            -turn
        } else if delta > 0.0 {
            delta.rem_euclid(turn) - turn
        } else {
            delta
        }
    }

    /// Evaluate arc at parameter value `t` in (0.0..=1.0)
    pub fn at(&self, t: Scalar) -> Point {
        self.center
            .polar(self.radius, self.start_angle + t * self.sweep())
    }

    pub fn start(&self) -> Point {
        self.at(0.0)
    }

    pub fn end(&self) -> Point {
        self.at(1.0)
    }

    /// Extend provided `init` bounding box with the extent of the arc.
    ///
    /// Besides end points the extent includes every axis aligned point (multiple
    /// of `π/2`) covered by the sweep, computed without trigonometry.
    pub fn bbox(&self, init: Option<BBox>) -> BBox {
        // quarter turns are counted from the start angle reduced to a single turn
        let sweep = self.sweep();
        let base = self.start_angle.rem_euclid(2.0 * PI);
        let (lo, hi) = if sweep >= 0.0 {
            (base, base + sweep)
        } else {
            (base + sweep, base)
        };
        let quarter = PI / 2.0;
        let bbox = BBox::new(self.start(), self.end()).union_opt(init);
        let first = (lo / quarter).ceil() as i64;
        let last = (hi / quarter).floor() as i64;
        (first..=last).fold(bbox, |bbox, k| {
            let r = self.radius;
            let offset = match k.rem_euclid(4) {
                0 => Point::new(r, 0.0),
                1 => Point::new(0.0, r),
                2 => Point::new(-r, 0.0),
                _ => Point::new(0.0, -r),
            };
            bbox.extend(self.center + offset)
        })
    }

    /// Same arc moved by `offset`
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            center: self.center + offset,
            ..*self
        }
    }

    /// Convert arc to an iterator over cubic bezier curves
    pub fn to_cubics(&self) -> ArcCubicIter {
        ArcCubicIter::new(*self)
    }

    /// Convert arc to an iterator over line segments with desired flatness
    pub fn flatten(&self, tr: Transform, flatness: Scalar) -> ArcFlattenIter {
        ArcFlattenIter {
            tr,
            flatness,
            cubics: self.to_cubics(),
            cubic: None,
        }
    }
}

/// Approximate arc with a sequence of cubic bezier curves
///
/// [Approximating Arcs Using Cubic Bézier Curves](https://www.joecridge.me/content/pdf/bezier-arcs.pdf)
///
/// Arc is split into pieces no bigger than `π/2`, and each piece from `eta_1` to `eta_2`
/// is approximated with:
///     P0 = A(eta_1)
///     P1 = P0 + alpha * A'(eta_1)
///     P2 = P3 - alpha * A'(eta_2)
///     P3 = A(eta_2)
/// where
///     alpha = sin(eta_2 - eta_1) * (sqrt(4 + 3 * tan((eta_2 - eta_1) / 2) ** 2) - 1) / 3
pub struct ArcCubicIter {
    arc: Arc,
    segment_delta: Scalar,
    segment_index: usize,
    segment_count: usize,
}

impl ArcCubicIter {
    fn new(arc: Arc) -> Self {
        let sweep = arc.sweep();
        let segment_count = (sweep.abs() / (PI / 2.0)).ceil() as usize;
        let segment_delta = if segment_count == 0 {
            0.0
        } else {
            sweep / segment_count as Scalar
        };
        Self {
            arc,
            segment_delta,
            segment_index: 0,
            segment_count,
        }
    }

    /// Point and its derivative with respect to the angle
    fn at(&self, angle: Scalar) -> (Point, Point) {
        let (sin, cos) = angle.sin_cos();
        let r = self.arc.radius;
        (
            self.arc.center + Point::new(r * cos, r * sin),
            Point::new(-r * sin, r * cos),
        )
    }
}

impl Iterator for ArcCubicIter {
    type Item = Cubic;

    fn next(&mut self) -> Option<Self::Item> {
        if self.segment_index >= self.segment_count {
            return None;
        }
        let eta_1 = self.arc.start_angle + self.segment_delta * self.segment_index as Scalar;
        let eta_2 = eta_1 + self.segment_delta;
        self.segment_index += 1;

        let sq = (4.0 + 3.0 * ((eta_2 - eta_1) / 2.0).tan().powi(2)).sqrt();
        let alpha = (eta_2 - eta_1).sin() * (sq - 1.0) / 3.0;
        let (p0, d0) = self.at(eta_1);
        let (p3, d3) = self.at(eta_2);
        Some(Cubic([p0, p0 + alpha * d0, p3 - alpha * d3, p3]))
    }
}

pub struct ArcFlattenIter {
    tr: Transform,
    flatness: Scalar,
    cubics: ArcCubicIter,
    cubic: Option<CurveFlattenIter<Cubic>>,
}

impl Iterator for ArcFlattenIter {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.cubic.as_mut().and_then(Iterator::next) {
                line @ Some(_) => return line,
                None => self.cubic = Some(self.cubics.next()?.flatten(self.tr, self.flatness)),
            }
        }
    }
}
