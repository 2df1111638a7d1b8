//! Conversion of a stroked path into closed polygons that can be filled
use crate::{Arc, Curve, EPSILON, Line, PI, Path, Point, Scalar, Segment, SubPath, Transform};

/// `LineJoin` defines the shape to be used at the corners of a stroked path
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LineJoin {
    /// Continue path segments with lines until they intersect. The value is the
    /// limit on the ratio of the miter length to the stroke width, beyond which
    /// the corner is beveled.
    Miter(Scalar),
    /// Connect path segments with a straight line.
    Bevel,
    /// Round corner is drawn around the junction point.
    Round,
}

impl Default for LineJoin {
    fn default() -> Self {
        Self::Miter(10.0)
    }
}

/// `LineCap` defines the shape to be used at the ends of open sub-paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LineCap {
    /// Stroke ends exactly at the end point
    #[default]
    Butt,
    /// Stroke is extended past the end point by half of its width
    Square,
    /// Half disc is drawn around the end point
    Round,
}

/// Style used to generate stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Width of the stroke
    pub width: Scalar,
    /// How to join offset segments
    pub line_join: LineJoin,
    /// How to join segments at the end of the path
    pub line_cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            line_join: LineJoin::default(),
            line_cap: LineCap::default(),
        }
    }
}

impl Path {
    /// Outline of the stroke of this path as a path filled with the non-zero rule
    pub fn stroke(&self, style: &StrokeStyle, flatness: Scalar) -> Path {
        let mut result = Path::empty();
        for subpath in self.subpaths() {
            let lines: Vec<_> = subpath
                .flatten(Transform::identity(), flatness, false)
                .collect();
            result.extend(stroke_outline(&lines, subpath.closed(), style));
        }
        result
    }
}

/// Build stroke outline of a connected polyline.
///
/// Result consists of a closed polygon for every line, join and cap. All polygons
/// have the same orientation, so their union is covered with the non-zero fill rule.
pub fn stroke_outline(lines: &[Line], closed: bool, style: &StrokeStyle) -> Path {
    let half = style.width / 2.0;
    let mut outline = Path::empty();
    if half <= 0.0 {
        return outline;
    }
    let mut segments: Vec<Line> = lines
        .iter()
        .copied()
        .filter(|line| line.length() > EPSILON)
        .collect();

    let (Some(first), Some(last)) = (segments.first().copied(), segments.last().copied()) else {
        // degenerate (single point) sub-path only has a visible round cap
        if let Some(line) = lines.first() {
            if !closed && style.line_cap == LineCap::Round {
                outline.extend(disc(line.start(), half));
            }
        }
        return outline;
    };

    if !closed && style.line_cap == LineCap::Square {
        extend_ends(&mut segments, half);
    }

    for line in segments.iter() {
        if let (Some(left), Some(right)) = (line.offset(half), line.offset(-half)) {
            outline.extend(polygon(&[left.start(), left.end(), right.end(), right.start()]));
        }
    }

    for pair in segments.windows(2) {
        outline.extend(join(pair[0], pair[1], half, style.line_join));
    }

    if closed {
        if segments.len() > 1 {
            outline.extend(join(last, first, half, style.line_join));
        }
    } else if style.line_cap == LineCap::Round {
        outline.extend(disc(first.start(), half));
        outline.extend(disc(last.end(), half));
    }

    outline
}

/// Move start of the first line and end of the last line outwards by `dist`
fn extend_ends(lines: &mut [Line], dist: Scalar) {
    if let Some(first) = lines.first_mut() {
        if let Some(dir) = first.direction().normalize() {
            first.0[0] = first.0[0] - dist * dir;
        }
    }
    if let Some(last) = lines.last_mut() {
        if let Some(dir) = last.direction().normalize() {
            last.0[1] = last.0[1] + dist * dir;
        }
    }
}

/// Polygons filling the gap on the outer side of the turn from `l0` to `l1`
fn join(l0: Line, l1: Line, half: Scalar, line_join: LineJoin) -> Vec<SubPath> {
    let (Some(d0), Some(d1)) = (l0.direction().normalize(), l1.direction().normalize()) else {
        return Vec::new();
    };
    let cross = d0.cross(d1);
    if cross.abs() < EPSILON && d0.dot(d1) > 0.0 {
        return Vec::new();
    }
    let p = l0.end();
    let side = if cross > 0.0 { 1.0 } else { -1.0 };
    let n0 = side * d0.normal();
    let n1 = side * d1.normal();
    let bevel = || -> Vec<SubPath> {
        polygon(&[p, p + half * n0, p + half * n1])
            .into_iter()
            .collect()
    };
    match line_join {
        LineJoin::Bevel => bevel(),
        LineJoin::Round => disc(p, half).into_iter().collect(),
        LineJoin::Miter(limit) => {
            let u = n0 + n1;
            let u_length = u.length();
            // ratio of the miter length to the stroke width
            if u_length < EPSILON || 2.0 / u_length > limit {
                return bevel();
            }
            let tip = p + (2.0 * half / u.dot(u)) * u;
            polygon(&[p, p + half * n0, tip, p + half * n1])
                .into_iter()
                .collect()
        }
    }
}

/// Closed polygon with positive orientation, `None` if it has no area
fn polygon(points: &[Point]) -> Option<SubPath> {
    let area: Scalar = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p0, p1)| p0.cross(*p1))
        .sum();
    if area.abs() < EPSILON {
        return None;
    }
    let mut points = points.to_vec();
    if area < 0.0 {
        points.reverse();
    }
    let segments = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p0, p1)| Segment::from(Line::new(*p0, *p1)))
        .collect();
    SubPath::new(segments, true)
}

/// Full circle with increasing angle, which has the same orientation as `polygon`
fn disc(center: Point, radius: Scalar) -> Option<SubPath> {
    let arc = Arc::new(center, radius, 0.0, 2.0 * PI, true);
    SubPath::new(vec![arc.into()], true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_FLATNESS, FillRule, Image, ImageOwned, assert_approx_eq};

    fn coverage(path: &Path, size: usize) -> ImageOwned<Scalar> {
        path.mask(
            Transform::identity(),
            DEFAULT_FLATNESS,
            FillRule::NonZero,
            ImageOwned::new_default(size, size),
        )
    }

    fn signed_area(subpath: &SubPath) -> Scalar {
        subpath
            .segments()
            .iter()
            .map(|segment| segment.start().cross(segment.end()))
            .sum()
    }

    #[test]
    fn test_polygon_orientation() {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(0.0, 1.0);
        let p2 = Point::new(1.0, 1.0);
        let ccw = polygon(&[p0, p1, p2]).unwrap();
        let cw = polygon(&[p0, p2, p1]).unwrap();
        assert_approx_eq!(signed_area(&ccw), 1.0);
        assert_approx_eq!(signed_area(&cw), 1.0);
        assert!(ccw.closed());
        assert!(polygon(&[p0, p2, Point::new(2.0, 2.0)]).is_none());
    }

    #[test]
    fn test_stroke_butt() {
        let path = Path::builder().move_to((2.0, 5.0)).line_to((8.0, 5.0)).build();
        let style = StrokeStyle {
            width: 2.0,
            ..Default::default()
        };
        let outline = path.stroke(&style, DEFAULT_FLATNESS);
        assert_eq!(outline.subpaths().len(), 1);
        let bbox = outline.bbox().unwrap();
        assert_eq!(bbox.min(), Point::new(2.0, 4.0));
        assert_eq!(bbox.max(), Point::new(8.0, 6.0));

        let img = coverage(&outline, 10);
        assert_approx_eq!(img.iter().sum::<Scalar>(), 12.0, 1e-6);
        assert_approx_eq!(*img.get(4, 5).unwrap(), 1.0);
        assert_approx_eq!(*img.get(3, 5).unwrap(), 0.0);

        // diagonal quad keeps the width across the line
        let path = Path::builder().move_to((2.0, 2.0)).line_to((8.0, 8.0)).build();
        let outline = path.stroke(&style, DEFAULT_FLATNESS);
        let bbox = outline.bbox().unwrap();
        assert_approx_eq!(bbox.x(), 2.0 - 0.5 * Scalar::sqrt(2.0), 1e-12);
        assert_approx_eq!(bbox.max().y(), 8.0 + 0.5 * Scalar::sqrt(2.0), 1e-12);
        let area = coverage(&outline, 12).iter().sum::<Scalar>();
        assert_approx_eq!(area, 12.0 * Scalar::sqrt(2.0), 1e-6);
    }

    #[test]
    fn test_stroke_caps() {
        let path = Path::builder().move_to((3.0, 5.0)).line_to((7.0, 5.0)).build();
        let square = StrokeStyle {
            width: 2.0,
            line_cap: LineCap::Square,
            ..Default::default()
        };
        let bbox = path.stroke(&square, DEFAULT_FLATNESS).bbox().unwrap();
        assert_eq!(bbox.min(), Point::new(2.0, 4.0));
        assert_eq!(bbox.max(), Point::new(8.0, 6.0));

        let round = StrokeStyle {
            width: 2.0,
            line_cap: LineCap::Round,
            ..Default::default()
        };
        let outline = path.stroke(&round, DEFAULT_FLATNESS);
        assert_eq!(outline.subpaths().len(), 3);
        let bbox = outline.bbox().unwrap();
        assert_approx_eq!(bbox.x(), 2.0);
        assert_approx_eq!(bbox.max().x(), 8.0);
        let area = coverage(&outline, 10).iter().sum::<Scalar>();
        assert_approx_eq!(area, 8.0 + PI, 0.2);
    }

    #[test]
    fn test_stroke_joins() {
        // right angle corner
        let path = Path::builder()
            .move_to((2.0, 2.0))
            .line_to((8.0, 2.0))
            .line_to((8.0, 8.0))
            .build();
        let stroke = |line_join| {
            let style = StrokeStyle {
                width: 2.0,
                line_join,
                ..Default::default()
            };
            let outline = path.stroke(&style, DEFAULT_FLATNESS);
            coverage(&outline, 12).iter().sum::<Scalar>()
        };
        // two 6x2 rectangles overlapping in a 1x1 square
        let base = 12.0 + 12.0 - 1.0;
        assert_approx_eq!(stroke(LineJoin::Miter(10.0)), base + 1.0, 1e-6);
        assert_approx_eq!(stroke(LineJoin::Bevel), base + 0.5, 1e-6);
        assert_approx_eq!(stroke(LineJoin::Round), base + PI / 4.0, 0.05);
        // miter ratio for the right angle is sqrt(2)
        assert_approx_eq!(stroke(LineJoin::Miter(1.2)), base + 0.5, 1e-6);
    }

    #[test]
    fn test_stroke_closed() {
        let path = Path::builder()
            .move_to((2.0, 2.0))
            .line_to((8.0, 2.0))
            .line_to((8.0, 8.0))
            .line_to((2.0, 8.0))
            .close()
            .build();
        let style = StrokeStyle {
            width: 2.0,
            ..Default::default()
        };
        let outline = path.stroke(&style, DEFAULT_FLATNESS);
        // four sides and four corners
        assert_eq!(outline.subpaths().len(), 8);
        let img = coverage(&outline, 10);
        assert_approx_eq!(img.iter().sum::<Scalar>(), 64.0 - 16.0, 1e-6);
        assert_approx_eq!(*img.get(1, 1).unwrap(), 1.0);
        assert_approx_eq!(*img.get(5, 5).unwrap(), 0.0);
    }

    #[test]
    fn test_stroke_degenerate() {
        let style = StrokeStyle {
            width: 2.0,
            line_cap: LineCap::Round,
            ..Default::default()
        };
        let point = Line::new((5.0, 5.0), (5.0, 5.0));
        assert_eq!(stroke_outline(&[point], false, &style).subpaths().len(), 1);
        assert!(stroke_outline(&[point], true, &style).is_empty());
        let zero = StrokeStyle {
            width: 0.0,
            ..style
        };
        let line = Line::new((1.0, 1.0), (5.0, 5.0));
        assert!(stroke_outline(&[line], false, &zero).is_empty());
        assert!(!stroke_outline(&[line], false, &style).is_empty());
    }
}
