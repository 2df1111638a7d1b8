//! Spiral made of circular arcs with growing radius
use crate::{Path, PathBuilder, Point, Scalar};

/// Parameters of the spiral
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpiralParams {
    /// Number of iterations, spiral contains `iterations - 1` arcs
    pub iterations: usize,
    /// Center before the first displacement
    pub center: Point,
    /// Radius before the first growth step
    pub radius: Scalar,
    /// Displacement and growth step
    pub depth_step: Scalar,
    /// Start angle of every arc in radians
    pub start_angle: Scalar,
    /// End angle of every arc in radians
    pub end_angle: Scalar,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            iterations: 10,
            center: Point::new(150.0, 150.0),
            radius: 50.0,
            depth_step: 5.0,
            start_angle: 0.0,
            end_angle: 180.0,
        }
    }
}

impl SpiralParams {
    pub fn build(&self) -> Path {
        build_spiral_path(
            self.iterations,
            self.center,
            self.radius,
            self.depth_step,
            self.start_angle,
            self.end_angle,
        )
    }
}

/// Build spiral path out of clockwise arcs.
///
/// Every step moves the center up by `depth_step` and sideways by `2 * depth_step`,
/// to the right on even steps and to the left on odd ones, grows the radius by
/// `2 * depth_step` and adds an arc around the new center. Steps are numbered from
/// `1` to `iterations - 1`, so fewer than two iterations produce an empty path.
pub fn build_spiral_path(
    iterations: usize,
    initial_center: impl Into<Point>,
    initial_radius: Scalar,
    depth_step: Scalar,
    start_angle: Scalar,
    end_angle: Scalar,
) -> Path {
    let d = depth_step;
    let (_, _, mut builder) = (1..iterations).fold(
        (initial_center.into(), initial_radius, PathBuilder::new()),
        |(center, radius, mut builder), i| {
            let offset = if i % 2 == 0 {
                Point::new(2.0 * d, -d)
            } else {
                Point::new(-2.0 * d, -d)
            };
            let center = center + offset;
            let radius = radius + 2.0 * d;
            builder.arc(center, radius, start_angle, end_angle, true);
            (center, radius, builder)
        },
    );
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_reference_spiral() {
        let path = SpiralParams::default().build();
        let arcs: Vec<_> = path.arcs().collect();
        assert_eq!(arcs.len(), 9);
        assert_eq!(path.subpaths().len(), 1);
        for (index, arc) in arcs.iter().enumerate() {
            let i = index + 1;
            assert_approx_eq!(arc.radius(), 50.0 + 10.0 * i as Scalar);
            assert_approx_eq!(arc.center().y(), 150.0 - 5.0 * i as Scalar);
            let x = if i % 2 == 1 { 140.0 } else { 150.0 };
            assert_approx_eq!(arc.center().x(), x);
            assert_eq!(arc.start_angle(), 0.0);
            assert_eq!(arc.end_angle(), 180.0);
            assert!(arc.clockwise());
        }
        let bbox = path.bbox().unwrap();
        assert_eq!(bbox.min(), Point::new(0.0, -35.0));
        assert_eq!(bbox.max(), Point::new(280.0, 245.0));
    }

    #[test]
    fn test_iterations() {
        for iterations in 0..2 {
            let path = build_spiral_path(iterations, (0.0, 0.0), 1.0, 1.0, 0.0, 1.0);
            assert!(path.is_empty());
            assert_eq!(path.segments_count(), 0);
        }
        for iterations in 2..20 {
            let path = build_spiral_path(iterations, (0.0, 0.0), 1.0, 1.0, 0.0, 1.0);
            assert_eq!(path.segments_count(), iterations - 1);
        }
    }

    #[test]
    fn test_alternation() {
        let path = build_spiral_path(5, (10.0, 20.0), -3.0, 2.0, 0.5, 1.5);
        let centers: Vec<_> = path.arcs().map(|arc| arc.center()).collect();
        assert_eq!(
            centers,
            vec![
                Point::new(6.0, 18.0),
                Point::new(10.0, 16.0),
                Point::new(6.0, 14.0),
                Point::new(10.0, 12.0),
            ]
        );
        // negative radius is not validated
        let radii: Vec<_> = path.arcs().map(|arc| arc.radius()).collect();
        assert_eq!(radii, vec![1.0, 5.0, 9.0, 13.0]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_params_serde() -> Result<(), serde_json::Error> {
        let params: SpiralParams =
            serde_json::from_str(r#"{"iterations": 4, "center": [10.0, 20.0]}"#)?;
        assert_eq!(params.iterations, 4);
        assert_eq!(params.center, Point::new(10.0, 20.0));
        assert_eq!(params.radius, 50.0);
        assert_eq!(params.build().segments_count(), 3);
        Ok(())
    }
}
