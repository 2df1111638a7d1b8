use spiral::{
    Image, Path, Point, RenderError, RenderStyle, Rgba, SpiralParams, SurfaceFailure,
    build_spiral_path, rasterize,
};

fn reference_style() -> RenderStyle {
    RenderStyle {
        fill: None,
        stroke: Some(Rgba::WHITE),
        stroke_width: 1.0,
        ..Default::default()
    }
}

#[test]
fn test_arcs_count() {
    assert_eq!(SpiralParams::default().build().arcs().count(), 9);
    for iterations in [0, 1] {
        let params = SpiralParams {
            iterations,
            ..Default::default()
        };
        assert_eq!(params.build().segments_count(), 0);
    }
    let path = build_spiral_path(3, (0.0, 0.0), 10.0, 1.0, 0.0, 1.0);
    assert_eq!(path.segments_count(), 2);
}

#[test]
fn test_reference_geometry() {
    let path = SpiralParams::default().build();
    let radii: Vec<_> = path.arcs().map(|arc| arc.radius()).collect();
    assert_eq!(
        radii,
        vec![60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0, 140.0]
    );
    let centers: Vec<_> = path.arcs().map(|arc| arc.center()).collect();
    for (index, center) in centers.iter().enumerate() {
        let x = if index % 2 == 0 { 140.0 } else { 150.0 };
        assert_eq!(*center, Point::new(x, 145.0 - 5.0 * index as f64));
    }
}

#[test]
fn test_reference_image() -> Result<(), RenderError> {
    let img = rasterize(SpiralParams::default().build(), &reference_style())?;
    assert_eq!((img.width(), img.height()), (280, 280));
    assert!(img.iter().any(|c| *c != Rgba::TRANSPARENT));

    let alpha = |row, col| img.get(row, col).map_or(0, |c: &Rgba| c.alpha());
    // bottom of the smallest circle
    assert!(alpha(239, 140) > 0);
    assert!(alpha(240, 140) > 0);
    // its center is not painted
    assert_eq!(alpha(180, 140), 0);
    // top, left and bottom extremes of the largest circle
    assert!(alpha(0, 140) > 0);
    assert!(alpha(140, 0) > 0);
    assert!(alpha(279, 140) > 0);
    // stroke is white everywhere it is painted
    assert!(img
        .iter()
        .filter(|c| c.alpha() > 0)
        .all(|c| (c.red(), c.green(), c.blue()) == (255, 255, 255)));
    Ok(())
}

#[test]
fn test_normalization_idempotence() -> Result<(), RenderError> {
    let style = RenderStyle {
        fill: Some(Rgba::new(0, 0, 255, 128)),
        ..reference_style()
    };
    let reference = rasterize(SpiralParams::default().build(), &style)?;
    for offset in [Point::new(17.0, -40.0), Point::new(-300.0, 1024.0)] {
        let params = SpiralParams {
            center: SpiralParams::default().center + offset,
            ..Default::default()
        };
        assert_eq!(rasterize(params.build(), &style)?, reference);

        let mut path = SpiralParams::default().build();
        path.translate(offset);
        assert_eq!(rasterize(path, &style)?, reference);
    }
    Ok(())
}

#[test]
fn test_transparent() -> Result<(), RenderError> {
    let img = rasterize(SpiralParams::default().build(), &RenderStyle::default())?;
    assert_eq!((img.width(), img.height()), (280, 280));
    assert!(img.iter().all(|c| *c == Rgba::TRANSPARENT));
    Ok(())
}

#[test]
fn test_empty_path() {
    let path = build_spiral_path(1, (150.0, 150.0), 50.0, 5.0, 0.0, 180.0);
    assert!(matches!(
        rasterize(path, &reference_style()),
        Err(RenderError::SurfaceAcquisitionFailure {
            reason: SurfaceFailure::EmptyPath,
            ..
        })
    ));
    assert!(rasterize(Path::empty(), &reference_style()).is_err());
}

#[cfg(feature = "png")]
#[test]
fn test_write_png() -> Result<(), Box<dyn std::error::Error>> {
    let img = rasterize(SpiralParams::default().build(), &reference_style())?;
    let mut data = Vec::new();
    img.write_png(&mut data)?;
    assert_eq!(&data[..8], b"\x89PNG\r\n\x1a\n");
    Ok(())
}
