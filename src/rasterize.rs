//! Signed area coverage rasterization of line segments
use crate::{EPSILON, FillRule, ImageMut, Line, Point, Scalar};
use std::cmp::min;

/// Clip line against the right side of the image `x == limit`.
///
/// Parts of the line to the right of the image do not affect any pixel, so they are
/// dropped. `None` if the line is completely to the right.
fn clip_right(line: Line, limit: Scalar) -> Option<Line> {
    let Line([p0, p1]) = line;
    if p0.x() <= limit && p1.x() <= limit {
        return Some(line);
    }
    if p0.x() > limit && p1.x() > limit {
        return None;
    }
    let t = (p0.x() - limit) / (p0.x() - p1.x());
    let mid = Point::new(limit, (1.0 - t) * p0.y() + t * p1.y());
    if p0.x() < limit {
        Some(Line::new(p0, mid))
    } else {
        Some(Line::new(mid, p1))
    }
}

/// Split line that crosses `x == 0.0`.
///
/// Returns vertical line at `x == 0.0` spanning the same y's as the part of the line
/// that is on the left side, and the remaining visible part of the line.
fn split_left(line: Line) -> (Option<Line>, Line) {
    let Line([p0, p1]) = line;
    if p0.x() >= 0.0 && p1.x() >= 0.0 {
        return (None, line);
    }
    if p0.x() <= 0.0 && p1.x() <= 0.0 {
        let vertical = Line::new((0.0, p0.y()), (0.0, p1.y()));
        return (Some(vertical), Line::new((0.0, 0.0), (0.0, 0.0)));
    }
    let t = p0.x() / (p0.x() - p1.x());
    let mid = Point::new(0.0, (1.0 - t) * p0.y() + t * p1.y());
    if p1.x() > 0.0 {
        (
            Some(Line::new((0.0, p0.y()), mid)),
            Line::new(mid, p1),
        )
    } else {
        (
            Some(Line::new(mid, (0.0, p1.y()))),
            Line::new(p0, mid),
        )
    }
}

/// Update provided image with the signed difference of the line
///
/// Signed difference is a difference between adjacent pixels introduced by the line,
/// prefix sum of a row of differences is equal to the signed coverage of the pixels.
pub(crate) fn signed_difference_line(mut img: impl ImageMut<Pixel = Scalar>, line: Line) {
    let Some(line) = clip_right(line, img.width() as Scalar) else {
        return;
    };
    let (vertical, line) = split_left(line);
    if let Some(vertical) = vertical {
        signed_difference_line(img.as_mut(), vertical);
    }

    let Line([p0, p1]) = line;
    if (p0.y() - p1.y()).abs() < EPSILON {
        // line does not introduce any signed coverage
        return;
    }

    let shape = img.shape();
    let data = img.data_mut();
    // differences past the right side only affect pixels outside of the image
    let mut add = |row_offset: usize, col: i64, value: Scalar| {
        if col >= 0 && (col as usize) < shape.width {
            data[row_offset + (col as usize) * shape.col_stride] += value;
        }
    };

    // always iterate from the point with the smallest y coordinate
    let (dir, p0, p1) = if p0.y() < p1.y() {
        (1.0, p0, p1)
    } else {
        (-1.0, p1, p0)
    };
    let dxdy = (p1.x() - p0.x()) / (p1.y() - p0.y());
    // first row to trace, x is adjusted if line starts above the image
    let row_start = p0.y().max(0.0) as usize;
    let row_end = min(shape.height, p1.y().ceil().max(0.0) as usize);
    let mut x_next = if p0.y() < 0.0 {
        p0.x() - p0.y() * dxdy
    } else {
        p0.x()
    };
    for row in row_start..row_end {
        let x = x_next;
        let row_offset = shape.offset(row, 0);
        let dy = ((row + 1) as Scalar).min(p1.y()) - (row as Scalar).max(p0.y());
        let d = dir * dy;
        x_next = x + dxdy * dy;

        let (x0, x1) = if x < x_next { (x, x_next) } else { (x_next, x) };
        let x0_floor = x0.floor().max(0.0);
        let x0i = x0_floor as i64;
        let x1_ceil = x1.ceil();
        let x1i = x1_ceil as i64;
        if x1i <= x0i + 1 {
            // only goes through one pixel (with the total coverage of `d` spread over two pixels)
            let xmf = 0.5 * (x + x_next) - x0_floor;
            add(row_offset, x0i, d * (1.0 - xmf));
            add(row_offset, x0i + 1, d * xmf);
        } else {
            let s = (x1 - x0).recip();
            let x0f = x0 - x0_floor;
            let x1f = x1 - x1_ceil + 1.0;
            // area of the first and the last pixel
            let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
            let am = 0.5 * s * x1f * x1f;
            add(row_offset, x0i, d * a0);
            if x1i == x0i + 2 {
                add(row_offset, x0i + 1, d * (1.0 - a0 - am));
            } else {
                let a1 = s * (1.5 - x0f);
                add(row_offset, x0i + 1, d * (a1 - a0));
                for xi in x0i + 2..x1i - 1 {
                    add(row_offset, xi, d * s);
                }
                let a2 = a1 + (x1i - x0i - 3) as Scalar * s;
                add(row_offset, x1i - 1, d * (1.0 - a2 - am));
            }
            add(row_offset, x1i, d * am);
        }
    }
}

/// Convert accumulated signed differences into a coverage mask in place
pub(crate) fn signed_difference_to_mask(
    mut img: impl ImageMut<Pixel = Scalar>,
    fill_rule: FillRule,
) {
    let shape = img.shape();
    let data = img.data_mut();
    for row in 0..shape.height {
        let mut acc = 0.0;
        for col in 0..shape.width {
            let offset = shape.offset(row, col);
            acc += data[offset];
            data[offset] = match fill_rule {
                FillRule::NonZero => {
                    let value = acc.abs();
                    if value > 1.0 {
                        1.0
                    } else if value < 1e-6 {
                        0.0
                    } else {
                        value
                    }
                }
                FillRule::EvenOdd => ((acc + 1.0).rem_euclid(2.0) - 1.0).abs(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Image, ImageOwned, assert_approx_eq};

    #[test]
    fn test_signed_difference_line() {
        let mut img = ImageOwned::<Scalar>::new_default(2, 5);

        // line covers many columns but just one row
        signed_difference_line(&mut img, Line::new((0.5, 1.0), (3.5, 0.0)));
        // covered areas per-pixel
        let a0 = (0.5 * (1.0 / 6.0)) / 2.0;
        let a1 = ((1.0 / 6.0) + (3.0 / 6.0)) / 2.0;
        let a2 = ((3.0 / 6.0) + (5.0 / 6.0)) / 2.0;
        assert_approx_eq!(*img.get(0, 0).unwrap(), -a0);
        assert_approx_eq!(*img.get(0, 1).unwrap(), a0 - a1);
        assert_approx_eq!(*img.get(0, 2).unwrap(), a1 - a2);
        assert_approx_eq!(*img.get(0, 3).unwrap(), a0 - a1);
        assert_approx_eq!(*img.get(0, 4).unwrap(), -a0);
        let a: Scalar = img.iter().sum();
        assert_approx_eq!(a, -1.0);
        img.clear();

        // out of bound line (intersects x = 0.0)
        signed_difference_line(&mut img, Line::new((-1.0, 0.0), (1.0, 1.0)));
        assert_approx_eq!(*img.get(0, 0).unwrap(), 3.0 / 4.0);
        assert_approx_eq!(*img.get(0, 1).unwrap(), 1.0 / 4.0);
        img.clear();

        // multiple rows diagonal
        signed_difference_line(&mut img, Line::new((0.0, -0.5), (2.0, 1.5)));
        assert_approx_eq!(*img.get(0, 0).unwrap(), 1.0 / 8.0);
        assert_approx_eq!(*img.get(0, 1).unwrap(), 1.0 - 2.0 / 8.0);
        assert_approx_eq!(*img.get(0, 2).unwrap(), 1.0 / 8.0);
        assert_approx_eq!(*img.get(1, 1).unwrap(), 1.0 / 8.0);
        assert_approx_eq!(*img.get(1, 2).unwrap(), 0.5 - 1.0 / 8.0);
        img.clear();

        // multiple rows vertical
        signed_difference_line(&mut img, Line::new((0.5, 0.5), (0.5, 1.75)));
        assert_approx_eq!(*img.get(0, 0).unwrap(), 1.0 / 4.0);
        assert_approx_eq!(*img.get(0, 1).unwrap(), 1.0 / 4.0);
        assert_approx_eq!(*img.get(1, 0).unwrap(), 3.0 / 8.0);
        assert_approx_eq!(*img.get(1, 1).unwrap(), 3.0 / 8.0);
        img.clear();
    }

    #[test]
    fn test_right_border() {
        // vertical line exactly at the last column must not spill into the next row
        let mut img = ImageOwned::<Scalar>::new_default(2, 3);
        signed_difference_line(&mut img, Line::new((2.0, 0.0), (2.0, 2.0)));
        assert_approx_eq!(*img.get(0, 2).unwrap(), 1.0);
        assert_approx_eq!(*img.get(1, 0).unwrap(), 0.0);
        assert_approx_eq!(*img.get(1, 2).unwrap(), 1.0);

        // line at the right side of the image or to the right of it is ignored
        let mut img = ImageOwned::<Scalar>::new_default(2, 3);
        signed_difference_line(&mut img, Line::new((3.0, 0.0), (3.0, 2.0)));
        signed_difference_line(&mut img, Line::new((10.0, 0.0), (10.0, 2.0)));
        assert!(img.iter().all(|value| *value == 0.0));

        // line crossing the right side only affects visible pixels
        signed_difference_line(&mut img, Line::new((2.5, 0.0), (4.5, 1.0)));
        assert_approx_eq!(*img.get(0, 2).unwrap(), 0.25 * 0.25);
        assert_approx_eq!(*img.get(1, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_mask_rectangle() {
        let mut img = ImageOwned::<Scalar>::new_default(4, 4);
        // clockwise square with half pixel margins
        let lines = [
            Line::new((0.5, 0.5), (3.5, 0.5)),
            Line::new((3.5, 0.5), (3.5, 3.5)),
            Line::new((3.5, 3.5), (0.5, 3.5)),
            Line::new((0.5, 3.5), (0.5, 0.5)),
        ];
        for line in lines {
            signed_difference_line(&mut img, line);
        }
        signed_difference_to_mask(&mut img, FillRule::NonZero);
        assert_approx_eq!(*img.get(0, 0).unwrap(), 0.25);
        assert_approx_eq!(*img.get(1, 1).unwrap(), 1.0);
        assert_approx_eq!(*img.get(0, 1).unwrap(), 0.5);
        assert_approx_eq!(img.iter().sum::<Scalar>(), 9.0, 1e-9);
    }
}
