use crate::{
    Arc, ArcFlattenIter, BBox, Curve, ImageMut, Line, Point, Scalar, Transform,
    rasterize::{signed_difference_line, signed_difference_to_mask},
};
use std::fmt;

/// flatness of 0.05px gives good accuracy tradeoff
pub const DEFAULT_FLATNESS: Scalar = 0.05;

/// Segment of a path
#[derive(Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    Arc(Arc),
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Line(line) => line.fmt(f),
            Segment::Arc(arc) => arc.fmt(f),
        }
    }
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(line) => line.start(),
            Segment::Arc(arc) => arc.start(),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(line) => line.end(),
            Segment::Arc(arc) => arc.end(),
        }
    }

    pub fn bbox(&self, init: Option<BBox>) -> BBox {
        match self {
            Segment::Line(line) => line.bbox(init),
            Segment::Arc(arc) => arc.bbox(init),
        }
    }

    pub fn translate(&self, offset: Point) -> Self {
        match self {
            Segment::Line(line) => Segment::Line(line.transform(Transform::new_translate(
                offset.x(),
                offset.y(),
            ))),
            Segment::Arc(arc) => Segment::Arc(arc.translate(offset)),
        }
    }

    pub fn to_arc(&self) -> Option<Arc> {
        match self {
            Segment::Arc(arc) => Some(*arc),
            Segment::Line(_) => None,
        }
    }

    /// Convert segment to an iterator over line segments with desired flatness
    pub fn flatten(&self, tr: Transform, flatness: Scalar) -> SegmentFlattenIter {
        match self {
            Segment::Line(line) => SegmentFlattenIter::Line(Some(line.transform(tr))),
            Segment::Arc(arc) => SegmentFlattenIter::Arc(arc.flatten(tr, flatness)),
        }
    }
}

impl From<Line> for Segment {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for Segment {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

pub enum SegmentFlattenIter {
    Line(Option<Line>),
    Arc(ArcFlattenIter),
}

impl Iterator for SegmentFlattenIter {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Line(line) => line.take(),
            Self::Arc(arcs) => arcs.next(),
        }
    }
}

/// Non-empty collection of segments traced with a single pen stroke.
///
/// Segments do not have to be connected, the pen moves along a straight line from the
/// end of a segment to the start of the next one.
#[derive(Clone, PartialEq)]
pub struct SubPath {
    segments: Vec<Segment>,
    /// Whether SubPath contains an implicit line segment connecting start and the end of it.
    closed: bool,
}

impl fmt::Debug for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments.iter() {
            writeln!(f, "{:?}", segment)?;
        }
        if self.closed {
            writeln!(f, "Close")
        } else {
            writeln!(f, "End")
        }
    }
}

impl SubPath {
    pub fn new(segments: Vec<Segment>, closed: bool) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments, closed })
        }
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn start(&self) -> Point {
        self.segments.first().map_or_else(Point::default, Segment::start)
    }

    pub fn end(&self) -> Point {
        self.segments.last().map_or_else(Point::default, Segment::end)
    }

    pub fn translate(&mut self, offset: Point) {
        for segment in self.segments.iter_mut() {
            *segment = segment.translate(offset);
        }
    }

    pub fn bbox(&self, init: Option<BBox>) -> Option<BBox> {
        self.segments
            .iter()
            .fold(init, |bbox, segment| Some(segment.bbox(bbox)))
    }

    /// Convert sub-path into a connected polyline.
    ///
    /// Gaps between segments are bridged with lines, and if `close` is set or sub-path
    /// is closed, the line from the end back to the start is added.
    pub fn flatten(
        &self,
        tr: Transform,
        flatness: Scalar,
        close: bool,
    ) -> impl Iterator<Item = Line> + '_ {
        let mut position: Option<Point> = None;
        let closing = if self.closed || close {
            let line = Line::new(self.end(), self.start()).transform(tr);
            (!line.start().is_close_to(line.end())).then_some(line)
        } else {
            None
        };
        self.segments
            .iter()
            .flat_map(move |segment| {
                let start = tr.apply(segment.start());
                let bridge = position
                    .filter(|end| !end.is_close_to(start))
                    .map(|end| Line::new(end, start));
                position = Some(tr.apply(segment.end()));
                bridge.into_iter().chain(segment.flatten(tr, flatness))
            })
            .chain(closing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Collection of sub-paths treated as a single unit
#[derive(Clone, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subpaths.is_empty() {
            write!(f, "Empty")?;
        } else {
            for subpath in self.subpaths.iter() {
                subpath.fmt(f)?
            }
        }
        Ok(())
    }
}

impl Path {
    pub fn new(subpaths: Vec<SubPath>) -> Self {
        Self { subpaths }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Convenience method to create `PathBuilder`
    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Iterator over all segments of all sub-paths
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.subpaths.iter().flat_map(|subpath| subpath.segments())
    }

    /// Iterator over the arc segments of the path
    pub fn arcs(&self) -> impl Iterator<Item = Arc> + '_ {
        self.segments().filter_map(Segment::to_arc)
    }

    pub fn segments_count(&self) -> usize {
        self.subpaths
            .iter()
            .fold(0usize, |acc, subpath| acc + subpath.segments().len())
    }

    /// Move every segment of the path by `offset` in place
    pub fn translate(&mut self, offset: Point) {
        for subpath in self.subpaths.iter_mut() {
            subpath.translate(offset);
        }
    }

    /// Bounding box of the path, `None` if path is empty
    pub fn bbox(&self) -> Option<BBox> {
        self.subpaths
            .iter()
            .fold(None, |bbox, subpath| subpath.bbox(bbox))
    }

    /// Translate path so the minimal corner of its bounding box ends up at the origin.
    ///
    /// Returns bounding box of the normalized path.
    pub fn normalize(&mut self) -> Option<BBox> {
        let bbox = self.bbox()?;
        self.translate(-bbox.min());
        Some(BBox::new(
            Point::new(0.0, 0.0),
            Point::new(bbox.width(), bbox.height()),
        ))
    }

    /// Convert path to an iterator over line segments
    pub fn flatten(
        &self,
        tr: Transform,
        flatness: Scalar,
        close: bool,
    ) -> impl Iterator<Item = Line> + '_ {
        self.subpaths
            .iter()
            .flat_map(move |subpath| subpath.flatten(tr, flatness, close))
    }

    /// Rasterize coverage mask of the path into a provided image.
    ///
    /// Everything that is outside of the image will be cropped. Image is assumed
    /// to contain zeros.
    pub fn mask<I: ImageMut<Pixel = Scalar>>(
        &self,
        tr: Transform,
        flatness: Scalar,
        fill_rule: FillRule,
        mut img: I,
    ) -> I {
        for line in self.flatten(tr, flatness, true) {
            signed_difference_line(&mut img, line);
        }
        signed_difference_to_mask(&mut img, fill_rule);
        img
    }
}

impl IntoIterator for Path {
    type Item = SubPath;
    type IntoIter = <Vec<SubPath> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.subpaths.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a SubPath;
    type IntoIter = <&'a Vec<SubPath> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.subpaths.iter()
    }
}

impl Extend<SubPath> for Path {
    fn extend<T: IntoIterator<Item = SubPath>>(&mut self, iter: T) {
        self.subpaths.extend(iter)
    }
}

/// Path builder similar to Canvas/Cairo interface.
#[derive(Clone, Default)]
pub struct PathBuilder {
    position: Point,
    subpath: Vec<Segment>,
    subpaths: Vec<SubPath>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build path
    pub fn build(&mut self) -> Path {
        let PathBuilder {
            subpath,
            mut subpaths,
            ..
        } = std::mem::take(self);
        subpaths.extend(SubPath::new(subpath, false));
        Path::new(subpaths)
    }

    /// Move current position, ending current subpath
    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        let subpath = std::mem::take(&mut self.subpath);
        self.subpaths.extend(SubPath::new(subpath, false));
        self.position = p.into();
        self
    }

    /// Close current subpath
    pub fn close(&mut self) -> &mut Self {
        let subpath = std::mem::take(&mut self.subpath);
        if let Some(seg) = subpath.first() {
            self.position = seg.start();
        }
        self.subpaths.extend(SubPath::new(subpath, true));
        self
    }

    /// Add line from the current position to the specified point
    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        let p = p.into();
        if !self.position.is_close_to(p) {
            let line = Line::new(self.position, p);
            self.position = line.end();
            self.subpath.push(line.into());
        }
        self
    }

    /// Add circular arc to the current subpath.
    ///
    /// If the current subpath is not empty, it is connected to the start of the arc
    /// with a straight line when the path is traced.
    pub fn arc(
        &mut self,
        center: impl Into<Point>,
        radius: Scalar,
        start_angle: Scalar,
        end_angle: Scalar,
        clockwise: bool,
    ) -> &mut Self {
        let arc = Arc::new(center, radius, start_angle, end_angle, clockwise);
        self.position = arc.end();
        self.subpath.push(arc.into());
        self
    }

    /// Current position of the builder
    pub fn position(&self) -> Point {
        self.position
    }
}
