use ndarray::{Array2, ArrayViewMut1};
use ttf_parser::OutlineBuilder;

pub type Point = [f32; 2];

/// vertical samples taken per pixel row when computing coverage.
const SUBSAMPLES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub p0: Point,
    pub p1: Point,
}

/// ink bounds of an outline in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }
}

/// A run of text flattened to straight edges, in pixels with y pointing down and the baseline at
/// `y = 0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub edges: Vec<Edge>,
    /// horizontal distance the pen travelled.
    pub advance: f32,
    /// distance from the baseline up to the top of the line box.
    pub ascent: f32,
    /// distance from the baseline down to the bottom of the line box.
    pub descent: f32,
}

impl Outline {
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.edges.iter().flat_map(|edge| [edge.p0, edge.p1]);
        let first = points.next()?;
        Some(points.fold(Bounds { min: first, max: first }, |bounds, [x, y]| Bounds {
            min: [bounds.min[0].min(x), bounds.min[1].min(y)],
            max: [bounds.max[0].max(x), bounds.max[1].max(y)],
        }))
    }

    /// appends a closed axis-aligned rectangle.
    pub fn push_rect(&mut self, min: Point, max: Point) {
        let corners = [min, [max[0], min[1]], max, [min[0], max[1]]];
        for i in 0..corners.len() {
            self.edges.push(Edge {
                p0: corners[i],
                p1: corners[(i + 1) % corners.len()],
            });
        }
    }

    /// Coverage in `[0, 1]` of each pixel of a `height x width` grid, with the outline shifted
    /// by `offset`. uses the nonzero winding rule, sampling each pixel row several times and
    /// integrating spans exactly along x.
    pub fn coverage(&self, height: usize, width: usize, offset: Point) -> Array2<f32> {
        let mut coverage = Array2::<f32>::zeros((height, width));
        let mut crossings: Vec<(f32, i32)> = Vec::with_capacity(16);
        let weight = 1. / SUBSAMPLES as f32;

        for y in 0..height {
            let mut row = coverage.row_mut(y);
            for sub in 0..SUBSAMPLES {
                let sample_y = y as f32 + (sub as f32 + 0.5) * weight - offset[1];

                crossings.clear();
                for &Edge { p0, p1 } in &self.edges {
                    if p0[1] == p1[1] {
                        continue;
                    }
                    let (low, high, direction) = if p0[1] < p1[1] {
                        (p0[1], p1[1], 1)
                    } else {
                        (p1[1], p0[1], -1)
                    };
                    if sample_y < low || sample_y >= high {
                        continue;
                    }
                    let t = (sample_y - p0[1]) / (p1[1] - p0[1]);
                    crossings.push((p0[0] + t * (p1[0] - p0[0]) + offset[0], direction));
                }
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                for (i, &(start, direction)) in crossings.iter().enumerate() {
                    winding += direction;
                    if winding != 0 {
                        if let Some(&(end, _)) = crossings.get(i + 1) {
                            fill_span(&mut row, start, end, weight);
                        }
                    }
                }
            }
        }

        coverage.mapv_inplace(|c| c.min(1.));
        coverage
    }
}

fn fill_span(row: &mut ArrayViewMut1<'_, f32>, start: f32, end: f32, weight: f32) {
    let width = row.len() as f32;
    let (start, end) = (start.clamp(0., width), end.clamp(0., width));
    if end <= start {
        return;
    }

    for x in start.floor() as usize..end.ceil() as usize {
        let covered = end.min(x as f32 + 1.) - start.max(x as f32);
        row[x] += covered * weight;
    }
}

fn lerp(p0: Point, p1: Point, t: f32) -> Point {
    [p0[0] * (1. - t) + p1[0] * t, p0[1] * (1. - t) + p1[1] * t]
}

/// Flattens font outlines into [`Edge`]s, scaling font units to pixels and flipping the y axis.
pub struct OutlineFlattener<'a> {
    outline: &'a mut Outline,
    scale: f32,
    origin_x: f32,
    current: Point,
    start: Point,
}

impl<'a> OutlineFlattener<'a> {
    const QUAD_STEPS: usize = 8;
    const CUBIC_DEPTH: u32 = 3;

    pub fn new(outline: &'a mut Outline, scale: f32, origin_x: f32) -> Self {
        Self {
            outline,
            scale,
            origin_x,
            current: [0., 0.],
            start: [0., 0.],
        }
    }

    fn point(&self, x: f32, y: f32) -> Point {
        [self.origin_x + x * self.scale, -y * self.scale]
    }

    fn push_line(&mut self, p1: Point) {
        if p1 != self.current {
            self.outline.edges.push(Edge { p0: self.current, p1 });
        }
        self.current = p1;
    }

    fn subdivide_cubic(&mut self, p0: Point, p1: Point, p2: Point, p3: Point, depth: u32) {
        if depth >= Self::CUBIC_DEPTH {
            self.push_line(p3);
            return;
        }

        let p01 = lerp(p0, p1, 0.5);
        let p12 = lerp(p1, p2, 0.5);
        let p23 = lerp(p2, p3, 0.5);

        let p012 = lerp(p01, p12, 0.5);
        let p123 = lerp(p12, p23, 0.5);

        let p0123 = lerp(p012, p123, 0.5);

        self.subdivide_cubic(p0, p01, p012, p0123, depth + 1);
        self.subdivide_cubic(p0123, p123, p23, p3, depth + 1);
    }
}

impl OutlineBuilder for OutlineFlattener<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.current = self.point(x, y);
        self.start = self.current;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p1 = self.point(x, y);
        self.push_line(p1);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p0 = self.current;
        let control = self.point(x1, y1);
        let p2 = self.point(x, y);

        for step in 1..=Self::QUAD_STEPS {
            let t = step as f32 / Self::QUAD_STEPS as f32;
            self.push_line(lerp(lerp(p0, control, t), lerp(control, p2, t), t));
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p1 = self.point(x1, y1);
        let p2 = self.point(x2, y2);
        let p3 = self.point(x, y);

        self.subdivide_cubic(self.current, p1, p2, p3, 0);
    }

    fn close(&mut self) {
        let start = self.start;
        self.push_line(start);
    }
}
