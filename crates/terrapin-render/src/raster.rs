//! Software raster implementation of the core canvas contract.
//!
//! Paths are captured in device space as polylines: transform ops only
//! affect points appended afterwards. Stroking rasterizes each segment
//! with Bresenham's algorithm; filling uses even-odd scanline coverage.
//! Everything outside the pixel grid is clipped.

use crate::transform::Affine;
use terrapin_core::{Canvas, Color};

/// Number of chord segments used to flatten a full-circle arc.
const ARC_SEGMENTS: usize = 32;

/// 8-bit RGBA pixel. The surface itself stays opaque; translucent sources
/// are composited over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Quantize a core color, clamping channels into `[0, 1]`.
    #[must_use]
    pub fn from_color(color: Color) -> Self {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: channel(color.r),
            g: channel(color.g),
            b: channel(color.b),
            a: 255,
        }
    }

    // Source-over compositing against an opaque destination.
    fn blend_over(self, src: Color) -> Self {
        let alpha = src.a.clamp(0.0, 1.0);
        let mix = |dst: u8, src: f64| {
            let dst = f64::from(dst) / 255.0;
            let out = src.clamp(0.0, 1.0) * alpha + dst * (1.0 - alpha);
            (out * 255.0).round() as u8
        };
        Self {
            r: mix(self.r, src.r),
            g: mix(self.g, src.g),
            b: mix(self.b, src.b),
            a: 255,
        }
    }
}

/// An offscreen RGBA pixel grid implementing [`Canvas`].
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    background: Rgba8,
    pixels: Vec<Rgba8>,
    transform: Affine,
    saved: Vec<Affine>,
    path: Vec<Vec<(f64, f64)>>,
    color: Color,
}

impl PixelCanvas {
    /// Construct a canvas cleared to the background color.
    #[must_use]
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let background = Rgba8::from_color(background);
        Self {
            width,
            height,
            background,
            pixels: vec![background; width * height],
            transform: Affine::IDENTITY,
            saved: Vec::new(),
            path: Vec::new(),
            color: Color::WHITE,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Row-major pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// The pixel at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba8> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Count of pixels differing from the background.
    #[must_use]
    pub fn painted_count(&self) -> usize {
        let background = self.background;
        self.pixels.iter().filter(|px| **px != background).count()
    }

    fn set_pixel(&mut self, x: isize, y: isize) {
        if x >= 0 && x < self.width as isize && y >= 0 && y < self.height as isize {
            let offset = y as usize * self.width + x as usize;
            self.pixels[offset] = self.pixels[offset].blend_over(self.color);
        }
    }

    // Bresenham over device-space endpoints. Segments are clipped to the
    // grid first so arbitrarily distant endpoints stay cheap.
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        let Some((from, to)) = clip_segment(from, to, self.width as f64, self.height as f64)
        else {
            return;
        };
        let (mut x0, mut y0, x1, y1) = (
            from.0.round() as isize,
            from.1.round() as isize,
            to.0.round() as isize,
            to.1.round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    // Even-odd scanline fill over all subpaths, each implicitly closed.
    fn fill_path(&mut self) {
        let subpaths = std::mem::take(&mut self.path);
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for subpath in &subpaths {
            for &(_, y) in subpath {
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }

        let row_start = (min_y.floor().max(0.0)) as isize;
        let row_end = (max_y.ceil().min(self.height as f64 - 1.0)) as isize;
        let mut crossings = Vec::new();

        for row in row_start..=row_end {
            let sample_y = row as f64 + 0.5;
            crossings.clear();
            for subpath in &subpaths {
                if subpath.len() < 2 {
                    continue;
                }
                for i in 0..subpath.len() {
                    let (x0, y0) = subpath[i];
                    let (x1, y1) = subpath[(i + 1) % subpath.len()];
                    if (y0 <= sample_y) != (y1 <= sample_y) {
                        let t = (sample_y - y0) / (y1 - y0);
                        crossings.push(x0 + t * (x1 - x0));
                    }
                }
            }
            crossings.sort_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil().max(0.0)) as isize;
                let end = ((span[1] - 0.5).floor().min(self.width as f64 - 1.0)) as isize;
                for x in start..=end {
                    self.set_pixel(x, row);
                }
            }
        }
    }
}

// Liang-Barsky clip against the pixel grid, expanded half a pixel so
// boundary pixels still rasterize.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    width: f64,
    height: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let (x0, y0) = from;
    let (dx, dy) = (to.0 - x0, to.1 - y0);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let edges = [
        (-dx, x0 + 0.5),
        (dx, width - 0.5 - x0),
        (-dy, y0 + 0.5),
        (dy, height - 0.5 - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }

    Some((
        (x0 + t0 * dx, y0 + t0 * dy),
        (x0 + t1 * dx, y0 + t1 * dy),
    ))
}

impl Canvas for PixelCanvas {
    fn move_to(&mut self, x: f64, y: f64) {
        let point = self.transform.apply(x, y);
        self.path.push(vec![point]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let point = self.transform.apply(x, y);
        match self.path.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.path.push(vec![point]),
        }
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let sweep = end_angle - start_angle;
        let mut subpath = Vec::with_capacity(ARC_SEGMENTS + 1);
        for i in 0..=ARC_SEGMENTS {
            let t = start_angle + sweep * (i as f64 / ARC_SEGMENTS as f64);
            let local = (cx + radius * t.cos(), cy + radius * t.sin());
            subpath.push(self.transform.apply(local.0, local.1));
        }
        self.path.push(subpath);
    }

    fn stroke(&mut self) {
        let subpaths = std::mem::take(&mut self.path);
        for subpath in &subpaths {
            for pair in subpath.windows(2) {
                self.draw_line(pair[0], pair[1]);
            }
        }
    }

    fn fill(&mut self) {
        self.fill_path();
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translated(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.rotated(radians);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.scaled(sx, sy);
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.saved.pop() {
            self.transform = transform;
        }
    }
}
