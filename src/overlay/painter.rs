use crate::foundation::core::Rgb8;
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::premul_over_rgb;
use crate::overlay::text::TextBlock;
use crate::render::frame::RgbFrame;
use vello_cpu::kurbo::{Affine, BezPath, Circle, Point, Shape, Stroke};

/// Vector overlay surface for one frame.
///
/// Shapes are rasterized with `vello_cpu` in the order they are drawn and composited over the
/// frame in a single pass. Integer pixel coordinates address pixel centres.
pub struct Painter {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    width: u32,
    height: u32,
    pending: bool,
}

impl std::fmt::Debug for Painter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painter")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pending", &self.pending)
            .finish()
    }
}

impl Painter {
    /// Create a surface of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> VizResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| VizError::config(format!("frame width {width} exceeds {}", u16::MAX)))?;
        let h: u16 = height.try_into().map_err(|_| {
            VizError::config(format!("frame height {height} exceeds {}", u16::MAX))
        })?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            width,
            height,
            pending: false,
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Stroke connected segments through `points`, in the given order.
    pub fn stroke_polyline(&mut self, points: &[(i32, i32)], color: Rgb8, line_width: f64) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(pixel_centre(*first));
        for &p in rest {
            path.line_to(pixel_centre(p));
        }
        self.set_color(color);
        self.ctx.set_stroke(Stroke::new(line_width));
        self.ctx.stroke_path(&path);
        self.pending = true;
    }

    /// Fill a disc of `radius` pixels centred on `centre`.
    pub fn fill_circle(&mut self, centre: (i32, i32), radius: f64, color: Rgb8) {
        let path = Circle::new(pixel_centre(centre), radius).to_path(0.1);
        self.set_color(color);
        self.ctx.fill_path(&path);
        self.pending = true;
    }

    /// Draw a shaped label with its top-left corner at `(x, y)`.
    pub fn draw_text(&mut self, block: &TextBlock, x: f64, y: f64, color: Rgb8) {
        let Some((layout, font)) = block.shaped.as_ref() else {
            return;
        };
        self.ctx.set_transform(Affine::translate((x, y)));
        self.set_color(color);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx.set_transform(Affine::IDENTITY);
        self.pending = true;
    }

    /// Composite everything drawn since the last call over `frame`, then clear the surface.
    pub fn composite_onto(&mut self, frame: &mut RgbFrame) -> VizResult<()> {
        if (frame.width, frame.height) != (self.width, self.height) {
            return Err(VizError::shape(format!(
                "overlay surface is {}x{} but frame is {}x{}",
                self.width, self.height, frame.width, frame.height
            )));
        }
        if !self.pending {
            return Ok(());
        }

        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);

        for (dst, src) in frame
            .data
            .chunks_exact_mut(3)
            .zip(self.pixmap.data_as_u8_slice().chunks_exact(4))
        {
            premul_over_rgb(dst, [src[0], src[1], src[2], src[3]]);
        }

        self.ctx.reset();
        self.pending = false;
        Ok(())
    }

    fn set_color(&mut self, color: Rgb8) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));
    }
}

fn pixel_centre((x, y): (i32, i32)) -> Point {
    Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/painter.rs"]
mod tests;
