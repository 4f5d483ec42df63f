use cairo::{Context, LinearGradient, Mesh, MeshCorner};
use circlechart_core::anim::Lerp;
use circlechart_core::{Brush, DrawCommand, LineCap, LineJoin, Point, Rect, TextAlign};
use palette::Srgba;
use std::f64::consts::{FRAC_PI_2, PI};

/// Largest angle a single bezier patch may span before it visibly leaves the
/// circle.
const MAX_PATCH_ANGLE: f64 = FRAC_PI_2;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn line_cap(cap: LineCap) -> cairo::LineCap {
    match cap {
        LineCap::Butt => cairo::LineCap::Butt,
        LineCap::Round => cairo::LineCap::Round,
    }
}

fn line_join(join: LineJoin) -> cairo::LineJoin {
    match join {
        LineJoin::Miter => cairo::LineJoin::Miter,
        LineJoin::Round => cairo::LineJoin::Round,
    }
}

fn polar(center: Point, radius: f64, angle: f64) -> (f64, f64) {
    (
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

fn linear_gradient(bounds: &Rect, stops: &[Srgba<f64>]) -> LinearGradient {
    let y = bounds.center().y;
    let gradient = LinearGradient::new(
        bounds.origin.x,
        y,
        bounds.origin.x + bounds.size.width,
        y,
    );
    let last = stops.len().saturating_sub(1).max(1) as f64;
    for (i, color) in stops.iter().enumerate() {
        let (r, g, b, a) = color.into_components();
        gradient.add_color_stop_rgba(i as f64 / last, r, g, b, a);
    }
    gradient
}

/// Approximates a conic gradient with one coons patch per wedge. Each patch
/// starts and ends at `center` so its two inner corners collapse onto it.
fn sweep_gradient(center: Point, radius: f64, stops: &[Srgba<f64>]) -> Mesh {
    let mesh = Mesh::new();
    let segments = stops.len().saturating_sub(1);
    if segments == 0 {
        return mesh;
    }

    let span = 2.0 * PI / segments as f64;
    let pieces = (span / MAX_PATCH_ANGLE).ceil().max(1.0) as usize;
    let step = span / pieces as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan() * radius;

    for (i, pair) in stops.windows(2).enumerate() {
        for piece in 0..pieces {
            let a0 = i as f64 * span + piece as f64 * step;
            let a1 = a0 + step;
            let c0 = pair[0].lerp(&pair[1], piece as f64 / pieces as f64);
            let c1 = pair[0].lerp(&pair[1], (piece + 1) as f64 / pieces as f64);

            let (x0, y0) = polar(center, radius, a0);
            let (x1, y1) = polar(center, radius, a1);

            mesh.begin_patch();
            mesh.move_to(center.x, center.y);
            mesh.line_to(x0, y0);
            mesh.curve_to(
                x0 - k * a0.sin(),
                y0 + k * a0.cos(),
                x1 + k * a1.sin(),
                y1 - k * a1.cos(),
                x1,
                y1,
            );
            mesh.line_to(center.x, center.y);

            for (corner, color) in [
                (MeshCorner::MeshCorner0, c0),
                (MeshCorner::MeshCorner1, c0),
                (MeshCorner::MeshCorner2, c1),
                (MeshCorner::MeshCorner3, c1),
            ] {
                let (r, g, b, a) = color.into_components();
                mesh.set_corner_color_rgba(corner, r, g, b, a);
            }
            mesh.end_patch();
        }
    }
    mesh
}

fn draw_arc(
    cr: &Context,
    bounds: &Rect,
    start_angle: f64,
    sweep_angle: f64,
    stroke_width: f64,
    brush: &Brush,
) -> Result<(), cairo::Error> {
    let center = bounds.center();
    let radius = bounds.size.width.min(bounds.size.height) / 2.0;
    let start = start_angle.to_radians();
    let end = (start_angle + sweep_angle).to_radians();

    match brush {
        Brush::Linear { stops } => cr.set_source(&linear_gradient(bounds, stops))?,
        Brush::Sweep { center, stops } => {
            cr.set_source(&sweep_gradient(*center, radius + stroke_width, stops))?
        }
    }
    cr.set_line_width(stroke_width);
    cr.new_path();
    if sweep_angle < 0.0 {
        cr.arc_negative(center.x, center.y, radius, start, end);
    } else {
        cr.arc(center.x, center.y, radius, start, end);
    }
    cr.stroke()
}

fn draw_text(
    cr: &Context,
    position: Point,
    text: &str,
    font_size: f64,
    color: Srgba<f64>,
    align: TextAlign,
) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(font_size);
    let ext = cr.text_extents(text)?;
    let x = match align {
        TextAlign::Left => position.x,
        TextAlign::Center => position.x - ext.x_advance() / 2.0,
        TextAlign::Right => position.x - ext.x_advance(),
    };
    cr.move_to(x, position.y);
    cr.show_text(text)
}

pub fn draw(cr: &Context, commands: &[DrawCommand]) -> Result<(), cairo::Error> {
    for command in commands {
        match command {
            DrawCommand::Circle {
                center,
                radius,
                stroke_width,
                color,
            } => {
                set_color(cr, *color);
                cr.set_line_width(*stroke_width);
                cr.new_path();
                cr.arc(center.x, center.y, *radius, 0.0, 2.0 * PI);
                cr.stroke()?;
            }
            DrawCommand::Arc {
                bounds,
                start_angle,
                sweep_angle,
                stroke_width,
                cap,
                join,
                brush,
            } => {
                cr.save()?;
                cr.set_line_cap(line_cap(*cap));
                cr.set_line_join(line_join(*join));
                draw_arc(cr, bounds, *start_angle, *sweep_angle, *stroke_width, brush)?;
                cr.restore()?;
            }
            DrawCommand::Text {
                position,
                text,
                font_size,
                color,
                align,
            } => draw_text(cr, *position, text, *font_size, *color, *align)?,
            DrawCommand::Line {
                start,
                end,
                width,
                color,
            } => {
                set_color(cr, *color);
                cr.set_line_width(*width);
                cr.set_line_cap(cairo::LineCap::Butt);
                cr.new_path();
                cr.move_to(start.x, start.y);
                cr.line_to(end.x, end.y);
                cr.stroke()?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::{Format, ImageSurface};
    use circlechart_core::{ChartRenderer, ProgressSpec, RainbowSpec, Size, StyleSpec};
    use std::time::Instant;

    const SIDE: i32 = 150;

    /// Paints one frame and returns the (r, g, b, a) bytes at each point.
    fn paint(
        style: &StyleSpec,
        progress: ProgressSpec,
        points: &[(usize, usize)],
    ) -> Vec<[u8; 4]> {
        let commands = ChartRenderer::new()
            .render(&progress, style, Size::square(SIDE as f64), Instant::now())
            .unwrap();

        let mut surface = ImageSurface::create(Format::ARgb32, SIDE, SIDE).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, &commands).unwrap();
        }
        surface.flush();

        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        points
            .iter()
            .map(|&(x, y)| {
                // ARGB32 is stored native endian: b, g, r, a on little endian
                let px = u32::from_ne_bytes(
                    data[y * stride + x * 4..y * stride + x * 4 + 4]
                        .try_into()
                        .unwrap(),
                );
                [(px >> 16) as u8, (px >> 8) as u8, px as u8, (px >> 24) as u8]
            })
            .collect()
    }

    #[test]
    fn test_solid_arc_covers_its_sweep_only() {
        let style = StyleSpec::default();
        // centre (75, 75), arc radius 62.5: south is inside a 270 degree sweep,
        // north east is not
        let pixels = paint(
            &style,
            ProgressSpec::new(75.0, 100.0).unwrap(),
            &[(75, 137), (119, 31)],
        );

        assert_eq!(pixels[0], [0, 0, 0, 255]);
        assert!(pixels[1][3] < 128, "{:?}", pixels[1]);
    }

    #[test]
    fn test_counter_clockwise_sweep() {
        let style = StyleSpec::default();
        let pixels = paint(
            &style,
            ProgressSpec::new(-25.0, 100.0).unwrap(),
            &[(75, 12), (75, 137)],
        );

        assert_eq!(pixels[0][3], 255);
        assert!(pixels[1][3] < 128, "{:?}", pixels[1]);
    }

    #[test]
    fn test_sweep_brush_follows_hue() {
        let style = StyleSpec {
            rainbow: Some(RainbowSpec::default()),
            ..StyleSpec::default()
        };
        // 90 degrees clockwise from east lands on the yellow-green stops
        let [r, g, b, a] = paint(
            &style,
            ProgressSpec::new(100.0, 100.0).unwrap(),
            &[(75, 137)],
        )[0];

        assert_eq!(a, 255);
        assert!(g > r && r > b, "{:?}", (r, g, b));
    }

    #[test]
    fn test_mesh_patch_count() {
        let stops = [Srgba::new(1.0, 0.0, 0.0, 1.0); 5];
        let mesh = sweep_gradient(Point::new(0.0, 0.0), 10.0, &stops);
        assert_eq!(mesh.patch_count().unwrap(), 4);

        // a two stop sweep is split so no patch spans more than a quarter turn
        let mesh = sweep_gradient(Point::new(0.0, 0.0), 10.0, &stops[..2]);
        assert_eq!(mesh.patch_count().unwrap(), 4);
    }
}
