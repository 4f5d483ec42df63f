pub const MIN_FONT_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }
}

/// Per-frame placement of the ring, the arc and the label inside a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLayout {
    pub container: Size,
    pub scale_factor: f64,
    pub stroke_width: f64,
    pub font_size: f64,
    pub left_inset: f64,
    pub top_inset: f64,
    pub arc_diameter: f64,
    pub ring_radius: f64,
}

impl ArcLayout {
    /// Scales stroke and font against `reference_size` (never upwards), then
    /// centers a square ring of the shorter side along the longer axis.
    ///
    /// Containers narrower than two strokes yield non-positive diameters;
    /// callers treat those as nothing to draw.
    pub fn compute(
        container: Size,
        reference_size: f64,
        stroke_width: f64,
        font_size: f64,
    ) -> Self {
        let max_dim = container.max_dimension();
        let min_dim = container.min_dimension();

        let scale_factor = 1.0_f64.min(max_dim / reference_size);
        let stroke_width = stroke_width * scale_factor;
        let font_size = MIN_FONT_SIZE.max(font_size * scale_factor);

        let centered = (max_dim - min_dim) / 2.0 + stroke_width;
        let left_inset = if container.width == max_dim {
            centered
        } else {
            stroke_width
        };
        let top_inset = if container.height == max_dim {
            centered
        } else {
            stroke_width
        };

        Self {
            container,
            scale_factor,
            stroke_width,
            font_size,
            left_inset,
            top_inset,
            arc_diameter: min_dim - 2.0 * stroke_width,
            ring_radius: min_dim / 2.0 - stroke_width,
        }
    }

    pub fn center(&self) -> Point {
        self.container.center()
    }

    pub fn arc_bounds(&self) -> Rect {
        Rect::new(
            Point::new(self.left_inset, self.top_inset),
            Size::square(self.arc_diameter),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sized_container_keeps_stroke() {
        let layout = ArcLayout::compute(Size::square(150.0), 150.0, 25.0, 25.0);
        assert_eq!(layout.scale_factor, 1.0);
        assert_eq!(layout.stroke_width, 25.0);
        assert_eq!(layout.font_size, 25.0);
        assert_eq!(layout.left_inset, 25.0);
        assert_eq!(layout.top_inset, 25.0);
        assert_eq!(layout.arc_diameter, 100.0);
        assert_eq!(layout.ring_radius, 50.0);
    }

    #[test]
    fn test_larger_container_never_scales_up() {
        let layout = ArcLayout::compute(Size::square(600.0), 150.0, 25.0, 25.0);
        assert_eq!(layout.scale_factor, 1.0);
        assert_eq!(layout.stroke_width, 25.0);
    }

    #[test]
    fn test_smaller_container_scales_down() {
        let layout = ArcLayout::compute(Size::square(75.0), 150.0, 20.0, 40.0);
        assert_eq!(layout.scale_factor, 0.5);
        assert_eq!(layout.stroke_width, 10.0);
        assert_eq!(layout.font_size, 20.0);
    }

    #[test]
    fn test_font_floor() {
        let cases = vec![(75.0, 15.0), (30.0, 25.0), (1.0, 100.0)];
        for (side, font) in cases {
            let layout = ArcLayout::compute(Size::square(side), 150.0, 25.0, font);
            assert_eq!(layout.font_size, MIN_FONT_SIZE, "side {side}, font {font}");
        }
    }

    #[test]
    fn test_wide_container_centers_horizontally() {
        let layout = ArcLayout::compute(Size::new(300.0, 150.0), 150.0, 25.0, 25.0);
        assert_eq!(layout.scale_factor, 1.0);
        assert_eq!(layout.ring_radius, 50.0);
        assert_eq!(layout.left_inset, 100.0);
        assert_eq!(layout.top_inset, 25.0);
        assert_eq!(layout.arc_diameter, 100.0);
        assert_eq!(layout.arc_bounds().center(), layout.center());
    }

    #[test]
    fn test_tall_container_centers_vertically() {
        let layout = ArcLayout::compute(Size::new(100.0, 200.0), 150.0, 10.0, 25.0);
        assert_eq!(layout.left_inset, 10.0);
        assert_eq!(layout.top_inset, 60.0);
        assert_eq!(layout.arc_diameter, 80.0);
        assert_eq!(layout.arc_bounds().center(), Point::new(50.0, 100.0));
    }

    #[test]
    fn test_tiny_container_reports_negative_geometry() {
        let layout = ArcLayout::compute(Size::square(30.0), 30.0, 25.0, 25.0);
        assert!(layout.arc_diameter < 0.0);
        assert!(layout.ring_radius < 0.0);
    }
}
