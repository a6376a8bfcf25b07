//! Layout rectangles and drag restriction

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }
}

/// Clamp a translation so `element` moved by `offset` stays inside `bounds`
///
/// `element` is the untranslated layout box. When the element is larger than
/// the bounds on an axis it is pinned to the leading edge of that axis.
pub fn clamp_offset(element: Rect, offset: (f32, f32), bounds: Rect) -> (f32, f32) {
    (
        clamp_axis(element.left(), element.width, offset.0, bounds.left(), bounds.width),
        clamp_axis(element.top(), element.height, offset.1, bounds.top(), bounds.height),
    )
}

fn clamp_axis(start: f32, size: f32, offset: f32, bound_start: f32, bound_size: f32) -> f32 {
    let min = bound_start - start;
    let max = bound_start + bound_size - size - start;
    if max < min {
        return min;
    }
    offset.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_inside_bounds_is_untouched() {
        let element = Rect::new(10.0, 10.0, 20.0, 20.0);
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(clamp_offset(element, (15.0, -5.0), bounds), (15.0, -5.0));
    }

    #[test]
    fn test_offset_clamped_at_each_edge() {
        let element = Rect::new(10.0, 10.0, 20.0, 20.0);
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);

        // Right/bottom: element may move until its far edge touches 100
        assert_eq!(clamp_offset(element, (500.0, 500.0), bounds), (70.0, 70.0));
        // Left/top: element may move until its near edge touches 0
        assert_eq!(clamp_offset(element, (-500.0, -500.0), bounds), (-10.0, -10.0));
    }

    #[test]
    fn test_oversized_element_pinned_to_leading_edge() {
        let element = Rect::new(5.0, 5.0, 200.0, 10.0);
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(clamp_offset(element, (30.0, 0.0), bounds), (-5.0, 0.0));
    }

    #[test]
    fn test_rect_edges_and_contains() {
        let rect = Rect::new(-5.0, 10.0, 15.0, 5.0);
        assert_eq!(rect.right(), 10.0);
        assert_eq!(rect.bottom(), 15.0);
        assert!(rect.contains(0.0, 12.0));
        assert!(!rect.contains(11.0, 12.0));
        assert_eq!(rect.translated(5.0, -10.0), Rect::new(0.0, 0.0, 15.0, 5.0));
    }
}
