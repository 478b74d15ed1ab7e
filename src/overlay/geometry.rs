//! Screen-space geometry used by hover detection and dragging.

/// A point in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Window rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Inclusive on every edge, so a cursor resting on the border counts as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True when `p` lies in the `grip`-sized square at the bottom-right corner.
    pub fn in_resize_grip(&self, p: Point, grip: i32) -> bool {
        self.contains(p) && p.x >= self.right() - grip && p.y >= self.bottom() - grip
    }

    pub fn with_size(self, width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn with_origin(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let b = Bounds::new(10, 10, 100, 50);
        assert!(b.contains(Point::new(10, 10)));
        assert!(b.contains(Point::new(110, 60)));
        assert!(!b.contains(Point::new(111, 60)));
        assert!(!b.contains(Point::new(9, 30)));
    }

    #[test]
    fn grip_is_bottom_right_only() {
        let b = Bounds::new(0, 0, 100, 50);
        assert!(b.in_resize_grip(Point::new(95, 45), 12));
        assert!(!b.in_resize_grip(Point::new(5, 45), 12));
        assert!(!b.in_resize_grip(Point::new(95, 5), 12));
    }
}
