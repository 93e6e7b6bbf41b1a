/// Horizontal extent of the seek control in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeekBounds {
    pub left: f64,
    pub width: f64,
}

impl SeekBounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// False until the control has been laid out and measured.
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.width > 0.0
    }

    /// Converts a pointer x coordinate to a position fraction, clamping the pointer to
    /// the control first.
    pub fn fraction_at(&self, x: f64) -> f64 {
        if !self.is_measured() || !x.is_finite() {
            return 0.0;
        }
        let clamped = x.clamp(self.left, self.left + self.width);
        ((clamped - self.left) / self.width).clamp(0.0, 1.0)
    }
}

/// Pointer-driven seek session state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeekDrag {
    active: bool,
}

impl SeekDrag {
    pub fn begin(&mut self) {
        self.active = true;
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_inside_maps_linearly() {
        let bounds = SeekBounds::new(100.0, 200.0);
        assert_eq!(bounds.fraction_at(100.0), 0.0);
        assert_eq!(bounds.fraction_at(150.0), 0.25);
        assert_eq!(bounds.fraction_at(300.0), 1.0);
    }

    #[test]
    fn pointer_outside_is_clamped() {
        let bounds = SeekBounds::new(100.0, 200.0);
        assert_eq!(bounds.fraction_at(-50.0), 0.0);
        assert_eq!(bounds.fraction_at(1000.0), 1.0);
    }

    #[test]
    fn degenerate_bounds_map_to_start() {
        assert_eq!(SeekBounds::new(10.0, 0.0).fraction_at(20.0), 0.0);
        assert_eq!(SeekBounds::new(10.0, -5.0).fraction_at(20.0), 0.0);
        assert_eq!(SeekBounds::new(0.0, 100.0).fraction_at(f64::NAN), 0.0);
        assert!(!SeekBounds::default().is_measured());
        assert!(SeekBounds::new(0.0, 100.0).is_measured());
    }
}
