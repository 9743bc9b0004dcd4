//! Deadzone modifier
//!
//! Shapes a computed axis value so small excursions collapse to zero and
//! large ones saturate. One instance is typically shared by several actions
//! through an `Arc`, so detaching any one of them cannot free it early.

/// Axis-value shaping filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadzone {
    lower: i32,
    upper: i32,
}

impl Deadzone {
    /// `lower` is the magnitude below which values collapse to zero;
    /// `upper` the magnitude above which they saturate.
    pub fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    /// Applies the deadzone to one axis value.
    pub fn apply(&self, value: i32) -> i32 {
        let magnitude = value.abs();
        if magnitude < self.lower {
            0
        } else if magnitude > self.upper {
            self.upper * value.signum()
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_excursions_collapse() {
        let dz = Deadzone::new(100, 30000);
        assert_eq!(dz.apply(0), 0);
        assert_eq!(dz.apply(99), 0);
        assert_eq!(dz.apply(-99), 0);
    }

    #[test]
    fn passband_is_untouched() {
        let dz = Deadzone::new(100, 30000);
        assert_eq!(dz.apply(100), 100);
        assert_eq!(dz.apply(-12345), -12345);
    }

    #[test]
    fn large_excursions_saturate() {
        let dz = Deadzone::new(100, 30000);
        assert_eq!(dz.apply(32767), 30000);
        assert_eq!(dz.apply(-32768), -30000);
    }
}
