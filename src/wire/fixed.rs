//! Wayland's 24.8 signed fixed-point wire type.

/// A 24.8 fixed-point number, as carried by the `fixed` argument kind
/// (spec.md §4.1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed(i32);

impl Fixed {
    const FRACTIONAL_BITS: i32 = 8;

    pub fn from_bits(bits: i32) -> Self {
        Fixed(bits)
    }

    pub fn to_bits(self) -> i32 {
        self.0
    }

    pub fn from_f64(v: f64) -> Self {
        Fixed((v * (1i32 << Self::FRACTIONAL_BITS) as f64).round() as i32)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1i32 << Self::FRACTIONAL_BITS) as f64
    }

    pub fn from_int(v: i32) -> Self {
        Fixed(v << Self::FRACTIONAL_BITS)
    }

    pub fn to_int(self) -> i32 {
        self.0 >> Self::FRACTIONAL_BITS
    }
}

impl From<i32> for Fixed {
    fn from(v: i32) -> Self {
        Fixed::from_int(v)
    }
}

impl From<f64> for Fixed {
    fn from(v: f64) -> Self {
        Fixed::from_f64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_integers() {
        let f = Fixed::from_int(42);
        assert_eq!(f.to_int(), 42);
    }

    #[test]
    fn round_trips_fractional() {
        let f = Fixed::from_f64(3.5);
        assert!((f.to_f64() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn bits_round_trip() {
        let f = Fixed::from_bits(0x0102_0304);
        assert_eq!(f.to_bits(), 0x0102_0304);
    }
}
