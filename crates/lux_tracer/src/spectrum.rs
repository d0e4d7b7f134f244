//! Spectral color table for dispersion.
//!
//! In spectral mode each traced channel stands for one wavelength. The
//! channel's radiance is tinted by its rainbow color and the tints are
//! normalized so that a neutral (white) scene stays white.

use lux_math::Color;

/// Reference hues from red to violet, evenly spaced along the spectrum.
pub const RAINBOW: [Color; 7] = [
    Color::new(1.0, 0.0, 0.0),   // red
    Color::new(1.0, 0.5, 0.0),   // orange
    Color::new(1.0, 1.0, 0.0),   // yellow
    Color::new(0.0, 1.0, 0.0),   // green
    Color::new(0.0, 0.0, 1.0),   // blue
    Color::new(0.29, 0.0, 0.51), // indigo
    Color::new(0.56, 0.0, 1.0),  // violet
];

/// Rainbow color at `t` in `[0, 1]`, linearly interpolated between the
/// reference hues. Values outside the range are clamped.
pub fn rainbow(t: f32) -> Color {
    let last = (RAINBOW.len() - 1) as f32;
    let s = t.clamp(0.0, 1.0) * last;
    let i = (s.floor() as usize).min(RAINBOW.len() - 2);
    let f = s - i as f32;
    RAINBOW[i].lerp(RAINBOW[i + 1], f)
}

/// Per-channel tints for `n` spectral samples.
///
/// Every component of the returned weights sums to one. A component that no
/// sample covers (only possible for very small `n`) is shared evenly.
pub fn spectral_weights(n: usize) -> Vec<Color> {
    if n == 0 {
        return Vec::new();
    }

    let mut weights: Vec<Color> = (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
            rainbow(t)
        })
        .collect();

    let total: Color = weights.iter().copied().sum();
    let even = 1.0 / n as f32;
    for w in &mut weights {
        for c in 0..3 {
            w[c] = if total[c] > 0.0 { w[c] / total[c] } else { even };
        }
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_normalized(weights: &[Color]) {
        let total: Color = weights.iter().copied().sum();
        for c in 0..3 {
            assert!((total[c] - 1.0).abs() < 1e-5, "component {c} sums to {}", total[c]);
        }
    }

    #[test]
    fn test_rainbow_endpoints() {
        assert_eq!(rainbow(0.0), RAINBOW[0]);
        assert!((rainbow(1.0) - RAINBOW[6]).length() < 1e-6);
        assert_eq!(rainbow(-3.0), RAINBOW[0]);
        assert_eq!(rainbow(0.5), RAINBOW[3]);
    }

    #[test]
    fn test_rainbow_interpolates() {
        // Halfway between red and orange
        let c = rainbow(1.0 / 12.0);
        assert!((c - Color::new(1.0, 0.25, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_weights_are_normalized() {
        for n in [1, 2, 3, 7, 16, 64] {
            let w = spectral_weights(n);
            assert_eq!(w.len(), n);
            assert_normalized(&w);
        }
    }

    #[test]
    fn test_weights_order_red_to_violet() {
        let w = spectral_weights(7);
        // First sample is pure red, the green sample carries no red or blue
        assert_eq!(w[0].y, 0.0);
        assert!(w[0].x > 0.0);
        assert_eq!(w[3].x, 0.0);
        assert_eq!(w[3].z, 0.0);
        assert!(w[6].z > 0.0);
    }

    #[test]
    fn test_no_samples() {
        assert!(spectral_weights(0).is_empty());
    }
}
