//! Tests for wavelength derivation and the sinusoidal grating

#[cfg(test)]
mod tests {
    use gaborgif::stimulus::grating::{grating, wavelength};
    use std::f64::consts::{FRAC_PI_2, PI};

    // Tests wavelength is size / (f * size / 60), i.e. 60 / f pixels
    // Verified by changing the pixels-per-degree constant
    #[test]
    fn test_wavelength_inverse_to_frequency() {
        for frequency in 1..=30 {
            let expected = 200.0 / (f64::from(frequency) * 200.0 / 60.0);
            let actual = wavelength(f64::from(frequency), 200);
            assert!((actual - expected).abs() < 1e-9);
            assert!((actual - 60.0 / f64::from(frequency)).abs() < 1e-9);
        }
    }

    // Tests non-positive frequency falls back to one cycle across the canvas
    // Verified by removing the fallback branch
    #[test]
    fn test_wavelength_zero_frequency() {
        assert!((wavelength(0.0, 200) - 200.0).abs() < 1e-12);
        assert!((wavelength(-3.0, 150) - 150.0).abs() < 1e-12);
    }

    #[test]
    fn test_grating_values() {
        assert!(grating(0.0, 60.0, 0.0, 0.0).abs() < 1e-12);
        assert!((grating(15.0, 60.0, 0.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((grating(45.0, 60.0, 0.0, 0.0) + 1.0).abs() < 1e-12);
        assert!((grating(0.0, 60.0, FRAC_PI_2, 0.0) - 1.0).abs() < 1e-12);
    }

    // Tests a positive shift moves the stripes to the right
    // Verified by adding the shift instead of subtracting it
    #[test]
    fn test_grating_shift_moves_right() {
        let unshifted = grating(10.0, 60.0, 0.0, 0.0);
        let shifted = grating(20.0, 60.0, 0.0, 10.0);
        assert!((unshifted - shifted).abs() < 1e-12);
    }

    #[test]
    fn test_grating_bounded() {
        for step in -500..500 {
            let value = grating(f64::from(step) * 0.37, 7.5, PI / 3.0, 2.0);
            assert!((-1.0..=1.0).contains(&value));
        }
    }
}
