//! Tests for the Gaussian envelope and soft circular aperture

#[cfg(test)]
mod tests {
    use gaborgif::stimulus::envelope::{
        aperture, aperture_feather, aperture_radius, envelope, gaussian,
    };

    // Tests the Gaussian is one at the centre and decays with distance
    // Verified by dropping the factor of two in the denominator
    #[test]
    fn test_gaussian_profile() {
        assert!((gaussian(0.0, 0.0, 10.0) - 1.0).abs() < 1e-12);
        let one_sigma = gaussian(10.0, 0.0, 10.0);
        assert!((one_sigma - (-0.5_f64).exp()).abs() < 1e-12);
        assert!(gaussian(20.0, 0.0, 10.0) < one_sigma);
        assert!((gaussian(3.0, 4.0, 7.0) - gaussian(5.0, 0.0, 7.0)).abs() < 1e-12);
    }

    // Tests a vanishing sigma collapses to an impulse at the centre
    // Verified by removing the centre short-circuit
    #[test]
    fn test_gaussian_sigma_collapse() {
        assert!((gaussian(0.0, 0.0, 0.0) - 1.0).abs() < 1e-12);
        assert!(gaussian(1.0, 0.0, 0.0).abs() < 1e-12);
        assert!(gaussian(1.0, 1.0, 1e-6) < 1e-12);
        assert!(!gaussian(0.0, 0.0, 1e-9).is_nan());
    }

    #[test]
    fn test_aperture_geometry() {
        assert!((aperture_radius(200) - 96.0).abs() < 1e-12);
        assert!((aperture_feather(200) - 8.0).abs() < 1e-12);
    }

    // Tests the aperture is fully open inside the feather and closed at the radius
    // Verified by swapping the smoothstep edges
    #[test]
    fn test_aperture_inside_and_outside() {
        assert!((aperture(0.0, 200) - 1.0).abs() < 1e-12);
        assert!((aperture(88.0, 200) - 1.0).abs() < 1e-12);
        assert!(aperture(96.0, 200).abs() < 1e-12);
        assert!(aperture(150.0, 200).abs() < 1e-12);
        assert!((aperture(92.0, 200) - 0.5).abs() < 1e-12);
    }

    // Tests the aperture never increases with radius
    // Verified by using a linear ramp with a step
    #[test]
    fn test_aperture_monotone() {
        let mut previous = aperture(0.0, 200);
        for step in 0..=2000 {
            let r = f64::from(step) * 0.1;
            let value = aperture(r, 200);
            assert!(value <= previous, "aperture rose at r = {r}");
            assert!((0.0..=1.0).contains(&value));
            previous = value;
        }
    }

    // Tests the combined envelope stays in the unit interval
    // Verified by adding the factors instead of multiplying
    #[test]
    fn test_envelope_range() {
        for y in -100..=100 {
            for x in (-100..=100).step_by(7) {
                let value = envelope(f64::from(x), f64::from(y), 200, 200.0 / 2.2);
                assert!((0.0..=1.0).contains(&value), "envelope {value} at ({x}, {y})");
            }
        }
        assert!((envelope(0.0, 0.0, 200, 90.0) - 1.0).abs() < 1e-12);
        assert!(envelope(100.0, 0.0, 200, 90.0).abs() < 1e-12);
    }
}
