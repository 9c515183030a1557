//! Tests for frame parameters and Gabor patch synthesis

#[cfg(test)]
mod tests {
    use gaborgif::GaborError;
    use gaborgif::stimulus::patch::to_intensity;
    use gaborgif::stimulus::{FrameParameters, Patch};
    use std::f64::consts::FRAC_PI_2;

    fn render(params: &FrameParameters) -> Patch {
        Patch::synthesize(params).expect("valid parameters should render")
    }

    // Tests default sigma is a fixed fraction of the canvas
    // Verified by scaling sigma with frequency
    #[test]
    fn test_effective_sigma_independent_of_frequency() {
        let low = FrameParameters::new(1.0, 200);
        let high = FrameParameters::new(30.0, 200);
        assert!((low.effective_sigma() - 200.0 / 2.2).abs() < 1e-12);
        assert!((low.effective_sigma() - high.effective_sigma()).abs() < 1e-12);
        assert!((low.with_sigma(12.0).effective_sigma() - 12.0).abs() < 1e-12);
    }

    // Tests validation rejects bad sizes, contrasts and sigmas
    // Verified by removing each validation branch
    #[test]
    fn test_validate_rejects_invalid_parameters() {
        let invalid = [
            FrameParameters::new(4.0, 0),
            FrameParameters::new(4.0, 200).with_contrast(-0.1),
            FrameParameters::new(4.0, 200).with_contrast(1.5),
            FrameParameters::new(4.0, 200).with_contrast(f64::NAN),
            FrameParameters::new(4.0, 200).with_sigma(0.0),
            FrameParameters::new(4.0, 200).with_sigma(-2.0),
            FrameParameters::new(f64::INFINITY, 200),
            FrameParameters::new(4.0, 200).with_phase(f64::NAN),
            FrameParameters::new(4.0, 200).with_shift(f64::INFINITY),
        ];
        for params in invalid {
            let result = Patch::synthesize(&params);
            assert!(
                matches!(result, Err(GaborError::InvalidParameter { .. })),
                "expected rejection of {params:?}"
            );
        }
    }

    // Tests zero and negative frequencies are defined behaviour
    // Verified by rejecting non-positive frequencies
    #[test]
    fn test_non_positive_frequency_renders() {
        let patch = render(&FrameParameters::new(0.0, 64));
        assert_eq!(patch.size(), 64);
        assert!(!patch.is_uniform());
        assert!(Patch::synthesize(&FrameParameters::new(-2.0, 64)).is_ok());
    }

    #[test]
    fn test_to_intensity_mapping() {
        assert_eq!(to_intensity(0.0, 0.8), 128);
        assert_eq!(to_intensity(1.0, 1.0), 255);
        assert_eq!(to_intensity(-1.0, 1.0), 0);
        assert_eq!(to_intensity(5.0, 1.0), 255);
        assert_eq!(to_intensity(-5.0, 1.0), 0);
        assert_eq!(to_intensity(f64::NAN, 1.0), 0);
    }

    // Tests the centre pixel is mid-gray for zero phase at any contrast
    // Verified by offsetting the canvas centre by half a pixel
    #[test]
    fn test_center_pixel_mid_gray() {
        for contrast in [0.0, 0.3, 0.8, 1.0] {
            for frequency in [1.0, 4.0, 17.0, 30.0] {
                let patch = render(&FrameParameters::new(frequency, 200).with_contrast(contrast));
                let center = patch.intensity(100, 100).expect("centre pixel exists");
                assert!(
                    center == 127 || center == 128,
                    "centre was {center} at contrast {contrast}, frequency {frequency}"
                );
            }
        }
    }

    // Tests the centre pixel follows sin(phase)
    // Verified by ignoring the phase term
    #[test]
    fn test_center_pixel_follows_phase() {
        let patch = render(
            &FrameParameters::new(4.0, 200)
                .with_contrast(1.0)
                .with_phase(FRAC_PI_2),
        );
        assert_eq!(patch.intensity(100, 100), Some(255));
    }

    // Tests zero contrast yields a flat field regardless of other parameters
    // Verified by applying contrast only to positive values
    #[test]
    fn test_zero_contrast_is_uniform() {
        for (frequency, phase, shift) in [(1.0, 0.0, 0.0), (12.0, 1.3, 5.0), (30.0, -2.0, -40.0)] {
            let patch = render(
                &FrameParameters::new(frequency, 120)
                    .with_contrast(0.0)
                    .with_phase(phase)
                    .with_shift(shift),
            );
            assert!(patch.is_uniform());
            assert_eq!(patch.intensity(0, 0), Some(128));
            assert_eq!(patch.intensity(60, 60), Some(128));
        }
    }

    // Tests every pixel lies in [0, 255] and the full contrast range is used
    // Verified by removing the clamp
    #[test]
    fn test_intensity_range_full_contrast() {
        let patch = render(&FrameParameters::new(2.0, 200).with_contrast(1.0));
        let min = patch.pixels().iter().copied().min().unwrap_or(128);
        let max = patch.pixels().iter().copied().max().unwrap_or(128);
        assert!(min < 40, "darkest pixel {min}");
        assert!(max > 215, "brightest pixel {max}");
    }

    // Tests pixels outside the aperture are mid-gray
    // Verified by removing the aperture factor
    #[test]
    fn test_corners_outside_aperture() {
        let patch = render(&FrameParameters::new(3.0, 200).with_contrast(1.0));
        for (x, y) in [(0, 0), (199, 0), (0, 199), (199, 199)] {
            assert_eq!(patch.intensity(x, y), Some(128));
        }
    }

    // Tests a tiny sigma leaves only the centre modulated
    // Verified by removing the Gaussian factor
    #[test]
    fn test_sigma_collapse() {
        let patch = render(
            &FrameParameters::new(4.0, 100)
                .with_contrast(1.0)
                .with_sigma(1e-6)
                .with_phase(FRAC_PI_2),
        );
        assert_eq!(patch.intensity(50, 50), Some(255));
        assert_eq!(patch.intensity(51, 50), Some(128));
        assert_eq!(patch.intensity(10, 80), Some(128));
    }

    // Tests a single-pixel canvas renders
    // Verified by using size - 1 as the divisor
    #[test]
    fn test_single_pixel_canvas() {
        let patch = render(&FrameParameters::new(5.0, 1).with_contrast(1.0));
        assert_eq!(patch.size(), 1);
        assert!(patch.intensity(0, 0).is_some());
        assert!(patch.intensity(1, 0).is_none());
    }

    // Tests the shift moves the pattern horizontally
    // Verified by applying the shift to dy
    #[test]
    fn test_shift_translates_columns() {
        let base = render(&FrameParameters::new(4.0, 200).with_contrast(1.0).with_sigma(1e6));
        let shifted = render(
            &FrameParameters::new(4.0, 200)
                .with_contrast(1.0)
                .with_sigma(1e6)
                .with_shift(3.0),
        );
        assert_eq!(base.intensity(90, 100), shifted.intensity(93, 100));
    }

    #[test]
    fn test_image_conversions() {
        let patch = render(&FrameParameters::new(6.0, 32).with_contrast(0.9));
        let gray = patch.to_gray_image();
        let rgba = patch.to_rgba_image();
        assert_eq!(gray.dimensions(), (32, 32));
        assert_eq!(rgba.dimensions(), (32, 32));
        for (x, y, pixel) in gray.enumerate_pixels() {
            assert_eq!(Some(pixel.0[0]), patch.intensity(x, y));
            let color = rgba.get_pixel(x, y).0;
            assert_eq!(color, [pixel.0[0], pixel.0[0], pixel.0[0], 255]);
        }
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let params = FrameParameters::new(9.0, 80).with_phase(0.4);
        assert_eq!(render(&params), render(&params));
    }
}
