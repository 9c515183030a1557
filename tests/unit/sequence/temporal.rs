//! Tests for the temporal flicker ramp

#[cfg(test)]
mod tests {
    use gaborgif::sequence::TemporalRamp;

    fn ramp() -> TemporalRamp {
        TemporalRamp {
            frame_count: 240,
            time_step: 0.03,
            ..TemporalRamp::default()
        }
    }

    // Tests the flicker-rate endpoints are exact
    // Verified by dividing by frame_count instead of frame_count - 1
    #[test]
    fn test_hz_endpoints_exact() {
        let ramp = ramp();
        assert!((ramp.hz_at(0) - 1.0).abs() < f64::EPSILON);
        assert!((ramp.hz_at(239) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hz_strictly_increasing() {
        let ramp = ramp();
        for index in 1..240 {
            assert!(ramp.hz_at(index) > ramp.hz_at(index - 1));
        }
    }

    // Tests on-contrast endpoints: base at min_hz, zero at max_hz
    // Verified by dropping the max(0) clamp and exponent
    #[test]
    fn test_on_contrast_endpoints() {
        let ramp = ramp();
        assert!((ramp.contrast_scale(1.0) - 1.0).abs() < f64::EPSILON);
        assert!((ramp.on_contrast(1.0) - ramp.base_contrast).abs() < f64::EPSILON);
        assert!(ramp.contrast_scale(30.0).abs() < f64::EPSILON);
        assert!(ramp.on_contrast(30.0).abs() < f64::EPSILON);
        assert!(ramp.contrast_scale(45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contrast_scale_curve() {
        let ramp = ramp();
        let midpoint = ramp.contrast_scale(15.5);
        assert!((midpoint - 0.5_f64.powf(1.3)).abs() < 1e-12);
        let mut previous = 1.0;
        for step in 0..=290 {
            let hz = 1.0 + f64::from(step) * 0.1;
            let scale = ramp.contrast_scale(hz);
            assert!(scale <= previous + 1e-15);
            previous = scale;
        }
    }

    // Tests the first frame is on and off-frames have zero contrast
    // Verified by inverting the on/off test
    #[test]
    fn test_flicker_states() {
        let ramp = ramp();
        assert!(ramp.is_on(0));
        let first = ramp.frame_at(0);
        assert!((first.contrast - ramp.base_contrast).abs() < f64::EPSILON);

        let frames = ramp.frames().expect("default ramp is valid");
        let off_frames: Vec<usize> = (0..240).filter(|&index| !ramp.is_on(index)).collect();
        assert!(!off_frames.is_empty(), "ramp should contain blank frames");
        for index in off_frames {
            assert!(frames[index].contrast.abs() < f64::EPSILON);
        }
    }

    // Tests frames come out in ascending time with the fixed spatial frequency
    // Verified by changing the spatial frequency per frame
    #[test]
    fn test_frames_in_time_order() {
        let ramp = ramp();
        let frames = ramp.frames().expect("default ramp is valid");
        assert_eq!(frames.len(), 240);
        for (index, params) in frames.iter().enumerate() {
            assert_eq!(*params, ramp.frame_at(index));
            assert!((params.spatial_frequency - 4.0).abs() < f64::EPSILON);
            assert_eq!(params.size, 200);
        }
        assert!((ramp.time_at(10) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_ramp_is_deterministic() {
        let first = ramp().frames().expect("valid ramp");
        let second = ramp().frames().expect("valid ramp");
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_frame_ramp() {
        let ramp = TemporalRamp {
            frame_count: 1,
            ..TemporalRamp::default()
        };
        assert!((ramp.hz_at(0) - ramp.min_hz).abs() < f64::EPSILON);
        assert_eq!(ramp.frames().expect("one frame is valid").len(), 1);
    }

    // Tests invalid ramp settings are rejected before frames are built
    // Verified by removing each validation branch
    #[test]
    fn test_invalid_ramps_rejected() {
        let defaults = TemporalRamp::default();
        let invalid = [
            TemporalRamp { frame_count: 0, ..defaults },
            TemporalRamp { time_step: 0.0, ..defaults },
            TemporalRamp { time_step: -0.1, ..defaults },
            TemporalRamp { min_hz: 0.0, ..defaults },
            TemporalRamp { max_hz: 1.0, ..defaults },
            TemporalRamp { base_contrast: 1.2, ..defaults },
            TemporalRamp { size: 0, ..defaults },
        ];
        for ramp in invalid {
            assert!(ramp.frames().is_err(), "expected rejection of {ramp:?}");
        }
    }

    // Tests on-frames carry exactly base contrast times the falloff, at full contrast too
    // Verified by scaling the contrast above the base
    #[test]
    fn test_on_contrast_never_exceeds_base() {
        let full = TemporalRamp {
            base_contrast: 1.0,
            ..ramp()
        };
        let frames = full.frames().expect("full-contrast ramp is valid");
        for (index, frame) in frames.iter().enumerate() {
            let expected = if full.is_on(index) {
                full.contrast_scale(full.hz_at(index))
            } else {
                0.0
            };
            assert!((frame.contrast - expected).abs() < 1e-12, "frame {index}");
            assert!((0.0..=1.0).contains(&frame.contrast));
        }
    }
}
