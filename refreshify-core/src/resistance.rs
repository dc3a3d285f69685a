//! Resistance curve and pull progress

/// Damp a raw downward drag distance.
///
/// The damping grows as `distance` approaches `viewport_height`, so the pull
/// gets harder the further it goes. Past `viewport_height` the result turns
/// negative; callers receive the raw curve unclamped.
pub fn resist(distance: f64, viewport_height: f64, resistance: f64) -> f64 {
    let ratio = distance / viewport_height;
    distance * (1.0 - ratio) * resistance
}

/// Progress toward the refresh threshold, 0..=100.
pub fn percent(offset_y: f64, start_distance: f64, threshold: f64) -> f64 {
    if offset_y < start_distance {
        return 0.0;
    }

    let span = (offset_y - start_distance).min(threshold);
    span * 100.0 / threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resist_matches_reference_values() {
        assert!((resist(100.0, 800.0, 0.6) - 52.5).abs() < 1e-9);
        assert!((resist(200.0, 800.0, 0.6) - 90.0).abs() < 1e-9);
        assert_eq!(resist(0.0, 800.0, 0.6), 0.0);
    }

    #[test]
    fn test_resist_never_amplifies_within_viewport() {
        let viewport = 800.0;
        for resistance in [0.1, 0.6, 1.0] {
            for step in 0..=800 {
                let distance = step as f64;
                let offset = resist(distance, viewport, resistance);
                assert!(offset >= 0.0, "{} -> {}", distance, offset);
                assert!(offset <= distance, "{} -> {}", distance, offset);
            }
        }
    }

    #[test]
    fn test_resist_rolls_over_past_viewport() {
        assert_eq!(resist(800.0, 800.0, 0.6), 0.0);
        assert!(resist(1000.0, 800.0, 0.6) < 0.0);
    }

    #[test]
    fn test_percent_zero_before_start() {
        assert_eq!(percent(0.0, 30.0, 50.0), 0.0);
        assert_eq!(percent(29.9, 30.0, 50.0), 0.0);
        assert_eq!(percent(30.0, 30.0, 50.0), 0.0);
    }

    #[test]
    fn test_percent_saturates() {
        assert_eq!(percent(55.0, 30.0, 50.0), 50.0);
        assert_eq!(percent(80.0, 30.0, 50.0), 100.0);
        assert_eq!(percent(500.0, 30.0, 50.0), 100.0);
    }

    #[test]
    fn test_percent_monotonic() {
        let mut last = 0.0;
        for step in 0..=2000 {
            let value = percent(step as f64 * 0.1, 30.0, 50.0);
            assert!(value >= last);
            last = value;
        }
        assert_eq!(last, 100.0);
    }
}
