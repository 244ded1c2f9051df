//! Strength versus toughness

/// Minimum D6 result needed to wound
///
/// | Strength vs toughness | Needed |
/// |-----------------------|--------|
/// | S >= 2T               | 2+     |
/// | S > T                 | 3+     |
/// | S == T                | 4+     |
/// | 2S <= T               | 6+     |
/// | otherwise             | 5+     |
pub fn wound_threshold(strength: u32, toughness: u32) -> u32 {
    if strength >= toughness.saturating_mul(2) {
        2
    } else if strength > toughness {
        3
    } else if strength == toughness {
        4
    } else if strength.saturating_mul(2) <= toughness {
        6
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_five_bands() {
        assert_eq!(wound_threshold(8, 4), 2);
        assert_eq!(wound_threshold(5, 4), 3);
        assert_eq!(wound_threshold(4, 4), 4);
        assert_eq!(wound_threshold(3, 4), 5);
        assert_eq!(wound_threshold(2, 4), 6);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(wound_threshold(7, 4), 3);
        assert_eq!(wound_threshold(3, 5), 5);
        assert_eq!(wound_threshold(2, 5), 6);
        assert_eq!(wound_threshold(10, 5), 2);
    }

    #[test]
    fn test_zero_toughness_always_two_plus() {
        assert_eq!(wound_threshold(0, 0), 2);
        assert_eq!(wound_threshold(4, 0), 2);
    }

    #[test]
    fn test_monotonic_in_strength() {
        for toughness in 1..=12 {
            let mut previous = wound_threshold(1, toughness);
            for strength in 2..=30 {
                let needed = wound_threshold(strength, toughness);
                assert!(
                    needed <= previous,
                    "S{} T{} needs {}+ but S{} needed {}+",
                    strength,
                    toughness,
                    needed,
                    strength - 1,
                    previous
                );
                previous = needed;
            }
        }
    }
}
