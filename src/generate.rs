//! Random polynomial generation.
//!
//! Fills the logical coefficient range of a buffer with non-zero values
//! drawn from a bounded symmetric range. Padding slots past the logical
//! degree are never touched, so a freshly allocated buffer keeps its
//! zeroed tail and stays safe for full-lane vector loads.

use rand::Rng;

/// Fills indices `0..=degree` of `buf` with non-zero coefficients drawn
/// uniformly from `[-max_abs, max_abs]`.
///
/// A non-positive `max_abs` falls back to the full representable range,
/// mirroring the degree of freedom the benchmark driver exposes.
///
/// # Panics
/// Panics if `buf` holds fewer than `degree + 1` elements.
pub fn random_fill<R: Rng + ?Sized>(buf: &mut [i32], degree: usize, max_abs: i32, rng: &mut R) {
    assert!(
        buf.len() > degree,
        "buffer of {} elements cannot hold degree {}",
        buf.len(),
        degree
    );

    let bound = if max_abs < 1 { i32::MAX } else { max_abs };

    for coeff in buf.iter_mut().take(degree + 1) {
        // Coefficients are non-zero by contract: a zero leading term
        // would silently lower the polynomial's degree.
        *coeff = loop {
            let candidate = rng.gen_range(-bound..=bound);
            if candidate != 0 {
                break candidate;
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CoeffBuffer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_fill_is_non_zero_and_bounded() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let degree = 100;
        let mut buf = CoeffBuffer::for_input(degree);
        random_fill(&mut buf, degree, 5, &mut rng);

        for &c in buf.iter().take(degree + 1) {
            assert_ne!(c, 0);
            assert!((-5..=5).contains(&c));
        }
    }

    #[test]
    fn test_fill_leaves_padding_zeroed() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let degree = 10;
        let mut buf = CoeffBuffer::for_input(degree);
        random_fill(&mut buf, degree, 3, &mut rng);

        assert!(buf.iter().skip(degree + 1).all(|&c| c == 0));
    }

    #[test]
    fn test_non_positive_bound_uses_full_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let degree = 1000;
        let mut buf = CoeffBuffer::for_input(degree);
        random_fill(&mut buf, degree, 0, &mut rng);

        assert!(buf.iter().take(degree + 1).all(|&c| c != 0));
        // With the full i32 range, 1001 draws bounded to [-3, 3] would be
        // astronomically unlikely.
        assert!(buf.iter().take(degree + 1).any(|&c| c.unsigned_abs() > 3));
    }

    #[test]
    fn test_unit_bound_yields_plus_minus_one() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let degree = 50;
        let mut buf = CoeffBuffer::for_input(degree);
        random_fill(&mut buf, degree, 1, &mut rng);

        assert!(buf.iter().take(degree + 1).all(|&c| c == 1 || c == -1));
    }
}
