use rand::Rng;

use crate::{RandomizerError, Result};

/// Picks an index with probability proportional to its weight, consuming one draw.
pub fn select_random<R: Rng + ?Sized>(weights: &[usize], rng: &mut R) -> Result<usize> {
    let sum: usize = weights.iter().sum();
    let mut r = rng.gen::<f64>() * sum as f64;
    for (i, &weight) in weights.iter().enumerate() {
        let weight = weight as f64;
        if r < weight {
            return Ok(i);
        }
        r -= weight;
    }
    Err(RandomizerError::Assertion(format!(
        "no category left to draw from: {weights:?}"
    )))
}

/// Fisher-Yates from the back, one draw per position including the first.
pub fn shuffle_simply<T, R: Rng + ?Sized>(list: &mut [T], rng: &mut R) {
    for i in (0..list.len()).rev() {
        let j = (rng.gen::<f64>() * (i + 1) as f64) as usize;
        list.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    #[test]
    fn never_selects_empty_weight() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let i = select_random(&[3, 0, 5, 0], &mut rng).unwrap();
            assert!(i == 0 || i == 2);
        }
    }

    #[test]
    fn all_zero_weights_fail() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(select_random(&[0, 0], &mut rng).is_err());
    }

    #[test]
    fn shuffle_is_permutation_and_reproducible() {
        let mut a: Vec<u32> = (0..50).collect();
        let mut b = a.clone();
        shuffle_simply(&mut a, &mut ChaCha20Rng::seed_from_u64(7));
        shuffle_simply(&mut b, &mut ChaCha20Rng::seed_from_u64(7));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_consumes_one_draw_per_element() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut reference = ChaCha20Rng::seed_from_u64(3);
        shuffle_simply(&mut [1, 2, 3, 4][..], &mut rng);
        for _ in 0..4 {
            reference.gen::<f64>();
        }
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }
}
