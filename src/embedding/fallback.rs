//! Degraded-mode query vectors

use rand::Rng;

pub const FALLBACK_MIN: f32 = -0.5;
pub const FALLBACK_MAX: f32 = 0.5;

/// Uniform random vector in `[-0.5, 0.5)`.
///
/// Used when the embedding service is down: retrieval still returns cards,
/// just not ranked by meaning.
pub fn random_query_vector(dimension: usize) -> Vec<f32> {
    let mut rng = rand::rng();
    (0..dimension)
        .map(|_| rng.random_range(FALLBACK_MIN..FALLBACK_MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_and_range() {
        let vector = random_query_vector(1536);
        assert_eq!(vector.len(), 1536);
        assert!(vector.iter().all(|v| (FALLBACK_MIN..FALLBACK_MAX).contains(v)));
    }

    #[test]
    fn test_zero_dimension() {
        assert!(random_query_vector(0).is_empty());
    }
}
