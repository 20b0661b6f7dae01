//! Vector similarity utilities.
//!
//! Pure-Rust implementations of:
//! - Cosine similarity
//! - Exhaustive nearest-neighbour lookup

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector has zero magnitude.
///
/// # Panics
///
/// If the vectors differ in length. Embeddings from one model always share a
/// dimensionality, so a mismatch is a wiring error, not a runtime condition.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "cosine similarity of vectors with different dimensions"
    );

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Find the candidate most similar to `query`.
///
/// Returns the candidate's index and its similarity, or `None` if there are no
/// scorable candidates. This is a full O(n) scan; ties go to the earliest
/// candidate. Candidates whose similarity is not finite (NaN components) are
/// skipped.
pub fn most_similar<'a, I>(query: &[f64], candidates: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in candidates.into_iter().enumerate() {
        let score = cosine_similarity(query, candidate);
        if !score.is_finite() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 1e-12);
    }

    #[test]
    fn cosine_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn cosine_zero_vector_is_exactly_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn cosine_empty_vectors() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    #[should_panic(expected = "different dimensions")]
    fn cosine_mismatched_lengths_panics() {
        cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn cosine_known_value() {
        // [1,1] · [1,0] = 1, |[1,1]| = sqrt(2), |[1,0]| = 1
        // similarity = 1 / sqrt(2) ≈ 0.7071
        let sim = cosine_similarity(&[1.0, 1.0], &[1.0, 0.0]);
        assert!((sim - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn cosine_is_symmetric_and_bounded() {
        let vectors = [
            vec![0.3, -1.2, 4.0],
            vec![-7.0, 0.0, 0.5],
            vec![1e-9, 2e-9, -3e-9],
            vec![1e9, -2e9, 3e9],
            vec![0.0, 0.0, 1.0],
        ];
        for a in &vectors {
            for b in &vectors {
                let ab = cosine_similarity(a, b);
                let ba = cosine_similarity(b, a);
                assert_eq!(ab, ba);
                assert!((-1.0..=1.0).contains(&ab), "{ab} out of range");
            }
        }
    }

    #[test]
    fn most_similar_picks_highest_score() {
        let candidates = [vec![0.0, 1.0], vec![1.0, 0.0], vec![0.5, 0.5]];
        let (index, score) =
            most_similar(&[1.0, 0.0], candidates.iter().map(Vec::as_slice)).unwrap();
        assert_eq!(index, 1);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn most_similar_prefers_earliest_on_tie() {
        let candidates = [vec![2.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]];
        let (index, _) = most_similar(&[1.0, 0.0], candidates.iter().map(Vec::as_slice)).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn most_similar_skips_nan_scores() {
        let candidates = [vec![f64::NAN, 0.0], vec![1.0, 0.0], vec![0.0, f64::NAN]];
        let (index, score) =
            most_similar(&[1.0, 0.0], candidates.iter().map(Vec::as_slice)).unwrap();
        assert_eq!(index, 1);
        assert!((score - 1.0).abs() < 1e-12);

        let only_nan = [vec![f64::NAN, 1.0]];
        assert!(most_similar(&[1.0, 0.0], only_nan.iter().map(Vec::as_slice)).is_none());
    }

    #[test]
    fn most_similar_of_nothing_is_none() {
        let candidates: [Vec<f64>; 0] = [];
        assert!(most_similar(&[1.0], candidates.iter().map(Vec::as_slice)).is_none());
    }
}
