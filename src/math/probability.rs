/// Shannon entropy of a distribution
///
/// Computes `-Σ p·ln(p)` over the strictly positive entries. The input is
/// expected to be normalized; zero entries contribute nothing.
pub fn shannon_entropy(distribution: &[f64]) -> f64 {
    distribution
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.ln())
        .sum()
}

/// Normalize weights in place so they sum to one
///
/// Returns the pre-normalization sum. A zero sum leaves the weights untouched.
pub fn normalize(weights: &mut [f64]) -> f64 {
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        for weight in weights.iter_mut() {
            *weight /= sum;
        }
    }
    sum
}

/// Select an index from a weighted distribution using a uniform sample in `[0, 1)`
///
/// Walks the cumulative sums and returns the first index whose running total
/// exceeds `sample * total`. When floating error leaves nothing selected the last
/// index with positive weight is returned, and `0` when no weight is positive.
pub fn weighted_index(weights: &[f64], sample: f64) -> usize {
    let total: f64 = weights.iter().sum();
    let threshold = sample * total;

    let mut running = 0.0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        running += weight;
        if running > threshold {
            return index;
        }
    }

    weights.iter().rposition(|&weight| weight > 0.0).unwrap_or(0)
}
