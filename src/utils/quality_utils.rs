pub struct QualityUtils {}

impl QualityUtils {
    /// Probability that a base call is correct, from its raw phred score
    /// (rust-htslib quality bytes carry no +33 offset).
    pub fn prob_correct(qual: u8) -> f64 {
        1.0 - 10f64.powf(-(qual as f64) / 10.0)
    }

    /// Mean probability-correct across a read's quality string.
    pub fn average_prob_correct(quals: &[u8]) -> f64 {
        if quals.is_empty() {
            return 0.0;
        }
        quals.iter().map(|q| Self::prob_correct(*q)).sum::<f64>() / quals.len() as f64
    }

    /// Bucket an average probability-correct onto the 0-4 axis of the
    /// error profile: clamp(-30·log10(p), 0, 4).
    pub fn quality_bucket(avg_prob_correct: f64) -> usize {
        let q = -30.0 * avg_prob_correct.log10();
        if q.is_nan() || q < 0.0 {
            0
        } else if q >= 4.0 {
            4
        } else {
            q as usize
        }
    }
}
