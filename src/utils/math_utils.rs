use rayon::prelude::*;
use statrs::function::gamma::ln_gamma;

// Covers every count the genotyper sees in practice; anything larger falls
// back to the gamma function.
const LOG_FACTORIAL_CACHE_SIZE: usize = 16_384;

lazy_static! {
    static ref LOG_FACTORIAL_CACHE: Vec<f64> = (0..LOG_FACTORIAL_CACHE_SIZE)
        .into_par_iter()
        .map(|n| ln_gamma(n as f64 + 1.0))
        .collect::<Vec<f64>>();
}

pub struct MathUtils {}

impl MathUtils {
    /// ln(n!), served from the process-wide cache for small n.
    pub fn ln_factorial(n: usize) -> f64 {
        if n < LOG_FACTORIAL_CACHE_SIZE {
            LOG_FACTORIAL_CACHE[n]
        } else {
            ln_gamma(n as f64 + 1.0)
        }
    }

    /// ln of the multinomial coefficient (Σ counts)! / Π counts_i!
    pub fn ln_multinomial_coefficient(counts: &[usize]) -> f64 {
        let total: usize = counts.iter().sum();
        counts
            .iter()
            .fold(Self::ln_factorial(total), |acc, c| acc - Self::ln_factorial(*c))
    }

    /// ln of the Dirichlet normalizer B(v) = Π Γ(v_k) / Γ(Σ v_k) for
    /// integer cells. Every cell must be >= 1.
    pub fn ln_dirichlet_normalizer(cells: &[usize]) -> f64 {
        let total: usize = cells.iter().sum();
        cells
            .iter()
            .map(|c| Self::ln_factorial(c - 1))
            .sum::<f64>()
            - Self::ln_factorial(total - 1)
    }

    /// Phred-scale the complement of a probability: -10·log10(1 - p).
    pub fn phred_of_complement(p: f64) -> f64 {
        -10.0 * (1.0 - p).log10()
    }

    /// Truncate (not round) a value to the given number of decimal places,
    /// matching the report formatting of the quality fields.
    pub fn truncate_to_places(value: f64, places: i32) -> f64 {
        let scale = 10f64.powi(places);
        (value * scale).trunc() / scale
    }

    /// Render a score with at most four decimals and no trailing zeros.
    pub fn format_score(value: f64) -> String {
        let mut formatted = format!("{:.4}", value);
        if formatted.contains('.') {
            while formatted.ends_with('0') {
                formatted.pop();
            }
            if formatted.ends_with('.') {
                formatted.pop();
            }
        }
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorial_cache_agrees_with_gamma() {
        for n in [0usize, 1, 2, 7, 100, LOG_FACTORIAL_CACHE_SIZE - 1] {
            assert!((MathUtils::ln_factorial(n) - ln_gamma(n as f64 + 1.0)).abs() < 1e-9);
        }
        // past the cache
        let n = LOG_FACTORIAL_CACHE_SIZE + 10;
        assert!((MathUtils::ln_factorial(n) - ln_gamma(n as f64 + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn format_score_trims_zeros() {
        assert_eq!(MathUtils::format_score(50.0), "50");
        assert_eq!(MathUtils::format_score(0.0), "0");
        assert_eq!(MathUtils::format_score(12.3456789), "12.3457");
        assert_eq!(MathUtils::format_score(3.02), "3.02");
    }
}
