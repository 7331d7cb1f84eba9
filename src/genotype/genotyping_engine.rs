use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::genotype::error_profile::{ErrorCounts, ErrorProfile};
use crate::model::allele_support::{self, AlleleSupport};
use crate::utils::math_utils::MathUtils;
use crate::utils::quality_utils::QualityUtils;

/// Ploidy mode of the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ploidy {
    Haploid,
    Diploid,
}

/// Outcome of genotyping one region.
#[derive(Clone, Debug)]
pub enum GenotypeCall {
    /// Degenerate evidence. A confidence is carried when hypotheses were
    /// scored but the winner was not reportable.
    NoCall { confidence: Option<f64> },
    /// One or two allele lengths, ascending, with the phred confidence of
    /// the winning hypothesis and the full normalized hypothesis map keyed
    /// `(shorter, longer)`.
    Call {
        alleles: Vec<usize>,
        confidence: f64,
        likelihoods: BTreeMap<(usize, usize), f64>,
    },
}

/**
 * Ranks diploid (or haploid) repeat-length hypotheses with a
 * Dirichlet-multinomial model over a small outcome table: reads supporting
 * each hypothesized allele, and everything else as error. The error
 * pseudo-counts come from the calibrated profile, keyed by unit size,
 * reference length and read quality.
 */
pub struct GenotypingEngine {
    profile: ErrorProfile,
    mode: Ploidy,
}

impl GenotypingEngine {
    pub const MAX_REF_LENGTH: usize = 70;
    pub const MAX_DISTINCT_ALLELES: usize = 9;
    pub const MAX_ALLELE_COVERAGE: usize = 10_000;
    pub const MIN_REPORTABLE_CONFIDENCE: f64 = 3.02;
    pub const CONFIDENCE_CAP: f64 = 50.0;
    pub const CONCORDANCE_SHORT_CIRCUIT: f64 = 0.99;

    pub fn new(mode: Ploidy) -> GenotypingEngine {
        GenotypingEngine {
            profile: ErrorProfile::default(),
            mode,
        }
    }

    /**
     * Genotype one region from its aggregated allele evidence (sorted by
     * occurrences descending, as the aggregator produces it).
     *
     * Degenerate evidence short-circuits before any scoring: no reads or
     * absurd coverage, too many distinct lengths, or near-total agreement
     * (where the majority allele is reported at the confidence cap).
     */
    pub fn genotype_region(
        &self,
        supports: &[AlleleSupport],
        ref_length: usize,
        unit_size: usize,
    ) -> GenotypeCall {
        if supports.is_empty() || supports[0].occurrences >= Self::MAX_ALLELE_COVERAGE {
            return GenotypeCall::NoCall { confidence: None };
        }
        if supports.len() > Self::MAX_DISTINCT_ALLELES {
            return GenotypeCall::NoCall { confidence: None };
        }

        if let Some(concordance) = allele_support::concordance(supports) {
            if concordance >= Self::CONCORDANCE_SHORT_CIRCUIT {
                let majority = supports[0].length;
                let mut likelihoods = BTreeMap::new();
                likelihoods.insert((majority, majority), Self::CONFIDENCE_CAP);
                return GenotypeCall::Call {
                    alleles: vec![majority],
                    confidence: Self::CONFIDENCE_CAP,
                    likelihoods,
                };
            }
        }

        let total_reads: usize = supports.iter().map(|s| s.occurrences).sum();
        let (alleles, mut confidence, likelihoods) =
            self.score_hypotheses(supports, ref_length, unit_size);
        if total_reads <= 1 {
            confidence = 0.0;
        }
        if confidence <= Self::MIN_REPORTABLE_CONFIDENCE {
            return GenotypeCall::NoCall {
                confidence: Some(confidence),
            };
        }
        GenotypeCall::Call {
            alleles,
            confidence,
            likelihoods,
        }
    }

    /// Enumerate homozygous and (in diploid mode) heterozygous hypotheses,
    /// score each, and normalize the posteriors to sum to one.
    fn score_hypotheses(
        &self,
        supports: &[AlleleSupport],
        ref_length: usize,
        unit_size: usize,
    ) -> (Vec<usize>, f64, BTreeMap<(usize, usize), f64>) {
        let ref_length = ref_length.min(Self::MAX_REF_LENGTH);
        let unit_size = unit_size.clamp(1, 5);

        // hypotheses are named shorter-allele-first
        let mut alleles: Vec<&AlleleSupport> = supports.iter().collect();
        alleles.sort_by_key(|s| s.length);

        let total: usize = alleles.iter().map(|s| s.occurrences).sum();
        let counts: Vec<ErrorCounts> = alleles
            .iter()
            .map(|s| {
                let bucket = QualityUtils::quality_bucket(s.avg_base_quality);
                self.profile.counts(unit_size, ref_length, bucket)
            })
            .collect();

        let mut hypotheses: Vec<((usize, usize), f64)> = Vec::new();
        for (i, first) in alleles.iter().enumerate() {
            let err_first = counts[i];
            let others = total - first.occurrences;
            let numerator = [
                1 + err_first.correct as usize + first.occurrences,
                1 + err_first.errors as usize + others,
            ];
            let denominator = [
                1 + err_first.correct as usize,
                1 + err_first.errors as usize,
            ];
            let ln_weight = MathUtils::ln_multinomial_coefficient(&[first.occurrences, others])
                + MathUtils::ln_dirichlet_normalizer(&numerator)
                - MathUtils::ln_dirichlet_normalizer(&denominator);
            hypotheses.push(((first.length, first.length), ln_weight.exp()));

            if self.mode == Ploidy::Haploid {
                continue;
            }
            for (j, second) in alleles.iter().enumerate().skip(i + 1) {
                let err_second = counts[j];
                let others = total - first.occurrences - second.occurrences;
                let numerator = [
                    1 + err_first.correct as usize + first.occurrences,
                    1 + err_second.correct as usize + second.occurrences,
                    1 + err_first.errors as usize + err_second.errors as usize + others,
                ];
                let denominator = [
                    1 + err_first.correct as usize,
                    1 + err_second.correct as usize,
                    1 + err_first.errors as usize + err_second.errors as usize,
                ];
                let ln_weight = MathUtils::ln_multinomial_coefficient(&[
                    first.occurrences,
                    second.occurrences,
                    others,
                ]) + MathUtils::ln_dirichlet_normalizer(&numerator)
                    - MathUtils::ln_dirichlet_normalizer(&denominator);
                hypotheses.push(((first.length, second.length), ln_weight.exp()));
            }
        }

        let total_weight: f64 = hypotheses.iter().map(|(_, weight)| weight).sum();
        let mut likelihoods = BTreeMap::new();
        for ((shorter, longer), weight) in hypotheses.iter_mut() {
            *weight /= total_weight;
            likelihoods.insert((*shorter, *longer), MathUtils::phred_of_complement(*weight));
        }

        let ((shorter, longer), best_posterior) = hypotheses
            .iter()
            .max_by_key(|(_, posterior)| OrderedFloat(*posterior))
            .copied()
            .expect("at least one hypothesis is always enumerated");
        let called = if shorter == longer {
            vec![shorter]
        } else {
            vec![shorter, longer]
        };

        let mut confidence = MathUtils::phred_of_complement(best_posterior);
        if confidence.is_nan() {
            confidence = 0.0;
        }
        (called, confidence.min(Self::CONFIDENCE_CAP), likelihoods)
    }
}
