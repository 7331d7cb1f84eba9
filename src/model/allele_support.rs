use crate::reads::ReadObservation;

/// Aggregated evidence for one observed allele length within a region.
#[derive(Clone, Debug)]
pub struct AlleleSupport {
    pub length: usize,
    pub occurrences: usize,
    /// Mean probability-correct across supporting reads once finalized.
    pub avg_base_quality: f64,
    pub avg_min_flank: f64,
    pub reverse: usize,
}

impl AlleleSupport {
    fn from_observation(obs: &ReadObservation) -> AlleleSupport {
        AlleleSupport {
            length: obs.allele_length,
            occurrences: 1,
            avg_base_quality: obs.avg_base_quality,
            avg_min_flank: obs.min_flank as f64,
            reverse: obs.reverse as usize,
        }
    }

    fn absorb(&mut self, obs: &ReadObservation) {
        self.occurrences += 1;
        self.avg_base_quality += obs.avg_base_quality;
        self.avg_min_flank += obs.min_flank as f64;
        if obs.reverse {
            self.reverse += 1;
        }
    }
}

/// Merge per-read observations by allele length, finalize the running
/// averages, and sort by occurrences descending (longer allele first on
/// ties).
pub fn aggregate(observations: &[ReadObservation]) -> Vec<AlleleSupport> {
    let mut supports: Vec<AlleleSupport> = Vec::new();
    for obs in observations {
        match supports.iter_mut().find(|s| s.length == obs.allele_length) {
            Some(support) => support.absorb(obs),
            None => supports.push(AlleleSupport::from_observation(obs)),
        }
    }
    for support in supports.iter_mut() {
        support.avg_base_quality /= support.occurrences as f64;
        support.avg_min_flank /= support.occurrences as f64;
    }
    supports.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then(b.length.cmp(&a.length))
    });
    supports
}

/// Fraction of reads beyond the first that agree with the majority allele:
/// (majority - 1) / (total - 1). `None` when fewer than two reads.
pub fn concordance(supports: &[AlleleSupport]) -> Option<f64> {
    if supports.is_empty() {
        return None;
    }
    let total: usize = supports.iter().map(|s| s.occurrences).sum();
    if total <= 1 {
        return None;
    }
    Some((supports[0].occurrences as f64 - 1.0) / (total as f64 - 1.0))
}
