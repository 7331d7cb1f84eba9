pub mod flank;
pub mod projection;

/// Everything retained from one read that passed projection and filtering.
#[derive(Clone, Debug)]
pub struct ReadObservation {
    pub allele_length: usize,
    pub avg_base_quality: f64,
    pub min_flank: usize,
    pub reverse: bool,
    pub map_quality: u8,
}
