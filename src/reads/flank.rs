use crate::reads::projection::ProjectedCell;

/// Scores how well a projected read matches the reference immediately
/// outside the repeat. Counting starts at the repeat edge and moves
/// outward; the first disagreement (including missing or soft-clipped
/// cells) ends the streak.
pub struct FlankValidator {}

impl FlankValidator {
    /// Consecutive matches over the left flank, innermost base first.
    pub fn left_matches(pre: &[ProjectedCell], left_reference: &[u8]) -> usize {
        let mut matches = 0;
        for (cell, ref_base) in pre.iter().rev().zip(left_reference.iter().rev()) {
            if Self::cell_matches(*cell, *ref_base) {
                matches += 1;
            } else {
                break;
            }
        }
        matches
    }

    /// Consecutive matches over the right flank, innermost base first.
    pub fn right_matches(post: &[ProjectedCell], right_reference: &[u8]) -> usize {
        let mut matches = 0;
        for (cell, ref_base) in post.iter().zip(right_reference.iter()) {
            if Self::cell_matches(*cell, *ref_base) {
                matches += 1;
            } else {
                break;
            }
        }
        matches
    }

    fn cell_matches(cell: ProjectedCell, ref_base: u8) -> bool {
        match cell {
            ProjectedCell::Base(base) => base == ref_base.to_ascii_uppercase(),
            _ => false,
        }
    }
}
