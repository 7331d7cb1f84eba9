use pardalote::reads::flank::FlankValidator;
use pardalote::reads::projection::ProjectedCell;

fn cells(bases: &[u8]) -> Vec<ProjectedCell> {
    bases.iter().map(|b| ProjectedCell::Base(*b)).collect()
}

#[test]
fn full_match_counts_every_base() {
    let pre = cells(b"ACGTA");
    assert_eq!(FlankValidator::left_matches(&pre, b"ACGTA"), 5);
    let post = cells(b"GGTCA");
    assert_eq!(FlankValidator::right_matches(&post, b"GGTCA"), 5);
}

#[test]
fn innermost_mismatch_scores_zero() {
    // left flank is scored from its last (repeat-adjacent) base outward
    let pre = cells(b"ACGTG");
    assert_eq!(FlankValidator::left_matches(&pre, b"ACGTA"), 0);
    let post = cells(b"TGTCA");
    assert_eq!(FlankValidator::right_matches(&post, b"GGTCA"), 0);
}

#[test]
fn streak_stops_at_first_disagreement() {
    // matches at the two innermost positions only
    let pre = cells(b"AGGTA");
    assert_eq!(FlankValidator::left_matches(&pre, b"ACGTA"), 2);
    let post = cells(b"GGACA");
    assert_eq!(FlankValidator::right_matches(&post, b"GGTCA"), 2);
}

#[test]
fn missing_and_clipped_cells_do_not_match() {
    let mut pre = cells(b"ACGTA");
    pre[4] = ProjectedCell::Missing;
    assert_eq!(FlankValidator::left_matches(&pre, b"ACGTA"), 0);
    pre[4] = ProjectedCell::SoftClipped;
    assert_eq!(FlankValidator::left_matches(&pre, b"ACGTA"), 0);
    pre[4] = ProjectedCell::Deletion;
    assert_eq!(FlankValidator::left_matches(&pre, b"ACGTA"), 0);

    // an outer missing cell still allows an inner streak
    let mut pre = cells(b"ACGTA");
    pre[0] = ProjectedCell::Missing;
    assert_eq!(FlankValidator::left_matches(&pre, b"ACGTA"), 4);
}

#[test]
fn clipped_reference_flank_limits_the_streak() {
    // near a chromosome edge the reference flank is shorter than the window
    let pre = cells(b"ACGTA");
    assert_eq!(FlankValidator::left_matches(&pre, b"GTA"), 3);
    let post = cells(b"GGTCA");
    assert_eq!(FlankValidator::right_matches(&post, b"GGT"), 3);
}
