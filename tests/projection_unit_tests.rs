use rust_htslib::bam::record::Cigar;

use pardalote::reads::projection::{CigarProjector, ProjectedCell, ProjectedRead};

const REGION_START: i64 = 101;
const CENTER_LEN: usize = 10;
const FLANK: usize = 20;

fn project(cigar: &[Cigar], seq: &[u8], align_start: i64) -> Option<ProjectedRead> {
    CigarProjector::project(cigar, seq, align_start, REGION_START, CENTER_LEN, FLANK)
}

fn patterned_seq(len: usize) -> Vec<u8> {
    (0..len).map(|i| b"ACGT"[i % 4]).collect()
}

#[test]
fn perfect_read_aligns_window() {
    // covers the whole 50-column window: positions 81..=130
    let seq = patterned_seq(50);
    let read = project(&[Cigar::Match(50)], &seq, 81).unwrap();

    assert_eq!(read.cells.len(), 2 * FLANK + CENTER_LEN);
    // column FLANK carries the base aligned to the first repeat position
    assert_eq!(read.cells[FLANK], ProjectedCell::Base(seq[20]));
    assert!(read.spans_repeat());
    assert!(read.center_midpoint_present());
    assert_eq!(read.observed_allele_length(), CENTER_LEN);
    assert!(read.insertions.is_empty());
}

#[test]
fn read_starting_at_repeat_is_padded_left() {
    let seq = patterned_seq(10);
    let read = project(&[Cigar::Match(10)], &seq, REGION_START).unwrap();

    assert!(read
        .pre()
        .iter()
        .all(|cell| *cell == ProjectedCell::Missing));
    assert!(read.spans_repeat());
    assert_eq!(read.observed_allele_length(), CENTER_LEN);
    assert!(read
        .post()
        .iter()
        .all(|cell| *cell == ProjectedCell::Missing));
}

#[test]
fn insertion_inside_repeat_extends_allele() {
    // 10M to 96..105, 3 inserted bases anchored at 105, 10M to 106..115
    let seq = patterned_seq(23);
    let read = project(
        &[Cigar::Match(10), Cigar::Ins(3), Cigar::Match(10)],
        &seq,
        96,
    )
    .unwrap();

    assert_eq!(read.insertions.len(), 1);
    let (column, bases) = &read.insertions[0];
    assert_eq!(*column, 24); // reference position 105
    assert_eq!(bases.len(), 3);
    assert_eq!(read.observed_allele_length(), CENTER_LEN + 3);
}

#[test]
fn insertion_at_last_flank_base_extends_allele() {
    // anchor lands on position 100, the base immediately left of the repeat
    let seq = patterned_seq(22);
    let read = project(
        &[Cigar::Match(10), Cigar::Ins(2), Cigar::Match(10)],
        &seq,
        91,
    )
    .unwrap();

    assert_eq!(read.insertions[0].0, FLANK - 1);
    assert_eq!(read.observed_allele_length(), CENTER_LEN + 2);
}

#[test]
fn insertion_past_repeat_does_not_count() {
    // 20M covers 96..115, anchor at 115 sits 5 bases right of the repeat
    let seq = patterned_seq(27);
    let read = project(
        &[Cigar::Match(20), Cigar::Ins(2), Cigar::Match(5)],
        &seq,
        96,
    )
    .unwrap();

    assert_eq!(read.insertions.len(), 1);
    assert_eq!(read.observed_allele_length(), CENTER_LEN);
}

#[test]
fn deletion_inside_repeat_shortens_allele() {
    // 10M to 96..105, 4D over 106..109, 10M to 110..119
    let seq = patterned_seq(20);
    let read = project(
        &[Cigar::Match(10), Cigar::Del(4), Cigar::Match(10)],
        &seq,
        96,
    )
    .unwrap();

    assert!(read.spans_repeat());
    assert_eq!(
        read.center()
            .iter()
            .filter(|cell| **cell == ProjectedCell::Deletion)
            .count(),
        4
    );
    assert_eq!(read.observed_allele_length(), CENTER_LEN - 4);
}

#[test]
fn spliced_alignment_is_rejected() {
    let seq = patterned_seq(100);
    assert!(project(
        &[Cigar::Match(50), Cigar::RefSkip(1000), Cigar::Match(50)],
        &seq,
        60
    )
    .is_none());
}

#[test]
fn leading_soft_clip_shifts_start() {
    // clip occupies 96..100, matches occupy 101..110
    let seq = patterned_seq(15);
    let read = project(&[Cigar::SoftClip(5), Cigar::Match(10)], &seq, REGION_START).unwrap();

    assert_eq!(read.cells[FLANK - 1], ProjectedCell::SoftClipped);
    assert!(matches!(read.cells[FLANK], ProjectedCell::Base(_)));
    assert!(read.spans_repeat());
    assert_eq!(read.observed_allele_length(), CENTER_LEN);
}

#[test]
fn soft_clipped_repeat_edge_does_not_span() {
    // read ends in a clip halfway through the repeat
    let seq = patterned_seq(25);
    let read = project(&[Cigar::Match(20), Cigar::SoftClip(5)], &seq, 81).unwrap();
    assert_eq!(read.cells[FLANK], ProjectedCell::SoftClipped);
    assert!(!read.spans_repeat());
}

#[test]
fn read_size_counts_query_consuming_ops() {
    let cigar = [
        Cigar::Match(10),
        Cigar::Ins(3),
        Cigar::SoftClip(5),
        Cigar::Del(2),
        Cigar::Match(10),
    ];
    assert_eq!(CigarProjector::read_size(&cigar), 28);
    assert_eq!(CigarProjector::cigar_text(&cigar), "10M3I5S2D10M");
}
