use std::collections::BTreeMap;

use pardalote::output::vcf::{self, VcfInfo};

fn likelihood_map(entries: &[((usize, usize), f64)]) -> BTreeMap<(usize, usize), f64> {
    entries.iter().copied().collect()
}

#[test]
fn header_is_vcf41_with_sample_column() {
    let header = vcf::header();
    assert!(header.starts_with("##fileformat=VCFv4.1\n"));
    assert!(header.contains("##INFO=<ID=AL,Number=A,Type=Integer"));
    assert!(header.contains("##FORMAT=<ID=GL,Number=G,Type=Float"));
    assert!(header.ends_with("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n"));
}

#[test]
fn heterozygous_insertion_record() {
    let mut candidates = vec![String::from("ACACACACACAC"); 10];
    candidates.extend(vec![String::from("ACACACACACACAC"); 10]);
    let likelihoods = likelihood_map(&[
        ((12, 12), 2.0),
        ((12, 14), 45.0),
        ((14, 14), 1.0),
    ]);
    let info = VcfInfo {
        unit: "AC".to_string(),
        depth: 20,
        ref_length: 12,
    };

    let record = vcf::synthesize_record(
        &candidates,
        "ACACACACACAC",
        "chr1",
        100,
        b'T',
        &info,
        &likelihoods,
        false,
    )
    .unwrap();

    assert_eq!(
        record,
        "chr1\t99\t.\tTACACACACACAC\tTACACACACACACAC\t45\tPASS\tAL=0,2;RU=AC;DP=20;RL=12\tGT:GL\t0/1:2,45,1\n"
    );
}

#[test]
fn reference_only_region_is_silent_without_emit_all() {
    let candidates = vec![String::from("AAAAAAAAAA"); 12];
    let likelihoods = likelihood_map(&[((10, 10), 50.0)]);
    let info = VcfInfo {
        unit: "A".to_string(),
        depth: 12,
        ref_length: 10,
    };

    assert!(vcf::synthesize_record(
        &candidates,
        "AAAAAAAAAA",
        "chr2",
        500,
        b'G',
        &info,
        &likelihoods,
        false,
    )
    .is_none());
}

#[test]
fn emit_all_reports_reference_genotype() {
    let candidates = vec![String::from("AAAAAAAAAA"); 12];
    let likelihoods = likelihood_map(&[((10, 10), 50.0)]);
    let info = VcfInfo {
        unit: "A".to_string(),
        depth: 12,
        ref_length: 10,
    };

    let record = vcf::synthesize_record(
        &candidates,
        "AAAAAAAAAA",
        "chr2",
        500,
        b'G',
        &info,
        &likelihoods,
        true,
    )
    .unwrap();

    assert_eq!(
        record,
        "chr2\t499\t.\tGAAAAAAAAAA\t.\t50\tPASS\tAL=0,0;RU=A;DP=12;RL=10\tGT:GL\t0/0:50\n"
    );
}

#[test]
fn equal_length_candidates_deduplicate_deterministically() {
    // two sequences of the same length tie on count; the lexicographically
    // smaller one must win
    let candidates = vec![
        String::from("AAAT"),
        String::from("AAAA"),
        String::from("AAAT"),
        String::from("AAAA"),
    ];
    let likelihoods = likelihood_map(&[((4, 4), 10.0)]);
    let info = VcfInfo {
        unit: "A".to_string(),
        depth: 4,
        ref_length: 3,
    };

    let record = vcf::synthesize_record(
        &candidates,
        "GGG",
        "chr3",
        50,
        b'T',
        &info,
        &likelihoods,
        false,
    )
    .unwrap();

    let alt = record.split('\t').nth(4).unwrap();
    assert_eq!(alt, "TAAAA");
}

#[test]
fn deletion_markers_are_stripped_before_alleles_form() {
    let candidates = vec![String::from("AC--ACAC"); 6];
    let likelihoods = likelihood_map(&[((6, 6), 40.0), ((6, 8), 9.0), ((8, 8), 1.0)]);
    let info = VcfInfo {
        unit: "AC".to_string(),
        depth: 6,
        ref_length: 8,
    };

    let record = vcf::synthesize_record(
        &candidates,
        "ACACACAC",
        "chr4",
        200,
        b'T',
        &info,
        &likelihoods,
        false,
    )
    .unwrap();

    let fields: Vec<&str> = record.trim_end().split('\t').collect();
    assert_eq!(fields[3], "TACACACAC");
    assert_eq!(fields[4], "TACACAC");
    // AL reflects the called six-base allele against the eight-base reference
    assert!(fields[7].starts_with("AL=-2,-2;"));
    assert_eq!(fields[9], "1/1:1,9,40");
}

#[test]
fn genotype_likelihoods_stay_inside_the_envelope() {
    let mut candidates = vec![String::from("ACACAC"); 4];
    candidates.extend(vec![String::from("ACACACAC"); 4]);
    let likelihoods = likelihood_map(&[
        ((6, 6), 80.0),
        ((6, 8), -4.0),
        ((8, 8), 12.0),
    ]);
    let info = VcfInfo {
        unit: "AC".to_string(),
        depth: 8,
        ref_length: 6,
    };

    let record = vcf::synthesize_record(
        &candidates,
        "ACACAC",
        "chr5",
        300,
        b'A',
        &info,
        &likelihoods,
        false,
    )
    .unwrap();

    let fields: Vec<&str> = record.trim_end().split('\t').collect();
    // QUAL is the best likelihood clamped to the cap
    assert_eq!(fields[5], "50");
    let sample = fields[9].split(':').nth(1).unwrap();
    assert_eq!(sample, "50,0,12");
}
