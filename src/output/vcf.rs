use std::collections::BTreeMap;

use itertools::Itertools;

use crate::utils::math_utils::MathUtils;

pub const QUAL_CAP: f64 = 50.0;
pub const PASS_THRESHOLD: f64 = 0.8;

/// Region metadata carried into the INFO column.
#[derive(Clone, Debug)]
pub struct VcfInfo {
    pub unit: String,
    pub depth: usize,
    pub ref_length: usize,
}

pub fn header() -> String {
    let mut header = String::new();
    header.push_str("##fileformat=VCFv4.1\n");
    header.push_str("##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n");
    header.push_str("##FORMAT=<ID=GL,Number=G,Type=Float,Description=\"Genotype likelihood\">\n");
    header.push_str("##INFO=<ID=AL,Number=A,Type=Integer,Description=\"Allele Length Offset(s)\">\n");
    header.push_str("##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">\n");
    header.push_str("##INFO=<ID=RU,Number=1,Type=String,Description=\"Repeat Unit\">\n");
    header.push_str("##INFO=<ID=RL,Number=1,Type=Integer,Description=\"Reference Length of Repeat\">\n");
    header.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n");
    header
}

/**
 * Synthesize one VCF record from the per-read candidate alignments of a
 * region. Candidates are strings over `{A,C,G,T,-}`; deletion markers are
 * stripped, one representative per length class is kept (most frequent,
 * ties to the lexicographically smallest), and the reference-length
 * candidate becomes the REF column. Returns `None` when every candidate
 * matches the reference and records are not forced.
 */
pub fn synthesize_record(
    candidates: &[String],
    reference_aligned: &str,
    chromosome: &str,
    start: usize,
    preceding_base: u8,
    info: &VcfInfo,
    likelihoods: &BTreeMap<(usize, usize), f64>,
    emit_all: bool,
) -> Option<String> {
    let reference: String = reference_aligned.chars().filter(|c| *c != '-').collect();
    let stripped: Vec<String> = candidates
        .iter()
        .map(|candidate| candidate.chars().filter(|c| *c != '-').collect())
        .collect();

    if !emit_all && stripped.iter().all(|candidate| *candidate == reference) {
        return None;
    }

    // one representative per length class
    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for candidate in &stripped {
        *occurrences.entry(candidate.as_str()).or_insert(0) += 1;
    }
    let mut by_length: BTreeMap<usize, (&str, usize)> = BTreeMap::new();
    for (sequence, count) in occurrences {
        let entry = by_length.entry(sequence.len()).or_insert((sequence, count));
        if count > entry.1 {
            *entry = (sequence, count);
        }
    }
    let alleles: Vec<String> = by_length
        .into_values()
        .map(|(sequence, _)| sequence.to_string())
        .collect();

    // most likely genotype; first maximum wins on exact ties
    let mut most_likely = (0usize, 0usize);
    let mut best_likelihood = f64::NEG_INFINITY;
    for (pair, value) in likelihoods {
        if *value > best_likelihood {
            best_likelihood = *value;
            most_likely = *pair;
        }
    }
    if most_likely.0 == 0 {
        most_likely.0 = reference.len();
    }
    if most_likely.1 == 0 {
        most_likely.1 = reference.len();
    }
    if !alleles.is_empty()
        && likelihoods.len() == 1
        && likelihoods.contains_key(&(alleles[0].len(), alleles[0].len()))
    {
        if most_likely.0 == 1 {
            most_likely.0 = alleles[0].len();
        }
        if most_likely.1 == 1 {
            most_likely.1 = alleles[0].len();
        }
    }

    // VCF convention: include the base before the repeat in every allele
    let reference_row = format!("{}{}", preceding_base as char, reference);
    let allele_rows: Vec<String> = alleles
        .iter()
        .map(|allele| format!("{}{}", preceding_base as char, allele))
        .collect();
    let alt_rows: Vec<&String> = allele_rows
        .iter()
        .filter(|row| row.len() != reference_row.len())
        .collect();

    let alt_column = if alt_rows.is_empty() {
        ".".to_string()
    } else {
        alt_rows.iter().join(",")
    };

    let qual = best_likelihood.max(0.0).min(QUAL_CAP);
    let filter = if best_likelihood > PASS_THRESHOLD {
        "PASS"
    } else {
        "."
    };

    let al_first = most_likely.0 as isize - info.ref_length as isize;
    let al_second = most_likely.1 as isize - info.ref_length as isize;

    // genotype indices over the REF row then the ALT rows
    let mut genotype = String::from("0/0");
    let row_lengths: Vec<usize> = std::iter::once(reference_row.len() - 1)
        .chain(alt_rows.iter().map(|row| row.len() - 1))
        .collect();
    'search: for (i, len_i) in row_lengths.iter().enumerate() {
        for (j, len_j) in row_lengths.iter().enumerate() {
            if *len_i == most_likely.0 && *len_j == most_likely.1 {
                genotype = format!("{}/{}", i, j);
                break 'search;
            }
        }
    }

    let genotype_likelihoods = if alt_rows.is_empty() {
        "50".to_string()
    } else {
        let mut values = Vec::new();
        for (i, len_i) in row_lengths.iter().enumerate() {
            for len_j in row_lengths.iter().take(i + 1) {
                let key = (*len_i.min(len_j), *len_i.max(len_j));
                let value = likelihoods.get(&key).copied().unwrap_or(0.0);
                values.push(MathUtils::format_score(value.max(0.0).min(QUAL_CAP)));
            }
        }
        values.join(",")
    };

    Some(format!(
        "{}\t{}\t.\t{}\t{}\t{}\t{}\tAL={},{};RU={};DP={};RL={}\tGT:GL\t{}:{}\n",
        chromosome,
        start - 1,
        reference_row,
        alt_column,
        MathUtils::format_score(qual),
        filter,
        al_first,
        al_second,
        info.unit,
        info.depth,
        info.ref_length,
        genotype,
        genotype_likelihoods,
    ))
}
