use std::collections::BTreeMap;

use itertools::Itertools;
use rust_htslib::bam::record::{Aux, Cigar, Record};
use rust_htslib::bam::{self, Read};

use crate::config::FilterSettings;
use crate::genotype::genotyping_engine::{GenotypeCall, GenotypingEngine};
use crate::model::allele_support::{self, AlleleSupport};
use crate::model::repeat_region::RepeatRegion;
use crate::output::vcf::{self, VcfInfo};
use crate::reads::flank::FlankValidator;
use crate::reads::projection::{CigarProjector, ProjectedCell, ProjectedRead};
use crate::reads::ReadObservation;
use crate::reference::reference_reader::{ReferenceReader, ReferenceWindow};
use crate::utils::errors::PardaloteError;
use crate::utils::math_utils::MathUtils;
use crate::utils::quality_utils::QualityUtils;

/// Output fragments accumulated by one worker, concatenated in worker
/// order once every region is done.
#[derive(Default)]
pub struct RegionBuffers {
    pub repeatseq: String,
    pub calls: String,
    pub vcf: String,
}

/// One read that survived projection and filtering, with everything needed
/// to print it and to genotype the region.
struct RetainedRead {
    projection: ProjectedRead,
    insertions: BTreeMap<usize, Vec<u8>>,
    annotation: String,
}

/**
 * Drives one region end to end: fetch the reference window, iterate the
 * overlapping alignments, project and filter each read, aggregate the
 * allele evidence, genotype, and assemble the three report fragments.
 */
pub struct RegionProcessor<'a> {
    settings: &'a FilterSettings,
    engine: GenotypingEngine,
}

impl<'a> RegionProcessor<'a> {
    pub fn new(settings: &'a FilterSettings) -> RegionProcessor<'a> {
        RegionProcessor {
            settings,
            engine: GenotypingEngine::new(settings.mode),
        }
    }

    pub fn process_region(
        &self,
        region: &RepeatRegion,
        reference: &mut ReferenceReader,
        bam: &mut bam::IndexedReader,
        buffers: &mut RegionBuffers,
    ) -> Result<(), PardaloteError> {
        let flank = self.settings.flank_window;
        let center_len = region.length();
        let window = reference.fetch_window(&region.chromosome, region.start, region.stop, flank)?;

        let tid = bam
            .header()
            .tid(region.chromosome.as_bytes())
            .ok_or_else(|| {
                PardaloteError::BamOperation(format!(
                    "Chromosome {} absent from the BAM header",
                    region.chromosome
                ))
            })?;
        bam.fetch((tid, (region.start - 1) as i64, (region.stop - 1) as i64))
            .map_err(|e| {
                PardaloteError::BamOperation(format!("Cannot fetch reads for {}: {}", region, e))
            })?;

        let mut depth = 0usize;
        let mut num_stars = 0usize;
        let mut retained: Vec<RetainedRead> = Vec::new();
        let mut observations: Vec<ReadObservation> = Vec::new();

        let mut record = Record::new();
        while let Some(result) = bam.read(&mut record) {
            if let Err(e) = result {
                warn!("Skipping unreadable alignment in {}: {}", region, e);
                continue;
            }
            let cigar_ops: Vec<Cigar> = record.cigar().iter().copied().collect();
            if cigar_ops.is_empty() {
                num_stars += 1;
                continue;
            }

            let seq = record.seq().as_bytes();
            let avg_base_quality = QualityUtils::average_prob_correct(record.qual());
            let projection = match CigarProjector::project(
                &cigar_ops,
                &seq,
                record.pos() + 1,
                region.start as i64,
                center_len,
                flank,
            ) {
                Some(projection) => projection,
                None => {
                    debug!(
                        "Skipping spliced alignment {} in {}",
                        String::from_utf8_lossy(record.qname()),
                        region
                    );
                    continue;
                }
            };

            if projection.center_midpoint_present() {
                depth += 1;
            }
            if !projection.spans_repeat() {
                continue;
            }

            let read_size = CigarProjector::read_size(&cigar_ops);
            if self.settings.read_length_min > 0 && read_size < self.settings.read_length_min {
                continue;
            }
            if self.settings.read_length_max > 0 && read_size > self.settings.read_length_max {
                continue;
            }

            let left = FlankValidator::left_matches(projection.pre(), &window.left_flank);
            let right = FlankValidator::right_matches(projection.post(), &window.right_flank);
            if left < self.settings.cons_left_flank || right < self.settings.cons_right_flank {
                continue;
            }

            if record.mapq() < self.settings.map_quality_min {
                continue;
            }
            if self.settings.multi && Self::has_multi_hit_tag(&record) {
                continue;
            }
            if self.settings.properly_paired && !record.is_proper_pair() {
                continue;
            }

            let observed_length = projection.observed_allele_length();
            let annotation =
                Self::read_annotation(&record, &cigar_ops, read_size, left, right, avg_base_quality);
            observations.push(ReadObservation {
                allele_length: observed_length,
                avg_base_quality,
                min_flank: left.min(right),
                reverse: record.is_reverse(),
                map_quality: record.mapq(),
            });
            retained.push(RetainedRead {
                insertions: Self::grouped_insertions(&projection),
                projection,
                annotation,
            });
        }

        let num_reads = retained.len();
        let supports = allele_support::aggregate(&observations);
        let concordance = allele_support::concordance(&supports);
        let call = self
            .engine
            .genotype_region(&supports, center_len, region.unit_length);

        buffers.repeatseq.push_str(&Self::region_header(
            region,
            &supports,
            concordance,
            depth,
            num_reads,
            num_stars,
            &observations,
            &call,
        ));
        if num_reads > 0 {
            buffers
                .repeatseq
                .push_str(&Self::render_block(&window, &retained, flank, center_len));
        }

        buffers.calls.push_str(&Self::calls_line(region, &call));

        self.append_vcf_record(region, &window, &retained, concordance, &call, buffers);

        Ok(())
    }

    fn has_multi_hit_tag(record: &Record) -> bool {
        match record.aux(b"XT") {
            Ok(Aux::Char(value)) => value == b'R',
            Ok(Aux::String(value)) => value.contains('R'),
            _ => false,
        }
    }

    fn flag_string(record: &Record) -> String {
        let mut flags = String::new();
        if record.is_paired() {
            flags.push('p');
        }
        if record.is_proper_pair() {
            flags.push('P');
        }
        if record.is_unmapped() {
            flags.push('u');
        }
        if record.is_mate_unmapped() {
            flags.push('U');
        }
        if record.is_reverse() {
            flags.push('r');
        }
        if record.is_mate_reverse() {
            flags.push('R');
        }
        if record.is_first_in_template() {
            flags.push('1');
        }
        if record.is_last_in_template() {
            flags.push('2');
        }
        if record.is_secondary() {
            flags.push('s');
        }
        if record.is_quality_check_failed() {
            flags.push('f');
        }
        if record.is_duplicate() {
            flags.push('d');
        }
        flags
    }

    /// The per-read information printed after its three sequence segments.
    fn read_annotation(
        record: &Record,
        cigar_ops: &[Cigar],
        read_size: usize,
        left_matches: usize,
        right_matches: usize,
        avg_base_quality: f64,
    ) -> String {
        format!(
            " {} {} {} {} B:{} M:{} F:{} C:{} ID:{}\n",
            record.pos() + 1,
            read_size,
            left_matches,
            right_matches,
            MathUtils::truncate_to_places(avg_base_quality, 4),
            record.mapq(),
            Self::flag_string(record),
            CigarProjector::cigar_text(cigar_ops),
            String::from_utf8_lossy(record.qname()),
        )
    }

    fn grouped_insertions(projection: &ProjectedRead) -> BTreeMap<usize, Vec<u8>> {
        let mut grouped: BTreeMap<usize, Vec<u8>> = BTreeMap::new();
        for (column, bases) in &projection.insertions {
            grouped.entry(*column).or_default().extend_from_slice(bases);
        }
        grouped
    }

    /// The `~region ...` summary line opening each region block.
    fn region_header(
        region: &RepeatRegion,
        supports: &[AlleleSupport],
        concordance: Option<f64>,
        depth: usize,
        num_reads: usize,
        num_stars: usize,
        observations: &[ReadObservation],
        call: &GenotypeCall,
    ) -> String {
        let mut header = format!(
            "~{} {} REF:{} A:",
            region.locus_string(),
            region.annotation,
            region.length()
        );
        if supports.is_empty() || (supports.len() == 1 && num_reads == 1) {
            header.push_str("NA ");
        } else if supports.len() == 1 {
            header.push_str(&format!("{} ", supports[0].length));
        } else {
            for support in supports {
                header.push_str(&format!("{}[{}] ", support.length, support.occurrences));
            }
        }
        match concordance {
            Some(value) => header.push_str(&format!("C:{}", MathUtils::format_score(value))),
            None => header.push_str("C:NA"),
        }
        header.push_str(&format!(" D:{} R:{} S:{}", depth, num_reads, num_stars));
        if observations.is_empty() {
            header.push_str(" M:NA");
        } else {
            let avg_mapq = observations
                .iter()
                .map(|obs| obs.map_quality as f64)
                .sum::<f64>()
                / observations.len() as f64;
            header.push_str(&format!(" M:{}", MathUtils::truncate_to_places(avg_mapq, 2)));
        }
        match call {
            GenotypeCall::NoCall { confidence: None } => header.push_str(" GT:NA L:NA\n"),
            GenotypeCall::NoCall {
                confidence: Some(confidence),
            } => header.push_str(&format!(
                " GT:NA L:{}\n",
                MathUtils::format_score(*confidence)
            )),
            GenotypeCall::Call {
                alleles,
                confidence,
                ..
            } => {
                let genotype = alleles.iter().map(|length| length.to_string()).join("h");
                header.push_str(&format!(
                    " GT:{} L:{}\n",
                    genotype,
                    MathUtils::format_score(*confidence)
                ));
            }
        }
        header
    }

    fn calls_line(region: &RepeatRegion, call: &GenotypeCall) -> String {
        let mut line = format!("{}\t{}\t", region.locus_string(), region.annotation);
        match call {
            GenotypeCall::NoCall { .. } => line.push_str("NA\tNA\n"),
            GenotypeCall::Call {
                alleles,
                confidence,
                ..
            } => {
                let genotype = alleles.iter().map(|length| length.to_string()).join("h");
                line.push_str(&format!(
                    "{}\t{}\n",
                    genotype,
                    MathUtils::format_score(*confidence)
                ));
            }
        }
        line
    }

    /**
     * Render the reference row and every retained read as aligned
     * `pre aligned post` segments. Columns that carry an insertion in any
     * read are expanded to the widest inserted string, with `-` padding in
     * the rows that have nothing inserted there, so all rows stay
     * column-compatible.
     */
    fn render_block(
        window: &ReferenceWindow,
        retained: &[RetainedRead],
        flank: usize,
        center_len: usize,
    ) -> String {
        let total = 2 * flank + center_len;
        let mut widths: BTreeMap<usize, usize> = BTreeMap::new();
        for read in retained {
            for (column, bases) in &read.insertions {
                let width = widths.entry(*column).or_insert(0);
                *width = (*width).max(bases.len());
            }
        }

        // reference row: clipped flanks are simply absent, not padded
        let mut reference_cells = Vec::with_capacity(total);
        for _ in window.left_flank.len()..flank {
            reference_cells.push(ProjectedCell::Missing);
        }
        for base in window
            .left_flank
            .iter()
            .chain(window.center.iter())
            .chain(window.right_flank.iter())
        {
            reference_cells.push(ProjectedCell::Base(*base));
        }
        while reference_cells.len() < total {
            reference_cells.push(ProjectedCell::Missing);
        }

        let empty = BTreeMap::new();
        let mut block = Self::render_row(&reference_cells, &empty, &widths, flank, center_len, true);
        block.push('\n');
        for read in retained {
            block.push_str(&Self::render_row(
                &read.projection.cells,
                &read.insertions,
                &widths,
                flank,
                center_len,
                false,
            ));
            block.push_str(&read.annotation);
        }
        block
    }

    fn render_row(
        cells: &[ProjectedCell],
        insertions: &BTreeMap<usize, Vec<u8>>,
        widths: &BTreeMap<usize, usize>,
        flank: usize,
        center_len: usize,
        trim_missing_edges: bool,
    ) -> String {
        let mut segments = [String::new(), String::new(), String::new()];
        for (column, cell) in cells.iter().enumerate() {
            let segment = if column < flank {
                0
            } else if column < flank + center_len {
                1
            } else {
                2
            };
            if !(trim_missing_edges && *cell == ProjectedCell::Missing) {
                segments[segment].push(cell.to_char());
            }
            if let Some(width) = widths.get(&column) {
                // insertions anchored at the last flank base or inside the
                // repeat belong to the repeat segment
                let insertion_segment = if column + 1 < flank {
                    0
                } else if column < flank + center_len {
                    1
                } else {
                    2
                };
                let mut rendered = match insertions.get(&column) {
                    Some(bases) => String::from_utf8_lossy(bases).into_owned(),
                    None => String::new(),
                };
                while rendered.len() < *width {
                    rendered.push('-');
                }
                segments[insertion_segment].push_str(&rendered);
            }
        }
        format!("{} {} {}", segments[0], segments[1], segments[2])
    }

    /// The repeat segment of one read with insertions spliced back in, as
    /// handed to the VCF synthesizer.
    fn aligned_candidate(read: &RetainedRead) -> String {
        let flank = read.projection.flank;
        let mut candidate = String::new();
        if flank > 0 {
            if let Some(bases) = read.insertions.get(&(flank - 1)) {
                candidate.push_str(&String::from_utf8_lossy(bases));
            }
        }
        for (offset, cell) in read.projection.center().iter().enumerate() {
            candidate.push(cell.to_char());
            if let Some(bases) = read.insertions.get(&(flank + offset)) {
                candidate.push_str(&String::from_utf8_lossy(bases));
            }
        }
        candidate
    }

    fn append_vcf_record(
        &self,
        region: &RepeatRegion,
        window: &ReferenceWindow,
        retained: &[RetainedRead],
        concordance: Option<f64>,
        call: &GenotypeCall,
        buffers: &mut RegionBuffers,
    ) {
        let (alleles, likelihoods) = match call {
            GenotypeCall::Call {
                alleles,
                likelihoods,
                ..
            } => (alleles, likelihoods),
            GenotypeCall::NoCall { .. } => return,
        };
        if retained.is_empty() {
            return;
        }

        let center_len = region.length();
        let short_circuited = concordance
            .map_or(false, |c| c >= GenotypingEngine::CONCORDANCE_SHORT_CIRCUIT);
        let should_emit = if short_circuited {
            // near-unanimous regions skip hypothesis scoring; a record only
            // makes sense when forced, and only when truly unanimous
            self.settings.emit_all && concordance == Some(1.0)
        } else {
            self.settings.emit_all || alleles.len() > 1 || alleles[0] != center_len
        };
        if !should_emit {
            return;
        }

        let candidates: Vec<String> = retained.iter().map(Self::aligned_candidate).collect();
        let reference_aligned = String::from_utf8_lossy(&window.center).into_owned();
        let preceding_base = window.left_flank.last().copied().unwrap_or(b'N');
        let info = VcfInfo {
            unit: region.unit_sequence.clone(),
            depth: retained.len(),
            ref_length: center_len,
        };
        if let Some(record_line) = vcf::synthesize_record(
            &candidates,
            &reference_aligned,
            &region.chromosome,
            region.start,
            preceding_base,
            &info,
            likelihoods,
            self.settings.emit_all,
        ) {
            buffers.vcf.push_str(&record_line);
        }
    }
}
