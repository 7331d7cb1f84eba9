use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use bio::io::fasta::IndexedReader;

use crate::external_command_checker;
use crate::utils::errors::PardaloteError;

/// Reference bases around one repeat: up to `flank` bases either side,
/// clipped at the chromosome bounds, all uppercased for matching.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceWindow {
    pub left_flank: Vec<u8>,
    pub center: Vec<u8>,
    pub right_flank: Vec<u8>,
}

/**
 * Random-access reference fetcher over an indexed FASTA. Each worker owns
 * its own reader; the underlying file handle is stateful.
 */
pub struct ReferenceReader {
    indexed_reader: IndexedReader<File>,
    sequence_lengths: HashMap<String, u64>,
}

impl ReferenceReader {
    /// Open an indexed reference, generating the `.fai` with samtools when
    /// it is missing.
    pub fn open(reference_path: &str) -> Result<ReferenceReader, PardaloteError> {
        let fai_path = format!("{}.fai", reference_path);
        if !Path::new(&fai_path).exists() {
            info!(
                "Reference index {} not found, creating with samtools faidx ..",
                &fai_path
            );
            Self::generate_faidx(reference_path)?;
        }
        let indexed_reader = IndexedReader::from_file(&reference_path).map_err(|e| {
            PardaloteError::ReferenceOperation(format!(
                "Unable to open reference {}: {}",
                reference_path, e
            ))
        })?;
        let sequence_lengths = indexed_reader
            .index
            .sequences()
            .into_iter()
            .map(|sequence| (sequence.name, sequence.len))
            .collect::<HashMap<String, u64>>();
        Ok(ReferenceReader {
            indexed_reader,
            sequence_lengths,
        })
    }

    fn generate_faidx(reference_path: &str) -> Result<(), PardaloteError> {
        external_command_checker::check_for_samtools();
        let cmd_string = format!("set -e -o pipefail; samtools faidx {}", reference_path);
        let output = Command::new("bash")
            .arg("-c")
            .arg(&cmd_string)
            .stdout(Stdio::piped())
            .output()
            .map_err(|e| {
                PardaloteError::ReferenceOperation(format!("Unable to execute samtools: {}", e))
            })?;
        if !output.status.success() {
            return Err(PardaloteError::ReferenceOperation(format!(
                "samtools faidx failed for {}",
                reference_path
            )));
        }
        Ok(())
    }

    pub fn sequence_length(&self, chromosome: &str) -> Option<u64> {
        self.sequence_lengths.get(chromosome).copied()
    }

    /// Fetch the repeat plus up to `flank` bases either side. `start` and
    /// `stop` are 1-based inclusive.
    pub fn fetch_window(
        &mut self,
        chromosome: &str,
        start: usize,
        stop: usize,
        flank: usize,
    ) -> Result<ReferenceWindow, PardaloteError> {
        let chromosome_length = self.sequence_length(chromosome).ok_or_else(|| {
            PardaloteError::ReferenceOperation(format!(
                "Chromosome {} absent from the reference index",
                chromosome
            ))
        })? as usize;
        if stop > chromosome_length {
            return Err(PardaloteError::InvalidRegion(format!(
                "{}:{}-{} extends past the end of the chromosome ({} bases)",
                chromosome, start, stop, chromosome_length
            )));
        }

        let left_start = start.saturating_sub(flank + 1);
        let left_flank = self.fetch(chromosome, left_start as u64, (start - 1) as u64)?;
        let center = self.fetch(chromosome, (start - 1) as u64, stop as u64)?;
        let right_stop = (stop + flank).min(chromosome_length);
        let right_flank = self.fetch(chromosome, stop as u64, right_stop as u64)?;

        Ok(ReferenceWindow {
            left_flank,
            center,
            right_flank,
        })
    }

    fn fetch(&mut self, chromosome: &str, start: u64, stop: u64) -> Result<Vec<u8>, PardaloteError> {
        let mut sequence = Vec::with_capacity((stop - start) as usize);
        self.indexed_reader
            .fetch(chromosome, start, stop)
            .map_err(|e| {
                PardaloteError::ReferenceOperation(format!(
                    "Cannot fetch {}:{}-{}: {}",
                    chromosome, start, stop, e
                ))
            })?;
        self.indexed_reader.read(&mut sequence).map_err(|e| {
            PardaloteError::ReferenceOperation(format!(
                "Cannot read sequence {}:{}-{}: {}",
                chromosome, start, stop, e
            ))
        })?;
        sequence.make_ascii_uppercase();
        Ok(sequence)
    }
}
