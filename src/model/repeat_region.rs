use std::fmt;

use crate::utils::errors::PardaloteError;

/**
 * One tandem-repeat locus from the input region list.
 *
 * Coordinates are 1-based inclusive, exactly as they appear in the file.
 * The annotation column is kept verbatim because the reports echo it.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatRegion {
    pub chromosome: String,
    pub start: usize,
    pub stop: usize,
    pub unit_length: usize,
    pub unit_sequence: String,
    pub purity: f64,
    pub annotation: String,
}

impl RepeatRegion {
    pub const CONTIG_SEPARATOR: char = ':';
    pub const START_STOP_SEPARATOR: char = '-';

    /// Parse a `chr:start-stop\t<unit-length>_.._<purity>_.._<unit-seq>`
    /// region line.
    pub fn from_line(line: &str) -> Result<RepeatRegion, PardaloteError> {
        let (locus, annotation) = line.split_once('\t').ok_or_else(|| {
            PardaloteError::InvalidRegion(format!("missing annotation column in '{}'", line))
        })?;
        let (chromosome, range) = locus.split_once(Self::CONTIG_SEPARATOR).ok_or_else(|| {
            PardaloteError::InvalidRegion(format!("missing '{}' in locus '{}'", Self::CONTIG_SEPARATOR, locus))
        })?;
        let (start_text, stop_text) =
            range.split_once(Self::START_STOP_SEPARATOR).ok_or_else(|| {
                PardaloteError::InvalidRegion(format!("missing range separator in '{}'", locus))
            })?;
        let start: usize = start_text.parse().map_err(|_| {
            PardaloteError::InvalidRegion(format!("unparseable start position in '{}'", locus))
        })?;
        let stop: usize = stop_text.parse().map_err(|_| {
            PardaloteError::InvalidRegion(format!("unparseable stop position in '{}'", locus))
        })?;
        if start == 0 || start > stop {
            return Err(PardaloteError::InvalidRegion(format!(
                "start must satisfy 1 <= start <= stop in '{}'",
                locus
            )));
        }

        let fields: Vec<&str> = annotation.split('_').collect();
        if fields.len() < 2 {
            return Err(PardaloteError::InvalidRegion(format!(
                "improper annotation column '{}' for {}",
                annotation, locus
            )));
        }
        let unit_length: usize = fields[0].parse().map_err(|_| {
            PardaloteError::InvalidRegion(format!(
                "unparseable unit length '{}' for {}",
                fields[0], locus
            ))
        })?;
        let purity: f64 = fields
            .get(4)
            .and_then(|field| field.parse().ok())
            .unwrap_or(0.0);
        let unit_sequence = fields.last().unwrap().to_string();

        Ok(RepeatRegion {
            chromosome: chromosome.to_string(),
            start,
            stop,
            unit_length,
            unit_sequence,
            purity,
            annotation: annotation.to_string(),
        })
    }

    /// Number of reference bases spanned by the repeat.
    pub fn length(&self) -> usize {
        self.stop - self.start + 1
    }

    pub fn locus_string(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.chromosome,
            Self::CONTIG_SEPARATOR,
            self.start,
            Self::START_STOP_SEPARATOR,
            self.stop
        )
    }
}

impl fmt::Display for RepeatRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locus_string())
    }
}
