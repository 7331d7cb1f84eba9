use rust_htslib::bam::record::Cigar;

/// One reference-coordinate cell of a projected read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectedCell {
    Base(u8),
    Deletion,
    Missing,
    SoftClipped,
}

impl ProjectedCell {
    pub fn to_char(self) -> char {
        match self {
            ProjectedCell::Base(base) => base as char,
            ProjectedCell::Deletion => '-',
            ProjectedCell::Missing => 'x',
            ProjectedCell::SoftClipped => 'S',
        }
    }
}

/**
 * A read projected onto the reference window around one repeat.
 *
 * The window always spans `2 * flank + center_len` cells; column `flank`
 * corresponds to the first base of the repeat on the reference. Inserted
 * substrings do not occupy reference columns and are carried on the side,
 * keyed by the column of the base they follow.
 */
#[derive(Clone, Debug)]
pub struct ProjectedRead {
    pub cells: Vec<ProjectedCell>,
    pub insertions: Vec<(usize, Vec<u8>)>,
    pub flank: usize,
    pub center_len: usize,
}

impl ProjectedRead {
    pub fn pre(&self) -> &[ProjectedCell] {
        &self.cells[..self.flank]
    }

    pub fn center(&self) -> &[ProjectedCell] {
        &self.cells[self.flank..self.flank + self.center_len]
    }

    pub fn post(&self) -> &[ProjectedCell] {
        &self.cells[self.flank + self.center_len..]
    }

    /// True when the first and last repeat bases are aligned read bases or
    /// deletions; soft-clipped or absent edges disqualify the read.
    pub fn spans_repeat(&self) -> bool {
        let center = self.center();
        matches!(center[0], ProjectedCell::Base(_) | ProjectedCell::Deletion)
            && matches!(
                center[self.center_len - 1],
                ProjectedCell::Base(_) | ProjectedCell::Deletion
            )
    }

    /// True when the middle of the repeat is covered; drives the depth
    /// counter.
    pub fn center_midpoint_present(&self) -> bool {
        self.cells[self.flank + self.center_len / 2] != ProjectedCell::Missing
    }

    /// Observed repeat length in this read: non-deleted repeat cells plus
    /// every insertion anchored between the last left-flank base and the
    /// final repeat base (those insertions sit inside the repeat tract).
    pub fn observed_allele_length(&self) -> usize {
        let kept = self
            .center()
            .iter()
            .filter(|cell| !matches!(cell, ProjectedCell::Deletion))
            .count();
        let lowest_anchor = self.flank.saturating_sub(1);
        let highest_anchor = self.flank + self.center_len - 1;
        let inserted: usize = self
            .insertions
            .iter()
            .filter(|(column, _)| *column >= lowest_anchor && *column <= highest_anchor)
            .map(|(_, bases)| bases.len())
            .sum();
        kept + inserted
    }
}

pub struct CigarProjector {}

impl CigarProjector {
    /**
     * Project a read's bases into reference coordinates around a repeat.
     *
     * `align_start` and `region_start` are 1-based reference positions; the
     * window covers `region_start - flank` for `2*flank + center_len`
     * columns, padded with `Missing` wherever the read has no bases.
     * Leading soft clips are laid onto the positions immediately before the
     * alignment start. Returns `None` for spliced (`N`) alignments.
     */
    pub fn project(
        cigar: &[Cigar],
        seq: &[u8],
        align_start: i64,
        region_start: i64,
        center_len: usize,
        flank: usize,
    ) -> Option<ProjectedRead> {
        let mut leading_clip = 0i64;
        for op in cigar {
            match op {
                Cigar::SoftClip(n) => leading_clip += *n as i64,
                Cigar::HardClip(_) => {}
                _ => break,
            }
        }

        let window_start = region_start - flank as i64;
        let start_pos = align_start - leading_clip;
        let mut cells: Vec<ProjectedCell> = Vec::with_capacity(seq.len() + 8);
        let mut insertions: Vec<(i64, Vec<u8>)> = Vec::new();
        let mut read_idx = 0usize;
        let mut ref_pos = start_pos;

        for op in cigar {
            match *op {
                Cigar::Match(n) | Cigar::Equal(n) | Cigar::Diff(n) => {
                    for _ in 0..n {
                        let base = seq.get(read_idx).copied().unwrap_or(b'N');
                        cells.push(ProjectedCell::Base(base.to_ascii_uppercase()));
                        read_idx += 1;
                        ref_pos += 1;
                    }
                }
                Cigar::Ins(n) => {
                    let len = n as usize;
                    let end = (read_idx + len).min(seq.len());
                    let inserted = if read_idx < end {
                        seq[read_idx..end].to_ascii_uppercase()
                    } else {
                        Vec::new()
                    };
                    read_idx += len;
                    // anchored to the base just written; an insertion before
                    // any aligned base has nothing to attach to
                    if !cells.is_empty() && !inserted.is_empty() {
                        insertions.push((ref_pos - 1, inserted));
                    }
                }
                Cigar::Del(n) => {
                    for _ in 0..n {
                        cells.push(ProjectedCell::Deletion);
                        ref_pos += 1;
                    }
                }
                Cigar::RefSkip(_) => return None,
                Cigar::SoftClip(n) => {
                    for _ in 0..n {
                        cells.push(ProjectedCell::SoftClipped);
                        read_idx += 1;
                        ref_pos += 1;
                    }
                }
                Cigar::HardClip(_) | Cigar::Pad(_) => {}
            }
        }

        let total = 2 * flank + center_len;
        let mut window = Vec::with_capacity(total);
        for offset in 0..total as i64 {
            let pos = window_start + offset;
            if pos >= start_pos && pos < ref_pos {
                window.push(cells[(pos - start_pos) as usize]);
            } else {
                window.push(ProjectedCell::Missing);
            }
        }

        let insertions = insertions
            .into_iter()
            .filter_map(|(anchor, bases)| {
                let column = anchor - window_start;
                if column >= 0 && column < total as i64 {
                    Some((column as usize, bases))
                } else {
                    None
                }
            })
            .collect();

        Some(ProjectedRead {
            cells: window,
            insertions,
            flank,
            center_len,
        })
    }

    /// Number of read bases as counted by the report: M/I/S/=/X op lengths.
    pub fn read_size(cigar: &[Cigar]) -> usize {
        cigar
            .iter()
            .map(|op| match op {
                Cigar::Match(n)
                | Cigar::Ins(n)
                | Cigar::SoftClip(n)
                | Cigar::Equal(n)
                | Cigar::Diff(n) => *n as usize,
                _ => 0,
            })
            .sum()
    }

    /// Text rendering of a CIGAR, for the read annotation line.
    pub fn cigar_text(cigar: &[Cigar]) -> String {
        let mut text = String::new();
        for op in cigar {
            text.push_str(&op.len().to_string());
            text.push(op.char());
        }
        text
    }
}
