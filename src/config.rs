use clap::ArgMatches;

use crate::genotype::genotyping_engine::Ploidy;

pub const DEFAULT_FLANK_WINDOW: usize = 20;
pub const DEFAULT_CONS_FLANK: usize = 3;

/// Read filters and output toggles, parsed once from the command line and
/// shared read-only across the workers.
#[derive(Clone, Debug)]
pub struct FilterSettings {
    /// Flank bases projected and printed either side of the repeat.
    pub flank_window: usize,
    pub cons_left_flank: usize,
    pub cons_right_flank: usize,
    pub map_quality_min: u8,
    /// 0 disables the bound.
    pub read_length_min: usize,
    pub read_length_max: usize,
    pub properly_paired: bool,
    /// Reject reads whose XT tag contains 'R'.
    pub multi: bool,
    pub mode: Ploidy,
    pub emit_all: bool,
    pub make_repeatseq_file: bool,
    pub make_calls_file: bool,
}

impl FilterSettings {
    pub fn from_matches(m: &ArgMatches) -> FilterSettings {
        FilterSettings {
            flank_window: *m.get_one::<usize>("flank-window").unwrap(),
            cons_left_flank: *m.get_one::<usize>("cons-left-flank").unwrap(),
            cons_right_flank: *m.get_one::<usize>("cons-right-flank").unwrap(),
            map_quality_min: *m.get_one::<u8>("min-mapq").unwrap(),
            read_length_min: *m.get_one::<usize>("min-read-length").unwrap(),
            read_length_max: *m.get_one::<usize>("max-read-length").unwrap(),
            properly_paired: m.get_flag("properly-paired"),
            multi: m.get_flag("multi"),
            mode: if m.get_flag("haploid") {
                Ploidy::Haploid
            } else {
                Ploidy::Diploid
            },
            emit_all: m.get_flag("emit-all"),
            make_repeatseq_file: m.get_flag("repeatseq"),
            make_calls_file: m.get_flag("calls"),
        }
    }

    /// Fingerprint of the non-default options, appended to the output
    /// basenames so runs with different filters never collide.
    pub fn param_string(&self) -> String {
        let mut tokens = String::new();
        if self.flank_window != DEFAULT_FLANK_WINDOW {
            tokens.push_str(&format!(".L{}", self.flank_window));
        }
        if self.cons_left_flank != DEFAULT_CONS_FLANK || self.cons_right_flank != DEFAULT_CONS_FLANK
        {
            tokens.push_str(&format!(".F{}:{}", self.cons_left_flank, self.cons_right_flank));
        }
        if self.map_quality_min > 0 {
            tokens.push_str(&format!(".M{}", self.map_quality_min));
        }
        if self.read_length_min > 0 || self.read_length_max > 0 {
            tokens.push_str(&format!(".R{}:{}", self.read_length_min, self.read_length_max));
        }
        if self.properly_paired {
            tokens.push_str(".pp");
        }
        if self.multi {
            tokens.push_str(".multi");
        }
        if self.mode == Ploidy::Haploid {
            tokens.push_str(".haploid");
        }
        if self.emit_all {
            tokens.push_str(".emitall");
        }
        tokens
    }
}
