use clap::{crate_version, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("pardalote")
        .version(crate_version!())
        .about("Genotype short tandem repeats from a coordinate-sorted, indexed BAM")
        .arg(
            Arg::new("bam")
                .short('b')
                .long("bam")
                .required(true)
                .help("Indexed BAM file of aligned reads"),
        )
        .arg(
            Arg::new("reference")
                .short('r')
                .long("reference")
                .required(true)
                .help("Reference FASTA (a .fai index is created if missing)"),
        )
        .arg(
            Arg::new("regions")
                .long("regions")
                .required(true)
                .help("Tandem repeat regions, one 'chr:start-stop<TAB>annotation' per line"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .default_value("0")
                .value_parser(clap::value_parser!(usize))
                .help("Worker threads (0 = one per available core)"),
        )
        .arg(
            Arg::new("flank-window")
                .short('L')
                .long("flank-window")
                .default_value("20")
                .value_parser(clap::value_parser!(usize))
                .help("Reference bases projected and printed either side of the repeat"),
        )
        .arg(
            Arg::new("cons-left-flank")
                .long("cons-left-flank")
                .default_value("3")
                .value_parser(clap::value_parser!(usize))
                .help("Minimum consecutive matching bases left of the repeat"),
        )
        .arg(
            Arg::new("cons-right-flank")
                .long("cons-right-flank")
                .default_value("3")
                .value_parser(clap::value_parser!(usize))
                .help("Minimum consecutive matching bases right of the repeat"),
        )
        .arg(
            Arg::new("min-mapq")
                .long("min-mapq")
                .default_value("0")
                .value_parser(clap::value_parser!(u8))
                .help("Drop reads mapped below this quality"),
        )
        .arg(
            Arg::new("min-read-length")
                .long("min-read-length")
                .default_value("0")
                .value_parser(clap::value_parser!(usize))
                .help("Drop reads shorter than this many bases (0 disables)"),
        )
        .arg(
            Arg::new("max-read-length")
                .long("max-read-length")
                .default_value("0")
                .value_parser(clap::value_parser!(usize))
                .help("Drop reads longer than this many bases (0 disables)"),
        )
        .arg(
            Arg::new("properly-paired")
                .long("properly-paired")
                .action(ArgAction::SetTrue)
                .help("Only use reads flagged as properly paired"),
        )
        .arg(
            Arg::new("multi")
                .long("multi")
                .action(ArgAction::SetTrue)
                .help("Reject multi-mapping reads (XT tag containing 'R')"),
        )
        .arg(
            Arg::new("haploid")
                .long("haploid")
                .action(ArgAction::SetTrue)
                .help("Call a single allele per locus"),
        )
        .arg(
            Arg::new("emit-all")
                .long("emit-all")
                .action(ArgAction::SetTrue)
                .help("Write VCF records for non-variant loci too"),
        )
        .arg(
            Arg::new("repeatseq")
                .long("repeatseq")
                .action(ArgAction::SetTrue)
                .help("Also write the per-region .repeatseq report"),
        )
        .arg(
            Arg::new("calls")
                .long("calls")
                .action(ArgAction::SetTrue)
                .help("Also write the tab-separated .calls file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Print extra debugging information"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Unless there is an error, do not print log messages"),
        )
}
