use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process;

#[macro_use]
extern crate log;

use clap::crate_version;
use env_logger::Builder;
use log::LevelFilter;
use rust_htslib::bam;

use pardalote::cli::build_cli;
use pardalote::config::FilterSettings;
use pardalote::model::repeat_region::RepeatRegion;
use pardalote::output::vcf;
use pardalote::processing::worker_pool;
use pardalote::reference::reference_reader::ReferenceReader;

fn main() {
    let matches = build_cli().get_matches();
    set_log_level(&matches, true);

    let bam_file = matches.get_one::<String>("bam").unwrap().clone();
    let reference_file = matches.get_one::<String>("reference").unwrap().clone();
    let region_file = matches.get_one::<String>("regions").unwrap().clone();
    let settings = FilterSettings::from_matches(&matches);

    // fail fast on unusable inputs before any worker starts
    for path in [&bam_file, &reference_file, &region_file] {
        if !Path::new(path).exists() {
            error!("Input file {} does not exist", path);
            process::exit(1);
        }
    }
    let bam_index = format!("{}.bai", bam_file);
    if !Path::new(&bam_index).exists() {
        error!(
            "BAM index {} not found; the BAM must be coordinate sorted and indexed",
            bam_index
        );
        process::exit(1);
    }
    if let Err(e) = bam::IndexedReader::from_path(&bam_file) {
        error!("Unable to open BAM file {}: {}", bam_file, e);
        process::exit(1);
    }
    // this probe also builds the .fai when it is missing
    if let Err(e) = ReferenceReader::open(&reference_file) {
        error!("{}", e);
        process::exit(1);
    }

    let regions = read_regions(&region_file);
    if regions.is_empty() {
        warn!("No usable regions found in {}", region_file);
    }

    let threads = match *matches.get_one::<usize>("threads").unwrap() {
        0 => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        n => n,
    };
    info!(
        "Genotyping {} regions from {} with {} threads",
        regions.len(),
        bam_file,
        threads
    );

    let outputs = worker_pool::process_regions(
        &regions,
        &settings,
        &bam_file,
        &reference_file,
        threads,
    );

    // outputs land in the working directory, named from the BAM basename
    let basename = output_basename(&bam_file, &settings);
    let mut vcf_content = vcf::header();
    for buffers in &outputs {
        vcf_content.push_str(&buffers.vcf);
    }
    write_output(&format!("{}.vcf", basename), &vcf_content);
    if settings.make_repeatseq_file {
        let content: String = outputs.iter().map(|b| b.repeatseq.as_str()).collect();
        write_output(&format!("{}.repeatseq", basename), &content);
    }
    if settings.make_calls_file {
        let content: String = outputs.iter().map(|b| b.calls.as_str()).collect();
        write_output(&format!("{}.calls", basename), &content);
    }
    info!("Finished");
}

fn read_regions(path: &str) -> Vec<RepeatRegion> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!("Unable to open region file {}: {}", path, e);
            process::exit(1);
        }
    };
    let mut regions = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Unable to read region file {}: {}", path, e);
                process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match RepeatRegion::from_line(&line) {
            Ok(region) => regions.push(region),
            Err(e) => warn!("Skipping region line: {}", e),
        }
    }
    regions
}

fn output_basename(bam_file: &str, settings: &FilterSettings) -> String {
    let name = Path::new(bam_file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| bam_file.to_string());
    format!("{}{}", name, settings.param_string())
}

fn write_output(path: &str, content: &str) {
    let mut file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            error!("Unable to create output file {}: {}", path, e);
            process::exit(1);
        }
    };
    if let Err(e) = file.write_all(content.as_bytes()) {
        error!("Unable to write output file {}: {}", path, e);
        process::exit(1);
    }
}

fn set_log_level(matches: &clap::ArgMatches, is_last: bool) {
    let mut log_level = LevelFilter::Info;
    let mut specified = false;
    if matches.get_flag("verbose") {
        specified = true;
        log_level = LevelFilter::Debug;
    }
    if matches.get_flag("quiet") {
        specified = true;
        log_level = LevelFilter::Error;
    }
    if specified || is_last {
        let mut builder = Builder::new();
        builder.filter_level(log_level);
        if env::var("RUST_LOG").is_ok() {
            builder.parse_filters(&env::var("RUST_LOG").unwrap());
        }
        if builder.try_init().is_err() {
            panic!("Failed to set log level - has it been specified multiple times?")
        }
    }
    if is_last {
        info!("pardalote version {}", crate_version!());
    }
}
