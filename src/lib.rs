pub mod cli;
pub mod config;
pub mod external_command_checker;
pub mod genotype;
pub mod model;
pub mod output;
pub mod processing;
pub mod reads;
pub mod reference;
pub mod utils;

// HTS and bio files
extern crate bio;
extern crate rust_htslib;

// Stats
extern crate ordered_float;
extern crate statrs;

// Utilities
extern crate clap;
extern crate env_logger;
extern crate itertools;
extern crate rayon;
extern crate scoped_threadpool;

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
