pub mod error_profile;
pub mod genotyping_engine;
