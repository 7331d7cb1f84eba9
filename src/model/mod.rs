pub mod allele_support;
pub mod repeat_region;
