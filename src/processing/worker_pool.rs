use rust_htslib::bam;
use scoped_threadpool::Pool;

use crate::config::FilterSettings;
use crate::model::repeat_region::RepeatRegion;
use crate::processing::region_processor::{RegionBuffers, RegionProcessor};
use crate::reference::reference_reader::ReferenceReader;

/**
 * Partition the region list into contiguous per-worker chunks and process
 * them on a scoped pool. Every worker owns its own BAM and reference
 * readers (both are stateful file handles) and its own output buffers, so
 * nothing is shared mutably. Buffers come back in worker order: for a
 * fixed region list and thread count the concatenated output is
 * byte-identical across runs.
 */
pub fn process_regions(
    regions: &[RepeatRegion],
    settings: &FilterSettings,
    bam_path: &str,
    reference_path: &str,
    threads: usize,
) -> Vec<RegionBuffers> {
    let threads = threads.max(1);
    let chunk = regions.len() / threads;
    let mut outputs: Vec<RegionBuffers> = (0..threads).map(|_| RegionBuffers::default()).collect();

    let mut pool = Pool::new(threads as u32);
    pool.scoped(|scope| {
        for (worker, buffers) in outputs.iter_mut().enumerate() {
            let start = worker * chunk;
            let stop = if worker == threads - 1 {
                regions.len()
            } else {
                (worker + 1) * chunk
            };
            let slice = &regions[start..stop];
            scope.execute(move || {
                // inputs were probed by the driver before the pool started
                let mut bam = bam::IndexedReader::from_path(bam_path)
                    .expect("Unable to open BAM file in worker");
                let mut reference = ReferenceReader::open(reference_path)
                    .expect("Unable to open reference in worker");
                let processor = RegionProcessor::new(settings);
                for region in slice {
                    if let Err(e) =
                        processor.process_region(region, &mut reference, &mut bam, buffers)
                    {
                        warn!("Skipping region {}: {}", region, e);
                    }
                }
            });
        }
    });
    outputs
}
