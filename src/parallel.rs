//! Parallel MARC record decoding using Rayon.
//!
//! Records are independent, so a buffer of concatenated records can be split
//! with the [`RecordBoundaryScanner`] and each span decoded on Rayon's
//! work-stealing thread pool. Results come back in input order, one per span;
//! a record that fails to decode never aborts the batch.
//!
//! # Examples
//!
//! ```no_run
//! use marcdec::parallel::decode_buffer_parallel;
//! use marcdec::Decoder;
//!
//! let buffer = std::fs::read("records.mrc")?;
//! let results = decode_buffer_parallel(&buffer, Decoder::new());
//! let ok = results.iter().filter(|r| r.is_ok()).count();
//! println!("Decoded {ok} of {} records in parallel", results.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::boundary_scanner::RecordBoundaryScanner;
use crate::decoder::Decoder;
use crate::error::{MarcError, Result};
use crate::record::Record;
use rayon::prelude::*;

/// Decode a batch of record spans in parallel.
///
/// `record_boundaries` holds `(offset, length)` pairs into `buffer`. A span
/// reaching past the end of the buffer is decoded with the bytes that exist,
/// which the decoder reports as a truncated record. Failures carry the
/// 1-based position of the span in `record_boundaries`.
pub fn decode_batch_parallel(
    record_boundaries: &[(usize, usize)],
    buffer: &[u8],
    decoder: Decoder,
) -> Vec<Result<Record>> {
    record_boundaries
        .par_iter()
        .enumerate()
        .map(|(idx, &(offset, length))| {
            let end = offset.saturating_add(length).min(buffer.len());
            let start = offset.min(end);
            decoder
                .decode(&buffer[start..end])
                .map_err(|source| MarcError::Record {
                    number: idx + 1,
                    source,
                })
        })
        .collect()
}

/// Split `buffer` into records and decode them in parallel.
pub fn decode_buffer_parallel(buffer: &[u8], decoder: Decoder) -> Vec<Result<Record>> {
    let boundaries = RecordBoundaryScanner::new().scan(buffer);
    tracing::debug!(records = boundaries.len(), "decoding batch in parallel");
    decode_batch_parallel(&boundaries, buffer, decoder)
}
