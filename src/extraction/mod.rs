pub mod gemini;
pub mod merge;

use crate::domain::ExtractedData;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Black-box extraction call: one text chunk plus context in, structured
/// candidate data out. Implementations may fail or return garbage; the
/// runner absorbs both.
#[async_trait]
pub trait ChunkExtractor: Send + Sync {
    async fn extract_chunk(
        &self,
        chunk: &str,
        municipality_name: &str,
        chunk_index: usize,
        total_chunks: usize,
    ) -> Result<ExtractedData>;
}

/// Pause discipline between consecutive extraction calls. The fixed delay is
/// an operational contract with the external service, not a correctness
/// requirement of the merge, so it lives behind its own seam.
#[async_trait]
pub trait PacingPolicy: Send + Sync {
    async fn pause(&self);
}

pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[async_trait]
impl PacingPolicy for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No-op pacing for tests
pub struct NoDelay;

#[async_trait]
impl PacingPolicy for NoDelay {
    async fn pause(&self) {}
}

/// Splits source text into chunks of roughly `chunk_size` characters,
/// extending each boundary to the next newline when one falls within a
/// 500-character window, so chunks do not cut lines mid-way.
pub fn split_text_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    const BOUNDARY_WINDOW: usize = 500;

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + chunk_size).min(chars.len());
        if end < chars.len() {
            let window_end = (end + BOUNDARY_WINDOW).min(chars.len());
            if let Some(offset) = chars[end..window_end].iter().position(|&c| c == '\n') {
                end = end + offset + 1;
            }
        }
        chunks.push(chars[start..end].iter().collect());
        start = end;
    }

    chunks
}

/// Runs the extractor over every chunk strictly sequentially, pausing
/// between calls, and merges the per-chunk results. A failed chunk is
/// substituted with an empty result rather than aborting the run.
pub async fn extract_from_text(
    extractor: &dyn ChunkExtractor,
    pacing: &dyn PacingPolicy,
    text: &str,
    municipality_name: &str,
    chunk_size: usize,
) -> ExtractedData {
    let chunks = split_text_into_chunks(text, chunk_size);
    info!("Split source text into {} chunks", chunks.len());

    let mut results = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        info!("Processing chunk {}/{}", index + 1, chunks.len());
        match extractor
            .extract_chunk(chunk, municipality_name, index, chunks.len())
            .await
        {
            Ok(data) => results.push(data),
            Err(e) => {
                warn!(
                    "Chunk {}/{} failed, continuing with empty result: {}",
                    index + 1,
                    chunks.len(),
                    e
                );
                results.push(ExtractedData::default());
            }
        }

        if index + 1 < chunks.len() {
            pacing.pause().await;
        }
    }

    let merged = merge::merge_extracted(results);
    info!(
        "Merge complete: {} areas, {} items",
        merged.areas.len(),
        merged.garbage_items.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_text_into_chunks("short text", 5000);
        assert_eq!(chunks, vec!["short text"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_text_into_chunks("", 5000).is_empty());
    }

    #[test]
    fn chunks_extend_to_the_next_newline_within_the_window() {
        // 10 chars per chunk; the newline at position 12 is within the window
        let text = "aaaaaaaaaabb\ncccc";
        let chunks = split_text_into_chunks(text, 10);
        assert_eq!(chunks, vec!["aaaaaaaaaabb\n", "cccc"]);
    }

    #[test]
    fn boundary_falls_back_to_hard_split_without_a_nearby_newline() {
        let text = "a".repeat(1200);
        let chunks = split_text_into_chunks(&text, 1000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 200);
    }

    #[test]
    fn chunking_reassembles_to_the_original_text() {
        let text = "第1週 燃やすごみ\n第2週 資源ごみ\n".repeat(400);
        let chunks = split_text_into_chunks(&text, 1000);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), text);
    }
}
