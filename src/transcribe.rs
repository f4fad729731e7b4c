//! One-way feed of client audio into an external transcription
//! collaborator. Audio arrives already resampled to the service rate and is
//! delivered in fixed-size chunks.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Bytes handed to the sink per delivery.
pub const CHUNK_BYTES: usize = 6400;

/// Destination for the client's resampled audio. The relay only pushes;
/// nothing flows back into the session.
#[async_trait]
pub trait TranscriptionSink: Send {
    async fn deliver(&mut self, chunk: &[u8]);
}

/// Default sink when no transcription backend is wired up.
#[derive(Debug, Default)]
pub struct DiscardSink;

#[async_trait]
impl TranscriptionSink for DiscardSink {
    async fn deliver(&mut self, chunk: &[u8]) {
        tracing::trace!(bytes = chunk.len(), "discarding transcription chunk");
    }
}

/// Accumulates arbitrary-size audio writes and yields full chunks.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    pending: Vec<u8>,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `data` and returns every chunk completed by it.
    pub fn push(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(data);
        let mut chunks = Vec::new();
        while self.pending.len() >= CHUNK_BYTES {
            let rest = self.pending.split_off(CHUNK_BYTES);
            chunks.push(std::mem::replace(&mut self.pending, rest));
        }
        chunks
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Buffers incoming audio and forwards full chunks until the feed closes.
pub async fn run(mut audio: mpsc::Receiver<Vec<u8>>, mut sink: Box<dyn TranscriptionSink>) {
    let mut buffer = ChunkBuffer::new();
    while let Some(data) = audio.recv().await {
        for chunk in buffer.push(&data) {
            sink.deliver(&chunk).await;
        }
    }
    tracing::debug!(
        leftover = buffer.pending_len(),
        "transcription feed closed"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct RecordingSink(Arc<Mutex<Vec<Vec<u8>>>>);

    #[async_trait]
    impl TranscriptionSink for RecordingSink {
        async fn deliver(&mut self, chunk: &[u8]) {
            self.0.lock().unwrap().push(chunk.to_vec());
        }
    }

    #[test]
    fn short_writes_accumulate_without_emitting() {
        let mut buffer = ChunkBuffer::new();
        assert!(buffer.push(&vec![0u8; CHUNK_BYTES - 1]).is_empty());
        assert_eq!(buffer.pending_len(), CHUNK_BYTES - 1);
    }

    #[test]
    fn exact_chunk_emits_and_resets() {
        let mut buffer = ChunkBuffer::new();
        let chunks = buffer.push(&vec![7u8; CHUNK_BYTES]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), CHUNK_BYTES);
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn large_write_emits_multiple_chunks_and_keeps_remainder() {
        let mut buffer = ChunkBuffer::new();
        let chunks = buffer.push(&vec![1u8; CHUNK_BYTES * 2 + 100]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(buffer.pending_len(), 100);
    }

    #[test]
    fn chunks_preserve_byte_order_across_writes() {
        let mut buffer = ChunkBuffer::new();
        let first: Vec<u8> = (0..CHUNK_BYTES - 2).map(|i| (i % 251) as u8).collect();
        assert!(buffer.push(&first).is_empty());
        let chunks = buffer.push(&[250, 251, 252, 253]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(&chunks[0][..CHUNK_BYTES - 2], &first[..]);
        assert_eq!(&chunks[0][CHUNK_BYTES - 2..], &[250, 251]);
        assert_eq!(buffer.pending_len(), 2);
    }

    #[tokio::test]
    async fn run_delivers_only_full_chunks() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(run(rx, Box::new(RecordingSink(delivered.clone()))));

        tx.send(vec![0u8; CHUNK_BYTES / 2]).await.unwrap();
        tx.send(vec![0u8; CHUNK_BYTES / 2]).await.unwrap();
        tx.send(vec![0u8; 10]).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].len(), CHUNK_BYTES);
    }
}
