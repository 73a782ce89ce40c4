use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use futures_util::Stream;
use voxgate_usage::{UsageRecord, UsageRecorder};

use crate::{engine::AudioByteStream, error::SynthesisError};

/// Audio chunk stream that settles its usage record exactly once
///
/// Chunks are relayed in engine order without buffering. When the
/// engine's sequence ends cleanly the draft record is completed and
/// handed to the recorder; an engine error or a client disconnect
/// (the stream dropped mid-flight) settles it as error-terminated
/// with the bytes counted so far.
pub struct AudioStream {
    inner: AudioByteStream,
    meter: Option<StreamMeter>,
}

impl std::fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStream")
            .field("metered", &self.meter.is_some())
            .finish_non_exhaustive()
    }
}

struct StreamMeter {
    recorder: UsageRecorder,
    draft: UsageRecord,
    started: Instant,
}

impl AudioStream {
    pub(crate) fn new(inner: AudioByteStream, recorder: UsageRecorder, draft: UsageRecord, started: Instant) -> Self {
        Self {
            inner,
            meter: Some(StreamMeter {
                recorder,
                draft,
                started,
            }),
        }
    }

    fn settle(&mut self, error: Option<String>) {
        if let Some(mut meter) = self.meter.take() {
            meter.draft.latency_ms = u64::try_from(meter.started.elapsed().as_millis()).unwrap_or(u64::MAX);
            meter.draft.error = error;
            meter.recorder.record(meter.draft);
        }
    }
}

impl Stream for AudioStream {
    type Item = Result<Bytes, SynthesisError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                if let Some(ref mut meter) = this.meter {
                    meter.draft.audio_bytes += chunk.len() as u64;
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.settle(Some(e.to_string()));
                Poll::Ready(Some(Err(e.into())))
            }
            Poll::Ready(None) => {
                this.settle(None);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for AudioStream {
    fn drop(&mut self) {
        self.settle(Some("stream abandoned before completion".to_owned()));
    }
}
