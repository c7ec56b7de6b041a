use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::stream::StreamEvent;

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub prompt: String,
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Translates the underlying LLM's streaming event shapes into a uniform
/// sequence of text deltas. Implementations never buffer beyond a single
/// delta and never retry (spec §5: "the request never retries the LLM call").
#[async_trait]
pub trait ModelStreamer: Send + Sync {
    async fn stream(&self, req: ChatRequest, tx: mpsc::Sender<StreamEvent>);
}

/// Latency/volume telemetry C4 is required to record around a stream call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamTelemetry {
    pub first_delta_ms: Option<u64>,
    pub total_deltas: usize,
    pub total_time_ms: u64,
}

/// Drives a `ModelStreamer`, forwarding its deltas to `out` while recording
/// first-delta latency and delta count. On upstream failure mid-stream it
/// forwards a single `Error` event and returns cleanly — bytes already sent
/// to the client stay sent (spec §4.4).
pub async fn run_stream(
    streamer: &dyn ModelStreamer,
    req: ChatRequest,
    out: mpsc::Sender<StreamEvent>,
) -> StreamTelemetry {
    let start = Instant::now();
    let (tx, mut rx) = mpsc::channel::<StreamEvent>(32);

    let model_id = req.model_id.clone();
    let stream_fut = streamer.stream(req, tx);
    tokio::pin!(stream_fut);

    let mut telemetry = StreamTelemetry::default();
    let mut driver_done = false;

    loop {
        tokio::select! {
            _ = &mut stream_fut, if !driver_done => {
                driver_done = true;
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(StreamEvent::TextDelta { text }) => {
                        if telemetry.first_delta_ms.is_none() {
                            telemetry.first_delta_ms = Some(start.elapsed().as_millis() as u64);
                        }
                        telemetry.total_deltas += 1;
                        if out.send(StreamEvent::TextDelta { text }).await.is_err() {
                            break;
                        }
                    }
                    Some(StreamEvent::Done { total_deltas }) => {
                        telemetry.total_deltas = telemetry.total_deltas.max(total_deltas);
                        telemetry.total_time_ms = start.elapsed().as_millis() as u64;
                        let _ = out.send(StreamEvent::Done { total_deltas: telemetry.total_deltas }).await;
                        break;
                    }
                    Some(StreamEvent::Error { message }) => {
                        warn!(model_id, error = %message, "llm stream failed mid-stream");
                        telemetry.total_time_ms = start.elapsed().as_millis() as u64;
                        let _ = out.send(StreamEvent::Error { message }).await;
                        break;
                    }
                    None => {
                        telemetry.total_time_ms = start.elapsed().as_millis() as u64;
                        break;
                    }
                }
            }
        }
    }

    info!(
        model_id,
        first_delta_ms = telemetry.first_delta_ms,
        total_deltas = telemetry.total_deltas,
        total_time_ms = telemetry.total_time_ms,
        "llm stream complete"
    );

    telemetry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct FakeStreamer {
        chunks: Vec<&'static str>,
        fail_after: Option<usize>,
    }

    #[async_trait]
    impl ModelStreamer for FakeStreamer {
        async fn stream(&self, _req: ChatRequest, tx: mpsc::Sender<StreamEvent>) {
            for (i, chunk) in self.chunks.iter().enumerate() {
                if Some(i) == self.fail_after {
                    let _ = tx
                        .send(StreamEvent::Error {
                            message: "upstream reset".into(),
                        })
                        .await;
                    return;
                }
                let _ = tx
                    .send(StreamEvent::TextDelta {
                        text: chunk.to_string(),
                    })
                    .await;
            }
            let _ = tx
                .send(StreamEvent::Done {
                    total_deltas: self.chunks.len(),
                })
                .await;
        }
    }

    #[tokio::test]
    async fn forwards_deltas_and_records_telemetry() {
        let streamer: Arc<dyn ModelStreamer> = Arc::new(FakeStreamer {
            chunks: vec!["hel", "lo"],
            fail_after: None,
        });
        let (tx, mut rx) = mpsc::channel(16);
        let req = ChatRequest {
            prompt: "hi".into(),
            model_id: "m".into(),
            max_tokens: 10,
            temperature: 0.0,
        };
        let telemetry = run_stream(streamer.as_ref(), req, tx).await;
        assert_eq!(telemetry.total_deltas, 2);
        assert!(telemetry.first_delta_ms.is_some());

        let mut received = Vec::new();
        while let Some(ev) = rx.recv().await {
            received.push(ev);
        }
        assert_eq!(received.len(), 3); // 2 deltas + Done
    }

    #[tokio::test]
    async fn mid_stream_failure_emits_single_error_event() {
        let streamer: Arc<dyn ModelStreamer> = Arc::new(FakeStreamer {
            chunks: vec!["hel", "lo"],
            fail_after: Some(1),
        });
        let (tx, mut rx) = mpsc::channel(16);
        let req = ChatRequest {
            prompt: "hi".into(),
            model_id: "m".into(),
            max_tokens: 10,
            temperature: 0.0,
        };
        let _telemetry = run_stream(streamer.as_ref(), req, tx).await;

        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        assert!(matches!(events.last(), Some(StreamEvent::Error { .. })));
    }
}
