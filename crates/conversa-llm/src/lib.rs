pub mod provider;
pub mod stream;

pub use provider::{run_stream, ChatRequest, ModelStreamer, StreamTelemetry};
pub use stream::StreamEvent;
