/// One event out of the LLM streamer's uniform delta sequence, terminated
/// by exactly one `Done` or `Error`.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    TextDelta { text: String },
    Done { total_deltas: usize },
    Error { message: String },
}
