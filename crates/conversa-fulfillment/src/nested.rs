use async_trait::async_trait;
use conversa_core::Result;

/// Abstracts fire-and-forget invocation of a named nested function (AWS
/// Lambda, a sibling service, …) for `fulfillment.type == "lambda"` forms.
#[async_trait]
pub trait NestedInvoker: Send + Sync {
    async fn invoke(&self, function_name: &str, payload: serde_json::Value) -> Result<()>;
}
