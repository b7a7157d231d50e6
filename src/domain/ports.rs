use crate::domain::model::Record;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A unit capable of producing one output for one converted input: a model
/// bound to a prompt, an HTTP endpoint, or any in-process chain. Invocation
/// may suspend on network or heavy compute.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn invoke(&self, input: Value) -> Result<Value>;
}

/// Destination for merged output rows. Each append must leave the row
/// durable before it returns, so an aborted run keeps every completed row.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append(&mut self, row: &Record) -> Result<()>;
}
