use crate::domain::ports::Responder;
use crate::utils::error::{EvalError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Responder backed by an HTTP endpoint: POSTs the converted input as a
/// JSON body and reads the `output` field of the JSON reply. A reply that
/// is not an object is used as the output directly.
#[derive(Debug, Clone)]
pub struct HttpResponder {
    name: String,
    endpoint: String,
    client: Client,
}

impl HttpResponder {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn invoke(&self, input: Value) -> Result<Value> {
        tracing::debug!(responder = %self.name, endpoint = %self.endpoint, "calling endpoint");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EvalError::ResponderError {
                name: self.name.clone(),
                message: format!("endpoint returned {}", status),
            });
        }

        let body: Value = response.json().await?;
        match body {
            Value::Object(mut reply) => {
                reply
                    .remove("output")
                    .ok_or_else(|| EvalError::ResponderError {
                        name: self.name.clone(),
                        message: "reply object has no 'output' field".to_string(),
                    })
            }
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_invoke_posts_input_and_extracts_output() {
        let server = MockServer::start();
        let classify_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/classify")
                .json_body(json!({"q": "is this spam?"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"output": "spam", "confidence": 0.9}));
        });

        let responder = HttpResponder::new("m1", server.url("/classify"));
        let output = responder
            .invoke(json!({"q": "is this spam?"}))
            .await
            .unwrap();

        classify_mock.assert();
        assert_eq!(output, json!("spam"));
    }

    #[tokio::test]
    async fn test_invoke_uses_bare_reply_when_not_an_object() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!("bare answer"));
        });

        let responder = HttpResponder::new("m1", server.url("/"));
        let output = responder.invoke(json!({})).await.unwrap();

        assert_eq!(output, json!("bare answer"));
    }

    #[tokio::test]
    async fn test_invoke_fails_on_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(503);
        });

        let responder = HttpResponder::new("m1", server.url("/"));
        let result = responder.invoke(json!({})).await;

        assert!(matches!(
            result,
            Err(EvalError::ResponderError { name, .. }) if name == "m1"
        ));
    }

    #[tokio::test]
    async fn test_invoke_fails_when_output_field_missing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"answer": "wrong key"}));
        });

        let responder = HttpResponder::new("m1", server.url("/"));
        let result = responder.invoke(json!({})).await;

        assert!(matches!(result, Err(EvalError::ResponderError { .. })));
    }
}
