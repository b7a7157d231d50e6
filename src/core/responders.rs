use crate::domain::ports::Responder;
use crate::utils::error::Result;
use crate::utils::validation::validate_unique_names;
use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::Value;
use std::future::Future;

pub struct NamedResponder {
    pub name: String,
    pub responder: Box<dyn Responder>,
}

/// Ordered collection of named responders. The evaluation loop invokes them
/// in this order for every record, and their names become output columns.
pub struct ResponderSet {
    responders: Vec<NamedResponder>,
}

impl ResponderSet {
    /// Chain-backed construction: wraps prebuilt responders directly, so
    /// results from entirely different methods can be ensembled side by side.
    pub fn from_chains(chains: Vec<(String, Box<dyn Responder>)>) -> Result<Self> {
        Self::with_unique_names(
            chains
                .into_iter()
                .map(|(name, responder)| NamedResponder { name, responder })
                .collect(),
        )
    }

    /// Model-backed construction: runs `load` for every model against the
    /// same prompt selector, so N models are compared under identical
    /// conditions. The loads are independent and run concurrently; all must
    /// finish before iteration can start.
    pub async fn from_models<M, P, F, Fut>(
        models: Vec<(String, M)>,
        prompt: P,
        load: F,
    ) -> Result<Self>
    where
        P: Clone,
        F: Fn(M, P) -> Fut,
        Fut: Future<Output = Result<Box<dyn Responder>>>,
    {
        let (names, handles): (Vec<_>, Vec<_>) = models.into_iter().unzip();
        let loaded = try_join_all(
            handles
                .into_iter()
                .map(|model| load(model, prompt.clone())),
        )
        .await?;

        Self::with_unique_names(
            names
                .into_iter()
                .zip(loaded)
                .map(|(name, responder)| NamedResponder { name, responder })
                .collect(),
        )
    }

    // A duplicate name would silently drop a column, so fail fast instead.
    fn with_unique_names(responders: Vec<NamedResponder>) -> Result<Self> {
        validate_unique_names("responders", responders.iter().map(|r| r.name.as_str()))?;
        Ok(Self { responders })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.responders.iter().map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedResponder> {
        self.responders.iter()
    }

    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }
}

/// Closure-backed responder, for in-process chains and tests.
pub struct FnResponder<F>(F);

#[async_trait]
impl<F, Fut> Responder for FnResponder<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send,
{
    async fn invoke(&self, input: Value) -> Result<Value> {
        (self.0)(input).await
    }
}

pub fn responder_fn<F, Fut>(f: F) -> Box<dyn Responder>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Box::new(FnResponder(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EvalError;
    use serde_json::json;

    fn constant(value: &'static str) -> Box<dyn Responder> {
        responder_fn(move |_input| async move { Ok(json!(value)) })
    }

    #[tokio::test]
    async fn test_from_chains_keeps_order() {
        let set = ResponderSet::from_chains(vec![
            ("b".to_string(), constant("1")),
            ("a".to_string(), constant("2")),
        ])
        .unwrap();

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn test_from_chains_rejects_duplicate_names() {
        let result = ResponderSet::from_chains(vec![
            ("m1".to_string(), constant("1")),
            ("m1".to_string(), constant("2")),
        ]);

        assert!(matches!(
            result,
            Err(EvalError::InvalidConfigValueError { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_models_loads_every_model_with_shared_prompt() {
        let models = vec![
            ("fast".to_string(), "model-a"),
            ("slow".to_string(), "model-b"),
        ];

        let set = ResponderSet::from_models(models, "classify:", |model, prompt| async move {
            let reply = format!("{} {}", prompt, model);
            Ok(responder_fn(move |_input| {
                let reply = reply.clone();
                async move { Ok(json!(reply)) }
            }))
        })
        .await
        .unwrap();

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["fast", "slow"]);

        let outputs: Vec<Value> = {
            let mut collected = Vec::new();
            for named in set.iter() {
                collected.push(named.responder.invoke(json!({})).await.unwrap());
            }
            collected
        };
        assert_eq!(outputs, vec![json!("classify: model-a"), json!("classify: model-b")]);
    }

    #[tokio::test]
    async fn test_from_models_fails_when_any_load_fails() {
        let models = vec![("ok".to_string(), 1u32), ("bad".to_string(), 2u32)];

        let result = ResponderSet::from_models(models, (), |model, _prompt| async move {
            if model == 2 {
                Err(EvalError::ConfigError {
                    message: "no such model".to_string(),
                })
            } else {
                Ok(constant("fine"))
            }
        })
        .await;

        assert!(matches!(result, Err(EvalError::ConfigError { .. })));
    }

    #[tokio::test]
    async fn test_responder_fn_sees_converted_input() {
        let responder = responder_fn(|input| async move {
            let question = input
                .get("q")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_uppercase();
            Ok(json!(question))
        });

        let output = responder.invoke(json!({"q": "hello"})).await.unwrap();
        assert_eq!(output, json!("HELLO"));
    }
}
