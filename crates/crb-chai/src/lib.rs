//! Chai adapter (onsite chat endpoint).
//!
//! Implements the `crb-core` [`ChatModel`] port over a single JSON `POST`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crb_core::{
    config::Config,
    conversation::Turn,
    errors::Error,
    model::{strip_echoed_user_turn, ChatModel, ChatRequest, EMPTY_OUTPUT_REPLY, ERROR_REPLY},
    Result,
};

/// Wire body of the onsite chat endpoint.
#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    /// Deprecated by the endpoint; always sent empty.
    memory: &'a str,
    prompt: &'a str,
    bot_name: &'a str,
    user_name: &'a str,
    chat_history: &'a [Turn],
}

impl<'a> From<&'a ChatRequest> for ChatPayload<'a> {
    fn from(req: &'a ChatRequest) -> Self {
        Self {
            memory: "",
            prompt: &req.prompt,
            bot_name: &req.bot_name,
            user_name: &req.user_name,
            chat_history: &req.chat_history,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChaiClient {
    url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ChaiClient {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::External(format!("chai client build error: {e}")))?;

        Ok(Self {
            url: url.into(),
            api_key,
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        if cfg.chai_api_key.is_none() {
            tracing::warn!("CHAI_API_KEY is not set; requests will be sent without credentials");
        }
        Self::new(
            cfg.chai_api_url.clone(),
            cfg.chai_api_key.clone(),
            cfg.chai_timeout,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and return the raw JSON body.
    pub async fn call(&self, req: &ChatRequest) -> Result<Value> {
        let mut request = self.http.post(&self.url).json(&ChatPayload::from(req));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Error::External(format!("chai request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "chai request failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| Error::External(format!("chai json error: {e}")))
    }
}

/// Pull the reply text out of a response body.
fn extract_reply(body: &Value, user_name: &str) -> String {
    let output = body
        .get("model_output")
        .and_then(Value::as_str)
        .unwrap_or(EMPTY_OUTPUT_REPLY);
    strip_echoed_user_turn(output, user_name)
}

#[async_trait]
impl ChatModel for ChaiClient {
    async fn get_reply(&self, req: &ChatRequest) -> String {
        match self.call(req).await {
            Ok(body) => extract_reply(&body, &req.user_name),
            Err(e) => {
                tracing::error!("Error making API request: {e}");
                ERROR_REPLY.to_string()
            }
        }
    }
}
