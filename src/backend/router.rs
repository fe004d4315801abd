//! Model selector and dispatch table.

use std::fmt;
use std::str::FromStr;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::buffered::BufferedCaller;
use super::streaming::StreamingCaller;
use super::{Generation, ModelCaller};
use crate::error::GatewayError;

/// The two recognized model selectors. Anything else is rejected at the
/// boundary before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelId {
    Llama2,
    Mistral,
}

impl ModelId {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::Llama2 => "llama2",
            ModelId::Mistral => "mistral",
        }
    }

    /// Identifier of the hosted model this selector maps to.
    pub fn upstream_model(self) -> &'static str {
        match self {
            ModelId::Llama2 => "llama3-8b-8192",
            ModelId::Mistral => "mistral-saba-24b",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "llama2" => Ok(ModelId::Llama2),
            "mistral" => Ok(ModelId::Mistral),
            other => Err(GatewayError::InvalidModelSelector(other.to_string())),
        }
    }
}

/// Maps each selector to its caller. Pure dispatch, no side effects of
/// its own.
pub struct ModelRouter {
    llama2: Box<dyn ModelCaller>,
    mistral: Box<dyn ModelCaller>,
}

impl ModelRouter {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            llama2: Box::new(BufferedCaller::new(
                client.clone(),
                api_key.to_string(),
                base_url,
                ModelId::Llama2.upstream_model(),
            )),
            mistral: Box::new(StreamingCaller::new(
                client,
                api_key.to_string(),
                base_url,
                ModelId::Mistral.upstream_model(),
            )),
        }
    }

    pub async fn dispatch(&self, model: ModelId, prompt: &str) -> Result<Generation, GatewayError> {
        match model {
            ModelId::Llama2 => self.llama2.call(prompt).await,
            ModelId::Mistral => self.mistral.call(prompt).await,
        }
    }
}
