//! Blocking client for the vision-language inference endpoint.
//!
//! Speaks the chat-completions protocol: one user turn carrying the fixed
//! instruction plus the JPEG-encoded image as a base64 data URI. All
//! transport and parse failures degrade to an empty prediction at this
//! boundary so the evaluation loop never sees an error.

use std::io::Cursor;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, GrayImage, ImageFormat};
use serde::Deserialize;

use crate::config::EvalConfig;

/// Instruction sent with every image.
const PLATE_PROMPT: &str = "What is the license plate number shown in this image? \
Respond only with the plate number without any additional text or explanation.";

/// Produces a raw text prediction for one preprocessed image.
///
/// Implementations must not fail: anything unrecoverable surfaces as an
/// empty string.
pub trait PlatePredictor {
    fn predict(&self, image: &GrayImage) -> String;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Chat-completions client with a bounded timeout and a small retry loop.
pub struct VlmClient {
    http: reqwest::blocking::Client,
    endpoint_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_retries: u32,
    retry_backoff: Duration,
}

impl VlmClient {
    pub fn new(config: &EvalConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint_url: config.endpoint_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// JPEG-encodes a grayscale image and wraps it in standard base64.
    fn encode_jpeg_base64(image: &GrayImage) -> Result<String> {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .context("Failed to encode image as JPEG")?;
        Ok(BASE64.encode(&bytes))
    }

    fn build_payload(&self, image_base64: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": PLATE_PROMPT },
                    {
                        "type": "image_url",
                        "image_url": {
                            "url": format!("data:image/jpeg;base64,{}", image_base64)
                        }
                    }
                ]
            }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }

    fn request_prediction(&self, image_base64: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint_url)
            .json(&self.build_payload(image_base64))
            .send()
            .context("Failed to reach inference endpoint")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Inference endpoint returned {}", status));
        }

        let parsed: ChatResponse = response
            .json()
            .context("Failed to parse inference response")?;
        let choice = parsed
            .choices
            .first()
            .ok_or_else(|| anyhow!("Inference response contained no choices"))?;
        Ok(choice.message.content.trim().to_string())
    }
}

impl PlatePredictor for VlmClient {
    fn predict(&self, image: &GrayImage) -> String {
        let encoded = match Self::encode_jpeg_base64(image) {
            Ok(encoded) => encoded,
            Err(e) => {
                crate::log(&format!("Error encoding image: {}", e));
                return String::new();
            }
        };

        let mut attempts = 0;
        loop {
            match self.request_prediction(&encoded) {
                Ok(text) => return text,
                Err(e) => {
                    attempts += 1;
                    if attempts > self.max_retries {
                        crate::log(&format!(
                            "Prediction failed after {} attempts: {}",
                            attempts, e
                        ));
                        return String::new();
                    }
                    crate::log(&format!("Prediction attempt {} failed, retrying: {}", attempts, e));
                    thread::sleep(self.retry_backoff);
                }
            }
        }
    }
}
