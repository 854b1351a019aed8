use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::util::{is_local_endpoint_url, thread_endpoint};

const DEFAULT_SERVER_URL: &str = "http://localhost:2024";
const DEFAULT_ASSISTANT_ID: &str = "email_assistant";
pub const DEFAULT_GMAIL_URL: &str = "https://mail.google.com/mail/u/0/#inbox/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub api_key: Option<String>,
    pub gmail_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let server_url =
            env_non_blank("MAILCARDS_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let thread_id = env_non_blank("MAILCARDS_THREAD_ID").unwrap_or_default();
        let assistant_id = env_non_blank("MAILCARDS_ASSISTANT_ID")
            .unwrap_or_else(|| DEFAULT_ASSISTANT_ID.to_string());
        let api_key = env_non_blank("MAILCARDS_API_KEY");
        let gmail_url =
            env_non_blank("MAILCARDS_GMAIL_URL").unwrap_or_else(|| DEFAULT_GMAIL_URL.to_string());

        Ok(Self {
            server_url,
            thread_id,
            assistant_id,
            api_key,
            gmail_url,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            bail!(
                "Invalid MAILCARDS_SERVER_URL '{}': expected http:// or https:// URL",
                self.server_url
            );
        }

        if self.thread_id.trim().is_empty() {
            bail!("MAILCARDS_THREAD_ID must be set to the conversation thread to follow");
        }

        if self.assistant_id.trim().is_empty() {
            bail!("MAILCARDS_ASSISTANT_ID must not be blank");
        }

        if !self.is_local_endpoint() && self.api_key.is_none() {
            bail!(
                "MAILCARDS_API_KEY must be set for non-local servers (url: '{}')",
                self.server_url
            );
        }

        Ok(())
    }

    pub fn resume_url(&self) -> String {
        thread_endpoint(&self.server_url, &self.thread_id, &["runs"])
    }

    pub fn stream_url(&self) -> String {
        thread_endpoint(&self.server_url, &self.thread_id, &["tool-calls", "stream"])
    }

    fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.server_url)
    }
}

fn env_non_blank(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
