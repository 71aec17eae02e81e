// =============================================================================
// Telegram Notifier — Best-effort report delivery
// =============================================================================
//
// Delivery is strictly best-effort: missing credentials disable the sink,
// and transport failures are logged and swallowed. A lost notification never
// invalidates the computed signal or aborts the evaluation loop.

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Telegram bot sink configured from the environment.
pub struct TelegramNotifier {
    client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Build the notifier from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`,
    /// re-using the process-wide HTTP client.
    ///
    /// Returns `None` when either credential is unset, which disables
    /// notifications for the run.
    pub fn from_env(client: reqwest::Client) -> Option<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?.trim().to_string();
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?.trim().to_string();
        if token.is_empty() || chat_id.is_empty() {
            return None;
        }

        Some(Self {
            client,
            token,
            chat_id,
        })
    }

    /// Send `text` to the configured chat. Errors are returned for logging
    /// but callers treat them as non-fatal.
    pub async fn send(&self, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "HTML",
            }))
            .send()
            .await
            .context("POST sendMessage request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API returned {status}: {body}");
        }

        debug!("telegram notification sent");
        Ok(())
    }

    /// Best-effort wrapper around [`send`]: logs failures, never propagates.
    pub async fn send_best_effort(&self, text: &str) {
        if let Err(e) = self.send(text).await {
            warn!(error = %e, "telegram delivery failed (non-fatal)");
        }
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}
