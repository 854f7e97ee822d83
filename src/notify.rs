//! Chat notification: summary embed and webhook delivery

use crate::error::Result;
use crate::types::ChartSummary;
use serde::Serialize;

#[cfg(feature = "async")]
use crate::error::ChartError;
#[cfg(feature = "async")]
use reqwest::Client;
#[cfg(feature = "async")]
use std::time::Duration;

pub const POSITIVE_COLOR: &str = "#0d9488";
pub const NEGATIVE_COLOR: &str = "#dc2626";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub fields: Vec<EmbedField>,
    pub image: EmbedImage,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    embeds: [&'a Embed; 1],
}

/// Build the summary embed for one chart
pub fn build_embed(summary: &ChartSummary, image_url: &str) -> Embed {
    let change_color = if summary.abs_change >= 0.0 {
        POSITIVE_COLOR
    } else {
        NEGATIVE_COLOR
    };

    Embed {
        title: format!("{} Daily Chart", summary.symbol),
        fields: vec![
            EmbedField {
                name: "Price".to_string(),
                value: format!("${:.2}", summary.last_close),
                inline: true,
                color: None,
            },
            EmbedField {
                name: "Change".to_string(),
                value: format!("${:.2} ({:.2})%", summary.abs_change, summary.pct_change),
                inline: true,
                color: Some(change_color.to_string()),
            },
            EmbedField {
                name: "ADRP".to_string(),
                value: format!("{:.2}%", summary.adrp),
                inline: true,
                color: None,
            },
        ],
        image: EmbedImage {
            url: image_url.to_string(),
        },
    }
}

/// Follow-up webhook for an interaction
pub fn webhook_url(base: &str, application_id: &str, token: &str) -> String {
    format!(
        "{}/webhooks/{}/{}",
        base.trim_end_matches('/'),
        application_id,
        token
    )
}

/// JSON body posted to the webhook
pub fn webhook_payload(embed: &Embed) -> Result<String> {
    Ok(serde_json::to_string(&WebhookPayload { embeds: [embed] })?)
}

/// Trait for delivering the embed back to the chat channel
#[cfg(feature = "async")]
pub trait Notifier: Send + Sync {
    fn send(
        &self,
        embed: &Embed,
        application_id: &str,
        token: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Posts embeds to the chat platform's interaction webhook
#[cfg(feature = "async")]
pub struct WebhookNotifier {
    base_url: String,
    client: Client,
}

#[cfg(feature = "async")]
impl WebhookNotifier {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ChartError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[cfg(feature = "async")]
impl Notifier for WebhookNotifier {
    async fn send(&self, embed: &Embed, application_id: &str, token: &str) -> Result<()> {
        let url = webhook_url(&self.base_url, application_id, token);
        let body = webhook_payload(embed)?;

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ChartError::Http(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        log::info!("Webhook for application {} answered {}", application_id, status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChartError::Http(format!("Webhook returned {}: {}", status, text)));
        }
        Ok(())
    }
}
