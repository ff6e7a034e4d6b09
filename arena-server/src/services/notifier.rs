//! Webhook Notifier
//!
//! Best-effort外部通知：比赛开始/结束、抽奖中奖等事件 POST 到配置的
//! webhook。失败只记日志，从不影响主流程 — 通知丢了比请求失败好。

use serde::Serialize;
use std::time::Duration;

/// Fire-and-forget webhook sink. Cheap to clone.
#[derive(Clone)]
pub struct NotifierService {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

#[derive(Serialize)]
struct NotifyEnvelope<'a, T> {
    event: &'a str,
    sent_at: i64,
    payload: T,
}

impl NotifierService {
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        if webhook_url.is_none() {
            tracing::info!("Notifier disabled (no NOTIFY_WEBHOOK_URL)");
        }
        Self {
            client,
            webhook_url,
        }
    }

    /// Post an event in a spawned task. Call after commit — a failed
    /// delivery must never roll anything back.
    pub fn notify<T: Serialize + Send + 'static>(&self, event: &'static str, payload: T) {
        let Some(url) = self.webhook_url.clone() else {
            return;
        };
        let client = self.client.clone();

        tokio::spawn(async move {
            let body = NotifyEnvelope {
                event,
                sent_at: shared::util::now_millis(),
                payload,
            };
            match client.post(&url).json(&body).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(target: "notifier", event, "webhook delivered");
                }
                Ok(resp) => {
                    tracing::warn!(
                        target: "notifier",
                        event,
                        status = %resp.status(),
                        "webhook rejected"
                    );
                }
                Err(e) => {
                    tracing::warn!(target: "notifier", event, error = %e, "webhook delivery failed");
                }
            }
        });
    }
}
