use crate::game::broadcast::Broadcast;
use crate::protocol::GameEvent;
use serde::Serialize;

/// Publishes game events through the Centrifugo server API. Each publish is a
/// detached task so the tick loop never waits on the broker; a failed publish
/// is logged and dropped, and the next diff re-synchronizes clients.
#[derive(Debug, Clone)]
pub struct CentrifugoClient {
    client: reqwest::Client,
    publish_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    channel: &'a str,
    data: &'a GameEvent,
}

impl CentrifugoClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            publish_url: format!("{}/api/publish", base_url.trim_end_matches('/')),
            api_key,
        }
    }
}

impl Broadcast for CentrifugoClient {
    fn publish(&self, channel: &str, event: GameEvent) {
        let client = self.client.clone();
        let publish_url = self.publish_url.clone();
        let api_key = self.api_key.clone();
        let body = match serde_json::to_value(PublishRequest {
            channel,
            data: &event,
        }) {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(?error, "failed to encode publish request");
                return;
            }
        };
        tokio::spawn(async move {
            let result = client
                .post(&publish_url)
                .header("X-API-Key", &api_key)
                .json(&body)
                .send()
                .await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(status = %response.status(), "centrifugo rejected publish");
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(?error, "failed to publish message");
                }
            }
        });
    }
}
