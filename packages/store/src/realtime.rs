//! # Realtime Feed
//!
//! Phoenix-channel websocket client for the hosted realtime service.
//!
//! ```text
//! → {"topic":"realtime:version_changes","event":"phx_join","payload":{config..},"ref":"1"}
//! ← {"event":"phx_reply","payload":{"status":"ok",..}}
//! ← {"event":"postgres_changes","payload":{"data":{"type":"INSERT","record":{..}}}}
//! → {"topic":"phoenix","event":"heartbeat","payload":{},"ref":"2"}   every 30s
//! ```

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::page::PageId;
use crate::record::VersionRecord;
use crate::store::Subscription;

pub const CHANNEL_TOPIC: &str = "realtime:version_changes";
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// What an incoming frame means to a subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    Insert(VersionRecord),
    Joined,
    Failed(String),
    Ignored,
}

pub fn join_message(table: &str, page: &PageId, key: &str, reference: u64) -> Value {
    json!({
        "topic": CHANNEL_TOPIC,
        "event": "phx_join",
        "payload": {
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [{
                    "event": "INSERT",
                    "schema": "public",
                    "table": table,
                    "filter": format!("page=eq.{}", page),
                }],
            },
            "access_token": key,
        },
        "ref": reference.to_string(),
    })
}

pub fn heartbeat_message(reference: u64) -> Value {
    json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "payload": {},
        "ref": reference.to_string(),
    })
}

/// Interpret one text frame
pub fn decode_message(text: &str) -> RealtimeEvent {
    let Ok(frame) = serde_json::from_str::<Value>(text) else {
        return RealtimeEvent::Ignored;
    };
    let payload = &frame["payload"];

    match frame["event"].as_str().unwrap_or_default() {
        "postgres_changes" => {
            let data = &payload["data"];
            if data["type"].as_str().is_some_and(|t| t != "INSERT") {
                return RealtimeEvent::Ignored;
            }
            decode_record(&data["record"])
        }
        // Older servers push the row directly under the event name
        "INSERT" => decode_record(&payload["record"]),
        "phx_reply" if frame["topic"] == CHANNEL_TOPIC => match payload["status"].as_str() {
            Some("ok") => RealtimeEvent::Joined,
            _ => RealtimeEvent::Failed(payload["response"].to_string()),
        },
        "phx_error" => RealtimeEvent::Failed("channel error".to_string()),
        "system" if payload["status"] == "error" => {
            RealtimeEvent::Failed(payload["message"].as_str().unwrap_or("system error").to_string())
        }
        _ => RealtimeEvent::Ignored,
    }
}

fn decode_record(value: &Value) -> RealtimeEvent {
    match serde_json::from_value::<VersionRecord>(value.clone()) {
        Ok(record) => RealtimeEvent::Insert(record),
        Err(e) => {
            tracing::warn!("undecodable realtime record: {}", e);
            RealtimeEvent::Ignored
        }
    }
}

/// Connect, join the page's channel and forward inserts until dropped
pub async fn subscribe(config: &StoreConfig, page: &PageId) -> StoreResult<Subscription> {
    let endpoint = config.realtime_endpoint()?;
    let key = config.key.as_deref().unwrap_or_default().trim().to_string();

    let (socket, _) = tokio_tungstenite::connect_async(endpoint.as_str())
        .await
        .map_err(StoreError::realtime)?;
    let (mut sink, mut frames) = socket.split();

    let join = join_message(&config.table, page, &key, 1);
    sink.send(Message::Text(join.to_string()))
        .await
        .map_err(StoreError::realtime)?;
    tracing::info!(page = %page, "subscribed to realtime inserts");

    let (tx, rx) = mpsc::channel(64);
    let page = page.clone();

    let task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut reference = 2u64;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    let beat = heartbeat_message(reference).to_string();
                    reference += 1;
                    if let Err(e) = sink.send(Message::Text(beat)).await {
                        tracing::warn!("realtime heartbeat failed: {}", e);
                        break;
                    }
                }
                frame = frames.next() => match frame {
                    Some(Ok(Message::Text(text))) => match decode_message(&text) {
                        RealtimeEvent::Insert(record) if record.page == page.as_str() => {
                            if tx.send(record).await.is_err() {
                                break;
                            }
                        }
                        RealtimeEvent::Failed(reason) => {
                            tracing::warn!(page = %page, "realtime channel error: {}", reason);
                        }
                        RealtimeEvent::Joined => tracing::debug!(page = %page, "realtime channel joined"),
                        _ => {}
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("realtime connection lost: {}", e);
                        break;
                    }
                }
            }
        }
    });

    Ok(Subscription::new(rx, Some(task)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_frame(page: &str) -> String {
        json!({
            "topic": CHANNEL_TOPIC,
            "event": "postgres_changes",
            "payload": {
                "ids": [1],
                "data": {
                    "schema": "public",
                    "table": "page_versions",
                    "type": "INSERT",
                    "commit_timestamp": "2024-02-05T10:00:00Z",
                    "record": {
                        "id": 12,
                        "page": page,
                        "content": "{\"h1\":\"Hello\"}",
                        "version_major": 1,
                        "version_minor": 2,
                        "updated_by": "grace",
                        "updated_at": "2024-02-05T10:00:00.5+00:00"
                    }
                }
            },
            "ref": null
        })
        .to_string()
    }

    #[test]
    fn test_decode_insert() {
        match decode_message(&insert_frame("index")) {
            RealtimeEvent::Insert(record) => {
                assert_eq!(record.id, 12);
                assert_eq!(record.author(), "grace");
                assert_eq!(record.content.get("h1"), Some("Hello"));
            }
            other => panic!("expected insert, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_join_reply() {
        let ok = json!({"topic": CHANNEL_TOPIC, "event": "phx_reply", "payload": {"status": "ok", "response": {}}, "ref": "1"});
        assert_eq!(decode_message(&ok.to_string()), RealtimeEvent::Joined);

        let err = json!({"topic": CHANNEL_TOPIC, "event": "phx_reply", "payload": {"status": "error", "response": {"reason": "bad"}}, "ref": "1"});
        assert!(matches!(decode_message(&err.to_string()), RealtimeEvent::Failed(_)));
    }

    #[test]
    fn test_heartbeat_reply_is_ignored() {
        let reply = json!({"topic": "phoenix", "event": "phx_reply", "payload": {"status": "ok"}, "ref": "2"});
        assert_eq!(decode_message(&reply.to_string()), RealtimeEvent::Ignored);
        assert_eq!(decode_message("not json"), RealtimeEvent::Ignored);
    }

    #[test]
    fn test_join_message_filters_page() {
        let join = join_message("page_versions", &PageId::new("about"), "anon", 1);
        assert_eq!(join["topic"], CHANNEL_TOPIC);
        assert_eq!(join["payload"]["config"]["postgres_changes"][0]["filter"], "page=eq.about");
        assert_eq!(join["payload"]["config"]["postgres_changes"][0]["event"], "INSERT");
        assert_eq!(join["ref"], "1");
    }
}
