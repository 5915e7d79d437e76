use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Notification block shown by the client OS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Android delivery hints: priority plus a dedup tag so a newer
/// notification on the same tag replaces the older one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AndroidConfig {
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Normal,
    High,
}

/// One topic-addressed push message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushMessage {
    pub topic: String,
    pub notification: Notification,
    /// String-keyed payload delivered alongside the notification.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,
}

impl PushMessage {
    pub fn to_topic(
        topic: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            notification: Notification {
                title: title.into(),
                body: body.into(),
            },
            data: BTreeMap::new(),
            android: None,
        }
    }

    pub fn data(mut self, data: BTreeMap<String, String>) -> Self {
        self.data = data;
        self
    }

    pub fn high_priority(mut self, collapse_key: Option<String>) -> Self {
        self.android = Some(AndroidConfig {
            priority: Priority::High,
            collapse_key,
        });
        self
    }
}

/// Response body of a successful `messages:send` call.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    /// Server-assigned message name, e.g. `projects/p/messages/123`.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() {
        let msg = PushMessage::to_topic("sport_football", "Title", "Body")
            .high_priority(Some("article-1".to_string()));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["topic"], "sport_football");
        assert_eq!(json["notification"]["title"], "Title");
        assert_eq!(json["android"]["priority"], "HIGH");
        assert_eq!(json["android"]["collapse_key"], "article-1");
        assert!(json.get("data").is_none());
    }
}
