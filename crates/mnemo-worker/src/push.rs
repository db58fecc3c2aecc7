//! Push Events
//!
//! Push payload access for reminder delivery.

/// Push event delivered by the platform
#[derive(Debug, Clone, Default)]
pub struct PushEvent {
    pub data: Option<PushMessageData>,
}

impl PushEvent {
    /// Event with no payload
    pub fn empty() -> Self {
        Self::default()
    }

    /// Event carrying a text payload
    pub fn with_text(text: &str) -> Self {
        Self {
            data: Some(PushMessageData::new(text.as_bytes().to_vec())),
        }
    }
}

/// Payload carried by a push event
#[derive(Debug, Clone)]
pub struct PushMessageData {
    data: Vec<u8>,
}

impl PushMessageData {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Payload as text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).to_string()
    }

    /// Payload parsed as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.data)
    }

    /// Raw payload bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_payload() {
        let event = PushEvent::with_text("Evening session awaits");
        assert_eq!(event.data.unwrap().text(), "Evening session awaits");
    }

    #[test]
    fn test_json_payload() {
        #[derive(serde::Deserialize)]
        struct Reminder {
            kind: String,
        }

        let data = PushMessageData::new(br#"{"kind":"daily"}"#.to_vec());
        let reminder: Reminder = data.json().unwrap();
        assert_eq!(reminder.kind, "daily");
    }

    #[test]
    fn test_empty_event_has_no_data() {
        assert!(PushEvent::empty().data.is_none());
    }
}
