use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::messages::{ClientEvent, ServerEvent};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame is not an event envelope: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("unknown event {0:?}")]
    UnknownEvent(String),
    #[error("invalid payload for event {event:?}: {source}")]
    InvalidPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {event:?}: {source}")]
    Encode {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
}

const SERVER_EVENTS: &[&str] = &["variables", "mapData", "purchaseLand", "sellLand"];
const CLIENT_EVENTS: &[&str] = &["purchaseLand", "sellLand"];

pub fn decode_server(text: &str) -> Result<ServerEvent, ProtocolError> {
    decode(text, SERVER_EVENTS)
}

pub fn decode_client(text: &str) -> Result<ClientEvent, ProtocolError> {
    decode(text, CLIENT_EVENTS)
}

pub fn encode_server(event: &ServerEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(event).map_err(|source| ProtocolError::Encode {
        event: event.name(),
        source,
    })
}

pub fn encode_client(event: &ClientEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(event).map_err(|source| ProtocolError::Encode {
        event: event.name(),
        source,
    })
}

fn decode<T: DeserializeOwned>(text: &str, known: &[&str]) -> Result<T, ProtocolError> {
    match serde_json::from_str::<T>(text) {
        Ok(msg) => Ok(msg),
        Err(err) => {
            // Re-read only the tag to tell the caller which part was wrong.
            let Ok(envelope) = serde_json::from_str::<Envelope>(text) else {
                return Err(ProtocolError::Malformed(err));
            };
            if known.contains(&envelope.event.as_str()) {
                return Err(ProtocolError::InvalidPayload {
                    event: envelope.event,
                    source: err,
                });
            }
            Err(ProtocolError::UnknownEvent(envelope.event))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{LandId, OwnerId};

    #[test]
    fn decodes_purchase_land() {
        let msg = decode_server(r#"{"event":"purchaseLand","data":{"id":1,"owner":"alice"}}"#)
            .unwrap();
        assert_eq!(
            msg,
            ServerEvent::PurchaseLand {
                id: LandId(1),
                owner: OwnerId::new("alice"),
            }
        );
    }

    #[test]
    fn unknown_event_is_reported_by_name() {
        let err = decode_server(r#"{"event":"teleport","data":{}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownEvent(name) if name == "teleport"));
    }

    #[test]
    fn bad_payload_names_the_event() {
        let err = decode_server(r#"{"event":"sellLand","data":{"id":"seven"}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidPayload { event, .. } if event == "sellLand"));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            decode_server("not json"),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn server_only_events_are_unknown_to_the_server() {
        let err = decode_client(r#"{"event":"mapData","data":[]}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownEvent(name) if name == "mapData"));
    }

    #[test]
    fn client_frames_decode_back() {
        let text = encode_client(&ClientEvent::SellLand { id: LandId(3) }).unwrap();
        assert_eq!(
            decode_client(&text).unwrap(),
            ClientEvent::SellLand { id: LandId(3) }
        );
    }
}
