use protocol::{ClientEvent, LandId, ProtocolError};
use tracing::debug;

use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection is not open")]
    Closed,
    #[error("send failed: {0}")]
    Send(String),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Outbound half of the event channel.
///
/// Inbound frames are pushed into [`Session::receive_text`] by whoever owns
/// the socket; this trait only covers requests the viewer sends.
pub trait Transport {
    fn send_text(&self, text: &str) -> Result<(), TransportError>;

    fn send(&self, event: &ClientEvent) -> Result<(), TransportError> {
        let text = protocol::encode_client(event)?;
        self.send_text(&text)
    }
}

impl Session {
    /// Asks the server to buy `id`. Returns `Ok(false)` without sending when
    /// the land is unknown or already owned.
    pub fn request_purchase<T: Transport + ?Sized>(
        &self,
        transport: &T,
        id: LandId,
    ) -> Result<bool, TransportError> {
        match self.lands().get(id) {
            Some(unit) if !unit.is_owned() => {
                transport.send(&ClientEvent::PurchaseLand { id })?;
                Ok(true)
            }
            _ => {
                debug!(land = %id, "purchase request not sent");
                Ok(false)
            }
        }
    }

    /// Asks the server to sell `id`. Returns `Ok(false)` without sending when
    /// the land is unknown or not owned. The server decides whether the
    /// requester is the owner.
    pub fn request_sell<T: Transport + ?Sized>(
        &self,
        transport: &T,
        id: LandId,
    ) -> Result<bool, TransportError> {
        match self.lands().get(id) {
            Some(unit) if unit.is_owned() => {
                transport.send(&ClientEvent::SellLand { id })?;
                Ok(true)
            }
            _ => {
                debug!(land = %id, "sell request not sent");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Transport, TransportError};
    use crate::session::Session;
    use foundation::color::Color;
    use protocol::{LandDescriptor, LandId, OwnerId, SessionConfig};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<String>>,
        closed: bool,
    }

    impl Transport for Recorder {
        fn send_text(&self, text: &str) -> Result<(), TransportError> {
            if self.closed {
                return Err(TransportError::Closed);
            }
            self.sent.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn session() -> Session {
        let mut session = Session::new();
        session
            .configure(SessionConfig {
                background_color: Color::BLACK,
                land_size: 1.0,
                land_color: Color::WHITE,
                owned_land_color: Color::BLACK,
            })
            .unwrap();
        session
            .load_map(vec![
                LandDescriptor {
                    id: LandId(1),
                    position: [0, 0],
                    owner: None,
                },
                LandDescriptor {
                    id: LandId(2),
                    position: [1, 0],
                    owner: Some(OwnerId::new("hank")),
                },
            ])
            .unwrap();
        session
    }

    #[test]
    fn purchase_request_only_for_unowned_land() {
        let session = session();
        let transport = Recorder::default();

        assert!(session.request_purchase(&transport, LandId(1)).unwrap());
        assert!(!session.request_purchase(&transport, LandId(2)).unwrap());
        assert!(!session.request_purchase(&transport, LandId(9)).unwrap());

        assert_eq!(
            *transport.sent.borrow(),
            vec![r#"{"event":"purchaseLand","data":{"id":1}}"#.to_string()]
        );
    }

    #[test]
    fn sell_request_only_for_owned_land() {
        let session = session();
        let transport = Recorder::default();

        assert!(!session.request_sell(&transport, LandId(1)).unwrap());
        assert!(session.request_sell(&transport, LandId(2)).unwrap());
        assert_eq!(transport.sent.borrow().len(), 1);
    }

    #[test]
    fn closed_transport_surfaces_error() {
        let session = session();
        let transport = Recorder {
            closed: true,
            ..Default::default()
        };
        assert!(matches!(
            session.request_purchase(&transport, LandId(1)),
            Err(TransportError::Closed)
        ));
    }
}
