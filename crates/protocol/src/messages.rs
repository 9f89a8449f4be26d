//! Wire messages exchanged between the land server and viewers.
//!
//! Every frame is a JSON text message shaped `{"event": <name>, "data": <payload>}`:
//! - `variables`: session configuration (server → client, once, first)
//! - `mapData`: land snapshot (server → client, once, after `variables`)
//! - `purchaseLand` / `sellLand`: ownership changes (both directions; from the
//!   client they are requests, from the server they are facts)

use foundation::color::Color;
use serde::{Deserialize, Serialize};

/// Gap between neighbouring parcels in world units.
pub const LAND_GAP: f64 = 0.1;

/// Height of a land parcel box in world units.
pub const LAND_HEIGHT: f64 = 1.0;

/// Server-assigned land identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandId(pub u32);

impl std::fmt::Display for LandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque owner reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One-time session parameters sent before anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub background_color: Color,
    /// Edge length of a square parcel.
    pub land_size: f64,
    /// Color of unowned parcels.
    pub land_color: Color,
    /// Color of owned parcels.
    pub owned_land_color: Color,
}

impl SessionConfig {
    /// Parcel color as a pure function of owner presence.
    pub fn color_for(&self, owned: bool) -> Color {
        if owned {
            self.owned_land_color
        } else {
            self.land_color
        }
    }

    /// Distance between the centers of neighbouring parcels.
    pub fn grid_spacing(&self) -> f64 {
        self.land_size + LAND_GAP
    }

    /// World position of the parcel at grid `(x, y)`; parcels sit on `y = 0`.
    pub fn world_position(&self, grid: [i32; 2]) -> [f64; 3] {
        let spacing = self.grid_spacing();
        [grid[0] as f64 * spacing, 0.0, grid[1] as f64 * spacing]
    }

    pub fn is_valid(&self) -> bool {
        self.land_size.is_finite() && self.land_size > 0.0
    }
}

/// One parcel in a `mapData` snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandDescriptor {
    pub id: LandId,
    pub position: [i32; 2],
    #[serde(default)]
    pub owner: Option<OwnerId>,
}

/// Message from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    Variables(SessionConfig),

    MapData(Vec<LandDescriptor>),

    PurchaseLand { id: LandId, owner: OwnerId },

    SellLand { id: LandId },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Variables(_) => "variables",
            ServerEvent::MapData(_) => "mapData",
            ServerEvent::PurchaseLand { .. } => "purchaseLand",
            ServerEvent::SellLand { .. } => "sellLand",
        }
    }
}

/// Message from client to server.
///
/// The owner is never sent: the server attributes requests to the connection
/// they arrive on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    PurchaseLand { id: LandId },

    SellLand { id: LandId },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::PurchaseLand { .. } => "purchaseLand",
            ClientEvent::SellLand { .. } => "sellLand",
        }
    }

    pub fn land_id(&self) -> LandId {
        match self {
            ClientEvent::PurchaseLand { id } | ClientEvent::SellLand { id } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> SessionConfig {
        SessionConfig {
            background_color: Color::from_hex(0x87ceeb).unwrap(),
            land_size: 2.0,
            land_color: Color::from_hex(0x00aa00).unwrap(),
            owned_land_color: Color::from_hex(0xaa0000).unwrap(),
        }
    }

    #[test]
    fn world_position_scales_by_size_plus_gap() {
        let cfg = config();
        assert_eq!(cfg.world_position([0, 0]), [0.0, 0.0, 0.0]);
        assert_eq!(cfg.world_position([3, -2]), [3.0 * 2.1, 0.0, -2.0 * 2.1]);
    }

    #[test]
    fn color_depends_only_on_owner_presence() {
        let cfg = config();
        assert_eq!(cfg.color_for(true), cfg.owned_land_color);
        assert_eq!(cfg.color_for(false), cfg.land_color);
    }

    #[test]
    fn variables_payload_uses_camel_case() {
        let json = r##"{"event":"variables","data":{"backgroundColor":"#87ceeb","landSize":2,"landColor":43520,"ownedLandColor":11141120}}"##;
        let msg: ServerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(msg, ServerEvent::Variables(config()));
        assert_eq!(msg.name(), "variables");
    }

    #[test]
    fn map_data_accepts_null_and_missing_owner() {
        let json = r#"{"event":"mapData","data":[
            {"id":1,"position":[0,0],"owner":null},
            {"id":2,"position":[1,0]},
            {"id":3,"position":[0,1],"owner":"alice"}
        ]}"#;
        let ServerEvent::MapData(lands) = serde_json::from_str(json).unwrap() else {
            panic!("expected mapData");
        };
        assert_eq!(lands.len(), 3);
        assert_eq!(lands[0].owner, None);
        assert_eq!(lands[1].owner, None);
        assert_eq!(lands[2].owner, Some(OwnerId::new("alice")));
    }

    #[test]
    fn sell_land_serializes_with_event_envelope() {
        let json = serde_json::to_string(&ServerEvent::SellLand { id: LandId(4) }).unwrap();
        assert_eq!(json, r#"{"event":"sellLand","data":{"id":4}}"#);
    }

    #[test]
    fn client_requests_carry_only_the_id() {
        let msg: ClientEvent =
            serde_json::from_str(r#"{"event":"purchaseLand","data":{"id":9}}"#).unwrap();
        assert_eq!(msg, ClientEvent::PurchaseLand { id: LandId(9) });
        assert_eq!(msg.land_id(), LandId(9));
    }

    #[test]
    fn rejects_non_positive_land_size() {
        let mut cfg = config();
        assert!(cfg.is_valid());
        cfg.land_size = 0.0;
        assert!(!cfg.is_valid());
        cfg.land_size = f64::NAN;
        assert!(!cfg.is_valid());
    }
}
