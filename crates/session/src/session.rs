use std::collections::HashSet;

use foundation::color::Color;
use protocol::{LAND_HEIGHT, LandDescriptor, LandId, OwnerId, ServerEvent, SessionConfig};
use runtime::event_bus::{Event, EventBus};
use runtime::metrics::Metrics;
use scene::components::{Drawable3D, Transform};
use scene::environment::DirectionalLight;
use scene::land::{LandMap, LandMapError, LandUnit};
use scene::world::World;
use tracing::{debug, info};

use crate::error::SessionError;

/// What a handled server event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relay {
    Configured,
    MapLoaded { lands: usize },
    Purchased { id: LandId, owner: OwnerId },
    Sold { id: LandId },
    /// The event named a land this session does not know; nothing changed.
    Ignored { id: LandId },
}

/// Everything one connected viewer knows, for the lifetime of the connection.
#[derive(Debug, Default)]
pub struct Session {
    config: Option<SessionConfig>,
    world: World,
    lands: LandMap,
    map_loaded: bool,
    events: EventBus,
    metrics: Metrics,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub fn is_map_loaded(&self) -> bool {
        self.map_loaded
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn lands(&self) -> &LandMap {
        &self.lands
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Diagnostics produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Current color of a land unit's material.
    pub fn land_color(&self, id: LandId) -> Option<Color> {
        let unit = self.lands.get(id)?;
        self.world
            .drawable_3d(unit.entity)
            .map(|d| d.material.color())
    }

    /// Decodes one text frame and applies it.
    pub fn receive_text(&mut self, text: &str) -> Result<Relay, SessionError> {
        let event = protocol::decode_server(text)?;
        self.handle(event)
    }

    pub fn handle(&mut self, event: ServerEvent) -> Result<Relay, SessionError> {
        match event {
            ServerEvent::Variables(config) => self.configure(config),
            ServerEvent::MapData(lands) => self.load_map(lands),
            ServerEvent::PurchaseLand { id, owner } => self.purchase_land(id, owner),
            ServerEvent::SellLand { id } => self.sell_land(id),
        }
    }

    /// Scene initializer: background, one white directional light, and the
    /// configuration every later handler depends on.
    pub fn configure(&mut self, config: SessionConfig) -> Result<Relay, SessionError> {
        if self.config.is_some() {
            self.events
                .warn("variables", "ignoring repeated session variables");
            return Err(SessionError::AlreadyConfigured);
        }
        if !config.is_valid() {
            return Err(SessionError::InvalidConfig(config.land_size));
        }

        self.world.set_background(config.background_color);
        self.world
            .add_light(DirectionalLight::new(Color::WHITE, 1.0));

        info!(
            land_size = config.land_size,
            background = %config.background_color,
            "session configured"
        );
        self.events.info(
            "variables",
            format!(
                "Configured: land size {}, background {}",
                config.land_size, config.background_color
            ),
        );
        self.config = Some(config);
        Ok(Relay::Configured)
    }

    /// Map loader: one bulk insert of every parcel in the snapshot.
    ///
    /// The snapshot is validated before anything is inserted, so a rejected
    /// snapshot leaves the scene untouched.
    pub fn load_map(&mut self, lands: Vec<LandDescriptor>) -> Result<Relay, SessionError> {
        let config = self.require_config("mapData")?.clone();
        if self.map_loaded {
            return Err(SessionError::MapAlreadyLoaded);
        }

        let mut seen = HashSet::with_capacity(lands.len());
        if let Some(dup) = lands.iter().find(|land| !seen.insert(land.id)) {
            return Err(SessionError::DuplicateLand(dup.id));
        }

        for land in lands {
            let color = config.color_for(land.owner.is_some());

            let entity = self.world.spawn();
            self.world
                .set_transform(entity, Transform::from(config.world_position(land.position)));
            self.world.set_drawable_3d(
                entity,
                Drawable3D::toon_box(config.land_size, LAND_HEIGHT, config.land_size, color),
            );

            self.lands
                .insert(LandUnit {
                    id: land.id,
                    owner: land.owner,
                    entity,
                })
                .map_err(|LandMapError::Duplicate(id)| SessionError::DuplicateLand(id))?;
        }

        self.map_loaded = true;
        let count = self.lands.len();
        info!(lands = count, "map loaded");
        self.events
            .info("mapData", format!("Loaded {count} lands"));
        Ok(Relay::MapLoaded { lands: count })
    }

    pub fn purchase_land(&mut self, id: LandId, owner: OwnerId) -> Result<Relay, SessionError> {
        let owned_color = self.require_config("purchaseLand")?.owned_land_color;

        let Some(unit) = self.lands.set_owner(id, Some(owner.clone())) else {
            return Ok(self.ignore("purchaseLand", id));
        };
        let entity = unit.entity;
        self.world.set_material_color(entity, owned_color);

        self.metrics.inc_counter("land.purchased", 1);
        info!(land = %id, owner = %owner, "land purchased");
        self.events.info(
            "purchaseLand",
            format!("Land [{id}] purchased by [{owner}]"),
        );
        Ok(Relay::Purchased { id, owner })
    }

    pub fn sell_land(&mut self, id: LandId) -> Result<Relay, SessionError> {
        let land_color = self.require_config("sellLand")?.land_color;

        let Some(unit) = self.lands.set_owner(id, None) else {
            return Ok(self.ignore("sellLand", id));
        };
        let entity = unit.entity;
        self.world.set_material_color(entity, land_color);

        self.metrics.inc_counter("land.sold", 1);
        info!(land = %id, "land sold");
        self.events.info("sellLand", format!("Sold land [{id}]"));
        Ok(Relay::Sold { id })
    }

    fn require_config(&self, event: &'static str) -> Result<&SessionConfig, SessionError> {
        self.config
            .as_ref()
            .ok_or(SessionError::NotConfigured { event })
    }

    fn ignore(&mut self, event: &'static str, id: LandId) -> Relay {
        self.metrics.inc_counter("land.ignored", 1);
        debug!(event, land = %id, "event for unknown land ignored");
        Relay::Ignored { id }
    }
}
