use std::collections::HashMap;

use parking_lot::RwLock;
use protocol::{LandDescriptor, LandId, OwnerId, ServerEvent};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("land {0} does not exist")]
    UnknownLand(LandId),
    #[error("land {0} is already owned")]
    AlreadyOwned(LandId),
    #[error("land {0} is not owned by the requester")]
    NotOwner(LandId),
    #[error("grid {0}x{1} exceeds {max} parcels per side", max = MAX_GRID_SIDE)]
    GridTooLarge(u32, u32),
}

/// Largest grid edge, in parcels. Keeps ids and positions inside `u32`/`i32`.
pub const MAX_GRID_SIDE: u32 = 4096;

/// Authoritative ownership table shared by every connection.
///
/// The set of parcels is fixed at startup; only owners change.
#[derive(Debug)]
pub struct LandRegistry {
    lands: RwLock<Vec<LandDescriptor>>,
    index: HashMap<LandId, usize>,
}

impl LandRegistry {
    /// `width × height` unowned parcels centered on the origin, numbered
    /// row by row from 1.
    pub fn grid(width: u32, height: u32) -> Result<Self, RegistryError> {
        if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
            return Err(RegistryError::GridTooLarge(width, height));
        }
        let x0 = -((width / 2) as i32);
        let y0 = -((height / 2) as i32);
        let mut lands = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                lands.push(LandDescriptor {
                    id: LandId(row * width + col + 1),
                    position: [x0 + col as i32, y0 + row as i32],
                    owner: None,
                });
            }
        }
        let index = lands.iter().enumerate().map(|(i, l)| (l.id, i)).collect();
        Ok(Self {
            lands: RwLock::new(lands),
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Current state of every parcel, in id order.
    pub fn snapshot(&self) -> Vec<LandDescriptor> {
        self.lands.read().clone()
    }

    pub fn owner(&self, id: LandId) -> Option<OwnerId> {
        let slot = *self.index.get(&id)?;
        self.lands.read()[slot].owner.clone()
    }

    /// Records `buyer` as owner of an unowned parcel and returns the event
    /// to broadcast.
    pub fn purchase(&self, id: LandId, buyer: &OwnerId) -> Result<ServerEvent, RegistryError> {
        let slot = *self.index.get(&id).ok_or(RegistryError::UnknownLand(id))?;
        let mut lands = self.lands.write();
        let land = &mut lands[slot];
        if land.owner.is_some() {
            return Err(RegistryError::AlreadyOwned(id));
        }
        land.owner = Some(buyer.clone());
        Ok(ServerEvent::PurchaseLand {
            id,
            owner: buyer.clone(),
        })
    }

    /// Clears the owner of a parcel held by `seller`.
    pub fn sell(&self, id: LandId, seller: &OwnerId) -> Result<ServerEvent, RegistryError> {
        let slot = *self.index.get(&id).ok_or(RegistryError::UnknownLand(id))?;
        let mut lands = self.lands.write();
        let land = &mut lands[slot];
        if land.owner.as_ref() != Some(seller) {
            return Err(RegistryError::NotOwner(id));
        }
        land.owner = None;
        Ok(ServerEvent::SellLand { id })
    }
}
