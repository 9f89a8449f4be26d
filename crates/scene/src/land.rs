use std::collections::HashMap;

use protocol::{LandId, OwnerId};

use crate::entity::EntityId;

/// One ownable parcel and the entity that draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandUnit {
    pub id: LandId,
    pub owner: Option<OwnerId>,
    pub entity: EntityId,
}

impl LandUnit {
    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LandMapError {
    #[error("land {0} is already in the map")]
    Duplicate(LandId),
}

/// The scene model: every land unit in snapshot order, addressable by id.
///
/// Units are only ever appended; after loading, the owner field is the only
/// thing that changes.
#[derive(Debug, Default)]
pub struct LandMap {
    units: Vec<LandUnit>,
    index: HashMap<LandId, usize>,
}

impl LandMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: LandUnit) -> Result<(), LandMapError> {
        if self.index.contains_key(&unit.id) {
            return Err(LandMapError::Duplicate(unit.id));
        }
        self.index.insert(unit.id, self.units.len());
        self.units.push(unit);
        Ok(())
    }

    pub fn get(&self, id: LandId) -> Option<&LandUnit> {
        self.index.get(&id).map(|&slot| &self.units[slot])
    }

    /// Replaces the owner of `id` and returns the updated unit.
    pub fn set_owner(&mut self, id: LandId, owner: Option<OwnerId>) -> Option<&LandUnit> {
        let slot = *self.index.get(&id)?;
        let unit = &mut self.units[slot];
        unit.owner = owner;
        Some(unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LandUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn owned_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_owned()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{LandMap, LandMapError, LandUnit};
    use crate::entity::EntityId;
    use foundation::handles::Handle;
    use pretty_assertions::assert_eq;
    use protocol::{LandId, OwnerId};

    fn unit(id: u32, owner: Option<&str>) -> LandUnit {
        LandUnit {
            id: LandId(id),
            owner: owner.map(OwnerId::new),
            entity: EntityId(Handle::new(id, 0)),
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let mut map = LandMap::new();
        for id in [5, 1, 3] {
            map.insert(unit(id, None)).unwrap();
        }
        let ids: Vec<u32> = map.iter().map(|u| u.id.0).collect();
        assert_eq!(ids, vec![5, 1, 3]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut map = LandMap::new();
        map.insert(unit(1, None)).unwrap();
        assert_eq!(
            map.insert(unit(1, Some("alice"))),
            Err(LandMapError::Duplicate(LandId(1)))
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(LandId(1)).unwrap().owner, None);
    }

    #[test]
    fn set_owner_updates_only_the_target() {
        let mut map = LandMap::new();
        map.insert(unit(1, None)).unwrap();
        map.insert(unit(2, None)).unwrap();

        let updated = map
            .set_owner(LandId(2), Some(OwnerId::new("bob")))
            .unwrap()
            .clone();
        assert_eq!(updated.owner, Some(OwnerId::new("bob")));
        assert_eq!(map.get(LandId(1)).unwrap().owner, None);
        assert_eq!(map.owned_count(), 1);
    }

    #[test]
    fn set_owner_on_missing_id_is_none() {
        let mut map = LandMap::new();
        assert!(map.set_owner(LandId(9), None).is_none());
        assert!(map.is_empty());
    }
}
