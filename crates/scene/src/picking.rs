use foundation::math::Vec3;
use foundation::math::stable_total_cmp_f64;
use protocol::LandId;

use crate::World;
use crate::entity::EntityId;
use crate::land::LandMap;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub land: LandId,
    pub entity: EntityId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
        }
    }
}

/// Ray picking over land units.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - If several units are hit at the same distance, the lower `EntityId::index()` wins.
///
/// Units whose entity has no transform or drawable are not pickable.
pub fn pick_land(world: &World, lands: &LandMap, ray: Ray, opts: PickOptions) -> Option<PickHit> {
    let dir = ray.dir.normalized()?;

    let mut best: Option<(f64, &crate::land::LandUnit)> = None;
    for unit in lands.iter() {
        let (Some(transform), Some(drawable)) =
            (world.transform(unit.entity), world.drawable_3d(unit.entity))
        else {
            continue;
        };

        let bounds = drawable.world_bounds(&transform);
        let Some(t) = bounds.ray_hit_t(ray.origin, dir, 0.0, opts.max_distance) else {
            continue;
        };

        best = match best {
            None => Some((t, unit)),
            Some((bt, bu)) => {
                let ord = stable_total_cmp_f64(t, bt)
                    .then_with(|| unit.entity.index().cmp(&bu.entity.index()));
                if ord.is_lt() {
                    Some((t, unit))
                } else {
                    Some((bt, bu))
                }
            }
        };
    }

    let (t, unit) = best?;
    Some(PickHit {
        land: unit.id,
        entity: unit.entity,
        distance: t,
        point: ray.origin + dir * t,
    })
}

/// Screen picking wrapper.
///
/// The caller supplies the screen->ray mapping via `make_ray`.
pub fn pick_screen<F>(
    world: &World,
    lands: &LandMap,
    x_px: f64,
    y_px: f64,
    mut make_ray: F,
    opts: PickOptions,
) -> Option<PickHit>
where
    F: FnMut(f64, f64) -> Option<Ray>,
{
    let ray = make_ray(x_px, y_px)?;
    pick_land(world, lands, ray, opts)
}
