use foundation::color::Color;

use crate::components::{Drawable3D, Transform};
use crate::entity::EntityId;
use crate::environment::{DirectionalLight, Environment};
use foundation::handles::Handle;

/// Scene graph: renderable entities plus the environment they are lit by.
///
/// Components live in parallel vectors indexed by `EntityId::index()`.
/// Entities are never despawned, so generations stay at 0.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    transforms: Vec<Option<Transform>>,
    drawables_3d: Vec<Option<Drawable3D>>,
    environment: Environment,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(Handle::new(self.next_index, 0));
        self.next_index += 1;
        self.ensure_capacity(id.index() as usize);
        id
    }

    pub fn entity_count(&self) -> usize {
        self.next_index as usize
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        self.ensure_capacity(entity.index() as usize);
        self.transforms[entity.index() as usize] = Some(transform);
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.transforms
            .get(entity.index() as usize)
            .and_then(|t| *t)
    }

    pub fn set_drawable_3d(&mut self, entity: EntityId, drawable: Drawable3D) {
        self.ensure_capacity(entity.index() as usize);
        self.drawables_3d[entity.index() as usize] = Some(drawable);
    }

    pub fn drawable_3d(&self, entity: EntityId) -> Option<Drawable3D> {
        self.drawables_3d
            .get(entity.index() as usize)
            .and_then(|d| *d)
    }

    /// Recolors the entity's material. Returns `false` if it has no drawable.
    pub fn set_material_color(&mut self, entity: EntityId, color: Color) -> bool {
        let Some(Some(drawable)) = self.drawables_3d.get_mut(entity.index() as usize) else {
            return false;
        };
        drawable.material.set_color(color);
        true
    }

    pub fn set_background(&mut self, color: Color) {
        self.environment.background = color;
    }

    pub fn add_light(&mut self, light: DirectionalLight) {
        self.environment.lights.push(light);
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Entities that have both a transform and a drawable, in spawn order.
    pub fn drawables_3d(&self) -> Vec<(EntityId, Transform, Drawable3D)> {
        let mut out = Vec::new();
        for (idx, drawable) in self.drawables_3d.iter().enumerate() {
            let Some(drawable) = drawable else { continue };
            let Some(transform) = self.transforms.get(idx).and_then(|t| *t) else {
                continue;
            };
            out.push((EntityId(Handle::new(idx as u32, 0)), transform, *drawable));
        }
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.transforms.resize(new_len, None);
            self.drawables_3d.resize(new_len, None);
        }
    }
}
