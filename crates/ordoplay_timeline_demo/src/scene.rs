// SPDX-License-Identifier: MIT OR Apache-2.0
//! Minimal headless scene that owns entities and their timelines.

use indexmap::IndexMap;
use ordoplay_timeline::{
    Color, SpriteId, Target, TargetHandle, Timeline, TimelineError, TimelineSettings, Vec3,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene object that timelines can drive
#[derive(Debug, Clone)]
pub struct SceneEntity {
    /// Entity ID
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Sprite tint, if the entity renders a sprite
    pub color: Option<Color>,
    /// Current sprite, if the entity renders a sprite
    pub sprite: Option<SpriteId>,
    removed: bool,
}

impl SceneEntity {
    /// Create an entity without a sprite renderer
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            position,
            color: None,
            sprite: None,
            removed: false,
        }
    }

    /// Attach a sprite renderer
    pub fn with_sprite(mut self, sprite: SpriteId, color: Color) -> Self {
        self.sprite = Some(sprite);
        self.color = Some(color);
        self
    }
}

impl Target for SceneEntity {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    fn color_mut(&mut self) -> Option<&mut Color> {
        self.color.as_mut()
    }

    fn sprite(&self) -> Option<&SpriteId> {
        self.sprite.as_ref()
    }

    fn sprite_mut(&mut self) -> Option<&mut SpriteId> {
        self.sprite.as_mut()
    }

    fn remove(&mut self) {
        tracing::info!("Removing entity {}", self.name);
        self.removed = true;
    }

    fn is_removed(&self) -> bool {
        self.removed
    }
}

/// Sprite names mapped to IDs
#[derive(Debug, Default)]
pub struct SpriteAtlas {
    sprites: IndexMap<String, SpriteId>,
}

impl SpriteAtlas {
    /// Get the ID for `name`, registering it on first use
    pub fn sprite(&mut self, name: &str) -> SpriteId {
        *self.sprites.entry(name.to_string()).or_default()
    }

    /// Find the name of a sprite
    pub fn name_of(&self, sprite: SpriteId) -> Option<&str> {
        self.sprites
            .iter()
            .find(|(_, id)| **id == sprite)
            .map(|(name, _)| name.as_str())
    }
}

/// Entities plus the timelines animating them
pub struct Scene {
    entities: IndexMap<EntityId, TargetHandle<SceneEntity>>,
    timelines: Vec<Timeline<SceneEntity>>,
    settings: TimelineSettings,
}

impl Scene {
    /// Create an empty scene; new timelines use `settings`
    pub fn new(settings: TimelineSettings) -> Self {
        Self {
            entities: IndexMap::new(),
            timelines: Vec::new(),
            settings,
        }
    }

    /// Add an entity
    pub fn spawn(&mut self, entity: SceneEntity) -> EntityId {
        let id = entity.id;
        tracing::debug!("Spawned entity {} ({:?})", entity.name, id);
        self.entities.insert(id, Rc::new(RefCell::new(entity)));
        id
    }

    /// Get an entity handle
    pub fn entity(&self, id: EntityId) -> Option<&TargetHandle<SceneEntity>> {
        self.entities.get(&id)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of timelines still bound to a live entity
    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    /// Whether every timeline has run out of steps
    pub fn is_settled(&self) -> bool {
        self.timelines
            .iter()
            .all(|timeline| timeline.is_idle() && timeline.pending_steps() == 0)
    }

    /// Build a timeline for `id` and hand it to the scene
    pub fn animate<F>(&mut self, id: EntityId, build: F) -> Result<(), TimelineError>
    where
        F: FnOnce(&mut Timeline<SceneEntity>) -> Result<&mut Timeline<SceneEntity>, TimelineError>,
    {
        let handle = self.entities.get(&id).ok_or(TimelineError::TargetReleased)?;
        let mut timeline = Timeline::with_settings(handle, self.settings.clone());
        build(&mut timeline)?;
        self.timelines.push(timeline);
        Ok(())
    }

    /// Advance every timeline, then drop removed entities and orphaned timelines
    pub fn update(&mut self, delta: f32) {
        for timeline in &mut self.timelines {
            if let Err(e) = timeline.tick(delta) {
                tracing::warn!("Timeline {} step failed: {}", timeline.name(), e);
            }
        }

        self.entities.retain(|_, entity| !entity.borrow().is_removed());
        self.timelines.retain(|timeline| !timeline.is_orphaned());
    }

    /// Iterate over live entities in spawn order
    pub fn entities(&self) -> impl Iterator<Item = &TargetHandle<SceneEntity>> {
        self.entities.values()
    }
}
