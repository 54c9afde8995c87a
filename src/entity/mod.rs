pub mod behavior;
pub mod interaction;

use crate::entity::interaction::InteractiveTag;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Numeric entity id assigned by the remote server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Stable id assigned by the proxy, unique for the session's lifetime and
/// never reused even when the remote server recycles numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Pig,
    Cow,
    Sheep,
    Wolf,
    ItemDrop,
    Unknown,
}

/// Category/variant description plus the rendering metadata the client
/// needs. Behavior is attached by kind through the capability table, not
/// stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefinition {
    pub kind: EntityKind,
    pub identifier: &'static str,
    pub width: f32,
    pub height: f32,
}

impl EntityDefinition {
    pub fn for_kind(kind: EntityKind) -> Self {
        let (identifier, width, height) = match kind {
            EntityKind::Player => ("player", 0.6, 1.8),
            EntityKind::Pig => ("pig", 0.9, 0.9),
            EntityKind::Cow => ("cow", 0.9, 1.4),
            EntityKind::Sheep => ("sheep", 0.9, 1.3),
            EntityKind::Wolf => ("wolf", 0.6, 0.85),
            EntityKind::ItemDrop => ("item", 0.25, 0.25),
            EntityKind::Unknown => ("unknown", 0.0, 0.0),
        };
        Self {
            kind,
            identifier,
            width,
            height,
        }
    }
}

/// Boolean capability/state flags, packed into a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityFlag {
    Saddled = 0,
    Baby = 1,
    Leashed = 2,
    NoAi = 3,
    OnFire = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityFlags(u64);

impl EntityFlags {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, flag: EntityFlag) -> Self {
        self.set(flag, true);
        self
    }

    pub fn get(&self, flag: EntityFlag) -> bool {
        self.0 & (1 << flag as u64) != 0
    }

    pub fn set(&mut self, flag: EntityFlag, value: bool) {
        let bit = 1 << flag as u64;
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

/// One simulated in-world actor, owned exclusively by its session's table.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub unique_id: UniqueId,
    pub definition: EntityDefinition,
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub head_yaw: f32,
    pub flags: EntityFlags,
    pub passengers: Vec<EntityId>,
    /// Last predicted interaction outcome, surfaced to the client as a UI
    /// hint. Refreshed by the hover translator.
    pub hover_tag: InteractiveTag,
}

impl Entity {
    pub fn flag(&self, flag: EntityFlag) -> bool {
        self.flags.get(flag)
    }

    pub fn set_flag(&mut self, flag: EntityFlag, value: bool) {
        self.flags.set(flag, value);
    }
}

/// Spawn-time pose, decoded from the remote server's spawn packet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnPose {
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub head_yaw: f32,
}

/// Per-session table of live entities, keyed by the remote server's numeric
/// id. Entities exist from first sighting until despawn or session end.
#[derive(Default)]
pub struct EntityTable {
    entities: HashMap<EntityId, Entity>,
    next_unique: u64,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entity on first sighting. A respawn under an id that is
    /// still live replaces the stale record (the remote server recycled it).
    pub fn spawn(&mut self, id: EntityId, kind: EntityKind, pose: SpawnPose) -> &mut Entity {
        self.next_unique += 1;
        let entity = Entity {
            id,
            unique_id: UniqueId(self.next_unique),
            definition: EntityDefinition::for_kind(kind),
            position: pose.position,
            velocity: pose.velocity,
            yaw: pose.yaw,
            pitch: pose.pitch,
            head_yaw: pose.head_yaw,
            flags: EntityFlags::empty(),
            passengers: Vec::new(),
            hover_tag: InteractiveTag::None,
        };
        match self.entities.entry(id) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(entity);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(entity),
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
