pub mod entity_state;
pub mod interact;
pub mod plugin_message;

use crate::entity::{EntityFlags, EntityId, EntityKind, SpawnPose};
use crate::net::frame::FrameError;
use crate::session::Session;
use crate::telemetry::logging;
use std::collections::HashMap;

/// A fully-decoded inbound message. Decoding from the outer transport is the
/// protocol library's job; translators only ever see these.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    PluginMessage {
        channel: String,
        data: Vec<u8>,
    },
    SpawnEntity {
        id: EntityId,
        kind: EntityKind,
        pose: SpawnPose,
    },
    RemoveEntity {
        id: EntityId,
    },
    SetEntityFlags {
        id: EntityId,
        flags: EntityFlags,
    },
    SetPassengers {
        id: EntityId,
        passengers: Vec<EntityId>,
    },
    PlayerStance {
        sneaking: bool,
    },
    HoverEntity {
        id: EntityId,
        item: u32,
    },
    InteractEntity {
        id: EntityId,
        item: u32,
    },
}

/// Type discriminant used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    PluginMessage,
    SpawnEntity,
    RemoveEntity,
    SetEntityFlags,
    SetPassengers,
    PlayerStance,
    HoverEntity,
    InteractEntity,
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::PluginMessage { .. } => PacketKind::PluginMessage,
            Packet::SpawnEntity { .. } => PacketKind::SpawnEntity,
            Packet::RemoveEntity { .. } => PacketKind::RemoveEntity,
            Packet::SetEntityFlags { .. } => PacketKind::SetEntityFlags,
            Packet::SetPassengers { .. } => PacketKind::SetPassengers,
            Packet::PlayerStance { .. } => PacketKind::PlayerStance,
            Packet::HoverEntity { .. } => PacketKind::HoverEntity,
            Packet::InteractEntity { .. } => PacketKind::InteractEntity,
        }
    }
}

#[derive(Debug)]
pub enum TranslateError {
    /// A translator was handed a packet of a kind it was not registered for.
    MismatchedKind {
        expected: PacketKind,
        actual: PacketKind,
    },
    Frame(FrameError),
    UnknownEntity(EntityId),
    UnknownItem(u32),
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::MismatchedKind { expected, actual } => {
                write!(f, "expected {:?} packet, got {:?}", expected, actual)
            }
            TranslateError::Frame(err) => write!(f, "{}", err),
            TranslateError::UnknownEntity(id) => write!(f, "no entity with id {}", id.0),
            TranslateError::UnknownItem(wire_id) => {
                write!(f, "no item mapping for wire id {}", wire_id)
            }
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<FrameError> for TranslateError {
    fn from(err: FrameError) -> Self {
        TranslateError::Frame(err)
    }
}

pub type TranslatorFn = fn(&Packet, &mut Session) -> Result<(), TranslateError>;

/// Per-session dispatch accounting, reported to `netload.log` on teardown.
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    pub dispatched: u64,
    pub unhandled: u64,
    pub faulted: u64,
}

/// Maps packet kinds to translators.
///
/// Built once at startup and shared read-only between sessions; dispatch
/// never mutates the table. Registering a kind twice replaces the earlier
/// binding, which is how override layers install themselves.
#[derive(Default)]
pub struct TranslatorRegistry {
    table: HashMap<PacketKind, TranslatorFn>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `translator` to `kind`, returning the previous binding if any.
    pub fn register(&mut self, kind: PacketKind, translator: TranslatorFn) -> Option<TranslatorFn> {
        self.table.insert(kind, translator)
    }

    pub fn is_registered(&self, kind: PacketKind) -> bool {
        self.table.contains_key(&kind)
    }

    /// Runs the translator bound to the packet's kind on the session.
    ///
    /// Unhandled kinds are dropped silently; many are deliberately left
    /// unbound. A translator error is logged with the packet kind and does
    /// not propagate: one misbehaving translator must not take down the
    /// connection.
    pub fn dispatch(&self, packet: &Packet, session: &mut Session) {
        let Some(translator) = self.table.get(&packet.kind()) else {
            session.dispatch_stats.unhandled += 1;
            return;
        };
        session.dispatch_stats.dispatched += 1;
        if let Err(err) = translator(packet, session) {
            session.dispatch_stats.faulted += 1;
            logging::log_error(&format!(
                "translator for {:?} failed: {}",
                packet.kind(),
                err
            ));
        }
    }
}

/// The registry with every built-in translator bound.
pub fn default_registry() -> TranslatorRegistry {
    let mut registry = TranslatorRegistry::new();
    registry.register(
        PacketKind::PluginMessage,
        plugin_message::translate_plugin_message,
    );
    registry.register(PacketKind::SpawnEntity, entity_state::translate_spawn_entity);
    registry.register(PacketKind::RemoveEntity, entity_state::translate_remove_entity);
    registry.register(
        PacketKind::SetEntityFlags,
        entity_state::translate_set_entity_flags,
    );
    registry.register(
        PacketKind::SetPassengers,
        entity_state::translate_set_passengers,
    );
    registry.register(
        PacketKind::PlayerStance,
        entity_state::translate_player_stance,
    );
    registry.register(PacketKind::HoverEntity, interact::translate_hover_entity);
    registry.register(PacketKind::InteractEntity, interact::translate_interact_entity);
    registry
}
