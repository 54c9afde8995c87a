use crate::entity::behavior::{behavior_for, InteractionContext};
use crate::mapping::ItemMapping;
use crate::session::Session;
use crate::telemetry::logging;
use crate::translator::{Packet, PacketKind, TranslateError};

fn resolve_item(session: &mut Session, wire_id: u32) -> Result<ItemMapping, TranslateError> {
    session
        .mappings
        .resolve(wire_id)
        .ok_or(TranslateError::UnknownItem(wire_id))
}

/// Side-effect-free prediction path: refreshes the entity's interaction
/// hint for the item the local player is holding over it.
pub fn translate_hover_entity(packet: &Packet, session: &mut Session) -> Result<(), TranslateError> {
    let Packet::HoverEntity { id, item } = packet else {
        return Err(TranslateError::MismatchedKind {
            expected: PacketKind::HoverEntity,
            actual: packet.kind(),
        });
    };

    let mapping = resolve_item(session, *item)?;
    let sneaking = session.sneaking;
    let entity = session
        .entities
        .get_mut(*id)
        .ok_or(TranslateError::UnknownEntity(*id))?;

    let behavior = behavior_for(entity.definition.kind);
    let ctx = InteractionContext {
        item: &mapping,
        sneaking,
    };
    let tag = behavior.interaction_tag(entity, &ctx);
    entity.hover_tag = tag;
    Ok(())
}

/// Authoritative action path. Mutates the entity per the variant's rules and
/// refreshes the hint so it reflects the post-action state.
pub fn translate_interact_entity(
    packet: &Packet,
    session: &mut Session,
) -> Result<(), TranslateError> {
    let Packet::InteractEntity { id, item } = packet else {
        return Err(TranslateError::MismatchedKind {
            expected: PacketKind::InteractEntity,
            actual: packet.kind(),
        });
    };

    let mapping = resolve_item(session, *item)?;
    let sneaking = session.sneaking;
    let entity = session
        .entities
        .get_mut(*id)
        .ok_or(TranslateError::UnknownEntity(*id))?;

    let behavior = behavior_for(entity.definition.kind);
    let ctx = InteractionContext {
        item: &mapping,
        sneaking,
    };
    let result = behavior.interact(entity, &ctx);
    if result.consumes_action() {
        logging::log_session(&format!(
            "interaction with {} consumed: {:?}",
            entity.definition.identifier, result
        ));
    }
    let tag = behavior.interaction_tag(entity, &ctx);
    entity.hover_tag = tag;
    Ok(())
}
