use crate::session::Session;
use crate::translator::{Packet, PacketKind, TranslateError};

pub fn translate_spawn_entity(packet: &Packet, session: &mut Session) -> Result<(), TranslateError> {
    let Packet::SpawnEntity { id, kind, pose } = packet else {
        return Err(mismatch(PacketKind::SpawnEntity, packet));
    };
    session.entities.spawn(*id, *kind, *pose);
    Ok(())
}

/// Despawns for entities the session never saw are routine (the remote
/// server culls aggressively), so an unknown id is not a fault here.
pub fn translate_remove_entity(packet: &Packet, session: &mut Session) -> Result<(), TranslateError> {
    let Packet::RemoveEntity { id } = packet else {
        return Err(mismatch(PacketKind::RemoveEntity, packet));
    };
    session.entities.remove(*id);
    Ok(())
}

pub fn translate_set_entity_flags(
    packet: &Packet,
    session: &mut Session,
) -> Result<(), TranslateError> {
    let Packet::SetEntityFlags { id, flags } = packet else {
        return Err(mismatch(PacketKind::SetEntityFlags, packet));
    };
    let entity = session
        .entities
        .get_mut(*id)
        .ok_or(TranslateError::UnknownEntity(*id))?;
    entity.flags = *flags;
    Ok(())
}

pub fn translate_set_passengers(
    packet: &Packet,
    session: &mut Session,
) -> Result<(), TranslateError> {
    let Packet::SetPassengers { id, passengers } = packet else {
        return Err(mismatch(PacketKind::SetPassengers, packet));
    };
    let entity = session
        .entities
        .get_mut(*id)
        .ok_or(TranslateError::UnknownEntity(*id))?;
    entity.passengers = passengers.clone();
    Ok(())
}

pub fn translate_player_stance(
    packet: &Packet,
    session: &mut Session,
) -> Result<(), TranslateError> {
    let Packet::PlayerStance { sneaking } = packet else {
        return Err(mismatch(PacketKind::PlayerStance, packet));
    };
    session.sneaking = *sneaking;
    Ok(())
}

fn mismatch(expected: PacketKind, packet: &Packet) -> TranslateError {
    TranslateError::MismatchedKind {
        expected,
        actual: packet.kind(),
    }
}
