use crate::config::AuthMode;
use crate::net::frame::{decode_form_request, CHANNEL_FORM, CHANNEL_SETTINGS};
use crate::session::world_cache::SettingsDocument;
use crate::session::Session;
use crate::telemetry::logging;
use crate::translator::{Packet, PacketKind, TranslateError};

/// Handles the generic plugin-message channel: settings documents and form
/// requests. Every other channel belongs to some other collaborator and is
/// ignored here.
pub fn translate_plugin_message(
    packet: &Packet,
    session: &mut Session,
) -> Result<(), TranslateError> {
    let Packet::PluginMessage { channel, data } = packet else {
        return Err(TranslateError::MismatchedKind {
            expected: PacketKind::PluginMessage,
            actual: packet.kind(),
        });
    };

    if channel == CHANNEL_SETTINGS {
        match SettingsDocument::from_bytes(data) {
            Ok(document) => session.apply_settings(&document),
            // A broken document spoils that one message, nothing else.
            Err(err) => logging::log_error(&format!("malformed settings document: {}", err)),
        }
        return Ok(());
    }

    // Forms only flow when the auth bridge is active.
    if session.config().auth_mode != AuthMode::Bridge {
        return Ok(());
    }

    if channel == CHANNEL_FORM {
        let frame = decode_form_request(data)?;
        session.submit_form(frame, CHANNEL_FORM);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::net::frame::FrameError;
    use crate::session::testing::session_with;

    fn bridge_config() -> ProxyConfig {
        ProxyConfig {
            auth_mode: AuthMode::Bridge,
            ..ProxyConfig::default()
        }
    }

    fn plugin_message(channel: &str, data: &[u8]) -> Packet {
        Packet::PluginMessage {
            channel: channel.to_string(),
            data: data.to_vec(),
        }
    }

    fn form_request(ordinal: u8, correlation: [u8; 2], body: &str) -> Vec<u8> {
        let mut data = vec![ordinal, correlation[0], correlation[1]];
        data.extend_from_slice(body.as_bytes());
        data
    }

    #[test]
    fn settings_document_updates_the_cache() {
        let mut harness = session_with(ProxyConfig::default());
        let packet = plugin_message(
            CHANNEL_SETTINGS,
            br#"{"success":true,"settings":{"disable-scaffolding-substitution":true}}"#,
        );
        translate_plugin_message(&packet, &mut harness.session).expect("translate");
        assert!(harness.session.world_cache.disable_scaffolding_substitution());
    }

    #[test]
    fn malformed_settings_are_a_per_message_no_op() {
        let mut harness = session_with(ProxyConfig::default());
        let packet = plugin_message(CHANNEL_SETTINGS, b"{\"success\":tru");
        translate_plugin_message(&packet, &mut harness.session).expect("recoverable");
        assert!(!harness.session.world_cache.disable_scaffolding_substitution());
    }

    #[test]
    fn form_request_is_submitted_in_bridge_mode() {
        let mut harness = session_with(bridge_config());
        let packet = plugin_message(CHANNEL_FORM, &form_request(0, [0x01, 0x02], "{}"));
        translate_plugin_message(&packet, &mut harness.session).expect("translate");

        assert_eq!(harness.session.outstanding_forms(), 1);
        assert_eq!(harness.presented.lock().expect("presented").len(), 1);
    }

    #[test]
    fn form_channel_is_ignored_outside_bridge_mode() {
        let mut harness = session_with(ProxyConfig::default());
        let packet = plugin_message(CHANNEL_FORM, &form_request(0, [0x01, 0x02], "{}"));
        translate_plugin_message(&packet, &mut harness.session).expect("translate");

        assert_eq!(harness.session.outstanding_forms(), 0);
        assert!(harness.presented.lock().expect("presented").is_empty());
    }

    #[test]
    fn unknown_form_kind_fails_the_message() {
        let mut harness = session_with(bridge_config());
        let packet = plugin_message(CHANNEL_FORM, &form_request(7, [0x01, 0x02], "{}"));
        match translate_plugin_message(&packet, &mut harness.session) {
            Err(TranslateError::Frame(FrameError::UnknownFormKind(7))) => {}
            other => panic!("expected unknown form kind, got {:?}", other),
        }
        assert_eq!(harness.session.outstanding_forms(), 0);
        assert!(harness.sent.lock().expect("sent").is_empty());
    }

    #[test]
    fn unrecognized_channels_are_ignored() {
        let mut harness = session_with(bridge_config());
        let packet = plugin_message("other:channel", b"\x01\x02\x03");
        translate_plugin_message(&packet, &mut harness.session).expect("translate");
        assert_eq!(harness.session.outstanding_forms(), 0);
    }

    #[test]
    fn end_to_end_form_round_trip() {
        let mut harness = session_with(bridge_config());
        let packet = plugin_message(
            CHANNEL_FORM,
            &form_request(2, [0xbe, 0xef], r#"{"content":[]}"#),
        );
        translate_plugin_message(&packet, &mut harness.session).expect("translate");

        assert!(harness.session.deliver_form_response([0xbe, 0xef], "42"));
        let sent = harness.sent.lock().expect("sent");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, CHANNEL_FORM);
        assert_eq!(sent[0].1, vec![0xbe, 0xef, b'4', b'2']);
    }
}
