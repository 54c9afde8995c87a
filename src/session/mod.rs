pub mod forms;
pub mod world_cache;

use crate::config::ProxyConfig;
use crate::entity::EntityTable;
use crate::mapping::{MappingCache, MappingSource};
use crate::net::frame::{encode_form_response, CorrelationId, FormRequestFrame};
use crate::session::forms::{Form, FormBridge};
use crate::session::world_cache::{SettingsDocument, WorldCache};
use crate::telemetry::logging;
use crate::translator::DispatchStats;
use std::sync::Arc;

/// Sends raw plugin-message payloads toward the remote server.
pub trait DownstreamSender {
    fn send_plugin_message(&mut self, channel: &str, data: &[u8]);
}

/// Hands a form to the client-facing delivery mechanism.
pub trait FormPresenter {
    fn present(&mut self, form: &Form);
}

/// Per-connection state container and processing context.
///
/// One session is processed by a single sequential stream: a packet is fully
/// translated before the next one is dispatched, so nothing here needs
/// interior locking. Sessions share only the read-only [`ProxyConfig`].
pub struct Session {
    pub entities: EntityTable,
    pub world_cache: WorldCache,
    pub mappings: MappingCache,
    pub dispatch_stats: DispatchStats,
    /// Stance of the local player, tracked from stance packets.
    pub sneaking: bool,
    forms: FormBridge,
    config: Arc<ProxyConfig>,
    downstream: Box<dyn DownstreamSender + Send>,
    presenter: Box<dyn FormPresenter + Send>,
}

impl Session {
    pub fn new(
        config: Arc<ProxyConfig>,
        mapping_source: Box<dyn MappingSource + Send>,
        downstream: Box<dyn DownstreamSender + Send>,
        presenter: Box<dyn FormPresenter + Send>,
    ) -> Self {
        Self {
            entities: EntityTable::new(),
            world_cache: WorldCache::new(&config),
            mappings: MappingCache::new(config.mapping_cache_capacity, mapping_source),
            dispatch_stats: DispatchStats::default(),
            sneaking: false,
            forms: FormBridge::new(),
            config,
            downstream,
            presenter,
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn apply_settings(&mut self, document: &SettingsDocument) {
        self.world_cache.apply_settings(document, &self.config);
    }

    /// Registers a decoded form request and hands the form to the client.
    ///
    /// The response handler echoes the request's correlation bytes in front
    /// of the UTF-8 response and fires at most once.
    pub fn submit_form(&mut self, frame: FormRequestFrame, channel: &str) {
        let correlation = frame.correlation;
        let form = Form {
            kind: frame.kind,
            body: frame.body,
        };
        let stale = self.forms.register(
            correlation,
            form.clone(),
            channel,
            Box::new(move |response| encode_form_response(correlation, response)),
        );
        if stale.is_some() {
            logging::log_session(&format!(
                "form id {:02x}{:02x} reused before retirement, dropping the stale form",
                correlation[0], correlation[1]
            ));
        }
        self.presenter.present(&form);
    }

    /// Delivers the client's response text for an outstanding form.
    ///
    /// Encodes and sends the response frame downstream exactly once per
    /// form; duplicate or late responses are logged and dropped.
    pub fn deliver_form_response(&mut self, correlation: CorrelationId, response: &str) -> bool {
        match self.forms.complete(correlation, response) {
            Some((channel, bytes)) => {
                self.downstream.send_plugin_message(&channel, &bytes);
                true
            }
            None => {
                logging::log_session(&format!(
                    "ignoring response for retired form id {:02x}{:02x}",
                    correlation[0], correlation[1]
                ));
                false
            }
        }
    }

    /// Forced retirement hook for an external form timer.
    pub fn discard_form(&mut self, correlation: CorrelationId) -> bool {
        self.forms.discard(correlation)
    }

    pub fn outstanding_forms(&self) -> usize {
        self.forms.outstanding()
    }

    /// Releases everything the session owns. Late form responses after this
    /// are no-ops, not faults.
    pub fn teardown(&mut self) {
        let dropped = self.forms.discard_all();
        if dropped > 0 {
            logging::log_session(&format!("teardown discarded {dropped} outstanding forms"));
        }
        self.entities.clear();
        logging::log_netload(&format!(
            "session closed: dispatched={} unhandled={} faulted={}",
            self.dispatch_stats.dispatched,
            self.dispatch_stats.unhandled,
            self.dispatch_stats.faulted
        ));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::mapping::ItemMapping;
    use std::sync::{Arc, Mutex};

    pub struct TableSource(pub Vec<(u32, &'static str)>);

    impl MappingSource for TableSource {
        fn resolve(&self, wire_id: u32) -> Option<ItemMapping> {
            self.0
                .iter()
                .find(|(id, _)| *id == wire_id)
                .map(|(_, identifier)| ItemMapping::new(*identifier))
        }
    }

    #[derive(Default)]
    pub struct RecordingSender(pub Arc<Mutex<Vec<(String, Vec<u8>)>>>);

    impl DownstreamSender for RecordingSender {
        fn send_plugin_message(&mut self, channel: &str, data: &[u8]) {
            if let Ok(mut sent) = self.0.lock() {
                sent.push((channel.to_string(), data.to_vec()));
            }
        }
    }

    #[derive(Default)]
    pub struct RecordingPresenter(pub Arc<Mutex<Vec<Form>>>);

    impl FormPresenter for RecordingPresenter {
        fn present(&mut self, form: &Form) {
            if let Ok(mut presented) = self.0.lock() {
                presented.push(form.clone());
            }
        }
    }

    pub struct SessionHarness {
        pub session: Session,
        pub sent: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
        pub presented: Arc<Mutex<Vec<Form>>>,
    }

    /// Builds a session over recording collaborators and a small fixed item
    /// table: 0=air, 1=carrot, 2=saddle, 3=wheat, 4=stick, 5=name tag.
    pub fn session_with(config: ProxyConfig) -> SessionHarness {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let presented = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Arc::new(config),
            Box::new(TableSource(vec![
                (0, "game:air"),
                (1, "game:carrot"),
                (2, "game:saddle"),
                (3, "game:wheat"),
                (4, "game:stick"),
                (5, "game:name_tag"),
            ])),
            Box::new(RecordingSender(Arc::clone(&sent))),
            Box::new(RecordingPresenter(Arc::clone(&presented))),
        );
        SessionHarness {
            session,
            sent,
            presented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::session_with;
    use super::*;
    use crate::net::frame::FormKind;

    fn frame(correlation: CorrelationId, body: &str) -> FormRequestFrame {
        FormRequestFrame {
            kind: FormKind::Simple,
            correlation,
            body: body.to_string(),
        }
    }

    #[test]
    fn submitted_form_reaches_the_presenter() {
        let mut harness = session_with(ProxyConfig::default());
        harness
            .session
            .submit_form(frame([0x0a, 0x0b], "{\"title\":\"t\"}"), "prism:form");

        let presented = harness.presented.lock().expect("presented");
        assert_eq!(presented.len(), 1);
        assert_eq!(presented[0].body, "{\"title\":\"t\"}");
        assert_eq!(harness.session.outstanding_forms(), 1);
    }

    #[test]
    fn response_goes_downstream_exactly_once() {
        let mut harness = session_with(ProxyConfig::default());
        harness
            .session
            .submit_form(frame([0x01, 0x02], "{}"), "prism:form");

        assert!(harness.session.deliver_form_response([0x01, 0x02], "ok"));
        assert!(!harness.session.deliver_form_response([0x01, 0x02], "ok"));

        let sent = harness.sent.lock().expect("sent");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "prism:form");
        assert_eq!(sent[0].1, vec![0x01, 0x02, b'o', b'k']);
    }

    #[test]
    fn teardown_invalidates_outstanding_forms() {
        let mut harness = session_with(ProxyConfig::default());
        harness
            .session
            .submit_form(frame([0x01, 0x02], "{}"), "prism:form");
        harness.session.teardown();

        assert_eq!(harness.session.outstanding_forms(), 0);
        assert!(!harness.session.deliver_form_response([0x01, 0x02], "late"));
        assert!(harness.sent.lock().expect("sent").is_empty());
    }

    #[test]
    fn external_discard_blocks_delivery() {
        let mut harness = session_with(ProxyConfig::default());
        harness
            .session
            .submit_form(frame([0x07, 0x08], "{}"), "prism:form");
        assert!(harness.session.discard_form([0x07, 0x08]));
        assert!(!harness.session.deliver_form_response([0x07, 0x08], "late"));
        assert!(harness.sent.lock().expect("sent").is_empty());
    }
}
