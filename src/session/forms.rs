use crate::net::frame::{CorrelationId, FormKind};
use std::collections::HashMap;

/// An opaque, typed UI description on its way to the client. The body
/// format belongs to the form-kind collaborator and is not inspected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub body: String,
}

/// One-shot callback producing the outbound response frame for a form.
pub type ResponseHandler = Box<dyn FnOnce(&str) -> Vec<u8> + Send>;

struct PendingForm {
    form: Form,
    channel: String,
    handler: ResponseHandler,
}

/// Table of outstanding forms for one session, keyed by the opaque two-byte
/// correlation id.
///
/// A form is retired on the first response delivered for its id; later
/// responses find nothing and are reported as duplicates. `discard` gives an
/// external timer forced retirement without a response ever being sent.
#[derive(Default)]
pub struct FormBridge {
    pending: HashMap<CorrelationId, PendingForm>,
}

impl FormBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an outstanding form. Returns the form previously bound to
    /// the same id, if the remote reused it before retirement.
    pub fn register(
        &mut self,
        correlation: CorrelationId,
        form: Form,
        channel: &str,
        handler: ResponseHandler,
    ) -> Option<Form> {
        self.pending
            .insert(
                correlation,
                PendingForm {
                    form,
                    channel: channel.to_string(),
                    handler,
                },
            )
            .map(|stale| stale.form)
    }

    /// Invokes and retires the handler for `correlation`, returning the
    /// channel and encoded response frame to send. `None` means the form was
    /// already retired, discarded, or never existed.
    pub fn complete(
        &mut self,
        correlation: CorrelationId,
        response: &str,
    ) -> Option<(String, Vec<u8>)> {
        let pending = self.pending.remove(&correlation)?;
        let bytes = (pending.handler)(response);
        Some((pending.channel, bytes))
    }

    pub fn discard(&mut self, correlation: CorrelationId) -> bool {
        self.pending.remove(&correlation).is_some()
    }

    /// Drops every outstanding form; used on session teardown.
    pub fn discard_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    pub fn get(&self, correlation: CorrelationId) -> Option<&Form> {
        self.pending.get(&correlation).map(|pending| &pending.form)
    }
}
