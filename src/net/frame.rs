use crate::net::wire::{WireReader, WireWriter};

/// Settings documents from the remote server arrive on this channel.
pub const CHANNEL_SETTINGS: &str = "prism:settings";
/// UI form requests/responses are exchanged on this channel.
pub const CHANNEL_FORM: &str = "prism:form";

/// Closed enumeration of form kinds carried on the form channel.
///
/// The ordinal is the first byte of every request frame; anything outside
/// this enumeration is a protocol violation, not a forward-compatible value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Simple,
    Modal,
    Custom,
}

impl FormKind {
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(FormKind::Simple),
            1 => Some(FormKind::Modal),
            2 => Some(FormKind::Custom),
            _ => None,
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            FormKind::Simple => 0,
            FormKind::Modal => 1,
            FormKind::Custom => 2,
        }
    }
}

/// Two opaque bytes linking a form response to its originating request.
///
/// Copied verbatim from request to response; never interpreted as an
/// integer of either endianness.
pub type CorrelationId = [u8; 2];

/// A decoded form request frame: `[kind:1][correlation:2][utf8 body]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequestFrame {
    pub kind: FormKind,
    pub correlation: CorrelationId,
    pub body: String,
}

#[derive(Debug)]
pub enum FrameError {
    Truncated { expected: usize, actual: usize },
    UnknownFormKind(u8),
    InvalidBody(std::str::Utf8Error),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Truncated { expected, actual } => {
                write!(f, "form frame truncated: need {} bytes, got {}", expected, actual)
            }
            FrameError::UnknownFormKind(ordinal) => {
                write!(f, "unrecognized form kind ordinal {}", ordinal)
            }
            FrameError::InvalidBody(err) => {
                write!(f, "form body is not valid UTF-8: {}", err)
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// Decodes a request frame received on the form channel.
///
/// An ordinal outside [`FormKind`] fails fast: the remaining bytes cannot be
/// interpreted without knowing the kind.
pub fn decode_form_request(data: &[u8]) -> Result<FormRequestFrame, FrameError> {
    const HEADER_LEN: usize = 3;
    let truncated = || FrameError::Truncated {
        expected: HEADER_LEN,
        actual: data.len(),
    };

    let mut reader = WireReader::new(data);
    let ordinal = reader.read_u8().ok_or_else(truncated)?;
    let kind = FormKind::from_ordinal(ordinal).ok_or(FrameError::UnknownFormKind(ordinal))?;
    let correlation = reader.read_array::<2>().ok_or_else(truncated)?;
    let body = std::str::from_utf8(reader.read_remainder())
        .map_err(FrameError::InvalidBody)?
        .to_string();

    Ok(FormRequestFrame {
        kind,
        correlation,
        body,
    })
}

/// Encodes a response frame: `[correlation:2][utf8 response]`, no delimiter.
pub fn encode_form_response(correlation: CorrelationId, response: &str) -> Vec<u8> {
    let mut writer = WireWriter::with_capacity(correlation.len() + response.len());
    writer.write_bytes(&correlation);
    writer.write_str(response);
    writer.into_vec()
}
