pub mod config;
pub mod entity;
pub mod mapping;
pub mod net;
pub mod session;
pub mod telemetry;
pub mod translator;

pub use config::{AuthMode, ConfigError, ProxyConfig};
pub use entity::interaction::{InteractionResult, InteractiveTag};
pub use mapping::{ItemMapping, MappingCache, MappingSource};
pub use net::frame::{
    decode_form_request, encode_form_response, CorrelationId, FormKind, FormRequestFrame,
    FrameError, CHANNEL_FORM, CHANNEL_SETTINGS,
};
pub use session::forms::{Form, FormBridge};
pub use session::world_cache::{SettingsDocument, WorldCache};
pub use session::{DownstreamSender, FormPresenter, Session};
pub use translator::{
    default_registry, DispatchStats, Packet, PacketKind, TranslateError, TranslatorRegistry,
};
