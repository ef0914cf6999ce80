//! Scout core: pure session state machine and wire codec for the
//! streaming meta-search client.
mod effect;
mod msg;
mod protocol;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use protocol::{decode_inbound, encode_search, Decoded, SearchHit, SessionId, SourceError};
pub use state::{AppState, ConnectionState, SourceFilter};
pub use update::update;
pub use view_model::AppViewModel;
