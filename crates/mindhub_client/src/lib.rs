//! Mindhub client: HTTP transport, backend routes and the request engine
//! that executes core effects.
pub mod endpoints;
mod engine;
mod persist;
mod transport;
mod types;

pub use endpoints::Reviewable;
pub use engine::{EngineHandle, ViewScope};
pub use persist::{ensure_output_dir, export_json, PersistError};
pub use transport::{ClientSettings, ReqwestTransport, Transport};
pub use types::{
    ApiRequest, ApiResponse, EngineEvent, FailureKind, FetchError, Method, RequestBody, Ticket,
};
