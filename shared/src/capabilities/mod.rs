mod clipboard;
mod delay;
mod http;

pub use self::clipboard::{Clipboard, ClipboardError, ClipboardOperation, ClipboardResult};
pub use self::delay::{Delay, DelayOperation};
pub use self::http::{
    into_documents, DeploymentEndpoint, DocumentsOverviewRequest, DocumentsOverviewResponse,
    EndpointError, FetchError, DOCUMENTS_OVERVIEW_PATH,
};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
    pub delay: Delay<Event>,
    pub clipboard: Clipboard<Event>,
}
