use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClipboardOperation {
    WriteText { text: String },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    PermissionDenied,

    #[error("clipboard unavailable on this platform")]
    Unavailable,

    #[error("clipboard write failed: {message}")]
    WriteFailed { message: String },
}

pub type ClipboardResult = Result<(), ClipboardError>;

impl Operation for ClipboardOperation {
    type Output = ClipboardResult;
}

pub struct Clipboard<Ev> {
    context: CapabilityContext<ClipboardOperation, Ev>,
}

impl<Ev> Capability<Ev> for Clipboard<Ev> {
    type Operation = ClipboardOperation;
    type MappedSelf<MappedEv> = Clipboard<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Clipboard::new(self.context.map_event(f))
    }
}

impl<Ev> Clipboard<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ClipboardOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn write_text<F>(&self, text: String, callback: F)
    where
        F: FnOnce(ClipboardResult) -> Ev + Send + 'static,
        Ev: Send,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(ClipboardOperation::WriteText { text })
                .await;
            ctx.update_app(callback(result));
        });
    }
}
