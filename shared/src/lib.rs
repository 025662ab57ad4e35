#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod config;
pub mod event;
pub mod fetcher;
pub mod format;
pub mod model;
pub mod pagination;
pub mod sorting;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::App as CruxApp;
pub use event::Event;
pub use model::Model;

pub const PAGE_SIZE: usize = 10;
pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY_MS: u64 = 2_000;
pub const TRANSITION_DELAY_MS: u64 = 500;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch documents. Please try again later.";
pub const LOADING_MESSAGE: &str = "Loading documents...";
pub const EMPTY_MESSAGE: &str = "No documents available. Upload a document to get started.";
pub const COPIED_TITLE: &str = "Copied!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    HttpStatus,
    EmptyResponse,
    RetriesExhausted,
    InvalidEndpoint,
    Clipboard,
    Configuration,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::HttpStatus => "HTTP_STATUS",
            Self::EmptyResponse => "EMPTY_RESPONSE",
            Self::RetriesExhausted => "RETRIES_EXHAUSTED",
            Self::InvalidEndpoint => "INVALID_ENDPOINT",
            Self::Clipboard => "CLIPBOARD_ERROR",
            Self::Configuration => "CONFIG_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::HttpStatus | Self::EmptyResponse | Self::Clipboard => {
                ErrorSeverity::Transient
            }
            Self::RetriesExhausted | Self::InvalidEndpoint | Self::Configuration => {
                ErrorSeverity::Permanent
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Terminal failure after the retry budget ran out. `cause` is the
    /// last attempt's error.
    #[must_use]
    pub fn fetch_exhausted(cause: &capabilities::FetchError, attempts: u32) -> Self {
        let cause = AppError::from(cause.clone());
        Self::new(ErrorKind::RetriesExhausted, FETCH_FAILED_MESSAGE)
            .with_internal(cause.to_string())
            .with_context("cause", cause.code())
            .with_context("attempts", attempts.to_string())
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network
            | ErrorKind::HttpStatus
            | ErrorKind::EmptyResponse
            | ErrorKind::RetriesExhausted => FETCH_FAILED_MESSAGE.into(),
            ErrorKind::InvalidEndpoint => "The deployment endpoint is not a valid URL.".into(),
            ErrorKind::Clipboard => "Could not copy to clipboard.".into(),
            ErrorKind::Configuration => self.message.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<capabilities::FetchError> for AppError {
    fn from(e: capabilities::FetchError) -> Self {
        use capabilities::FetchError;
        match e {
            FetchError::Transport { message } => AppError::new(ErrorKind::Network, message),
            FetchError::Status { status } => {
                AppError::new(ErrorKind::HttpStatus, format!("HTTP error: {status}"))
                    .with_context("http_status", status.to_string())
            }
            FetchError::EmptyBody => {
                AppError::new(ErrorKind::EmptyResponse, "documents overview had no body")
            }
        }
    }
}

impl From<capabilities::EndpointError> for AppError {
    fn from(e: capabilities::EndpointError) -> Self {
        AppError::new(ErrorKind::InvalidEndpoint, e.to_string())
    }
}

impl From<capabilities::ClipboardError> for AppError {
    fn from(e: capabilities::ClipboardError) -> Self {
        AppError::new(ErrorKind::Clipboard, e.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

// --- View model ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRow {
    pub document_id: String,
    pub document_id_short: String,
    pub user_id: Option<String>,
    pub user_id_short: String,
    pub title: String,
    pub version: String,
    pub updated_at: String,
    pub size_mb: String,
    pub metadata: String,
    pub is_selected: bool,
}

impl DocumentRow {
    fn new(doc: &model::Document, selection: &model::SelectionSet) -> Self {
        Self {
            document_id: doc.document_id.0.clone(),
            document_id_short: format::abbreviate_id(doc.document_id.as_str()),
            user_id: doc.user_id.as_ref().map(|u| u.0.clone()),
            user_id_short: doc
                .user_id
                .as_ref()
                .filter(|u| !u.as_str().is_empty())
                .map_or_else(
                    || format::NOT_AVAILABLE.to_string(),
                    |u| format::abbreviate_id(u.as_str()),
                ),
            title: doc
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(format::NOT_AVAILABLE)
                .to_string(),
            version: doc.version.to_string(),
            updated_at: format::format_updated_at(doc.updated_at.as_deref()),
            size_mb: format::format_size_mb(doc.size_in_bytes),
            metadata: format::format_metadata(&doc.metadata),
            is_selected: selection.contains(&doc.document_id),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableBody {
    Loading { message: String },
    Failed { message: String },
    Empty { message: String },
    Rows { rows: Vec<DocumentRow> },
}

impl TableBody {
    /// Rows actually drawn; status bodies draw a single row.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self {
            Self::Rows { rows } => rows.len(),
            Self::Loading { .. } | Self::Failed { .. } | Self::Empty { .. } => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogView {
    pub document_id: Option<String>,
    pub open: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub title: String,
    pub description: String,
}

impl From<&model::Toast> for ToastView {
    fn from(t: &model::Toast) -> Self {
        Self {
            title: t.title.clone(),
            description: t.description.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub body: TableBody,
    pub placeholder_rows: usize,
    pub is_transitioning: bool,
    pub pagination: Option<PaginationView>,
    pub criteria: model::FilterCriteria,
    pub selected_document_ids: Vec<String>,
    pub endpoint: Option<String>,
    pub dialog: DialogView,
    pub toast: Option<ToastView>,
}

pub mod app {
    use super::*;
    use crate::capabilities::{
        into_documents, Capabilities, DeploymentEndpoint, DocumentsOverviewRequest,
        DocumentsOverviewResponse,
    };
    use crate::event::CopyTarget;
    use crate::fetcher::{FailureAction, FetchTicket, RetryPolicy};
    use crate::model::{DocumentDialog, FetchStatus, Toast};
    use tracing::{debug, error, warn};

    #[derive(Default)]
    pub struct App;

    impl App {
        /// Opens a new fetch generation and sends its first request.
        fn start_fetch(model: &mut Model, caps: &Capabilities) {
            model.is_transitioning = false;
            match model.fetch.begin() {
                Some(ticket) => Self::send_overview_request(model, caps, ticket),
                None => debug!("no deployment endpoint yet, fetch deferred"),
            }
        }

        fn send_overview_request(model: &Model, caps: &Capabilities, ticket: FetchTicket) {
            let Some(endpoint) = model.fetch.endpoint() else {
                return;
            };
            let url = endpoint.documents_overview_url(&DocumentsOverviewRequest::default());
            debug!(
                %url,
                generation = ticket.generation(),
                attempt = ticket.attempt(),
                "requesting documents overview"
            );
            caps.http
                .get(url)
                .expect_json::<DocumentsOverviewResponse>()
                .send(move |result| Event::DocumentsFetched {
                    ticket,
                    result: into_documents(result),
                });
        }

        fn apply_endpoint(raw: Option<String>, model: &mut Model, caps: &Capabilities) {
            let endpoint = match raw.as_deref().map(DeploymentEndpoint::parse).transpose() {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    warn!(error = %e, "rejecting deployment endpoint");
                    model.fetch.close();
                    Self::reset_collection(model);
                    model.status = FetchStatus::Failed(e.into());
                    return;
                }
            };

            if model.fetch.set_endpoint(endpoint) {
                debug!(
                    endpoint = model.fetch.endpoint().map(DeploymentEndpoint::as_str),
                    "deployment endpoint changed"
                );
                Self::reset_collection(model);
                model.status = FetchStatus::Loading;
            }
            Self::start_fetch(model, caps);
        }

        /// Drops everything that belonged to the previous deployment.
        fn reset_collection(model: &mut Model) {
            model.documents.clear();
            model.selection.clear();
            model.dialog = DocumentDialog::default();
            model.pagination.go_to(1, 0);
            model.is_transitioning = false;
        }

        fn handle_fetched(
            ticket: FetchTicket,
            result: Result<Vec<model::Document>, capabilities::FetchError>,
            model: &mut Model,
            caps: &Capabilities,
        ) {
            match result {
                Ok(documents) => {
                    if !model.fetch.record_success(ticket) {
                        debug!(generation = ticket.generation(), "discarding stale documents");
                        return;
                    }
                    debug!(count = documents.len(), "documents fetched");
                    model.documents = documents;
                    if model.status.error().is_some() {
                        model.status = FetchStatus::Ready;
                    }
                    model.is_transitioning = true;
                    caps.delay.start(
                        model.config.transition_delay_ms,
                        Event::TransitionElapsed { ticket },
                    );
                }
                Err(e) => {
                    let policy = RetryPolicy::from(&model.config);
                    match model.fetch.record_failure(ticket, policy) {
                        FailureAction::Discard => {
                            debug!(generation = ticket.generation(), "discarding stale failure");
                        }
                        FailureAction::Retry {
                            ticket: next,
                            delay_ms,
                        } => {
                            warn!(
                                error = %e,
                                attempt = ticket.attempt(),
                                retry_in_ms = delay_ms,
                                "documents fetch failed, retrying"
                            );
                            caps.delay.start(delay_ms, Event::RetryDue { ticket: next });
                        }
                        FailureAction::GiveUp { attempts } => {
                            error!(error = %e, attempts, "documents fetch failed, giving up");
                            model.is_transitioning = false;
                            model.status =
                                FetchStatus::Failed(AppError::fetch_exhausted(&e, attempts));
                        }
                    }
                }
            }
        }

        fn copy_to_clipboard(text: String, target: CopyTarget, caps: &Capabilities) {
            caps.clipboard
                .write_text(text, move |result| Event::ClipboardWritten { target, result });
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(
                event = event.name(),
                user_initiated = event.is_user_initiated(),
                "processing event"
            );

            match event {
                Event::Noop => {}

                Event::EndpointChanged { endpoint } => {
                    Self::apply_endpoint(endpoint, model, caps);
                }

                Event::ViewClosed => {
                    model.fetch.close();
                    model.is_transitioning = false;
                }

                Event::RefreshRequested => {
                    if model.status.error().is_some() {
                        model.status = FetchStatus::Loading;
                    }
                    Self::start_fetch(model, caps);
                }

                Event::ConfigLoaded { config } => match model.apply_config(config) {
                    Ok(()) => debug!(page_size = config.page_size, "pipeline config applied"),
                    Err(e) => {
                        let error = AppError::from(e);
                        warn!(code = error.code(), error = %error, "rejecting pipeline config");
                    }
                },

                Event::DocumentsFetched { ticket, result } => {
                    Self::handle_fetched(ticket, result, model, caps);
                }

                Event::RetryDue { ticket } => match model.fetch.resume(ticket) {
                    Some(ticket) => Self::send_overview_request(model, caps, ticket),
                    None => debug!(generation = ticket.generation(), "retry cancelled"),
                },

                Event::TransitionElapsed { ticket } => {
                    if model.fetch.is_current(ticket) {
                        model.is_transitioning = false;
                        if model.status.is_loading() {
                            model.status = FetchStatus::Ready;
                        }
                    }
                }

                Event::SortKeySelected { sort } => {
                    model.criteria.sort = sort;
                }

                Event::SortOrderSelected { order } => {
                    model.criteria.order = order;
                }

                Event::PageChanged { page } => {
                    model.pagination.go_to(page, model.documents.len());
                }

                Event::DocumentToggled {
                    document_id,
                    checked,
                } => {
                    model.selection.toggle(document_id, checked);
                }

                Event::UploadSucceeded | Event::UpdateSucceeded { .. } => {
                    Self::start_fetch(model, caps);
                }

                Event::DeleteSucceeded => {
                    model.selection.clear();
                    Self::start_fetch(model, caps);
                }

                Event::DocumentInfoRequested { document_id } => {
                    model.dialog = DocumentDialog {
                        document_id: Some(document_id),
                        open: true,
                    };
                }

                Event::DocumentInfoClosed => {
                    model.dialog.open = false;
                }

                Event::CopyDocumentIdRequested { document_id } => {
                    Self::copy_to_clipboard(document_id.0, CopyTarget::DocumentId, caps);
                }

                Event::CopyUserIdRequested { user_id } => {
                    Self::copy_to_clipboard(user_id.0, CopyTarget::UserId, caps);
                }

                Event::ClipboardWritten { target, result } => match result {
                    Ok(()) => {
                        model.active_toast = Some(Toast::new(COPIED_TITLE, target.confirmation()));
                    }
                    Err(e) => {
                        let error = AppError::from(e);
                        warn!(code = error.code(), error = %error, ?target, "could not copy text");
                    }
                },

                Event::ToastRequested { title, description } => {
                    model.active_toast = Some(Toast::new(title, description));
                }

                Event::DismissToast => {
                    model.active_toast = None;
                }
            }

            if let Some(correction) = model.reconcile_page() {
                debug!(
                    from = correction.from,
                    to = correction.to,
                    "current page out of range, clamped"
                );
            }

            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            let sorted = model.sorted_documents();

            let body = match &model.status {
                FetchStatus::Loading => TableBody::Loading {
                    message: LOADING_MESSAGE.into(),
                },
                FetchStatus::Failed(e) => TableBody::Failed {
                    message: e.user_facing_message(),
                },
                FetchStatus::Ready if model.documents.is_empty() => TableBody::Empty {
                    message: EMPTY_MESSAGE.into(),
                },
                FetchStatus::Ready => TableBody::Rows {
                    rows: model
                        .pagination
                        .slice(&sorted)
                        .iter()
                        .map(|doc| DocumentRow::new(doc, &model.selection))
                        .collect(),
                },
            };

            let pagination = (matches!(model.status, FetchStatus::Ready) && !sorted.is_empty())
                .then(|| PaginationView {
                    current_page: model.pagination.current_page(),
                    total_pages: model.pagination.total_pages(sorted.len()),
                });

            ViewModel {
                placeholder_rows: model.pagination.placeholder_rows(body.row_count()),
                body,
                is_transitioning: model.is_transitioning,
                pagination,
                criteria: model.criteria,
                selected_document_ids: model.selection.iter().map(|id| id.0.clone()).collect(),
                endpoint: model.fetch.endpoint().map(|e| e.as_str().to_string()),
                dialog: DialogView {
                    document_id: model.dialog.document_id.as_ref().map(|id| id.0.clone()),
                    open: model.dialog.open,
                },
                toast: model.active_toast.as_ref().map(ToastView::from),
            }
        }
    }
}
