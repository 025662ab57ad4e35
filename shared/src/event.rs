use serde::{Deserialize, Serialize};

use crate::capabilities::{ClipboardResult, FetchError};
use crate::config::PipelineConfig;
use crate::fetcher::FetchTicket;
use crate::model::{Document, DocumentId, SortKey, SortOrder, UserId};

/// Which identifier a clipboard write carried, for the confirmation toast.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyTarget {
    DocumentId,
    UserId,
}

impl CopyTarget {
    #[must_use]
    pub const fn confirmation(self) -> &'static str {
        match self {
            Self::DocumentId => "Document ID copied to clipboard",
            Self::UserId => "User ID copied to clipboard",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub enum Event {
    #[default]
    Noop,

    // Lifecycle
    EndpointChanged {
        endpoint: Option<String>,
    },
    ViewClosed,
    RefreshRequested,
    ConfigLoaded {
        config: PipelineConfig,
    },

    // Fetch pipeline
    DocumentsFetched {
        ticket: FetchTicket,
        result: Result<Vec<Document>, FetchError>,
    },
    RetryDue {
        ticket: FetchTicket,
    },
    TransitionElapsed {
        ticket: FetchTicket,
    },

    // Filter menu & pagination
    SortKeySelected {
        sort: SortKey,
    },
    SortOrderSelected {
        order: SortOrder,
    },
    PageChanged {
        page: usize,
    },

    // Selection
    DocumentToggled {
        document_id: DocumentId,
        checked: bool,
    },

    // Collaborator widgets
    UploadSucceeded,
    UpdateSucceeded {
        document_id: DocumentId,
    },
    DeleteSucceeded,
    DocumentInfoRequested {
        document_id: DocumentId,
    },
    DocumentInfoClosed,

    // Clipboard & notifications
    CopyDocumentIdRequested {
        document_id: DocumentId,
    },
    CopyUserIdRequested {
        user_id: UserId,
    },
    ClipboardWritten {
        target: CopyTarget,
        result: ClipboardResult,
    },
    ToastRequested {
        title: String,
        description: String,
    },
    DismissToast,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::EndpointChanged { .. } => "endpoint_changed",
            Self::ViewClosed => "view_closed",
            Self::RefreshRequested => "refresh_requested",
            Self::ConfigLoaded { .. } => "config_loaded",
            Self::DocumentsFetched { .. } => "documents_fetched",
            Self::RetryDue { .. } => "retry_due",
            Self::TransitionElapsed { .. } => "transition_elapsed",
            Self::SortKeySelected { .. } => "sort_key_selected",
            Self::SortOrderSelected { .. } => "sort_order_selected",
            Self::PageChanged { .. } => "page_changed",
            Self::DocumentToggled { .. } => "document_toggled",
            Self::UploadSucceeded => "upload_succeeded",
            Self::UpdateSucceeded { .. } => "update_succeeded",
            Self::DeleteSucceeded => "delete_succeeded",
            Self::DocumentInfoRequested { .. } => "document_info_requested",
            Self::DocumentInfoClosed => "document_info_closed",
            Self::CopyDocumentIdRequested { .. } => "copy_document_id_requested",
            Self::CopyUserIdRequested { .. } => "copy_user_id_requested",
            Self::ClipboardWritten { .. } => "clipboard_written",
            Self::ToastRequested { .. } => "toast_requested",
            Self::DismissToast => "dismiss_toast",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::RefreshRequested
                | Self::SortKeySelected { .. }
                | Self::SortOrderSelected { .. }
                | Self::PageChanged { .. }
                | Self::DocumentToggled { .. }
                | Self::DocumentInfoRequested { .. }
                | Self::DocumentInfoClosed
                | Self::CopyDocumentIdRequested { .. }
                | Self::CopyUserIdRequested { .. }
                | Self::DismissToast
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_and_fetch_events_are_not_user_initiated() {
        assert!(!Event::ViewClosed.is_user_initiated());
        assert!(!Event::UploadSucceeded.is_user_initiated());
        assert!(!Event::ConfigLoaded {
            config: PipelineConfig::default()
        }
        .is_user_initiated());
        assert!(Event::PageChanged { page: 2 }.is_user_initiated());
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = Event::SortKeySelected {
            sort: SortKey::Date,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"SortKeySelected":{"sort":"date"}}"#);
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn copy_targets_name_their_field() {
        assert_eq!(
            CopyTarget::DocumentId.confirmation(),
            "Document ID copied to clipboard"
        );
        assert_eq!(CopyTarget::UserId.confirmation(), "User ID copied to clipboard");
    }

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(size <= 128, "Event enum is {size} bytes");
    }
}
