use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::config::{ConfigError, PipelineConfig};
use crate::fetcher::FetchSession;
use crate::pagination::{PageCorrection, Paginator};
use crate::sorting;
use crate::AppError;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(DocumentId);
typed_id!(UserId);

/// The service reports versions either as a label (`"v0"`) or a bare number.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum DocumentVersion {
    Number(serde_json::Number),
    Label(String),
}

impl Default for DocumentVersion {
    fn default() -> Self {
        Self::Label(String::new())
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

/// Read-only snapshot of a document as returned by the overview endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Document {
    pub document_id: DocumentId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: DocumentVersion,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_size")]
    pub size_in_bytes: u64,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

// Malformed values decode to the default rather than failing the overview.

fn lenient_version<'de, D: Deserializer<'de>>(d: D) -> Result<DocumentVersion, D::Error> {
    Ok(match serde_json::Value::deserialize(d)? {
        serde_json::Value::Number(n) => DocumentVersion::Number(n),
        serde_json::Value::String(s) => DocumentVersion::Label(s),
        _ => DocumentVersion::default(),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_size<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .unwrap_or(0))
}

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Title,
    Date,
}

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    pub sort: SortKey,
    pub order: SortOrder,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum FetchStatus {
    Loading,
    Failed(AppError),
    Ready,
}

impl Default for FetchStatus {
    fn default() -> Self {
        Self::Loading
    }
}

impl FetchStatus {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn error(&self) -> Option<&AppError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Checked rows, in the order they were checked.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet(Vec<DocumentId>);

impl SelectionSet {
    pub fn toggle(&mut self, id: DocumentId, checked: bool) {
        if checked {
            if !self.0.contains(&id) {
                self.0.push(id);
            }
        } else {
            self.0.retain(|selected| selected != &id);
        }
    }

    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.0.contains(id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentId> {
        self.0.iter()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentDialog {
    pub document_id: Option<DocumentId>,
    pub open: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Model {
    pub config: PipelineConfig,
    pub fetch: FetchSession,
    pub status: FetchStatus,
    pub is_transitioning: bool,

    pub documents: Vec<Document>,
    pub criteria: FilterCriteria,
    pub pagination: Paginator,
    pub selection: SelectionSet,

    pub dialog: DocumentDialog,
    pub active_toast: Option<Toast>,
}

impl Default for Model {
    fn default() -> Self {
        let config = PipelineConfig::default();
        Self {
            config,
            fetch: FetchSession::default(),
            status: FetchStatus::Loading,
            is_transitioning: false,
            documents: Vec::new(),
            criteria: FilterCriteria::default(),
            pagination: Paginator::new(config.page_size),
            selection: SelectionSet::default(),
            dialog: DocumentDialog::default(),
            active_toast: None,
        }
    }
}

impl Model {
    /// Swaps in a shell-provided config and restarts paging at page 1.
    pub fn apply_config(&mut self, config: PipelineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.pagination = Paginator::new(config.page_size);
        Ok(())
    }

    /// Documents in display order for the current criteria.
    #[must_use]
    pub fn sorted_documents(&self) -> Vec<&Document> {
        sorting::project(&self.documents, self.criteria)
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.documents.len())
    }

    /// Re-establishes the page bound after anything that may have shrunk
    /// the collection.
    pub fn reconcile_page(&mut self) -> Option<PageCorrection> {
        self.pagination.reconcile(self.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_deserializes_from_overview_payload() {
        let raw = r#"{
            "document_id": "9fbe403b-c11c-5aae-8ade-ef22980c3ad1",
            "user_id": "2acb499e-8428-543b-bd85-0d9098718220",
            "title": "aristotle.txt",
            "version": "v0",
            "updated_at": "2024-06-05T16:26:12.418452Z",
            "size_in_bytes": 73353,
            "metadata": {"title": "aristotle.txt"}
        }"#;
        let doc: Document = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.document_id.as_str(), "9fbe403b-c11c-5aae-8ade-ef22980c3ad1");
        assert_eq!(doc.version.to_string(), "v0");
        assert_eq!(doc.size_in_bytes, 73_353);
        assert_eq!(doc.metadata["title"], "aristotle.txt");
    }

    #[test]
    fn document_tolerates_missing_optional_fields() {
        let doc: Document =
            serde_json::from_str(r#"{"document_id": "abc", "version": 2}"#).unwrap();
        assert_eq!(doc.user_id, None);
        assert_eq!(doc.title, None);
        assert_eq!(doc.version.to_string(), "2");
        assert_eq!(doc.size_in_bytes, 0);
        assert!(doc.metadata.is_null());
    }

    #[test]
    fn malformed_size_and_version_fall_back_to_defaults() {
        let raw = r#"{"results": [
            {"document_id": "a", "size_in_bytes": null, "version": null},
            {"document_id": "b", "size_in_bytes": 1536.75, "version": {"major": 1}},
            {"document_id": "c", "size_in_bytes": "big", "version": "v3"},
            {"document_id": "d", "size_in_bytes": -4}
        ]}"#;
        let response: crate::capabilities::DocumentsOverviewResponse =
            serde_json::from_str(raw).unwrap();
        let sizes: Vec<u64> = response.results.iter().map(|d| d.size_in_bytes).collect();
        assert_eq!(sizes, [0, 1536, 0, 0]);
        assert_eq!(response.results[0].version, DocumentVersion::default());
        assert_eq!(response.results[1].version, DocumentVersion::default());
        assert_eq!(response.results[2].version.to_string(), "v3");
    }

    #[test]
    fn selection_toggle_is_idempotent() {
        let mut selection = SelectionSet::default();
        let id = DocumentId::new("a");
        selection.toggle(id.clone(), true);
        selection.toggle(id.clone(), true);
        assert_eq!(selection.len(), 1);

        selection.toggle(id.clone(), false);
        assert!(!selection.contains(&id));
        assert!(selection.is_empty());
    }

    #[test]
    fn selection_keeps_check_order() {
        let mut selection = SelectionSet::default();
        for id in ["c", "a", "b"] {
            selection.toggle(DocumentId::new(id), true);
        }
        let ids: Vec<_> = selection.iter().map(DocumentId::as_str).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn default_model_starts_loading_on_first_page() {
        let model = Model::default();
        assert!(model.status.is_loading());
        assert_eq!(model.pagination.current_page(), 1);
        assert_eq!(model.criteria, FilterCriteria::default());
    }

    #[test]
    fn invalid_config_leaves_model_untouched() {
        let mut model = Model::default();
        let config = PipelineConfig {
            page_size: 0,
            ..PipelineConfig::default()
        };
        assert!(model.apply_config(config).is_err());
        assert_eq!(model.config, PipelineConfig::default());
        assert_eq!(model.pagination.page_size(), 10);
    }

    #[test]
    fn applied_config_resizes_pages() {
        let mut model = Model::default();
        model.pagination.go_to(2, 30);
        let config = PipelineConfig {
            page_size: 25,
            ..PipelineConfig::default()
        };
        model.apply_config(config).unwrap();
        assert_eq!(model.pagination.page_size(), 25);
        assert_eq!(model.pagination.current_page(), 1);
    }
}
