//! The viewer: manifest loading, document loading and navigation state.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sw_manifest::{Manifest, NodeKey};
use sw_renderer::{MarkdownRenderer, RenderResult};
use sw_source::{DocSource, SourceError, SourceErrorKind};

use crate::nav::{NavEvent, NavItem, NavOptions, build_navigation};
use crate::state::{
    DEFAULT_CONTENT, NO_DOCUMENTS_CONTENT, Phase, ViewerError, ViewerState, error_document,
};

/// Viewer configuration.
#[derive(Clone, Debug, Default)]
pub struct ViewerOptions {
    /// Sidebar behavior.
    pub nav: NavOptions,
    /// Prefix for rewritten document links (e.g. `/help?doc=`).
    pub link_prefix: Option<String>,
    /// Prefix for relative images (e.g. `/help/docs`).
    pub asset_prefix: Option<String>,
}

/// Ticket for one document request, issued by [`Viewer::begin_document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRequest {
    seq: u64,
    path: String,
}

impl DocumentRequest {
    /// Requested path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sequence number; later requests have larger numbers.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened to a completed document request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Content replaced with the fetched document.
    Committed,
    /// Content replaced with the error document.
    Failed,
    /// A newer request was issued first; the result was dropped.
    Stale,
}

/// Everything a page needs to draw the viewer.
#[derive(Clone, Debug)]
pub struct ViewerView {
    pub phase: Phase,
    /// Banner to show, if any.
    pub banner: Option<ViewerError>,
    pub navigation: Vec<NavItem>,
    pub selected_path: Option<String>,
    /// Expanded sections the navigation was built with.
    pub expanded: BTreeSet<NodeKey>,
    /// Rendered `content`.
    pub document: RenderResult,
}

/// Documentation viewer.
///
/// Owns one [`ViewerState`]. Fetches run on the blocking pool and the state
/// lock is never held across an await, so a shared viewer can serve
/// overlapping requests; the newest document request always wins.
pub struct Viewer {
    source: Arc<dyn DocSource>,
    options: ViewerOptions,
    state: Mutex<ViewerState>,
    /// Newest issued request sequence number.
    latest: AtomicU64,
    mounted: AtomicBool,
    /// Expand the initial document's sections on mount.
    reveal_on_mount: bool,
}

impl Viewer {
    /// Create an unmounted viewer in the `LoadingManifest` phase.
    #[must_use]
    pub fn new(source: Arc<dyn DocSource>, options: ViewerOptions) -> Self {
        Self {
            source,
            options,
            state: Mutex::new(ViewerState::default()),
            latest: AtomicU64::new(0),
            mounted: AtomicBool::new(false),
            reveal_on_mount: true,
        }
    }

    /// Start with exactly the given sections expanded.
    ///
    /// Mounting no longer reveals the initial document, so a caller that
    /// tracks expansion itself can keep a section collapsed.
    #[must_use]
    pub fn with_expanded(mut self, keys: impl IntoIterator<Item = NodeKey>) -> Self {
        self.lock().expanded.extend(keys);
        self.reveal_on_mount = false;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ViewerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the manifest and the first document.
    ///
    /// Only the first call on a viewer does anything.
    pub async fn mount(&self) {
        self.mount_at(None).await;
    }

    /// Load the manifest, then `initial` instead of the first document.
    ///
    /// `initial` applies only when the manifest lists at least one file. In
    /// the expandable variant the sections enclosing it are expanded unless
    /// the expansion was given with [`Viewer::with_expanded`]. Only the first
    /// mount call on a viewer does anything.
    pub async fn mount_at(&self, initial: Option<&str>) {
        if self.mounted.swap(true, Ordering::SeqCst) {
            tracing::debug!("Viewer already mounted");
            return;
        }

        let Some(first) = self.load_manifest().await else {
            return;
        };
        let path = initial
            .filter(|p| !p.is_empty())
            .unwrap_or(first.as_str())
            .to_owned();
        if self.reveal_on_mount {
            self.reveal(&path);
        }
        self.load_document(&path).await;
    }

    /// Fetch and parse the manifest.
    ///
    /// Returns the first document path when the manifest lists files. On
    /// failure the fallback document is shown with an empty menu; with no
    /// files the viewer settles in [`Phase::ManifestError`].
    pub async fn load_manifest(&self) -> Option<String> {
        self.lock().phase = Phase::LoadingManifest;

        let source = Arc::clone(&self.source);
        let fetched = run_blocking(move || source.fetch_manifest()).await;
        let parsed = fetched.map_err(|e| e.to_string()).and_then(|text| {
            Manifest::from_json(&text).map_err(|e| e.to_string())
        });

        let mut state = self.lock();
        let manifest = match parsed {
            Ok(manifest) => manifest,
            Err(message) => {
                let error = ViewerError::ManifestUnavailable { message };
                tracing::warn!(source = %self.source.describe(), "{error}");
                state.menu = None;
                state.content = DEFAULT_CONTENT.to_owned();
                state.error = None;
                state.phase = Phase::Ready;
                return None;
            }
        };

        let issues = manifest.validate();
        for issue in &issues {
            tracing::debug!(%issue, "Manifest issue");
        }
        if !issues.is_empty() {
            tracing::warn!(count = issues.len(), "Manifest has structural issues");
        }

        let first = manifest.first_file().map(ToOwned::to_owned);
        tracing::info!(
            source = %self.source.describe(),
            files = manifest.files().len(),
            "Loaded documentation manifest"
        );
        state.menu = Some(manifest);

        if first.is_none() {
            state.content = NO_DOCUMENTS_CONTENT.to_owned();
            state.error = Some(ViewerError::ManifestEmpty);
            state.phase = Phase::ManifestError;
        }
        first
    }

    /// Start a document request.
    ///
    /// Moves to [`Phase::LoadingDocument`] while keeping the current content.
    /// The returned ticket must be passed to [`complete_document`](Self::complete_document).
    pub fn begin_document(&self, path: &str) -> DocumentRequest {
        let mut state = self.lock();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        state.phase = Phase::LoadingDocument;
        state.pending_path = Some(path.to_owned());
        DocumentRequest {
            seq,
            path: path.to_owned(),
        }
    }

    /// Commit the result of a document request, unless a newer one was issued.
    pub fn complete_document(
        &self,
        request: DocumentRequest,
        result: Result<String, SourceError>,
    ) -> DocumentOutcome {
        let mut state = self.lock();
        if request.seq != self.latest.load(Ordering::SeqCst) {
            tracing::debug!(path = %request.path, seq = request.seq, "Dropping stale document response");
            return DocumentOutcome::Stale;
        }

        state.pending_path = None;
        match result {
            Ok(text) => {
                state.content = text;
                state.selected_path = Some(request.path);
                state.error = None;
                state.phase = Phase::Ready;
                DocumentOutcome::Committed
            }
            Err(err) => {
                tracing::warn!(path = %request.path, error = %err, "Failed to load document");
                state.content = error_document(&request.path);
                state.error = Some(ViewerError::DocumentUnavailable {
                    path: request.path.clone(),
                    message: err.to_string(),
                });
                state.selected_path = Some(request.path);
                state.phase = Phase::DocumentError;
                DocumentOutcome::Failed
            }
        }
    }

    /// Fetch a document and show it.
    ///
    /// The path is fetched as-is; it is not checked against the manifest.
    pub async fn load_document(&self, path: &str) -> DocumentOutcome {
        let request = self.begin_document(path);
        let source = Arc::clone(&self.source);
        let owned = path.to_owned();
        let result = run_blocking(move || source.fetch_document(&owned)).await;
        self.complete_document(request, result)
    }

    /// Flip a section's expansion.
    ///
    /// Returns whether the section is now expanded. Only sections with
    /// children toggle, and nothing toggles in the flat variant. The
    /// selection is never touched.
    pub fn toggle_section(&self, key: &NodeKey) -> bool {
        if !self.options.nav.expandable {
            return false;
        }
        let mut state = self.lock();
        let toggleable = state
            .menu
            .as_ref()
            .and_then(|m| m.node(key))
            .is_some_and(|node| node.is_section() && !node.children().is_empty());
        if !toggleable {
            return state.expanded.contains(key);
        }
        if state.expanded.remove(key) {
            false
        } else {
            state.expanded.insert(key.clone());
            true
        }
    }

    /// Expand every section enclosing `path` (expandable variant only).
    pub fn reveal(&self, path: &str) {
        if !self.options.nav.expandable {
            return;
        }
        let mut state = self.lock();
        let ancestors = state
            .menu
            .as_ref()
            .map(|m| m.ancestors_of(path))
            .unwrap_or_default();
        state.expanded.extend(ancestors);
    }

    /// Act on a navigation event.
    pub async fn handle(&self, event: NavEvent) -> Option<DocumentOutcome> {
        match event {
            NavEvent::SelectDocument(path) => Some(self.load_document(&path).await),
            NavEvent::ToggleSection(key) => {
                self.toggle_section(&key);
                None
            }
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ViewerState {
        self.lock().clone()
    }

    /// Navigation tree for the current state.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        let state = self.lock();
        build_navigation(
            state.sections(),
            state.selected_path.as_deref(),
            &state.expanded,
            self.options.nav,
        )
    }

    /// Render the current state for display.
    #[must_use]
    pub fn view(&self) -> ViewerView {
        let state = self.snapshot();
        let navigation = build_navigation(
            state.sections(),
            state.selected_path.as_deref(),
            &state.expanded,
            self.options.nav,
        );

        let mut renderer = MarkdownRenderer::new().with_title_extraction();
        if let Some(path) = &state.selected_path {
            renderer = renderer.with_base_path(path);
        }
        if let Some(prefix) = &self.options.link_prefix {
            renderer = renderer.with_link_prefix(prefix.clone());
        }
        if let Some(prefix) = &self.options.asset_prefix {
            renderer = renderer.with_asset_prefix(prefix.clone());
        }
        let document = renderer.render_markdown(&state.content);

        ViewerView {
            phase: state.phase,
            banner: state.error,
            navigation,
            selected_path: state.selected_path,
            expanded: state.expanded,
            document,
        }
    }
}

/// Run a blocking source call on the blocking pool.
async fn run_blocking<F>(f: F) -> Result<String, SourceError>
where
    F: FnOnce() -> Result<String, SourceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(err) => Err(SourceError::new(SourceErrorKind::Other).with_source(err)),
    }
}
