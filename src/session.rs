//! Filter panel session control.
//!
//! The controller owns two parallel copies of the filter selections: the
//! *applied* set drives the visible results table, the *temporary* set holds
//! live edits inside an open panel. Apply commits temporary into applied
//! category by category; cancel throws the edits away. While the panel is
//! open, every change schedules a debounced resolve against the backend and
//! publishes the returned option lists as overrides.
//!
//! Ordering guarantee: the last change inside the debounce window determines
//! the request actually sent. A superseded pending resolve, or a response
//! that lands after a newer change, has zero observable effect — each resolve
//! carries the generation that scheduled it and checks it again both before
//! fetching and before merging.
//!
//! All trackers (last-changed, open-category) are instance fields, so a host
//! can run several independent panels side by side.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::Config;
use crate::resolver::CascadeResolver;
use crate::types::{CASCADING_CATEGORIES, CascadeOverrides, FilterCategory, Selection};

/// Callback invoked once per changed category at apply/clear time — never
/// during live preview.
pub type FilterChangeListener = Arc<dyn Fn(FilterCategory, &[String]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    /// Panel open, temporary equals applied.
    OpenClean,
    /// Panel open, temporary diverges from applied.
    OpenDirty,
}

#[derive(Default)]
struct SessionState {
    applied: Selection,
    temporary: Selection,
    overrides: CascadeOverrides,
    last_changed: Option<FilterCategory>,
    open_category: Option<FilterCategory>,
    panel: PanelState,
    /// Bumped by every transition that invalidates pending resolves. A
    /// debounce task only acts while the generation it was scheduled under
    /// is still current.
    generation: u64,
}

pub struct FilterSessionController {
    state: Arc<Mutex<SessionState>>,
    resolver: Arc<CascadeResolver>,
    debounce: Duration,
    listener: Option<FilterChangeListener>,
}

impl FilterSessionController {
    pub fn new(resolver: Arc<CascadeResolver>, config: &Config) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            resolver,
            debounce: config.debounce(),
            listener: None,
        }
    }

    /// Register the results-table collaborator.
    pub fn set_change_listener(
        &mut self,
        listener: impl Fn(FilterCategory, &[String]) + Send + Sync + 'static,
    ) {
        self.listener = Some(Arc::new(listener));
    }

    /// Open the filter panel: temporary is reset to applied and any stale
    /// overrides are dropped.
    pub fn open_panel(&self) {
        let mut s = self.state.lock();
        s.temporary = s.applied.clone();
        s.overrides.clear();
        s.last_changed = None;
        s.open_category = None;
        s.panel = PanelState::OpenClean;
        s.generation += 1;
    }

    /// Record a live edit and schedule a debounced resolve.
    ///
    /// Must be called from within a tokio runtime: the debounce timer runs on
    /// a spawned task. Ignored while the panel is closed.
    pub fn change_filter(&self, category: FilterCategory, values: Vec<String>) {
        let generation = {
            let mut s = self.state.lock();
            if s.panel == PanelState::Closed {
                tracing::debug!("filter change for {category} ignored while panel is closed");
                return;
            }
            s.temporary.set(category, values);
            s.last_changed = Some(category);
            s.panel = PanelState::OpenDirty;
            s.generation += 1;
            s.generation
        };

        let state = Arc::clone(&self.state);
        let resolver = Arc::clone(&self.resolver);
        let debounce = self.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            // Snapshot under the lock; bail if a newer change superseded this
            // timer or the panel closed while it was pending.
            let (selection, open_category, last_changed) = {
                let s = state.lock();
                if s.generation != generation || s.panel == PanelState::Closed {
                    tracing::debug!("debounced resolve superseded before firing");
                    return;
                }
                (s.temporary.clone(), s.open_category, s.last_changed)
            };

            let params = resolver.build_params(&selection, open_category);
            let Some(sets) = resolver.fetch(&params).await else {
                return;
            };

            // Last-resolve-wins: a response arriving after a newer resolve
            // started is discarded before anything is merged.
            let mut s = state.lock();
            if s.generation != generation || s.panel == PanelState::Closed {
                tracing::debug!("stale cascade response discarded");
                return;
            }
            s.overrides = resolver.merge_overrides(&sets, last_changed);
        });
    }

    /// Record which dropdown is currently expanded. Does not trigger a
    /// resolve by itself, but the next resolve omits this category's
    /// parameter.
    pub fn set_open_category(&self, category: Option<FilterCategory>) {
        self.state.lock().open_category = category;
    }

    /// Commit the panel: copy temporary into applied for every category whose
    /// sorted-unique value actually changed, notify the collaborator once per
    /// such category, and close the panel.
    ///
    /// Returns the changed categories.
    pub fn apply(&self) -> Vec<FilterCategory> {
        let (changed, notifications) = {
            let mut s = self.state.lock();
            let mut changed = Vec::new();
            let mut notifications = Vec::new();
            for category in CASCADING_CATEGORIES {
                if s.temporary.sorted_unique(*category) != s.applied.sorted_unique(*category) {
                    let values = s.temporary.get(*category).to_vec();
                    s.applied.set(*category, values.clone());
                    changed.push(*category);
                    notifications.push((*category, values));
                }
            }
            s.overrides.clear();
            s.panel = PanelState::Closed;
            s.open_category = None;
            s.last_changed = None;
            s.generation += 1;
            (changed, notifications)
        };

        // Invoke the collaborator outside the lock; it typically kicks off a
        // data fetch and may call back into the controller.
        if let Some(listener) = &self.listener {
            for (category, values) in &notifications {
                listener(*category, values);
            }
        }
        changed
    }

    /// Discard the panel's edits and close it. No notifications.
    pub fn cancel(&self) {
        let mut s = self.state.lock();
        s.temporary = s.applied.clone();
        s.overrides.clear();
        s.panel = PanelState::Closed;
        s.open_category = None;
        s.last_changed = None;
        s.generation += 1;
    }

    /// Reset everything: both selections emptied, trackers cleared, response
    /// cache dropped, panel closed. The collaborator is notified once per
    /// category. Valid in any state.
    pub fn clear_all(&self) {
        {
            let mut s = self.state.lock();
            s.applied.clear();
            s.temporary.clear();
            s.overrides.clear();
            s.last_changed = None;
            s.open_category = None;
            s.panel = PanelState::Closed;
            s.generation += 1;
        }
        self.resolver.clear_response_cache();

        if let Some(listener) = &self.listener {
            for category in CASCADING_CATEGORIES {
                listener(*category, &[]);
            }
        }
    }

    pub fn panel_state(&self) -> PanelState {
        self.state.lock().panel
    }

    pub fn applied(&self) -> Selection {
        self.state.lock().applied.clone()
    }

    pub fn temporary(&self) -> Selection {
        self.state.lock().temporary.clone()
    }

    pub fn overrides(&self) -> CascadeOverrides {
        self.state.lock().overrides.clone()
    }

    pub fn last_changed(&self) -> Option<FilterCategory> {
        self.state.lock().last_changed
    }

    pub fn open_category(&self) -> Option<FilterCategory> {
        self.state.lock().open_category
    }

    /// The list the UI should render for a category: the current override if
    /// one is present, otherwise the unfiltered base list.
    pub fn display_options(&self, category: FilterCategory, base: &[String]) -> Vec<String> {
        self.state.lock().overrides.display_list(category, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::error::Result;
    use crate::remote::{CascadeBackend, CascadeParams};
    use crate::types::{BaseOptions, OptionSets};

    struct EmptyBackend;

    #[async_trait]
    impl CascadeBackend for EmptyBackend {
        async fn cascade_options(&self, _params: &CascadeParams) -> Result<OptionSets> {
            Ok(OptionSets::default())
        }

        async fn base_options(&self) -> Result<BaseOptions> {
            Ok(BaseOptions::default())
        }
    }

    fn controller() -> FilterSessionController {
        let resolver = Arc::new(CascadeResolver::new(
            Arc::new(EmptyBackend),
            Duration::from_secs(120),
        ));
        FilterSessionController::new(resolver, &Config::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_state_transitions() {
        let session = controller();
        assert_eq!(session.panel_state(), PanelState::Closed);

        session.open_panel();
        assert_eq!(session.panel_state(), PanelState::OpenClean);

        session.change_filter(FilterCategory::Branch, vec!["Pune".into()]);
        assert_eq!(session.panel_state(), PanelState::OpenDirty);
        assert_eq!(session.last_changed(), Some(FilterCategory::Branch));

        session.cancel();
        assert_eq!(session.panel_state(), PanelState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_ignored_while_closed() {
        let session = controller();
        session.change_filter(FilterCategory::Branch, vec!["Pune".into()]);
        assert!(session.temporary().is_empty());
        assert_eq!(session.panel_state(), PanelState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_panel_copies_applied_into_temporary() {
        let session = controller();
        session.open_panel();
        session.change_filter(FilterCategory::Branch, vec!["Pune".into()]);
        session.apply();

        session.open_panel();
        assert_eq!(session.temporary(), session.applied());
        assert_eq!(
            session.temporary().get(FilterCategory::Branch),
            ["Pune"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_open_category_tracked() {
        let session = controller();
        session.open_panel();
        session.set_open_category(Some(FilterCategory::TeamLead));
        assert_eq!(session.open_category(), Some(FilterCategory::TeamLead));
        session.set_open_category(None);
        assert_eq!(session.open_category(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_options_fall_back_to_base() {
        let session = controller();
        let base = vec!["Asha".to_string(), "Ravi".to_string()];
        assert_eq!(
            session.display_options(FilterCategory::TeamLead, &base),
            base
        );
    }
}
