use crate::config::PickerConfig;
use crate::error::{PickerError, Result};
use crate::reducer::{reduce, Effect, PickerEvent, Transition};
use crate::source::CategorySource;
use crate::state::PickerState;
use catalog_taxonomy::{validate_tree, CategoryId};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub type ChangeCallback = Box<dyn FnMut(&CategoryId) + Send + Sync>;

/// Async driver around [`reduce`].
///
/// Owns the picker state and is its only writer. Collaborator calls race the
/// cancellation token; once it fires, pending results are dropped and the
/// state is left as it was.
pub struct PickerController {
    state: PickerState,
    source: Arc<dyn CategorySource>,
    on_change: ChangeCallback,
    cancel: CancellationToken,
}

impl PickerController {
    pub fn new(
        source: Arc<dyn CategorySource>,
        config: PickerConfig,
        selected: Option<CategoryId>,
        on_change: ChangeCallback,
    ) -> Self {
        Self {
            state: PickerState::new(config, selected),
            source,
            on_change,
            cancel: CancellationToken::new(),
        }
    }

    /// Start disabled: the picker loads but cannot be opened or selected from
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.state = std::mem::take(&mut self.state).with_disabled(disabled);
        self
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    /// Token that unmounts the picker when cancelled, usable from other tasks
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    pub async fn mount(&mut self) -> Result<()> {
        self.dispatch(PickerEvent::Mounted).await
    }

    pub async fn reload(&mut self) -> Result<()> {
        self.dispatch(PickerEvent::ReloadRequested).await
    }

    pub async fn open(&mut self) -> Result<()> {
        self.dispatch(PickerEvent::Opened).await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.dispatch(PickerEvent::Closed).await
    }

    pub async fn search(&mut self, term: impl Into<String>) -> Result<()> {
        self.dispatch(PickerEvent::SearchChanged(term.into())).await
    }

    pub async fn toggle(&mut self, id: impl Into<CategoryId>) -> Result<()> {
        self.dispatch(PickerEvent::ToggleNode(id.into())).await
    }

    pub async fn select(&mut self, id: impl Into<CategoryId>) -> Result<()> {
        self.dispatch(PickerEvent::NodeSelected(id.into())).await
    }

    pub async fn create(&mut self, name: impl Into<String>) -> Result<()> {
        self.dispatch(PickerEvent::CreateRequested(name.into())).await
    }

    /// Host-side value change; never fires `on_change`
    pub async fn set_selected(&mut self, id: Option<CategoryId>) -> Result<()> {
        self.dispatch(PickerEvent::SelectedValueChanged(id)).await
    }

    pub async fn set_disabled(&mut self, disabled: bool) -> Result<()> {
        self.dispatch(PickerEvent::DisabledChanged(disabled)).await
    }

    /// Feed one event through the reducer and run the resulting effects until
    /// the queue drains.
    pub async fn dispatch(&mut self, event: PickerEvent) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(PickerError::Unmounted);
        }

        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let Transition { state, effects } = reduce(std::mem::take(&mut self.state), event);
            self.state = state;

            for effect in effects {
                match effect {
                    Effect::FetchTree => queue.push_back(self.fetch_tree().await?),
                    Effect::CreateCategory(name) => {
                        queue.push_back(self.create_category(&name).await?)
                    }
                    Effect::EmitChange(id) => {
                        log::debug!("Category picker committed {id}");
                        (self.on_change)(&id);
                    }
                    Effect::Notify(message) => {
                        log::warn!("Category creation failed: {message}");
                    }
                }
            }
        }
        Ok(())
    }

    async fn fetch_tree(&self) -> Result<PickerEvent> {
        log::debug!("Fetching category tree");
        let source = Arc::clone(&self.source);
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(PickerError::Cancelled("tree fetch")),
            result = source.fetch_tree() => result,
        };

        let event = match result {
            Ok(tree) => match validate_tree(&tree) {
                Ok(()) => {
                    log::debug!("Loaded {} root categories", tree.len());
                    PickerEvent::TreeLoaded(tree)
                }
                Err(err) => {
                    log::warn!("Rejected category tree: {err}");
                    PickerEvent::LoadFailed(err.to_string())
                }
            },
            Err(err) => {
                log::warn!("Category tree fetch failed: {err:#}");
                PickerEvent::LoadFailed(format!("{err:#}"))
            }
        };
        Ok(event)
    }

    async fn create_category(&self, name: &str) -> Result<PickerEvent> {
        log::debug!("Creating category {name:?}");
        let source = Arc::clone(&self.source);
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(PickerError::Cancelled("category creation")),
            result = source.create_category(name) => result,
        };

        Ok(match result {
            Ok(category) => PickerEvent::CreateSucceeded(category),
            Err(err) => PickerEvent::CreateFailed(format!("{err:#}")),
        })
    }
}
