use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::{Backend, PushUpdate};
use crate::batcher::UpdateBatcher;
use crate::error::{Error, Result};
use crate::model::{Change, ChangeData, Data, Field, FieldName, FieldOptionId, WorkItemId};
use crate::progress::ProgressMeter;
use crate::storage::ExtraDataStore;

/// The reactive mirror of the backend's work-item store.
///
/// One instance owns the snapshot. UI tasks share the engine behind an
/// `Arc` and read through [`SyncEngine::data`]; mutation happens only
/// here: push messages land through [`SyncEngine::apply`], and every
/// user-driven method confirms with the backend before the mirror
/// changes. Locks are never held across an await.
pub struct SyncEngine {
    backend: Arc<dyn Backend>,
    state: RwLock<Data>,
    progress: ProgressMeter,
    batcher: UpdateBatcher,
    extra_data: Mutex<Box<dyn ExtraDataStore>>,
}

impl SyncEngine {
    /// Spawns the update batcher's worker, so this must run inside a tokio
    /// runtime.
    pub fn new(backend: Arc<dyn Backend>, extra_data: Box<dyn ExtraDataStore>) -> SyncEngine {
        SyncEngine {
            batcher: UpdateBatcher::new(backend.clone()),
            backend,
            state: RwLock::new(Data::default()),
            progress: ProgressMeter::new(),
            extra_data: Mutex::new(extra_data),
        }
    }

    /// Read access to the current snapshot. Do not hold the guard across
    /// an await point.
    pub fn data(&self) -> RwLockReadGuard<'_, Data> {
        self.state.read().unwrap()
    }

    /// The remaining-work fraction of the load in flight: 0.0 when idle,
    /// 1.0 when a load has just started.
    pub fn load_progress(&self) -> f64 {
        self.progress.fraction()
    }

    /// The engine's own meter, for UIs that want to await changes.
    pub fn progress(&self) -> &ProgressMeter {
        &self.progress
    }

    pub fn has_pending_changes(&self) -> bool {
        self.data().has_pending_changes()
    }

    /// Establishes the push subscription and hands back the receiver to
    /// drive [`SyncEngine::run`] (or [`SyncEngine::apply`] directly).
    /// Called once per engine lifetime, before other calls.
    pub async fn watch(&self) -> Result<mpsc::UnboundedReceiver<PushUpdate>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.backend.watch_data(tx).await?;
        Ok(rx)
    }

    /// Applies push messages in arrival order until the subscription ends.
    pub async fn run(&self, mut channel: mpsc::UnboundedReceiver<PushUpdate>) -> Result<()> {
        loop {
            match channel.recv().await {
                Some(update) => self.apply(update),
                None => return Err(Error::ChannelClosed),
            }
        }
    }

    /// The message application state machine: `data` replaces the snapshot
    /// wholesale, `progress` feeds the meter and touches nothing else, and
    /// `workItem` upserts a single entry. The tree is left alone; a stale
    /// tree stays structurally valid because only leaf data changed.
    pub fn apply(&self, update: PushUpdate) {
        match update {
            PushUpdate::Data(data) => {
                debug!(
                    work_items = data.work_items.len(),
                    nodes = data.nodes.len(),
                    "applying data snapshot"
                );
                *self.state.write().unwrap() = *data;
            }
            PushUpdate::Progress { done, total } => self.progress.observe(done, total),
            PushUpdate::WorkItem(item) => {
                debug!(item = %item.describe(), "applying work item update");
                self.state
                    .write()
                    .unwrap()
                    .work_items
                    .insert(item.id.clone(), *item);
            }
        }
    }

    /// Fetches a fresh snapshot. At most one load is in flight: calls made
    /// while `load_progress` is nonzero are dropped, not queued. The
    /// fraction always returns to 0, and a failed fetch keeps the previous
    /// snapshot.
    pub async fn refresh(&self, force_refresh: bool) -> Result<()> {
        if !self.progress.try_begin() {
            return Ok(());
        }

        let result = match self
            .backend
            .get_data(force_refresh, self.progress.clone())
            .await
        {
            Ok(data) => {
                *self.state.write().unwrap() = data;
                Ok(())
            }
            Err(error) => Err(Error::BackendCallFailed(error)),
        };
        self.progress.set(0.0);
        result
    }

    /// Asks the backend to push a fresh snapshot; the result arrives on
    /// the push channel.
    pub async fn force_refresh(&self) -> Result<()> {
        Ok(self.backend.force_refresh_data().await?)
    }

    pub async fn convert_tracked_issues_to_sub_issue(&self, id: &WorkItemId) -> Result<()> {
        Ok(self.backend.convert_tracked_issues_to_sub_issue(id).await?)
    }

    pub async fn sanitize(&self) -> Result<()> {
        Ok(self.backend.sanitize().await?)
    }

    /// Stages a change. The mirror reflects it once the backend's updated
    /// state lands; nothing is mutated speculatively.
    pub async fn add_change(&self, change: Change) -> Result<()> {
        self.backend.add_change(change).await?;
        self.refresh(false).await
    }

    /// Un-stages a change, matched by work item and field. Removing a
    /// change that is no longer staged is a no-op, since a push update may
    /// already have cleared it.
    pub async fn remove_change(&self, change: Change) -> Result<()> {
        self.backend.remove_change(change).await?;
        self.refresh(false).await
    }

    pub async fn delete_changes(&self) -> Result<()> {
        self.backend.delete_changes().await?;
        self.refresh(false).await
    }

    pub async fn set_preview_changes(&self, preview: bool) -> Result<()> {
        self.backend.set_preview_changes(preview).await?;
        self.refresh(false).await
    }

    /// Persists every staged change; `progress` receives `(done, total)`
    /// samples while the backend works. With nothing staged this is a
    /// no-op that completes the progress stream immediately.
    pub async fn save_changes(&self, progress: ProgressMeter) -> Result<()> {
        let nothing_staged = self.data().changes.is_empty();
        if nothing_staged {
            progress.observe(0, 0);
            return Ok(());
        }
        self.backend.save_changes(progress).await?;
        self.refresh(true).await
    }

    /// Resolves an option id to its display value. Unknown and absent ids
    /// resolve to `None`; this lookup has no failure mode.
    pub fn get_field_option(
        &self,
        field: FieldName,
        option: Option<&FieldOptionId>,
    ) -> Option<String> {
        self.data()
            .fields
            .get(field)
            .option_name(option)
            .map(str::to_owned)
    }

    /// Checked narrowing to a single-select field; asking for a field of
    /// another kind is a caller bug and fails loudly.
    pub fn get_single_select_field(&self, field: FieldName) -> Result<Field> {
        Ok(self.data().fields.single_select(field)?.clone())
    }

    /// Checked narrowing to an iteration field.
    pub fn get_iteration_field(&self, field: FieldName) -> Result<Field> {
        Ok(self.data().fields.iteration_field(field)?.clone())
    }

    pub fn get_filter(&self, field: FieldName) -> Option<Vec<FieldOptionId>> {
        self.data().filters.get(field).map(<[FieldOptionId]>::to_vec)
    }

    /// Replaces the filter selection for one field and persists the whole
    /// selection through the backend.
    pub async fn set_filter(
        &self,
        field: FieldName,
        selection: Option<Vec<FieldOptionId>>,
    ) -> Result<()> {
        let mut filters = self.data().filters.clone();
        filters.set(field, selection);
        self.backend.set_filters(filters).await?;
        self.refresh(false).await
    }

    /// The single entry point translating a UI field edit into a staged
    /// change. Fields outside the editable set are rejected even though
    /// they are legal to read.
    pub async fn set_field_value(
        &self,
        item: &WorkItemId,
        field: FieldName,
        value: Option<FieldOptionId>,
    ) -> Result<()> {
        let data =
            ChangeData::field_edit(field, value).ok_or(Error::FieldNotEditable(field))?;
        self.add_change(Change {
            work_item_id: item.clone(),
            data,
        })
        .await
    }

    /// Schedules a batched re-sync of one item. Fire-and-forget; use this
    /// when an item's lazily loaded fields turn out to be missing.
    pub fn request_item_update(&self, id: WorkItemId, force: bool) {
        self.batcher.schedule(id, force);
    }

    pub fn extra_data(&self, id: &WorkItemId) -> Option<String> {
        self.extra_data.lock().unwrap().get(id)
    }

    /// Write-through to the injected store; a failed write is logged and
    /// otherwise ignored.
    pub fn set_extra_data(&self, id: &WorkItemId, value: String) {
        if let Err(error) = self.extra_data.lock().unwrap().set(id, value) {
            warn!(%error, "failed to persist work item extra data");
        }
    }
}
