//! Client-side editing of a workout session's exercise log.
//!
//! Mutations apply to a working copy first. Live mode queues a full copy for
//! the session's writer task after each one; deferred mode writes on `save`.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::error::{AppError, Result};
use crate::models::{Exercise, ExerciseLog, SetLogError, SetPatch, WorkoutSession};

#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn fetch_session(&self, id: &str) -> Result<WorkoutSession>;
    async fn replace_exercises(&self, id: &str, exercises: &[ExerciseLog]) -> Result<()>;
    async fn complete_session(&self, id: &str) -> Result<()>;
    async fn delete_session(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    Live,
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub mode: PersistMode,
    /// `completed` flag for sets created by `add_set`. `None` uses the mode default.
    pub new_set_completed: Option<bool>,
}

impl EditorOptions {
    pub fn live() -> Self {
        Self {
            mode: PersistMode::Live,
            new_set_completed: None,
        }
    }

    pub fn deferred() -> Self {
        Self {
            mode: PersistMode::Deferred,
            new_set_completed: None,
        }
    }

    pub fn with_new_set_completed(mut self, completed: bool) -> Self {
        self.new_set_completed = Some(completed);
        self
    }

    pub fn new_set_completed(&self) -> bool {
        // Sets added while reviewing history were already performed
        self.new_set_completed
            .unwrap_or(matches!(self.mode, PersistMode::Deferred))
    }
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Could not save the workout: {0}")]
    Save(#[source] AppError),

    #[error("Could not finish the workout: {0}")]
    Complete(#[source] AppError),

    #[error("Could not delete the workout: {0}")]
    Delete(#[source] AppError),

    #[error("Could not reload the workout: {0}")]
    Refresh(#[source] AppError),

    #[error("Exercise {0} does not exist in this session")]
    ExerciseOutOfRange(usize),

    #[error("Set {set} does not exist for exercise {exercise}")]
    SetOutOfRange { exercise: usize, set: usize },

    #[error("Set fields do not match the exercise type")]
    SetTypeMismatch,

    #[error("This workout can no longer be edited")]
    Locked,
}

impl EditorError {
    pub fn user_message(&self) -> String {
        match self {
            EditorError::Save(e) => format!("Could not save the workout: {}", e.user_message()),
            EditorError::Complete(e) => {
                format!("Could not finish the workout: {}", e.user_message())
            }
            EditorError::Delete(e) => format!("Could not delete the workout: {}", e.user_message()),
            EditorError::Refresh(e) => {
                format!("Could not reload the workout: {}", e.user_message())
            }
            other => other.to_string(),
        }
    }
}

pub struct SessionEditor<S: SessionStore> {
    store: Arc<S>,
    options: EditorOptions,
    session: WorkoutSession,
    exercises: Vec<ExerciseLog>,
    deleted: bool,
    writer: Option<Writer>,
    queued: u64,
    last_error: Arc<Mutex<Option<String>>>,
}

// Snapshots are written one at a time in queue order, so the last write to
// land is always the newest copy.
struct Writer {
    queue: mpsc::UnboundedSender<(u64, Vec<ExerciseLog>)>,
    written: watch::Receiver<u64>,
    failure: Arc<Mutex<Option<AppError>>>,
}

impl<S: SessionStore> SessionEditor<S> {
    pub fn new(store: Arc<S>, session: WorkoutSession, options: EditorOptions) -> Self {
        let exercises = session.exercises.clone();
        Self {
            store,
            options,
            session,
            exercises,
            deleted: false,
            writer: None,
            queued: 0,
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn load(
        store: Arc<S>,
        id: &str,
        options: EditorOptions,
    ) -> std::result::Result<Self, EditorError> {
        let session = store
            .fetch_session(id)
            .await
            .map_err(EditorError::Refresh)?;
        tracing::debug!(
            "Loaded session {} with {} exercises ({:?})",
            session.id,
            session.exercises.len(),
            options.mode
        );
        Ok(Self::new(store, session, options))
    }

    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    pub fn exercises(&self) -> &[ExerciseLog] {
        &self.exercises
    }

    pub fn mode(&self) -> PersistMode {
        self.options.mode
    }

    pub fn is_saving(&self) -> bool {
        self.writer
            .as_ref()
            .is_some_and(|w| *w.written.borrow() < self.queued)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn exercise_ids(&self) -> Vec<&str> {
        self.exercises
            .iter()
            .map(|e| e.exercise_id.as_str())
            .collect()
    }

    pub fn can_mutate(&self) -> bool {
        if self.deleted {
            return false;
        }
        match self.options.mode {
            PersistMode::Live => !self.session.is_completed,
            PersistMode::Deferred => true,
        }
    }

    pub fn can_delete(&self) -> bool {
        self.can_mutate()
    }

    pub fn can_complete(&self) -> bool {
        !self.deleted && !self.session.is_completed
    }

    /// Replaces the working copy with a fresh copy of `session`, dropping unsaved edits.
    pub fn reload(&mut self, session: WorkoutSession) {
        self.exercises = session.exercises.clone();
        self.session = session;
    }

    pub async fn refresh(&mut self) -> std::result::Result<(), EditorError> {
        let session = self
            .store
            .fetch_session(&self.session.id)
            .await
            .map_err(EditorError::Refresh)?;
        self.reload(session);
        Ok(())
    }

    pub fn available_exercises<'a>(&self, catalog: &'a [Exercise], query: &str) -> Vec<&'a Exercise> {
        catalog
            .iter()
            .filter(|ex| !self.contains_exercise(&ex.id))
            .filter(|ex| ex.matches_query(query))
            .collect()
    }

    fn contains_exercise(&self, exercise_id: &str) -> bool {
        self.exercises.iter().any(|e| e.exercise_id == exercise_id)
    }

    /// Returns `false` without changes when the exercise is already logged.
    pub fn add_exercise(&mut self, exercise: &Exercise) -> std::result::Result<bool, EditorError> {
        self.ensure_mutable()?;
        if self.contains_exercise(&exercise.id) {
            tracing::debug!("Exercise {} already in session", exercise.id);
            return Ok(false);
        }
        self.exercises.push(ExerciseLog::for_exercise(exercise));
        self.write_through();
        Ok(true)
    }

    pub fn remove_exercise<F>(
        &mut self,
        index: usize,
        confirm: F,
    ) -> std::result::Result<Option<ExerciseLog>, EditorError>
    where
        F: FnOnce(&ExerciseLog) -> bool,
    {
        self.ensure_mutable()?;
        let exercise = self
            .exercises
            .get(index)
            .ok_or(EditorError::ExerciseOutOfRange(index))?;
        if !confirm(exercise) {
            return Ok(None);
        }
        let removed = self.exercises.remove(index);
        self.write_through();
        Ok(Some(removed))
    }

    pub fn add_set(&mut self, exercise_index: usize) -> std::result::Result<usize, EditorError> {
        self.ensure_mutable()?;
        let completed = self.options.new_set_completed();
        let exercise = self.exercise_mut(exercise_index)?;
        exercise.sets.push_blank(completed);
        let index = exercise.sets.len() - 1;
        self.write_through();
        Ok(index)
    }

    pub fn update_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        patch: impl Into<SetPatch>,
    ) -> std::result::Result<(), EditorError> {
        self.ensure_mutable()?;
        let patch = patch.into();
        self.exercise_mut(exercise_index)?
            .sets
            .apply(set_index, &patch)
            .map_err(|e| set_error(e, exercise_index, set_index))?;
        self.write_through();
        Ok(())
    }

    pub fn remove_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
    ) -> std::result::Result<(), EditorError> {
        self.ensure_mutable()?;
        self.exercise_mut(exercise_index)?
            .sets
            .remove(set_index)
            .map_err(|e| set_error(e, exercise_index, set_index))?;
        self.write_through();
        Ok(())
    }

    pub fn toggle_complete(
        &mut self,
        exercise_index: usize,
        set_index: usize,
    ) -> std::result::Result<bool, EditorError> {
        self.ensure_mutable()?;
        let completed = self
            .exercise_mut(exercise_index)?
            .sets
            .toggle(set_index)
            .map_err(|e| set_error(e, exercise_index, set_index))?;
        self.write_through();
        Ok(completed)
    }

    /// Writes the whole working copy, then reloads the canonical session.
    /// The working copy survives a failure so the save can be retried.
    pub async fn save(&mut self) -> std::result::Result<(), EditorError> {
        self.ensure_mutable()?;
        // A queued live write must not land after this one.
        if let Err(e) = self.flush().await {
            tracing::warn!("Saving session {} after failed write: {}", self.session.id, e);
        }

        let result = self
            .store
            .replace_exercises(&self.session.id, &self.exercises)
            .await;
        if let Err(e) = result {
            tracing::error!("Failed to save session {}: {}", self.session.id, e);
            *self.last_error.lock() = Some(e.user_message());
            return Err(EditorError::Save(e));
        }
        *self.last_error.lock() = None;
        tracing::info!("Saved session {}", self.session.id);

        self.refresh().await
    }

    /// Waits until every queued live write has landed. Fails when the newest one failed.
    pub async fn flush(&mut self) -> std::result::Result<(), EditorError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        let target = self.queued;
        if writer.written.wait_for(|version| *version >= target).await.is_err() {
            tracing::error!("Writer for session {} stopped early", self.session.id);
        }
        match writer.failure.lock().take() {
            Some(e) => Err(EditorError::Save(e)),
            None => Ok(()),
        }
    }

    pub async fn complete(&mut self) -> std::result::Result<(), EditorError> {
        if !self.can_complete() {
            return Err(EditorError::Locked);
        }
        if let Err(e) = self.flush().await {
            tracing::warn!("Completing session {} after failed write: {}", self.session.id, e);
        }

        if let Err(e) = self.store.complete_session(&self.session.id).await {
            tracing::error!("Failed to complete session {}: {}", self.session.id, e);
            return Err(EditorError::Complete(e));
        }
        self.session.is_completed = true;

        if let Err(e) = self.refresh().await {
            tracing::warn!("Session {} completed but reload failed: {}", self.session.id, e);
        }
        Ok(())
    }

    pub async fn delete(&mut self) -> std::result::Result<(), EditorError> {
        if !self.can_delete() {
            return Err(EditorError::Locked);
        }
        if let Err(e) = self.store.delete_session(&self.session.id).await {
            tracing::error!("Failed to delete session {}: {}", self.session.id, e);
            return Err(EditorError::Delete(e));
        }
        self.deleted = true;
        Ok(())
    }

    fn ensure_mutable(&self) -> std::result::Result<(), EditorError> {
        if self.can_mutate() {
            Ok(())
        } else {
            Err(EditorError::Locked)
        }
    }

    fn exercise_mut(&mut self, index: usize) -> std::result::Result<&mut ExerciseLog, EditorError> {
        self.exercises
            .get_mut(index)
            .ok_or(EditorError::ExerciseOutOfRange(index))
    }

    fn write_through(&mut self) {
        if self.options.mode != PersistMode::Live {
            return;
        }
        if self.writer.is_none() {
            self.writer = Some(self.spawn_writer());
        }
        self.queued += 1;
        let snapshot = (self.queued, self.exercises.clone());
        if let Some(writer) = &self.writer {
            if writer.queue.send(snapshot).is_err() {
                tracing::error!("Writer for session {} is gone", self.session.id);
            }
        }
    }

    fn spawn_writer(&self) -> Writer {
        let (queue, mut snapshots) = mpsc::unbounded_channel::<(u64, Vec<ExerciseLog>)>();
        let (done, written) = watch::channel(self.queued);
        let failure = Arc::new(Mutex::new(None));

        let store = Arc::clone(&self.store);
        let id = self.session.id.clone();
        let last_error = Arc::clone(&self.last_error);
        let task_failure = Arc::clone(&failure);
        // Runs until the editor drops its sender, draining whatever is still queued.
        tokio::spawn(async move {
            while let Some((version, exercises)) = snapshots.recv().await {
                match store.replace_exercises(&id, &exercises).await {
                    Ok(()) => {
                        *last_error.lock() = None;
                        *task_failure.lock() = None;
                    }
                    Err(e) => {
                        tracing::error!("Failed to save session {}: {}", id, e);
                        *last_error.lock() = Some(e.user_message());
                        *task_failure.lock() = Some(e);
                    }
                }
                done.send_replace(version);
            }
        });

        Writer {
            queue,
            written,
            failure,
        }
    }
}

fn set_error(error: SetLogError, exercise: usize, set: usize) -> EditorError {
    match error {
        SetLogError::OutOfRange => EditorError::SetOutOfRange { exercise, set },
        SetLogError::TypeMismatch => EditorError::SetTypeMismatch,
    }
}
