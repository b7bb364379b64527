use std::future::Future;

use crate::model::{Due, Label, Priority, Project, Section, Task};

pub mod demo;

/// Typed failure returned by the remote service collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("rate limited")]
    RateLimited,
    #[error("not found: {0}")]
    NotFound(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Full service state returned by a sync.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub sections: Vec<Section>,
    pub labels: Vec<Label>,
}

/// Partial task update. `due` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub content: Option<String>,
    pub priority: Option<Priority>,
    pub due: Option<Option<Due>>,
}

/// Destination for a batch move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTarget {
    pub project_id: String,
    pub section_id: Option<String>,
}

/// The remote task service, as seen by the mutation engine.
///
/// Each call either succeeds or fails with an `ApiError`; the transport
/// behind it is out of scope here. Implementations must be shareable across
/// the spawned dispatch tasks, hence `Send + Sync` and `Send` futures.
pub trait Api: Send + Sync + 'static {
    fn close_task(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn reopen_task(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn delete_task(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn update_task(&self, id: &str, patch: TaskPatch) -> impl Future<Output = ApiResult<()>> + Send;
    fn batch_move_tasks(
        &self,
        ids: &[String],
        target: MoveTarget,
    ) -> impl Future<Output = ApiResult<()>> + Send;
    fn fetch_snapshot(&self) -> impl Future<Output = ApiResult<Snapshot>> + Send;
}
