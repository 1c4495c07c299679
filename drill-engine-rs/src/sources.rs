//! The content repository port.

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use task_model::{Language, LearningPath, Task, TaskKind};

use crate::recording::CollaboratorError;

/// What the learner asked to drill. Everything optional; an empty criteria
/// selects the whole learning path in content order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SessionCriteria {
    #[serde(default)]
    pub language: Option<Language>,
    /// Restrict to these kinds; empty means all kinds.
    #[serde(default)]
    pub kinds: Vec<TaskKind>,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub trait ContentSource {
    fn task_ids<'a>(
        &'a self,
        criteria: &'a SessionCriteria,
    ) -> LocalBoxFuture<'a, Result<Vec<String>, CollaboratorError>>;

    fn task<'a>(&'a self, id: &'a str) -> LocalBoxFuture<'a, Result<Task, CollaboratorError>>;
}

/// Content source over an already-loaded learning path. This is what the
/// browser build uses (the view fetches and parses the path, the engine
/// drills it) and what the tests drive.
pub struct InMemoryContentSource {
    language: Option<Language>,
    tasks: Vec<Task>,
}

impl InMemoryContentSource {
    pub fn new(path: LearningPath) -> Self {
        Self {
            language: path.language,
            tasks: path.tasks,
        }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            language: None,
            tasks,
        }
    }
}

impl ContentSource for InMemoryContentSource {
    fn task_ids<'a>(
        &'a self,
        criteria: &'a SessionCriteria,
    ) -> LocalBoxFuture<'a, Result<Vec<String>, CollaboratorError>> {
        Box::pin(async move {
            if let (Some(wanted), Some(have)) = (criteria.language, self.language)
                && wanted != have
            {
                return Ok(Vec::new());
            }
            let ids = self
                .tasks
                .iter()
                .filter(|task| {
                    criteria.kinds.is_empty() || criteria.kinds.contains(&task.content.kind())
                })
                .map(|task| task.id.clone())
                .take(criteria.limit.unwrap_or(usize::MAX))
                .collect();
            Ok(ids)
        })
    }

    fn task<'a>(&'a self, id: &'a str) -> LocalBoxFuture<'a, Result<Task, CollaboratorError>> {
        Box::pin(async move {
            self.tasks
                .iter()
                .find(|task| task.id == id)
                .cloned()
                .ok_or_else(|| CollaboratorError::new(format!("unknown task id {id:?}")))
        })
    }
}
