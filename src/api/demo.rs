use std::sync::Mutex;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Local};

use crate::model::{Due, Label, Priority, Project, Section, Task};

use super::{Api, ApiError, ApiResult, MoveTarget, Snapshot, TaskPatch};

/// In-process backend with seeded data. Stands in for the real transport so
/// the client can be driven end to end without a network; every call
/// succeeds after a short simulated round trip.
pub struct DemoApi {
    state: Mutex<Snapshot>,
    latency: Duration,
}

impl DemoApi {
    pub fn new() -> Self {
        DemoApi {
            state: Mutex::new(seed()),
            latency: Duration::from_millis(120),
        }
    }

    fn with_task<R>(&self, id: &str, f: impl FnOnce(&mut Task) -> R) -> ApiResult<R> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => Ok(f(task)),
            None => Err(ApiError::NotFound(id.to_string())),
        }
    }
}

impl Default for DemoApi {
    fn default() -> Self {
        DemoApi::new()
    }
}

impl Api for DemoApi {
    async fn close_task(&self, id: &str) -> ApiResult<()> {
        tokio::time::sleep(self.latency).await;
        self.with_task(id, |t| t.checked = true)
    }

    async fn reopen_task(&self, id: &str) -> ApiResult<()> {
        tokio::time::sleep(self.latency).await;
        self.with_task(id, |t| t.checked = false)
    }

    async fn delete_task(&self, id: &str) -> ApiResult<()> {
        tokio::time::sleep(self.latency).await;
        self.with_task(id, |t| t.is_deleted = true)
    }

    async fn update_task(&self, id: &str, patch: TaskPatch) -> ApiResult<()> {
        tokio::time::sleep(self.latency).await;
        self.with_task(id, |t| {
            if let Some(content) = patch.content {
                t.content = content;
            }
            if let Some(priority) = patch.priority {
                t.priority = priority;
            }
            if let Some(due) = patch.due {
                t.due = due;
            }
        })
    }

    async fn batch_move_tasks(&self, ids: &[String], target: MoveTarget) -> ApiResult<()> {
        tokio::time::sleep(self.latency).await;
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for task in state.tasks.iter_mut() {
            if ids.iter().any(|id| *id == task.id) {
                task.project_id = target.project_id.clone();
                task.section_id = target.section_id.clone();
            }
        }
        Ok(())
    }

    async fn fetch_snapshot(&self) -> ApiResult<Snapshot> {
        tokio::time::sleep(self.latency).await;
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let mut snapshot = state.clone();
        snapshot.tasks.retain(|t| !t.checked && !t.is_deleted);
        Ok(snapshot)
    }
}

/// Seed data: two projects, two sections, a spread of due dates.
fn seed() -> Snapshot {
    let today = Local::now().date_naive();
    let mut order = 0;
    let mut task = |id: &str, content: &str, project: &str| -> Task {
        order += 1;
        let mut t = Task::new(id, content, project);
        t.child_order = order;
        t
    };

    let mut t1 = task("t1", "Pay the electricity bill", "inbox");
    t1.due = Some(Due::on(today - ChronoDuration::days(2)));
    t1.priority = Priority(4);

    let mut t2 = task("t2", "Water the plants", "inbox");
    t2.due = Some(Due {
        date: today,
        datetime: None,
        recurring: true,
    });

    let mut t3 = task("t3", "Book dentist appointment", "inbox");
    t3.priority = Priority(2);

    let mut t4 = task("t4", "Draft the quarterly report", "work");
    t4.due = Some(Due::on(today));
    t4.section_id = Some("s-doing".into());
    t4.labels = vec!["writing".into()];

    let mut t5 = task("t5", "Review open pull requests", "work");
    t5.section_id = Some("s-doing".into());
    t5.priority = Priority(3);

    let mut t6 = task("t6", "Plan next sprint", "work");
    t6.due = Some(Due::on(today + ChronoDuration::days(3)));

    let t7 = task("t7", "Clean up stale branches", "work");

    Snapshot {
        tasks: vec![t1, t2, t3, t4, t5, t6, t7],
        projects: vec![
            Project {
                id: "inbox".into(),
                name: "Inbox".into(),
                child_order: 0,
                inbox: true,
            },
            Project {
                id: "work".into(),
                name: "Work".into(),
                child_order: 1,
                inbox: false,
            },
        ],
        sections: vec![
            Section {
                id: "s-doing".into(),
                project_id: "work".into(),
                name: "Doing".into(),
                section_order: 1,
            },
            Section {
                id: "s-next".into(),
                project_id: "work".into(),
                name: "Next up".into(),
                section_order: 2,
            },
        ],
        labels: vec![Label {
            id: "l1".into(),
            name: "writing".into(),
        }],
    }
}
