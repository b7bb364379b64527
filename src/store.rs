use std::cmp::Ordering;

use chrono::{DateTime, Local, NaiveDate};

use crate::api::Snapshot;
use crate::model::{Catalog, Task};

/// Predicate selecting the current view subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewFilter {
    /// Due today or overdue.
    Today,
    /// Belongs to the given project.
    Project(String),
    /// Carries the given label.
    Label(String),
}

impl ViewFilter {
    pub fn matches(&self, task: &Task, today: NaiveDate, now: DateTime<Local>) -> bool {
        match self {
            ViewFilter::Today => task
                .due
                .as_ref()
                .is_some_and(|d| d.is_overdue(today, now) || d.is_today(today, now)),
            ViewFilter::Project(id) => task.project_id == *id,
            ViewFilter::Label(name) => task.has_label(name),
        }
    }

    /// Tab title for this filter.
    pub fn title<'a>(&'a self, catalog: &'a Catalog) -> &'a str {
        match self {
            ViewFilter::Today => "Today",
            ViewFilter::Project(id) => catalog.project_name(id),
            ViewFilter::Label(name) => name,
        }
    }
}

/// Authoritative in-memory entity collection plus the derived current view.
///
/// `all` is replaced wholesale on sync and mutated incrementally by the
/// mutation engine; `view` is recomputed from `all` whenever the active
/// filter changes and kept in step by the incremental mutations. Only the
/// control loop ever touches either collection.
#[derive(Debug, Default)]
pub struct EntityStore {
    all: Vec<Task>,
    view: Vec<Task>,
    pub catalog: Catalog,
}

impl EntityStore {
    pub fn new() -> Self {
        EntityStore::default()
    }

    /// Install a freshly fetched snapshot: rebuild the catalog and replace
    /// the authoritative collection. The view is untouched until a filter
    /// is reapplied.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.catalog = Catalog::new(snapshot.projects, snapshot.sections, snapshot.labels);
        self.replace_all(snapshot.tasks);
    }

    /// Wholesale replace of the authoritative collection, ordered by due
    /// date (undated last), then priority (most urgent first), then the
    /// manual order value as tiebreak.
    pub fn replace_all(&mut self, mut tasks: Vec<Task>) {
        tasks.retain(|t| !t.is_deleted);
        tasks.sort_by(|a, b| {
            let a_date = a.due.as_ref().map(|d| d.date);
            let b_date = b.due.as_ref().map(|d| d.date);
            match (a_date, b_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then(b.priority.cmp(&a.priority))
            .then(a.child_order.cmp(&b.child_order))
        });
        self.all = tasks;
    }

    /// Recompute the current view as the stable-ordered subset of `all`
    /// matching the filter.
    pub fn apply_filter(&mut self, filter: &ViewFilter, today: NaiveDate, now: DateTime<Local>) {
        self.view = self
            .all
            .iter()
            .filter(|t| filter.matches(t, today, now))
            .cloned()
            .collect();
    }

    /// Remove matching entities from both collections. Absent ids are
    /// no-ops.
    pub fn remove_by_id(&mut self, ids: &[String]) {
        self.all.retain(|t| !ids.contains(&t.id));
        self.view.retain(|t| !ids.contains(&t.id));
    }

    /// Apply a field-level transformation to the entity in both
    /// collections, if present.
    pub fn mutate_by_id(&mut self, id: &str, mut f: impl FnMut(&mut Task)) {
        if let Some(task) = self.all.iter_mut().find(|t| t.id == id) {
            f(task);
        }
        if let Some(task) = self.view.iter_mut().find(|t| t.id == id) {
            f(task);
        }
    }

    pub fn all(&self) -> &[Task] {
        &self.all
    }

    pub fn view(&self) -> &[Task] {
        &self.view
    }

    pub fn view_task(&self, idx: usize) -> Option<&Task> {
        self.view.get(idx)
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.all.iter().find(|t| t.id == id)
    }
}
