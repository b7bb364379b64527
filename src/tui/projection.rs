use chrono::{DateTime, Local, NaiveDate};

use crate::model::{Section, Task};

pub const OVERDUE_HEADER: &str = "OVERDUE";
pub const TODAY_HEADER: &str = "TODAY";
pub const NO_DUE_HEADER: &str = "NO DUE DATE";

/// Grouping strategy for the ordered display sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// One task slot per entity in view order, no placeholders.
    Flat,
    /// Overdue / due-today / everything-else buckets.
    #[default]
    Status,
    /// Sectionless tasks first, then one block per project section.
    Section,
}

impl GroupMode {
    pub fn cycled(self) -> GroupMode {
        match self {
            GroupMode::Flat => GroupMode::Status,
            GroupMode::Status => GroupMode::Section,
            GroupMode::Section => GroupMode::Flat,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupMode::Flat => "flat",
            GroupMode::Status => "status",
            GroupMode::Section => "section",
        }
    }

    pub fn from_name(name: &str) -> Option<GroupMode> {
        match name {
            "flat" => Some(GroupMode::Flat),
            "status" => Some(GroupMode::Status),
            "section" => Some(GroupMode::Section),
            _ => None,
        }
    }
}

/// One line of the ordered display sequence: either a reference into the
/// current view, or a placeholder. Placeholders never carry a view index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Task at position `view_idx` of the current view.
    Task { view_idx: usize },
    /// Section or bucket header. `section_id` is set for section headers so
    /// context detection can target them; a header with no tasks under it
    /// doubles as the empty-section marker.
    Header {
        title: String,
        section_id: Option<String>,
    },
    /// Blank separator line.
    Blank,
}

impl Slot {
    pub fn is_task(&self) -> bool {
        matches!(self, Slot::Task { .. })
    }

    fn header(title: impl Into<String>) -> Slot {
        Slot::Header {
            title: title.into(),
            section_id: None,
        }
    }
}

/// The ordered display sequence plus its index map. Owned by the projector;
/// rendering and input resolve through it rather than recomputing grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub slots: Vec<Slot>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// View index of the task at `pos`, or None for placeholders and
    /// out-of-range positions.
    pub fn task_at(&self, pos: usize) -> Option<usize> {
        match self.slots.get(pos) {
            Some(Slot::Task { view_idx }) => Some(*view_idx),
            _ => None,
        }
    }

    pub fn has_task_slots(&self) -> bool {
        self.slots.iter().any(Slot::is_task)
    }

    pub fn first_task_slot(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_task)
    }

    pub fn last_task_slot(&self) -> Option<usize> {
        self.slots.iter().rposition(Slot::is_task)
    }

    /// Slot position displaying view index `k`.
    pub fn slot_of_view_idx(&self, k: usize) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| matches!(s, Slot::Task { view_idx } if *view_idx == k))
    }

    /// Section context at `pos`: the id carried by the nearest section
    /// header at or above it. Used by "act in current section" commands.
    pub fn section_at(&self, pos: usize) -> Option<&str> {
        self.slots
            .iter()
            .take(pos.saturating_add(1))
            .rev()
            .find_map(|s| match s {
                Slot::Header {
                    section_id: Some(id),
                    ..
                } => Some(id.as_str()),
                _ => None,
            })
    }
}

/// Build the ordered display sequence for the current view under the given
/// grouping mode. `sections` are the active project's sections in ascending
/// order (empty outside section grouping).
pub fn project(
    view: &[Task],
    sections: &[&Section],
    mode: GroupMode,
    today: NaiveDate,
    now: DateTime<Local>,
) -> Projection {
    let slots = match mode {
        GroupMode::Flat => (0..view.len()).map(|view_idx| Slot::Task { view_idx }).collect(),
        GroupMode::Status => project_status(view, today, now),
        GroupMode::Section => project_sections(view, sections),
    };
    Projection { slots }
}

/// Status grouping: fixed bucket order overdue → today → everything-else.
/// The first non-empty dated bucket gets a header; when overdue precedes
/// it, the today run follows directly under the OVERDUE header. The
/// everything-else bucket always gets its own header.
fn project_status(view: &[Task], today: NaiveDate, now: DateTime<Local>) -> Vec<Slot> {
    let mut overdue = Vec::new();
    let mut due_today = Vec::new();
    let mut other = Vec::new();
    for (view_idx, task) in view.iter().enumerate() {
        let slot = Slot::Task { view_idx };
        match &task.due {
            Some(d) if d.is_overdue(today, now) => overdue.push(slot),
            Some(d) if d.is_today(today, now) => due_today.push(slot),
            _ => other.push(slot),
        }
    }

    let mut slots = Vec::with_capacity(view.len() + 3);
    if !overdue.is_empty() {
        slots.push(Slot::header(OVERDUE_HEADER));
        slots.append(&mut overdue);
        slots.append(&mut due_today);
    } else if !due_today.is_empty() {
        slots.push(Slot::header(TODAY_HEADER));
        slots.append(&mut due_today);
    }
    if !other.is_empty() {
        slots.push(Slot::header(NO_DUE_HEADER));
        slots.append(&mut other);
    }
    slots
}

/// Section grouping: sectionless tasks first with no header, then every
/// known section in order — header emitted even for zero tasks so "create
/// in this section" has a target. Tasks referencing an unknown section are
/// kept with the sectionless run rather than dropped.
fn project_sections(view: &[Task], sections: &[&Section]) -> Vec<Slot> {
    let known = |id: &str| sections.iter().any(|s| s.id == id);

    let mut slots: Vec<Slot> = view
        .iter()
        .enumerate()
        .filter(|(_, t)| t.section_id.as_deref().is_none_or(|id| !known(id)))
        .map(|(view_idx, _)| Slot::Task { view_idx })
        .collect();

    for section in sections {
        if !slots.is_empty() {
            slots.push(Slot::Blank);
        }
        slots.push(Slot::Header {
            title: section.name.clone(),
            section_id: Some(section.id.clone()),
        });
        for (view_idx, _) in view
            .iter()
            .enumerate()
            .filter(|(_, t)| t.section_id.as_deref() == Some(section.id.as_str()))
        {
            slots.push(Slot::Task { view_idx });
        }
    }
    slots
}
