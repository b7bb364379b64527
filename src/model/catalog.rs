use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A project known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub child_order: i32,
    /// The service-designated inbox project.
    #[serde(default)]
    pub inbox: bool,
}

/// A section within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub section_order: i32,
}

/// A label known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
}

/// Id-keyed lookup tables over projects, sections, and labels.
///
/// Built once per load and rebuilt on structural change, so that rendering
/// and context detection resolve foreign keys by map lookup instead of
/// scanning the flat collections per frame.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: IndexMap<String, Project>,
    sections: IndexMap<String, Section>,
    labels: IndexMap<String, Label>,
}

impl Catalog {
    pub fn new(mut projects: Vec<Project>, mut sections: Vec<Section>, labels: Vec<Label>) -> Self {
        projects.sort_by_key(|p| p.child_order);
        // Stable sort: sections with equal order keep service-supplied order.
        sections.sort_by_key(|s| s.section_order);
        Catalog {
            projects: projects.into_iter().map(|p| (p.id.clone(), p)).collect(),
            sections: sections.into_iter().map(|s| (s.id.clone(), s)).collect(),
            labels: labels.into_iter().map(|l| (l.id.clone(), l)).collect(),
        }
    }

    /// Projects in display order (inbox first, then by child_order).
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        let inbox = self.projects.values().filter(|p| p.inbox);
        let rest = self.projects.values().filter(|p| !p.inbox);
        inbox.chain(rest)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn project_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.projects.get(id).map_or(id, |p| p.name.as_str())
    }

    /// Sections of a project in ascending section_order.
    pub fn sections_of(&self, project_id: &str) -> Vec<&Section> {
        self.sections
            .values()
            .filter(|s| s.project_id == project_id)
            .collect()
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    pub fn section_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.sections.get(id).map_or(id, |s| s.name.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, project: &str, name: &str, order: i32) -> Section {
        Section {
            id: id.into(),
            project_id: project.into(),
            name: name.into(),
            section_order: order,
        }
    }

    #[test]
    fn test_sections_sorted_with_stable_ties() {
        let catalog = Catalog::new(
            vec![],
            vec![
                section("s1", "p", "later", 2),
                section("s2", "p", "first-tie", 1),
                section("s3", "p", "second-tie", 1),
            ],
            vec![],
        );
        let names: Vec<&str> = catalog
            .sections_of("p")
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["first-tie", "second-tie", "later"]);
    }

    #[test]
    fn test_inbox_project_listed_first() {
        let catalog = Catalog::new(
            vec![
                Project {
                    id: "p1".into(),
                    name: "Work".into(),
                    child_order: 1,
                    inbox: false,
                },
                Project {
                    id: "p0".into(),
                    name: "Inbox".into(),
                    child_order: 5,
                    inbox: true,
                },
            ],
            vec![],
            vec![],
        );
        let names: Vec<&str> = catalog.projects().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Inbox", "Work"]);
    }

    #[test]
    fn test_name_lookups_fall_back_to_id() {
        let catalog = Catalog::default();
        assert_eq!(catalog.project_name("missing"), "missing");
        assert_eq!(catalog.section_name("missing"), "missing");
    }
}
