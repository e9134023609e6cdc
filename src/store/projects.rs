//! Projects: a single JSON array file, rewritten whole on every change

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{write_atomic, StoreError};
use crate::content::{default_gradient, Project, ProjectInput};

#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All projects in insertion order. A missing file is created as `[]`.
    pub fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        if !self.path.exists() {
            write_atomic(&self.path, b"[]")?;
            tracing::debug!("Created empty projects file {:?}", self.path);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn get_project(&self, id: &str) -> Result<Project, StoreError> {
        self.list_projects()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))
    }

    /// Replace the whole file with `projects`
    pub fn save_projects(&self, projects: &[Project]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(projects)?;
        write_atomic(&self.path, json.as_bytes())
    }

    pub fn create_project(&self, input: ProjectInput) -> Result<Project, StoreError> {
        self.create_project_at(input, Utc::now())
    }

    fn create_project_at(
        &self,
        input: ProjectInput,
        now: DateTime<Utc>,
    ) -> Result<Project, StoreError> {
        input.validate().map_err(StoreError::Validation)?;

        let mut projects = self.list_projects()?;
        let project = Project {
            id: next_id(&projects, now.timestamp_millis()),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            tags: input.tag_list(),
            github: input.github(),
            link: input.link(),
            gradient: input.gradient().unwrap_or_else(default_gradient),
            created_at: now.format("%Y-%m-%d").to_string(),
            extra: serde_json::Map::new(),
        };

        projects.push(project.clone());
        self.save_projects(&projects)?;
        tracing::info!("Created project {} ({})", project.id, project.title);
        Ok(project)
    }

    /// Replace a project's editable fields; id and creation date are kept
    pub fn update_project(&self, id: &str, input: ProjectInput) -> Result<Project, StoreError> {
        if id.trim().is_empty() {
            return Err(StoreError::Validation("Missing required fields".to_string()));
        }
        input.validate().map_err(StoreError::Validation)?;

        let mut projects = self.list_projects()?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))?;

        project.title = input.title.trim().to_string();
        project.description = input.description.trim().to_string();
        project.tags = input.tag_list();
        project.github = input.github();
        project.link = input.link();
        if let Some(gradient) = input.gradient() {
            project.gradient = gradient;
        }

        let updated = project.clone();
        self.save_projects(&projects)?;
        tracing::info!("Updated project {}", id);
        Ok(updated)
    }

    /// Remove a project; returns whether anything was removed
    pub fn delete_project(&self, id: &str) -> Result<bool, StoreError> {
        let mut projects = self.list_projects()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        let removed = projects.len() != before;

        self.save_projects(&projects)?;
        if removed {
            tracing::info!("Deleted project {}", id);
        }
        Ok(removed)
    }
}

/// `proj-<millis>`, bumped until it does not collide with an existing id
fn next_id(projects: &[Project], millis: i64) -> String {
    let mut millis = millis;
    loop {
        let id = format!("proj-{}", millis);
        if !projects.iter().any(|p| p.id == id) {
            return id;
        }
        millis += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProjectStore) {
        let tmp = TempDir::new().unwrap();
        let store = ProjectStore::new(tmp.path().join("content/projects.json"));
        (tmp, store)
    }

    fn input(title: &str) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            description: "Something I built".to_string(),
            tags: "rust, cli".to_string(),
            github: "https://github.com/me/x".to_string(),
            link: "".to_string(),
            gradient: "".to_string(),
        }
    }

    #[test]
    fn test_list_creates_empty_file() {
        let (_tmp, store) = store();
        assert!(store.list_projects().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn test_create_appends_in_order() {
        let (_tmp, store) = store();
        let a = store.create_project(input("A")).unwrap();
        let b = store.create_project(input("B")).unwrap();

        let projects = store.list_projects().unwrap();
        let ids: Vec<_> = projects.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(projects[0].gradient, "from-blue-500 to-cyan-500");
        assert_eq!(projects[0].tags, vec!["rust", "cli"]);
        assert_eq!(projects[0].link, None);
    }

    #[test]
    fn test_ids_stay_unique_within_same_millisecond() {
        let (_tmp, store) = store();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let a = store.create_project_at(input("A"), now).unwrap();
        let b = store.create_project_at(input("B"), now).unwrap();

        assert_eq!(a.id, format!("proj-{}", now.timestamp_millis()));
        assert_eq!(b.id, format!("proj-{}", now.timestamp_millis() + 1));
        assert_eq!(a.created_at, "2024-06-01");
    }

    #[test]
    fn test_update_keeps_gradient_when_blank() {
        let (_tmp, store) = store();
        let mut first = input("A");
        first.gradient = "from-orange-500 to-red-500".to_string();
        let created = store.create_project(first).unwrap();

        let mut edit = input("A2");
        edit.github.clear();
        let updated = store.update_project(&created.id, edit).unwrap();

        assert_eq!(updated.title, "A2");
        assert_eq!(updated.gradient, "from-orange-500 to-red-500");
        assert_eq!(updated.github, None);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.get_project(&created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_keeps_unknown_keys() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"[{"id":"proj-1","title":"A","description":"D","featured":true,"order":3}]"#,
        )
        .unwrap();

        let updated = store.update_project("proj-1", input("A2")).unwrap();
        assert_eq!(updated.extra["featured"], true);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["title"], "A2");
        assert_eq!(raw[0]["featured"], true);
        assert_eq!(raw[0]["order"], 3);
    }

    #[test]
    fn test_update_missing_project() {
        let (_tmp, store) = store();
        let err = store.update_project("proj-404", input("X")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Project not found");
    }

    #[test]
    fn test_delete_filters_by_id() {
        let (_tmp, store) = store();
        let a = store.create_project(input("A")).unwrap();
        let b = store.create_project(input("B")).unwrap();

        assert!(store.delete_project(&a.id).unwrap());
        assert!(!store.delete_project(&a.id).unwrap());

        let remaining = store.list_projects().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(
            store.list_projects().unwrap_err(),
            StoreError::Json(_)
        ));
    }
}
