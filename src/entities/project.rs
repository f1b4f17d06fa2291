//! Project entity type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityKind, StructuredId};

/// Kind of work a project covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    Plan,
    #[serde(rename = "Étude")]
    Etude,
    Suivi,
    Construction,
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectType::Plan => write!(f, "Plan"),
            ProjectType::Etude => write!(f, "Étude"),
            ProjectType::Suivi => write!(f, "Suivi-Contrôle"),
            ProjectType::Construction => write!(f, "Construction"),
        }
    }
}

/// A project record, attached to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Remote document key, assigned by the store on creation
    #[serde(skip)]
    pub document_id: String,

    /// Structured identifier, e.g. `PR-25-001`
    pub structured_id: StructuredId,

    /// Document key of the owning client; immutable after creation
    pub client_id: String,

    /// Free-text description of the work
    pub designation: String,

    /// Kind of work
    #[serde(rename = "type")]
    pub project_type: ProjectType,

    /// Total cost in XOF
    pub cout: f64,

    /// User-supplied project date
    pub date_creation: NaiveDate,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a project
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub client_id: String,
    pub designation: String,
    pub project_type: ProjectType,
    pub cout: f64,
    pub date_creation: NaiveDate,
}

/// Mutable project fields for an edit submission
///
/// The owning client cannot change once the project exists, so `clientId`
/// has no slot here.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cout: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<NaiveDate>,
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;

    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    fn from_draft(draft: ProjectDraft, id: StructuredId, created: DateTime<Utc>) -> Self {
        Self {
            document_id: String::new(),
            structured_id: id,
            client_id: draft.client_id,
            designation: draft.designation,
            project_type: draft.project_type,
            cout: draft.cout,
            date_creation: draft.date_creation,
            created_at: created,
        }
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }

    fn set_document_id(&mut self, key: String) {
        self.document_id = key;
    }

    fn structured_id(&self) -> &StructuredId {
        &self.structured_id
    }

    fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(designation) = &patch.designation {
            self.designation = designation.clone();
        }
        if let Some(project_type) = patch.project_type {
            self.project_type = project_type;
        }
        if let Some(cout) = patch.cout {
            self.cout = cout;
        }
        if let Some(date_creation) = patch.date_creation {
            self.date_creation = date_creation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        Project::from_draft(
            ProjectDraft {
                client_id: "CL-25-01".to_string(),
                designation: "Plan de maison R+1".to_string(),
                project_type: ProjectType::Etude,
                cout: 1_500_000.0,
                date_creation: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            },
            StructuredId::from_parts(EntityKind::Project, 25, 1),
            Utc::now(),
        )
    }

    #[test]
    fn test_project_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["structuredId"], "PR-25-001");
        assert_eq!(json["clientId"], "CL-25-01");
        assert_eq!(json["type"], "Étude");
        assert_eq!(json["cout"], 1_500_000.0);
    }

    #[test]
    fn test_project_roundtrip() {
        let project = sample();
        let json = serde_json::to_value(&project).unwrap();
        let parsed: Project = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.structured_id, project.structured_id);
        assert_eq!(parsed.project_type, ProjectType::Etude);
        assert_eq!(parsed.date_creation, project.date_creation);
    }

    #[test]
    fn test_patch_excludes_client_id() {
        let patch = ProjectPatch {
            cout: Some(2_000_000.0),
            project_type: Some(ProjectType::Construction),
            ..ProjectPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.get("clientId").is_none());
        assert_eq!(obj["type"], "Construction");
    }

    #[test]
    fn test_apply_patch_keeps_client() {
        let mut project = sample();
        project.apply_patch(&ProjectPatch {
            designation: Some("Étude de sol".to_string()),
            ..ProjectPatch::default()
        });
        assert_eq!(project.designation, "Étude de sol");
        assert_eq!(project.client_id, "CL-25-01");
    }
}
