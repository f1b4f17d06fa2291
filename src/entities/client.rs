//! Client entity type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityKind, StructuredId};

/// A client record
///
/// Clients use their structured id as the remote document key, so
/// `document_id` and `structured_id` always agree for persisted records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Remote document key (not part of the document fields)
    #[serde(skip)]
    pub document_id: String,

    /// Structured identifier, e.g. `CL-25-01`
    pub structured_id: StructuredId,

    /// First name
    pub prenom: String,

    /// Family name
    pub nom: String,

    /// Local phone number, 8 digits (validated upstream)
    pub telephone: String,

    /// Creation timestamp
    pub date_creation: DateTime<Utc>,
}

/// Validated input for creating a client
#[derive(Debug, Clone)]
pub struct ClientDraft {
    pub prenom: String,
    pub nom: String,
    pub telephone: String,
}

/// Mutable client fields for an edit submission
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Client;

    type Draft = ClientDraft;
    type Patch = ClientPatch;

    fn from_draft(draft: ClientDraft, id: StructuredId, created: DateTime<Utc>) -> Self {
        Self {
            document_id: String::new(),
            structured_id: id,
            prenom: draft.prenom,
            nom: draft.nom,
            telephone: draft.telephone,
            date_creation: created,
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

    fn apply_patch(&mut self, patch: &ClientPatch) {
        if let Some(prenom) = &patch.prenom {
            self.prenom = prenom.clone();
        }
        if let Some(nom) = &patch.nom {
            self.nom = nom.clone();
        }
        if let Some(telephone) = &patch.telephone {
            self.telephone = telephone.clone();
        }
    }
}

impl Client {
    /// Full display name, `prenom` then `nom`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Client {
        Client::from_draft(
            ClientDraft {
                prenom: "Awa".to_string(),
                nom: "Traoré".to_string(),
                telephone: "70123456".to_string(),
            },
            StructuredId::from_parts(EntityKind::Client, 25, 3),
            Utc::now(),
        )
    }

    #[test]
    fn test_client_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["structuredId"], "CL-25-03");
        assert_eq!(json["prenom"], "Awa");
        assert_eq!(json["telephone"], "70123456");
        assert!(json.get("dateCreation").is_some());
        // The document key never serializes into the fields.
        assert!(json.get("documentId").is_none());
    }

    #[test]
    fn test_client_roundtrip() {
        let client = sample();
        let json = serde_json::to_value(&client).unwrap();
        let parsed: Client = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.structured_id, client.structured_id);
        assert_eq!(parsed.nom, client.nom);
        assert_eq!(parsed.document_id, "");
    }

    #[test]
    fn test_patch_only_mutable_fields() {
        let patch = ClientPatch {
            telephone: Some("71112233".to_string()),
            ..ClientPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["telephone"], "71112233");
    }

    #[test]
    fn test_apply_patch() {
        let mut client = sample();
        client.apply_patch(&ClientPatch {
            telephone: Some("71112233".to_string()),
            ..ClientPatch::default()
        });
        assert_eq!(client.telephone, "71112233");
        assert_eq!(client.prenom, "Awa");
        assert_eq!(client.full_name(), "Awa Traoré");
    }
}
