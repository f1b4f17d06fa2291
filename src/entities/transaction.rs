//! Transaction entity type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityKind, StructuredId};

/// A payment transaction on a project
///
/// The structured id is stored under the `transactionId` field; the remote
/// document key is store-assigned and unrelated to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Remote document key, assigned by the store on creation
    #[serde(skip)]
    pub document_id: String,

    /// Structured identifier, e.g. `TR-25-001`
    #[serde(rename = "transactionId")]
    pub structured_id: StructuredId,

    /// Document key of the project this payment belongs to
    pub project_id: String,

    /// Denormalized project designation, snapshotted at submission time
    pub project_name: String,

    /// Amount in FCFA
    pub amount: f64,

    /// Date the payment was made
    pub transaction_date: NaiveDate,

    /// Creation timestamp
    pub date_creation: DateTime<Utc>,
}

/// Validated input for recording a transaction
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub project_id: String,
    pub project_name: String,
    pub amount: f64,
    pub transaction_date: NaiveDate,
}

/// Mutable transaction fields for an edit submission
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
}

impl Entity for Transaction {
    const KIND: EntityKind = EntityKind::Transaction;

    type Draft = TransactionDraft;
    type Patch = TransactionPatch;

    fn from_draft(draft: TransactionDraft, id: StructuredId, created: DateTime<Utc>) -> Self {
        Self {
            document_id: String::new(),
            structured_id: id,
            project_id: draft.project_id,
            project_name: draft.project_name,
            amount: draft.amount,
            transaction_date: draft.transaction_date,
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

    fn apply_patch(&mut self, patch: &TransactionPatch) {
        if let Some(project_id) = &patch.project_id {
            self.project_id = project_id.clone();
        }
        if let Some(project_name) = &patch.project_name {
            self.project_name = project_name.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(transaction_date) = patch.transaction_date {
            self.transaction_date = transaction_date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::from_draft(
            TransactionDraft {
                project_id: "proj-doc-key".to_string(),
                project_name: "Plan de maison R+1".to_string(),
                amount: 500_000.0,
                transaction_date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            },
            StructuredId::from_parts(EntityKind::Transaction, 25, 9),
            Utc::now(),
        )
    }

    #[test]
    fn test_transaction_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["transactionId"], "TR-25-009");
        assert_eq!(json["projectId"], "proj-doc-key");
        assert_eq!(json["amount"], 500_000.0);
        assert!(json.get("structuredId").is_none());
    }

    #[test]
    fn test_transaction_roundtrip() {
        let tx = sample();
        let json = serde_json::to_value(&tx).unwrap();
        let parsed: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.structured_id, tx.structured_id);
        assert_eq!(parsed.amount, tx.amount);
    }

    #[test]
    fn test_apply_patch() {
        let mut tx = sample();
        tx.apply_patch(&TransactionPatch {
            amount: Some(750_000.0),
            ..TransactionPatch::default()
        });
        assert_eq!(tx.amount, 750_000.0);
        assert_eq!(tx.project_name, "Plan de maison R+1");
    }
}
