// Path: crates/services/src/issuance/document.rs
//! The request and metadata document of a full document-backed issuance.

use credchain_api::content::ContentId;
use credchain_types::error::CredentialError;
use serde::{Deserialize, Serialize};

/// Everything needed to upload a credential document and issue a token for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIssuanceRequest {
    /// Address text of the issuing institution.
    pub issuer: String,
    /// Address text of the student receiving the credential.
    pub student_wallet: String,
    /// The student's name as printed on the credential.
    pub student_name: String,
    /// The course the credential certifies. Used as the token's display name.
    pub course: String,
    /// The grade awarded.
    pub grade: String,
    /// The kind of credential, e.g. `Degree` or `Certificate`.
    pub credential_type: String,
    /// The issue date, `YYYY-MM-DD`.
    pub issue_date: String,
    /// File name under which the document is uploaded.
    pub file_name: String,
    /// The credential document itself.
    #[serde(skip)]
    pub document: Vec<u8>,
}

impl DocumentIssuanceRequest {
    /// Checks the fields an upload cannot proceed without.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.document.is_empty() {
            return Err(CredentialError::Validation("credential document is empty".into()));
        }
        if self.student_wallet.trim().is_empty() {
            return Err(CredentialError::Validation("student wallet is required".into()));
        }
        if self.course.trim().is_empty() {
            return Err(CredentialError::Validation("course is required".into()));
        }
        Ok(())
    }

    /// Builds the metadata document pointing at the uploaded file.
    pub fn metadata(&self, document_id: &ContentId) -> serde_json::Value {
        serde_json::json!({
            "name": self.course,
            "description": format!("{} credential", self.credential_type),
            "image": document_id.to_url(),
            "properties": {
                "student_name": self.student_name,
                "student_wallet": self.student_wallet,
                "course": self.course,
                "grade": self.grade,
                "issue_date": self.issue_date,
                "credential_type": self.credential_type,
                "institution_wallet": self.issuer,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DocumentIssuanceRequest {
        DocumentIssuanceRequest {
            issuer: "INSTITUTION".into(),
            student_wallet: "STUDENT".into(),
            student_name: "Asha".into(),
            course: "B.Tech CS".into(),
            grade: "A".into(),
            credential_type: "Degree".into(),
            issue_date: "2024-06-01".into(),
            file_name: "degree.pdf".into(),
            document: b"%PDF-1.7".to_vec(),
        }
    }

    #[test]
    fn test_metadata_layout() {
        let doc = request().metadata(&ContentId("QmFile".into()));
        assert_eq!(doc["name"], "B.Tech CS");
        assert_eq!(doc["description"], "Degree credential");
        assert_eq!(doc["image"], "ipfs://QmFile");
        assert_eq!(doc["properties"]["institution_wallet"], "INSTITUTION");
        assert_eq!(doc["properties"]["issue_date"], "2024-06-01");
        assert_eq!(doc["properties"]["grade"], "A");
    }

    #[test]
    fn test_requires_document_wallet_and_course() {
        assert!(request().validate().is_ok());
        let mut empty = request();
        empty.document.clear();
        assert!(matches!(empty.validate(), Err(CredentialError::Validation(_))));
        let mut no_course = request();
        no_course.course = "  ".into();
        assert!(matches!(no_course.validate(), Err(CredentialError::Validation(_))));
    }
}
