use serde::{Deserialize, Serialize};

use crate::agent::{FieldKind, FieldSchema, StructuredOutput};

/// Customer name and location captured during onboarding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub location: String,
}

impl StructuredOutput for PersonalInfo {
    fn field_schema() -> FieldSchema {
        FieldSchema::new()
            .required("name", FieldKind::non_empty_string())
            .required("location", FieldKind::non_empty_string())
    }
}

/// Product in use and the problem the customer reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueReport {
    pub product: String,
    pub issue: String,
}

impl StructuredOutput for IssueReport {
    fn field_schema() -> FieldSchema {
        FieldSchema::new()
            .required("product", FieldKind::non_empty_string())
            .required("issue", FieldKind::non_empty_string())
    }
}
