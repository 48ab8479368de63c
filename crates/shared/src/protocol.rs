use serde::{Deserialize, Serialize};

/// Body for `POST /add_context`. Both fields are always sent; a subject the
/// caregiver left blank is submitted as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddContextRequest {
    pub mia_context: String,
    pub luna_context: String,
}

/// Body for `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Success body from `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_context_uses_the_collaborator_field_names() {
        let body = serde_json::to_value(AddContextRequest {
            mia_context: "6 months old, 7kg".to_string(),
            luna_context: String::new(),
        })
        .expect("serialize");

        assert_eq!(body["mia_context"], "6 months old, 7kg");
        assert_eq!(body["luna_context"], "");
    }

    #[test]
    fn ask_payloads_match_the_collaborator_shape() {
        let request =
            serde_json::to_value(AskRequest { question: "When can I start solids?".to_string() })
                .expect("serialize");
        assert_eq!(request["question"], "When can I start solids?");

        let response: AskResponse =
            serde_json::from_str(r#"{"answer":"Around 6 months."}"#).expect("deserialize");
        assert_eq!(response.answer, "Around 6 months.");
    }
}
