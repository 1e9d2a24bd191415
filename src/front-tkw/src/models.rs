use serde::{Deserialize, Serialize};

/// Body of POST /api/requests
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub project_name: String,
    pub business_details: String,
    pub website_structure: String,
}

impl SubmitBody {
    /// Trimmed form values, or `None` if any of them is blank.
    pub fn from_inputs(project_name: &str, business_details: &str, website_structure: &str) -> Option<Self> {
        let (project_name, business_details, website_structure) =
            (project_name.trim(), business_details.trim(), website_structure.trim());
        if project_name.is_empty() || business_details.is_empty() || website_structure.is_empty() {
            return None;
        }
        Some(SubmitBody {
            project_name: project_name.to_string(),
            business_details: business_details.to_string(),
            website_structure: website_structure.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswer {
    pub id: String,
    pub reused: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectItem {
    pub id: String,
    pub project_name: String,
    pub business_details: String,
    pub website_structure: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectList {
    pub items: Vec<ProjectItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestItem {
    pub id: String,
    pub project_name: String,
    pub business_details: String,
    pub website_structure: String,
    pub status: String,
    #[serde(default)]
    pub output_link: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestList {
    pub items: Vec<RequestItem>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub callback_url: String,
}

/// Why a call to the API did not produce the expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// fetch() itself rejected.
    Network(String),
    /// The server answered with a non-success status.
    Status { status: u16, body: String },
    /// The answer was not the expected JSON.
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_body_from_inputs() {
        let body = SubmitBody::from_inputs(" Acme ", "B2B SaaS\n", "Home").unwrap();
        assert_eq!(body.project_name, "Acme");
        assert_eq!(body.business_details, "B2B SaaS");
        assert!(SubmitBody::from_inputs("Acme", "   ", "Home").is_none());
    }

    #[test]
    fn test_submit_body_is_camel_case() {
        let body = SubmitBody::from_inputs("Acme", "B2B", "Home").unwrap();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["projectName"], "Acme");
        assert_eq!(json["websiteStructure"], "Home");
    }

    #[test]
    fn test_request_item_without_outcome() {
        let item: RequestItem = serde_json::from_str(
            r#"{"id":"1","project_name":"Acme","business_details":"B2B","website_structure":"Home",
                "status":"pending","created_at":"2025-06-01T12:00:00Z","updated_at":"2025-06-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(item.output_link, None);
        assert_eq!(item.status, "pending");
    }
}
