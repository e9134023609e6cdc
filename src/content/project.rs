//! Portfolio project model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::post::parse_tag_list;

/// Gradient tokens offered by the admin panel; the first is the default
pub const GRADIENTS: &[(&str, &str)] = &[
    ("from-blue-500 to-cyan-500", "Blue → Cyan"),
    ("from-purple-500 to-pink-500", "Purple → Pink"),
    ("from-green-500 to-emerald-500", "Green → Emerald"),
    ("from-orange-500 to-red-500", "Orange → Red"),
    ("from-indigo-500 to-purple-500", "Indigo → Purple"),
    ("from-yellow-500 to-orange-500", "Yellow → Orange"),
];

pub fn default_gradient() -> String {
    GRADIENTS[0].0.to_string()
}

pub fn is_known_gradient(token: &str) -> bool {
    GRADIENTS.iter().any(|(value, _)| *value == token)
}

/// A portfolio entry stored in the shared projects file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub github: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub link: Option<String>,
    #[serde(default = "default_gradient")]
    pub gradient: String,
    #[serde(default)]
    pub created_at: String,
    /// Keys this model does not know, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

/// Fields submitted when creating or updating a project
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    /// Comma-separated tag list
    pub tags: String,
    pub github: String,
    pub link: String,
    /// Blank keeps the current gradient (or the default for new projects)
    pub gradient: String,
}

impl ProjectInput {
    /// Check required fields and the gradient token
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err("Title and description are required".to_string());
        }
        if let Some(gradient) = self.gradient() {
            if !is_known_gradient(&gradient) {
                return Err(format!("Unknown gradient: {}", gradient));
            }
        }
        Ok(())
    }

    pub fn tag_list(&self) -> Vec<String> {
        parse_tag_list(&self.tags)
    }

    pub fn gradient(&self) -> Option<String> {
        non_blank(&self.gradient)
    }

    pub fn github(&self) -> Option<String> {
        non_blank(&self.github)
    }

    pub fn link(&self) -> Option<String> {
        non_blank(&self.link)
    }
}

fn non_blank(s: &str) -> Option<String> {
    Some(s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape_matches_file_format() {
        let project = Project {
            id: "proj-1".to_string(),
            title: "Folio".to_string(),
            description: "A site".to_string(),
            tags: vec!["rust".to_string()],
            github: None,
            link: Some("https://example.com".to_string()),
            gradient: default_gradient(),
            created_at: "2024-05-01".to_string(),
            extra: serde_json::Map::new(),
        };
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["github"], "");
        assert_eq!(json["link"], "https://example.com");
        assert_eq!(json["createdAt"], "2024-05-01");

        let back: Project = serde_json::from_value(json).unwrap();
        assert_eq!(back, project);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id":"proj-2","title":"T","description":"D"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.tags.is_empty());
        assert_eq!(project.github, None);
        assert_eq!(project.gradient, "from-blue-500 to-cyan-500");
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = r#"{"id":"proj-3","title":"T","description":"D","featured":true,"stars":42}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.extra["featured"], true);
        assert_eq!(project.extra["stars"], 42);

        let out = serde_json::to_value(&project).unwrap();
        assert_eq!(out["featured"], true);
        assert_eq!(out["stars"], 42);
        assert_eq!(out["createdAt"], "");
    }

    #[test]
    fn test_input_validation() {
        let mut input = ProjectInput {
            title: "T".to_string(),
            description: "D".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        input.gradient = "from-black to-white".to_string();
        assert!(input.validate().unwrap_err().contains("Unknown gradient"));

        input.gradient.clear();
        input.description = " ".to_string();
        assert_eq!(
            input.validate().unwrap_err(),
            "Title and description are required"
        );
    }
}
