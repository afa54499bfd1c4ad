use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The canonical resume document edited by the builder and persisted by the store.
///
/// Every field tolerates absence so partially-filled documents from the
/// front end (or the import skeleton) round-trip without errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// A single skill, normalized from either wire representation.
///
/// The front end stores skills either as bare strings (`["Go", "Rust"]`) or as
/// objects (`[{"name": "Go", "level": "expert"}]`). Both collapse into this type
/// on deserialization; a skill without a level serializes back to a bare string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    pub level: Option<String>,
}

impl Skill {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: None,
        }
    }

    pub fn with_level(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Some(level.into()),
        }
    }

    /// `Go` or `Go (expert)`.
    pub fn display_label(&self) -> String {
        match self.level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() => format!("{} ({level})", self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SkillRepr {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<String>,
    },
}

impl<'de> Deserialize<'de> for Skill {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match SkillRepr::deserialize(deserializer)? {
            SkillRepr::Name(name) => Skill { name, level: None },
            SkillRepr::Detailed { name, level } => Skill { name, level },
        })
    }
}

impl Serialize for Skill {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match &self.level {
            None => SkillRepr::Name(self.name.clone()),
            Some(level) => SkillRepr::Detailed {
                name: self.name.clone(),
                level: Some(level.clone()),
            },
        };
        repr.serialize(serializer)
    }
}

/// Renders the comma-separated skill listing used by every export format.
pub fn format_skills(skills: &[Skill]) -> String {
    skills
        .iter()
        .map(Skill::display_label)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_accept_string_array() {
        let data: ResumeData = serde_json::from_str(r#"{"skills": ["Go", "Rust"]}"#).unwrap();
        assert_eq!(data.skills, vec![Skill::named("Go"), Skill::named("Rust")]);
        assert_eq!(format_skills(&data.skills), "Go, Rust");
    }

    #[test]
    fn test_skills_accept_object_array() {
        let data: ResumeData =
            serde_json::from_str(r#"{"skills": [{"name": "Go", "level": "expert"}]}"#).unwrap();
        assert_eq!(data.skills, vec![Skill::with_level("Go", "expert")]);
        assert_eq!(format_skills(&data.skills), "Go (expert)");
    }

    #[test]
    fn test_skills_accept_mixed_representations() {
        let data: ResumeData = serde_json::from_str(
            r#"{"skills": ["SQL", {"name": "Rust", "level": "advanced"}, {"name": "Bash"}]}"#,
        )
        .unwrap();
        assert_eq!(format_skills(&data.skills), "SQL, Rust (advanced), Bash");
    }

    #[test]
    fn test_skill_without_level_serializes_as_string() {
        let skills = vec![Skill::named("Go"), Skill::with_level("Rust", "expert")];
        let json = serde_json::to_value(&skills).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["Go", {"name": "Rust", "level": "expert"}])
        );
    }

    #[test]
    fn test_blank_level_renders_name_only() {
        assert_eq!(Skill::with_level("Go", "  ").display_label(), "Go");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let data: ResumeData =
            serde_json::from_str(r#"{"personal": {"name": "Ada"}, "experience": [{}]}"#).unwrap();
        assert_eq!(data.personal.name, "Ada");
        assert!(data.personal.email.is_empty());
        assert_eq!(data.experience.len(), 1);
        assert!(data.experience[0].company.is_empty());
        assert!(data.template.is_none());
    }

    #[test]
    fn test_camel_case_field_names() {
        let data: ResumeData = serde_json::from_str(
            r#"{"experience": [{"company": "Acme", "startDate": "2020", "endDate": "2023"}]}"#,
        )
        .unwrap();
        assert_eq!(data.experience[0].start_date, "2020");
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["experience"][0]["endDate"], "2023");
    }
}
