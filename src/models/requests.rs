use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::UserProfile;

/// Request to recommend postures for a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    pub age: i32,
    pub height: i32,
    pub weight: i32,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub goals: Vec<String>,
    #[validate(length(max = 50))]
    #[serde(alias = "physicalIssues", default)]
    pub physical_issues: Vec<String>,
    #[validate(length(max = 50))]
    #[serde(alias = "mentalIssues", default)]
    pub mental_issues: Vec<String>,
    #[validate(length(max = 64))]
    pub level: String,
}

impl RecommendRequest {
    /// Convert into a domain profile, trimming entries and dropping blank ones
    ///
    /// A blank issue would be a substring of every contraindication text.
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            age: self.age,
            height: self.height,
            weight: self.weight,
            goals: clean_entries(self.goals),
            physical_issues: clean_entries(self.physical_issues),
            mental_issues: clean_entries(self.mental_issues),
            level: self.level.trim().to_string(),
        }
    }
}

fn clean_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}
