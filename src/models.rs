use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoreBreakdown;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCriteria {
    pub skills: Vec<String>,
    pub budget: Option<f64>,
    pub availability: Option<String>,
    pub location: Option<String>,
    pub project_type: Option<String>,
    pub experience_level: Option<String>,
    pub min_rating: Option<f64>,
}

impl SearchCriteria {
    /// Requested skills, trimmed, with blank entries dropped. `[""]` means no skill constraint.
    pub fn requested_skills(&self) -> Vec<String> {
        self.skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// True only for an explicit "available" request; other values are no constraint.
    pub fn wants_available(&self) -> bool {
        self.availability
            .as_deref()
            .is_some_and(|a| a.trim().eq_ignore_ascii_case("available"))
    }

    /// Minimum years of experience, read from a leading integer ("5", "5+", "10 years").
    pub fn min_years(&self) -> Option<u32> {
        let raw = self.experience_level.as_deref()?.trim();
        let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.experience_level.as_deref().and_then(Difficulty::parse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    pub fn level(self) -> i32 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortfolioEntry {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub impact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Consultant {
    pub id: String,
    pub name: String,
    pub title: String,
    pub location: String,
    pub timezone: String,
    pub hourly_rate: f64,
    pub availability: String, // free text: "Available", "Busy until Feb 2025", ...
    pub rating: f64,
    pub review_count: u32,
    pub years_experience: u32,
    pub skills: Vec<String>,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub bio: String,
    pub portfolio: Vec<PortfolioEntry>,
    pub certifications: Vec<String>,
    pub education: String,
    pub work_preference: String, // "Remote", "Hybrid", "On-site preferred"
    pub project_types: Vec<String>,
    pub industries: Vec<String>,
}

impl Consultant {
    pub fn is_available(&self) -> bool {
        self.availability.to_lowercase().contains("available")
    }

    pub fn is_remote(&self) -> bool {
        self.work_preference.eq_ignore_ascii_case("remote")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoFeature {
    IssueTracking,
    Documentation,
    ProjectManagement,
    ActiveDevelopment,
    WellTagged,
    Licensed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub license: Option<License>,
    pub last_updated: Option<DateTime<Utc>>,
    pub difficulty: Difficulty,
    pub html_url: String,
    pub owner: String,
    pub topics: Vec<String>,
    pub archived: bool,
    pub has_issues: bool,
    pub has_wiki: bool,
    pub has_projects: bool,
    pub size: u64,
    pub category: String,
    pub estimated_time: String,
    pub features: Vec<RepoFeature>,
    pub maintainer_reputation: f64,
}

impl Repository {
    pub fn has_feature(&self, feature: RepoFeature) -> bool {
        self.features.contains(&feature)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<C, I> {
    pub candidate: C,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub insights: I,
}
