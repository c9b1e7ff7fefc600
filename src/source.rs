use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::models::{Consultant, SearchCriteria};

// --- Source trait ---

/// Supplies the raw candidates a matcher filters, scores and ranks.
pub trait CandidateSource {
    type Record;

    async fn query(&self, criteria: &SearchCriteria) -> Result<Vec<Self::Record>>;
}

// --- Consultant directory ---

const EMBEDDED_CONSULTANTS: &str = include_str!("../data/consultants.json");

/// In-memory consultant list, loaded from the embedded fixture or a JSON file.
#[derive(Debug, Clone)]
pub struct ConsultantDirectory {
    consultants: Vec<Consultant>,
    origin: Option<PathBuf>,
}

impl ConsultantDirectory {
    pub fn new(consultants: Vec<Consultant>) -> Self {
        Self {
            consultants,
            origin: None,
        }
    }

    pub fn embedded() -> Result<Self> {
        let consultants: Vec<Consultant> = serde_json::from_str(EMBEDDED_CONSULTANTS)
            .context("Failed to parse embedded consultant directory")?;
        Ok(Self::new(consultants))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read consultant directory: {}", path.display()))?;
        let consultants: Vec<Consultant> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse consultant directory: {}", path.display()))?;
        Ok(Self {
            consultants,
            origin: Some(path.to_path_buf()),
        })
    }

    /// The configured file when given, the embedded fixture otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::embedded(),
        }
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn len(&self) -> usize {
        self.consultants.len()
    }

    pub fn get(&self, id: &str) -> Result<&Consultant> {
        self.consultants
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow!("Consultant '{}' not found", id))
    }
}

impl CandidateSource for ConsultantDirectory {
    type Record = Consultant;

    async fn query(&self, _criteria: &SearchCriteria) -> Result<Vec<Consultant>> {
        Ok(self.consultants.clone())
    }
}

// --- Popular filters ---

#[derive(Debug, Clone, Serialize)]
pub struct LabeledValue {
    pub label: &'static str,
    pub value: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopularFilters {
    pub skills: Vec<&'static str>,
    pub budget_ranges: Vec<LabeledValue>,
    pub project_types: Vec<&'static str>,
    pub experience_levels: Vec<LabeledValue>,
}

pub fn popular_filters() -> PopularFilters {
    PopularFilters {
        skills: vec!["React", "Python", "AWS", "Machine Learning", "Blockchain"],
        budget_ranges: vec![
            LabeledValue { label: "Under $100/hr", value: Some(100) },
            LabeledValue { label: "$100-150/hr", value: Some(150) },
            LabeledValue { label: "$150-200/hr", value: Some(200) },
            LabeledValue { label: "$200+/hr", value: None },
        ],
        project_types: vec!["Web Development", "Mobile Apps", "AI/ML", "DevOps", "Security"],
        experience_levels: vec![
            LabeledValue { label: "5+ years", value: Some(5) },
            LabeledValue { label: "10+ years", value: Some(10) },
            LabeledValue { label: "15+ years", value: Some(15) },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_directory_loads() {
        let directory = ConsultantDirectory::embedded().unwrap();
        assert_eq!(directory.len(), 6);
        assert!(directory.origin().is_none());
        let sarah = directory.get("cons-001").unwrap();
        assert_eq!(sarah.name, "Sarah Chen");
        assert_eq!(sarah.hourly_rate, 125.0);
        assert!(sarah.skills.contains(&"React".to_string()));
    }

    #[test]
    fn test_get_unknown_consultant() {
        let directory = ConsultantDirectory::embedded().unwrap();
        let err = directory.get("cons-999").unwrap_err();
        assert!(err.to_string().contains("cons-999"));
    }

    #[test]
    fn test_from_file_tolerates_partial_records() {
        let path = std::env::temp_dir().join(format!("tec-consultants-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"id": "p-1", "name": "Partial", "skills": ["Go"]}, {"id": "p-2"}]"#).unwrap();

        let directory = ConsultantDirectory::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.origin(), Some(path.as_path()));
        let bare = directory.get("p-2").unwrap();
        assert_eq!(bare.rating, 0.0);
        assert!(bare.specializations.is_empty());
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = ConsultantDirectory::from_file(Path::new("/nonexistent/consultants.json"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_query_returns_whole_directory() {
        let directory = ConsultantDirectory::new(vec![Consultant::default(), Consultant::default()]);
        let all = directory.query(&SearchCriteria::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_popular_filters() {
        let filters = popular_filters();
        assert_eq!(filters.budget_ranges.len(), 4);
        assert!(filters.budget_ranges[3].value.is_none());
        assert_eq!(filters.experience_levels[1].value, Some(10));
    }
}
