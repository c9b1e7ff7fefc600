//! Derived repository attributes: technologies, difficulty, category and friends.
//! Everything here is a pure function of the search record.

use crate::github::{OwnerRecord, RepositoryRecord};
use crate::models::{Difficulty, License, RepoFeature, Repository, SearchCriteria};
use crate::skills::TECH_KEYWORDS;

const MAX_TECHNOLOGIES: usize = 6;

pub fn to_repository(record: &RepositoryRecord) -> Repository {
    Repository {
        id: record.id.to_string(),
        name: record.name.clone(),
        full_name: record.full_name.clone(),
        description: record
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "No description available".to_string()),
        technologies: extract_technologies(record),
        language: record.language.clone(),
        stars: record.stargazers_count,
        forks: record.forks_count,
        open_issues: record.open_issues_count,
        license: record.license.as_ref().filter(|l| !l.key.is_empty()).map(|l| License {
            key: l.key.clone(),
            name: l.name.clone(),
        }),
        last_updated: record.updated_at,
        difficulty: calculate_difficulty(record),
        html_url: record.html_url.clone(),
        owner: record.owner.login.clone(),
        topics: record.topics.clone(),
        archived: record.archived,
        has_issues: record.has_issues,
        has_wiki: record.has_wiki,
        has_projects: record.has_projects,
        size: record.size,
        category: categorize(record).to_string(),
        estimated_time: estimate_time(record).to_string(),
        features: extract_features(record),
        maintainer_reputation: maintainer_reputation(&record.owner),
    }
}

/// Primary language, then technologies implied by topics, then by name and description.
pub fn extract_technologies(record: &RepositoryRecord) -> Vec<String> {
    let mut technologies: Vec<String> = Vec::new();
    let mut push = |tech: &str| {
        if !technologies.iter().any(|t| t == tech) {
            technologies.push(tech.to_string());
        }
    };

    if let Some(language) = record.language.as_deref().filter(|l| !l.is_empty()) {
        push(language);
    }

    for topic in &record.topics {
        let topic = topic.to_lowercase();
        if let Some((tech, _)) = TECH_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| topic.contains(k)))
        {
            push(tech);
        }
    }

    let text = format!(
        "{} {}",
        record.name,
        record.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    for (tech, keywords) in TECH_KEYWORDS {
        if keywords.iter().any(|k| text.contains(k)) {
            push(tech);
        }
    }

    technologies.truncate(MAX_TECHNOLOGIES);
    technologies
}

pub fn calculate_difficulty(record: &RepositoryRecord) -> Difficulty {
    let complexity = (record.stargazers_count as f64 / 100.0).min(10.0)
        + (record.forks_count as f64 / 50.0).min(5.0)
        + (record.size as f64 / 1000.0).min(5.0)
        + (record.open_issues_count as f64 / 20.0).min(3.0);

    if complexity < 5.0 {
        Difficulty::Beginner
    } else if complexity < 12.0 {
        Difficulty::Intermediate
    } else {
        Difficulty::Advanced
    }
}

pub fn estimate_time(record: &RepositoryRecord) -> &'static str {
    let size = record.size;
    let stars = record.stargazers_count;
    if size < 1000 && stars < 100 {
        "1-2 weeks"
    } else if size < 5000 && stars < 500 {
        "2-4 weeks"
    } else if size < 20000 && stars < 2000 {
        "1-2 months"
    } else {
        "2+ months"
    }
}

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Web Development", &["web", "frontend", "backend", "fullstack", "website", "app"]),
    ("Mobile Development", &["mobile", "android", "ios", "react-native", "flutter"]),
    ("Machine Learning", &["ml", "ai", "machine-learning", "tensorflow", "pytorch", "data"]),
    ("Blockchain", &["blockchain", "crypto", "ethereum", "bitcoin", "web3", "defi"]),
    ("DevOps", &["devops", "docker", "kubernetes", "ci", "cd", "deployment"]),
    ("Game Development", &["game", "gaming", "unity", "unreal", "godot"]),
    ("Data Science", &["data-science", "analytics", "visualization", "pandas", "jupyter"]),
    ("Security", &["security", "cybersecurity", "encryption", "auth", "vulnerability"]),
    ("Education", &["education", "learning", "tutorial", "course", "teaching"]),
    ("Open Source Tools", &["tool", "utility", "cli", "library", "framework"]),
    ("Social Impact", &["social", "community", "nonprofit", "charity", "volunteer"]),
    ("Healthcare", &["health", "medical", "healthcare", "medicine", "patient"]),
    ("Finance", &["finance", "fintech", "trading", "banking", "payment"]),
    ("E-commerce", &["ecommerce", "shop", "store", "marketplace", "retail"]),
    ("Entertainment", &["entertainment", "media", "music", "video", "streaming"]),
];

pub fn categorize(record: &RepositoryRecord) -> &'static str {
    let text = format!(
        "{} {} {}",
        record.name,
        record.description.as_deref().unwrap_or_default(),
        record.topics.join(" ")
    )
    .to_lowercase();

    CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or("General Development")
}

pub fn extract_features(record: &RepositoryRecord) -> Vec<RepoFeature> {
    let mut features = Vec::new();
    if record.has_issues {
        features.push(RepoFeature::IssueTracking);
    }
    if record.has_wiki {
        features.push(RepoFeature::Documentation);
    }
    if record.has_projects {
        features.push(RepoFeature::ProjectManagement);
    }
    if record.open_issues_count > 0 {
        features.push(RepoFeature::ActiveDevelopment);
    }
    if !record.topics.is_empty() {
        features.push(RepoFeature::WellTagged);
    }
    if record.license.is_some() {
        features.push(RepoFeature::Licensed);
    }
    features
}

/// 3.0 base, up to +1.5 for followers and +0.5 for public repositories; one decimal.
pub fn maintainer_reputation(owner: &OwnerRecord) -> f64 {
    let score = 3.0
        + (owner.followers as f64 / 100.0).min(1.5)
        + (owner.public_repos as f64 / 50.0).min(0.5);
    (score.min(5.0) * 10.0).round() / 10.0
}

/// Placeholder projects served when the search API cannot be reached.
pub fn fallback_projects(criteria: &SearchCriteria) -> Vec<Repository> {
    let difficulty = criteria.difficulty().unwrap_or(Difficulty::Intermediate);
    let mit = || {
        Some(License {
            key: "mit".to_string(),
            name: "MIT License".to_string(),
        })
    };
    let placeholder = |id: &str, name: &str, description: &str, technologies: &[&str], category: &str, stars: u64| {
        Repository {
            id: id.to_string(),
            name: name.to_string(),
            full_name: format!("three-eyed-coders/{}", name),
            description: description.to_string(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            language: technologies.first().map(|t| t.to_string()),
            stars,
            forks: stars / 4,
            open_issues: 8,
            license: mit(),
            last_updated: None,
            difficulty,
            html_url: format!("https://github.com/three-eyed-coders/{}", name),
            owner: "three-eyed-coders".to_string(),
            topics: vec!["good-first-issue".to_string()],
            archived: false,
            has_issues: true,
            has_wiki: true,
            has_projects: false,
            size: 800,
            category: category.to_string(),
            estimated_time: "2-3 weeks".to_string(),
            features: vec![
                RepoFeature::IssueTracking,
                RepoFeature::Documentation,
                RepoFeature::ActiveDevelopment,
                RepoFeature::WellTagged,
                RepoFeature::Licensed,
            ],
            maintainer_reputation: 3.0,
        }
    };

    vec![
        placeholder(
            "fallback-1",
            "community-project-finder",
            "Help build a platform to connect developers with meaningful projects",
            &["React", "Node.js", "MongoDB"],
            "Open Source Tools",
            89,
        ),
        placeholder(
            "fallback-2",
            "open-learning-hub",
            "Curated tutorials and exercises for people learning to code",
            &["Python", "Machine Learning"],
            "Education",
            64,
        ),
        placeholder(
            "fallback-3",
            "contributor-toolkit",
            "Command-line helpers for first-time open source contributors",
            &["Rust", "Go"],
            "Open Source Tools",
            41,
        ),
    ]
}
