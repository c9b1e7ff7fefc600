use serde::Serialize;

use crate::models::{Consultant, Difficulty, Repository, SearchCriteria};
use crate::skills::{SkillMatcher, partition_skills, uncovered};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Excellent,
    Strong,
    Learning,
    SkillBuilding,
}

impl MatchBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => MatchBand::Excellent,
            60..=79 => MatchBand::Strong,
            40..=59 => MatchBand::Learning,
            _ => MatchBand::SkillBuilding,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            MatchBand::Excellent => "Excellent match!",
            MatchBand::Strong => "Strong match!",
            MatchBand::Learning => "Good learning opportunity!",
            MatchBand::SkillBuilding => "Skill-building match!",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsultantInsight {
    pub band: MatchBand,
    pub match_reason: String,
    pub budget_fit: String,
    pub additional_skills: Vec<String>,
    pub strength_areas: Vec<String>,
    pub experience_highlight: String,
    pub recommendation_tip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectInsight {
    pub band: MatchBand,
    pub match_reason: String,
    pub learning_opportunities: Vec<String>,
    pub impact_score: f64,
    pub contribution_tips: Vec<String>,
    pub difficulty_explanation: String,
    pub open_source_quality: Vec<String>,
}

// --- Consultants ---

pub fn consultant_insight(
    consultant: &Consultant,
    criteria: &SearchCriteria,
    score: u8,
    matcher: &dyn SkillMatcher,
) -> ConsultantInsight {
    let band = MatchBand::for_score(score);
    let wanted = criteria.requested_skills();
    let (matched, _) = partition_skills(matcher, &wanted, &consultant.skills);
    let requested = wanted.len();

    let coverage = if requested > 0 && matched.len() == requested {
        format!(
            "{} has expertise in all your required technologies: {}.",
            consultant.name,
            matched.join(", ")
        )
    } else if !matched.is_empty() {
        format!(
            "Covers {}/{} required skills: {}.",
            matched.len(),
            requested,
            matched.join(", ")
        )
    } else {
        "Experienced professional with complementary skills that could benefit your project.".to_string()
    };

    let budget_fit = match criteria.budget {
        Some(budget) if consultant.hourly_rate <= budget => "Within budget".to_string(),
        Some(budget) => format!("${:.0} over budget", consultant.hourly_rate - budget),
        None => "No budget specified".to_string(),
    };

    ConsultantInsight {
        band,
        match_reason: format!("{} {}", band.headline(), coverage),
        budget_fit,
        additional_skills: uncovered(matcher, &wanted, &consultant.skills)
            .into_iter()
            .take(3)
            .collect(),
        strength_areas: consultant.specializations.iter().take(3).cloned().collect(),
        experience_highlight: format!(
            "{} years of experience with {}/5 rating",
            consultant.years_experience, consultant.rating
        ),
        recommendation_tip: recommendation_tip(consultant),
    }
}

fn recommendation_tip(consultant: &Consultant) -> String {
    if consultant.is_available() {
        "Currently available for new projects".to_string()
    } else if !consultant.industries.is_empty() {
        format!(
            "{} has worked in {} industries",
            consultant.name,
            consultant.industries.join(", ")
        )
    } else if let Some(first) = consultant.specializations.first() {
        format!("Specializes in {}", first)
    } else {
        format!("Located in {}", consultant.location)
    }
}

// --- Projects ---

pub fn project_insight(
    repo: &Repository,
    criteria: &SearchCriteria,
    score: u8,
    matcher: &dyn SkillMatcher,
) -> ProjectInsight {
    let band = MatchBand::for_score(score);
    let wanted = criteria.requested_skills();
    let matched: Vec<String> = repo
        .technologies
        .iter()
        .filter(|tech| wanted.iter().any(|s| matcher.matches(s, tech)))
        .cloned()
        .collect();
    let learning = uncovered(matcher, &wanted, &repo.technologies);

    let mut indicators = Vec::new();
    if repo.stars > 1000 {
        indicators.push("highly starred");
    }
    if repo.forks > 100 {
        indicators.push("actively forked");
    }
    if repo.open_issues > 10 {
        indicators.push("community-driven");
    }
    if repo.license.is_some() {
        indicators.push("properly licensed");
    }

    let skills_phrase = if matched.is_empty() {
        "current".to_string()
    } else {
        matched.join(", ")
    };
    let match_reason = match band {
        MatchBand::Excellent => format!(
            "{} This {} open source project aligns with your {} expertise.",
            band.headline(),
            if indicators.is_empty() { "quality".to_string() } else { indicators.join(", ") },
            skills_phrase
        ),
        MatchBand::Strong => format!(
            "{} This {} project offers great opportunities with your {} skills.",
            band.headline(),
            indicators.first().copied().unwrap_or("quality"),
            skills_phrase
        ),
        MatchBand::Learning => format!(
            "{} This well-maintained open source project will help you grow beyond your current skills.",
            band.headline()
        ),
        MatchBand::SkillBuilding => format!(
            "{} This established project offers excellent learning potential in new technologies.",
            band.headline()
        ),
    };

    ProjectInsight {
        band,
        match_reason,
        learning_opportunities: learning.into_iter().take(3).collect(),
        impact_score: impact_score(repo),
        contribution_tips: contribution_tips(repo),
        difficulty_explanation: explain_difficulty(repo.difficulty).to_string(),
        open_source_quality: open_source_quality(repo),
    }
}

/// 0-10, one decimal; popularity plus a bonus for social-good categories.
pub fn impact_score(repo: &Repository) -> f64 {
    let category = repo.category.as_str();
    let mut score = ((repo.stars as f64) + 1.0).log10() * 1.5 + ((repo.forks as f64) + 1.0).log10() * 1.2;
    if category.contains("Social") {
        score += 2.0;
    }
    if category.contains("Education") {
        score += 1.5;
    }
    if category.contains("Healthcare") {
        score += 2.0;
    }
    if category.contains("Climate") {
        score += 2.5;
    }
    if repo.open_issues > 20 {
        score += 1.0;
    }
    (score.min(10.0) * 10.0).round() / 10.0
}

fn contribution_tips(repo: &Repository) -> Vec<String> {
    let mut tips = Vec::new();
    if repo.open_issues > 0 {
        tips.push("Check open issues for contribution opportunities".to_string());
    }
    if repo.has_wiki {
        tips.push("Documentation improvements are always welcome".to_string());
    }
    if let Some(language) = &repo.language {
        tips.push(format!("Focus on {} related contributions", language));
    }
    if repo.topics.iter().any(|t| t == "good-first-issue") {
        tips.push("Look for \"good first issue\" labels".to_string());
    }
    tips.truncate(3);
    tips
}

pub fn explain_difficulty(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "Great for newcomers with clear documentation and simple codebase",
        Difficulty::Intermediate => "Moderate complexity requiring some experience with the tech stack",
        Difficulty::Advanced => "Advanced project with complex architecture and extensive codebase",
    }
}

fn open_source_quality(repo: &Repository) -> Vec<String> {
    let mut indicators = Vec::new();

    if repo.stars > 5000 {
        indicators.push("Highly popular");
    } else if repo.stars > 1000 {
        indicators.push("Well-regarded");
    } else if repo.stars > 100 {
        indicators.push("Community favorite");
    }

    if repo.forks > 500 {
        indicators.push("Extensively forked");
    } else if repo.forks > 50 {
        indicators.push("Actively forked");
    }

    if repo.open_issues > 50 {
        indicators.push("Very active");
    } else if repo.open_issues > 10 {
        indicators.push("Community engaged");
    }

    if repo.license.is_some() {
        indicators.push("Open source licensed");
    }

    indicators.into_iter().take(3).map(String::from).collect()
}
