use serde::Serialize;

use crate::models::{Consultant, RepoFeature, Repository, SearchCriteria};
use crate::skills::{SkillMatcher, partition_skills};

/// Points available per component. The same split is used for consultants and repositories.
pub const WEIGHTS: Weights = Weights {
    skills: 40.0,
    constraint: 25.0,
    quality: 20.0,
    activity: 15.0,
};

#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub skills: f64,
    pub constraint: f64,
    pub quality: f64,
    pub activity: f64,
}

impl Weights {
    #[cfg(test)]
    pub fn sum(&self) -> f64 {
        self.skills + self.constraint + self.quality + self.activity
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub constraint: f64,
    pub quality: f64,
    pub activity: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        let sum = self.skills + self.constraint + self.quality + self.activity;
        if sum.is_nan() {
            return 0;
        }
        sum.clamp(0.0, 100.0).round() as u8
    }
}

/// Share of requested skills covered by `offered`, scaled to the skill weight.
fn skill_component(matcher: &dyn SkillMatcher, requested: &[String], offered: &[String]) -> f64 {
    if requested.is_empty() {
        return WEIGHTS.skills;
    }
    let (matched, _) = partition_skills(matcher, requested, offered);
    matched.len() as f64 / requested.len() as f64 * WEIGHTS.skills
}

fn log_points(count: f64, per_decade: f64, cap: f64) -> f64 {
    ((count.max(0.0) + 1.0).log10() * per_decade).min(cap)
}

// --- Consultants ---

pub fn score_consultant(
    consultant: &Consultant,
    criteria: &SearchCriteria,
    matcher: &dyn SkillMatcher,
) -> ScoreBreakdown {
    let skills = skill_component(matcher, &criteria.requested_skills(), &consultant.skills);

    let rate = consultant.hourly_rate.max(0.0);
    let constraint = match criteria.budget {
        Some(budget) if rate > 0.0 && rate > budget => {
            (budget.max(0.0) / rate * WEIGHTS.constraint).clamp(0.0, WEIGHTS.constraint)
        }
        _ => WEIGHTS.constraint,
    };

    // 12 points for rating, 8 for review volume
    let rating = consultant.rating.clamp(0.0, 5.0) / 5.0 * 12.0;
    let reviews = log_points(consultant.review_count as f64, 4.0, 8.0);
    let quality = (rating + reviews).min(WEIGHTS.quality);

    let activity = if !criteria.wants_available() || consultant.is_available() {
        WEIGHTS.activity
    } else {
        WEIGHTS.activity * 0.25
    };

    ScoreBreakdown {
        skills,
        constraint,
        quality,
        activity,
    }
}

// --- Repositories ---

pub fn score_repository(
    repo: &Repository,
    criteria: &SearchCriteria,
    matcher: &dyn SkillMatcher,
) -> ScoreBreakdown {
    let skills = skill_component(matcher, &criteria.requested_skills(), &repo.technologies);

    let constraint = match criteria.difficulty() {
        Some(wanted) => {
            let distance = (wanted.level() - repo.difficulty.level()).abs() as f64;
            (WEIGHTS.constraint - distance * 7.5).max(0.0)
        }
        None => WEIGHTS.constraint,
    };

    let quality = (log_points(repo.stars as f64, 2.4, 12.0) + log_points(repo.forks as f64, 2.0, 8.0))
        .min(WEIGHTS.quality);

    let mut activity: f64 = match repo.open_issues {
        n if n > 10 => 5.0,
        n if n > 5 => 4.0,
        n if n > 0 => 2.0,
        _ => 0.0,
    };
    if repo.has_feature(RepoFeature::Documentation) {
        activity += 3.0;
    }
    if repo.has_feature(RepoFeature::IssueTracking) {
        activity += 2.0;
    }
    if repo.license.is_some() {
        activity += 3.0;
    }
    if repo.has_feature(RepoFeature::WellTagged) {
        activity += 2.0;
    }
    if repo.has_feature(RepoFeature::ActiveDevelopment) {
        activity += 2.0;
    }

    ScoreBreakdown {
        skills,
        constraint,
        quality,
        activity: activity.min(WEIGHTS.activity),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Difficulty, License};
    use crate::skills::SubstringMatcher;

    pub(crate) fn consultant(skills: &[&str], rate: f64) -> Consultant {
        Consultant {
            id: "cons-test".to_string(),
            name: "Test Consultant".to_string(),
            hourly_rate: rate,
            availability: "Available".to_string(),
            rating: 4.8,
            review_count: 40,
            years_experience: 7,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            location: "Austin, TX".to_string(),
            work_preference: "Hybrid".to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn repository(technologies: &[&str], stars: u64) -> Repository {
        Repository {
            id: "1".to_string(),
            name: "widget".to_string(),
            full_name: "acme/widget".to_string(),
            description: "A widget".to_string(),
            technologies: technologies.iter().map(|s| s.to_string()).collect(),
            language: technologies.first().map(|s| s.to_string()),
            stars,
            forks: 120,
            open_issues: 12,
            license: Some(License {
                key: "mit".to_string(),
                name: "MIT License".to_string(),
            }),
            last_updated: None,
            difficulty: Difficulty::Intermediate,
            html_url: "https://github.com/acme/widget".to_string(),
            owner: "acme".to_string(),
            topics: vec!["react".to_string()],
            archived: false,
            has_issues: true,
            has_wiki: true,
            has_projects: false,
            size: 2000,
            category: "Web Development".to_string(),
            estimated_time: "2-4 weeks".to_string(),
            features: vec![
                RepoFeature::IssueTracking,
                RepoFeature::Documentation,
                RepoFeature::ActiveDevelopment,
                RepoFeature::WellTagged,
                RepoFeature::Licensed,
            ],
            maintainer_reputation: 3.0,
        }
    }

    fn criteria(skills: &[&str]) -> SearchCriteria {
        SearchCriteria {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_weights_sum_to_hundred() {
        assert!((WEIGHTS.sum() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unset_criteria_give_full_credit() {
        let empty = SearchCriteria::default();
        for c in [
            consultant(&[], 0.0),
            consultant(&["Go"], 500.0),
            Consultant {
                availability: "Busy".to_string(),
                ..consultant(&["Rust"], 90.0)
            },
        ] {
            let b = score_consultant(&c, &empty, &SubstringMatcher);
            assert_eq!(b.skills, WEIGHTS.skills);
            assert_eq!(b.constraint, WEIGHTS.constraint);
            assert_eq!(b.activity, WEIGHTS.activity);
        }

        let b = score_repository(&repository(&["Rust"], 10), &empty, &SubstringMatcher);
        assert_eq!(b.skills, WEIGHTS.skills);
        assert_eq!(b.constraint, WEIGHTS.constraint);
    }

    #[test]
    fn test_react_budget_scenario() {
        let search = SearchCriteria {
            budget: Some(130.0),
            ..criteria(&["React"])
        };
        let within = score_consultant(&consultant(&["React", "Node.js"], 125.0), &search, &SubstringMatcher);
        let over = score_consultant(&consultant(&["Python"], 200.0), &search, &SubstringMatcher);

        assert_eq!(within.skills, WEIGHTS.skills);
        assert_eq!(within.constraint, WEIGHTS.constraint);
        assert!(within.quality > 0.0);
        assert_eq!(over.skills, 0.0);
        assert!((over.constraint - 130.0 / 200.0 * 25.0).abs() < 1e-9);
        assert!(within.total() > over.total());
    }

    #[test]
    fn test_blank_skills_get_full_credit() {
        let blank = criteria(&["", "   "]);
        let b = score_consultant(&consultant(&["React"], 100.0), &blank, &SubstringMatcher);
        assert_eq!(b.skills, WEIGHTS.skills);

        let b = score_repository(&repository(&["Rust"], 100), &blank, &SubstringMatcher);
        assert_eq!(b.skills, WEIGHTS.skills);

        // a blank entry next to a real one does not dilute the fraction
        let mixed = criteria(&["React", ""]);
        let b = score_consultant(&consultant(&["React"], 100.0), &mixed, &SubstringMatcher);
        assert_eq!(b.skills, WEIGHTS.skills);
    }

    #[test]
    fn test_active_development_adds_activity() {
        let quiet = Repository {
            open_issues: 0,
            license: None,
            features: vec![],
            ..repository(&["Rust"], 100)
        };
        let active = Repository {
            features: vec![RepoFeature::ActiveDevelopment],
            ..quiet.clone()
        };
        let none = criteria(&[]);
        assert_eq!(score_repository(&quiet, &none, &SubstringMatcher).activity, 0.0);
        assert_eq!(score_repository(&active, &none, &SubstringMatcher).activity, 2.0);
    }

    #[test]
    fn test_partial_skill_credit() {
        let b = score_consultant(
            &consultant(&["React"], 100.0),
            &criteria(&["React", "Rust"]),
            &SubstringMatcher,
        );
        assert!((b.skills - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_unavailable_consultant_gets_partial_activity() {
        let search = SearchCriteria {
            availability: Some("available".to_string()),
            ..Default::default()
        };
        let busy = Consultant {
            availability: "Busy until Feb 2025".to_string(),
            ..consultant(&[], 100.0)
        };
        let b = score_consultant(&busy, &search, &SubstringMatcher);
        assert!((b.activity - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let extremes = [
            consultant(&[], 0.0),
            Consultant {
                rating: 99.0,
                review_count: u32::MAX,
                ..consultant(&["React"], f64::MAX)
            },
            Consultant {
                rating: -3.0,
                hourly_rate: -10.0,
                ..consultant(&["React"], 0.0)
            },
        ];
        let searches = [
            SearchCriteria::default(),
            SearchCriteria {
                budget: Some(0.0),
                availability: Some("available".to_string()),
                ..criteria(&["React", "Go"])
            },
            SearchCriteria {
                budget: Some(-5.0),
                ..Default::default()
            },
        ];
        for c in &extremes {
            for s in &searches {
                let b = score_consultant(c, s, &SubstringMatcher);
                assert!(b.total() <= 100);
                assert!(b.quality <= WEIGHTS.quality);
                assert!(b.constraint >= 0.0);
            }
        }

        let huge = Repository {
            forks: u64::MAX,
            open_issues: u64::MAX,
            ..repository(&["Rust"], u64::MAX)
        };
        let b = score_repository(&huge, &criteria(&["Rust"]), &SubstringMatcher);
        assert_eq!(b.total(), 100);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let c = consultant(&["React", "AWS"], 140.0);
        let s = SearchCriteria {
            budget: Some(120.0),
            ..criteria(&["React", "Python"])
        };
        let first = score_consultant(&c, &s, &SubstringMatcher);
        let second = score_consultant(&c, &s, &SubstringMatcher);
        assert_eq!(first, second);
        assert_eq!(first.total(), second.total());
    }

    #[test]
    fn test_adding_matching_skill_never_lowers_score() {
        let s = criteria(&["React", "Rust", "AWS"]);
        let mut c = consultant(&["Python"], 100.0);
        let mut previous = score_consultant(&c, &s, &SubstringMatcher).total();
        for skill in ["React", "Rust", "AWS"] {
            c.skills.push(skill.to_string());
            let next = score_consultant(&c, &s, &SubstringMatcher).total();
            assert!(next >= previous);
            previous = next;
        }

        let mut r = repository(&["Go"], 300);
        let before = score_repository(&r, &s, &SubstringMatcher).total();
        r.technologies.push("Rust".to_string());
        assert!(score_repository(&r, &s, &SubstringMatcher).total() >= before);
    }

    #[test]
    fn test_repository_quality_is_logarithmic() {
        let small = score_repository(&repository(&["Rust"], 10), &criteria(&[]), &SubstringMatcher);
        let large = score_repository(&repository(&["Rust"], 10_000), &criteria(&[]), &SubstringMatcher);
        assert!(large.quality > small.quality);
        assert!(large.quality < small.quality * 4.0);
    }

    #[test]
    fn test_repository_experience_distance() {
        let mut repo = repository(&["Rust"], 100);
        repo.difficulty = Difficulty::Advanced;
        let beginner = SearchCriteria {
            experience_level: Some("beginner".to_string()),
            ..Default::default()
        };
        let b = score_repository(&repo, &beginner, &SubstringMatcher);
        assert!((b.constraint - 10.0).abs() < 1e-9);

        let advanced = SearchCriteria {
            experience_level: Some("advanced".to_string()),
            ..Default::default()
        };
        assert_eq!(score_repository(&repo, &advanced, &SubstringMatcher).constraint, 25.0);
    }

    #[test]
    fn test_repository_activity_is_capped() {
        let b = score_repository(&repository(&["Rust"], 100), &criteria(&[]), &SubstringMatcher);
        assert_eq!(b.activity, WEIGHTS.activity);

        let bare = Repository {
            open_issues: 0,
            license: None,
            features: vec![],
            ..repository(&["Rust"], 100)
        };
        assert_eq!(score_repository(&bare, &criteria(&[]), &SubstringMatcher).activity, 0.0);
    }
}
