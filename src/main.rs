mod analysis;
mod config;
mod enrich;
mod filter;
mod github;
mod insights;
mod logging;
mod matcher;
mod models;
mod ranking;
mod scoring;
mod skills;
mod source;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use github::GithubSource;
use matcher::{ConsultantMatcher, ProjectMatcher};
use models::SearchCriteria;
use serde::Serialize;
use source::ConsultantDirectory;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "tec")]
#[command(about = "Match consultants and open-source projects to a developer's skills")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find consultants matching the given criteria
    Consultants {
        /// Required skill (repeatable)
        #[arg(short, long = "skill")]
        skills: Vec<String>,

        /// Maximum hourly rate
        #[arg(short, long)]
        budget: Option<f64>,

        /// Only consultants available now
        #[arg(short, long)]
        available: bool,

        /// Location (remote consultants always qualify)
        #[arg(short, long)]
        location: Option<String>,

        /// Project type, e.g. "Web Applications"
        #[arg(short, long)]
        project_type: Option<String>,

        /// Minimum years of experience, e.g. "5+"
        #[arg(short, long)]
        experience: Option<String>,

        /// Minimum rating (0-5)
        #[arg(long)]
        min_rating: Option<f64>,

        /// Number of results to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a consultant profile
    Consultant {
        /// Consultant ID
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Find open-source projects to contribute to
    Projects {
        /// Skill to match (repeatable)
        #[arg(short, long = "skill")]
        skills: Vec<String>,

        /// Experience level (beginner, intermediate, advanced)
        #[arg(short, long)]
        level: Option<String>,

        /// Number of results to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Suggest skills from the catalogue
    Skills {
        /// Text to search for
        query: Option<String>,
    },

    /// Show popular search filters
    Filters {
        #[arg(long)]
        json: bool,
    },

    /// Scan a source file for security, performance and maintainability issues
    Analyze {
        /// File to analyze
        file: PathBuf,

        #[arg(short, long, default_value = "javascript")]
        language: String,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;
    debug!(skill_matcher = ?config.skill_matcher, max_results = config.max_results, "configuration loaded");

    match cli.command {
        Commands::Consultants {
            skills,
            budget,
            available,
            location,
            project_type,
            experience,
            min_rating,
            limit,
            json,
        } => {
            let directory = ConsultantDirectory::load(config.consultants_path.as_deref())?;
            debug!(count = directory.len(), origin = ?directory.origin(), "consultant directory loaded");

            let criteria = SearchCriteria {
                skills,
                budget,
                availability: available.then(|| "available".to_string()),
                location,
                project_type,
                experience_level: experience,
                min_rating,
            };
            let matcher = ConsultantMatcher::new(
                directory,
                skills::create_matcher(config.skill_matcher, config.fuzzy_threshold),
                limit.unwrap_or(config.max_results),
            );
            let results = matcher.search(&criteria).await;

            if json {
                print_json(&results)?;
            } else if results.is_empty() {
                println!("No consultants match those criteria.");
            } else {
                println!(
                    "{:<5} {:<10} {:<20} {:<30} {:>8} {:>6}",
                    "RANK", "ID", "NAME", "TITLE", "RATE", "SCORE"
                );
                println!("{}", "-".repeat(84));
                for (i, result) in results.iter().enumerate() {
                    let c = &result.candidate;
                    println!(
                        "{:<5} {:<10} {:<20} {:<30} {:>8} {:>6}",
                        i + 1,
                        c.id,
                        truncate(&c.name, 18),
                        truncate(&c.title, 28),
                        format!("${:.0}/hr", c.hourly_rate),
                        result.score
                    );
                    println!("{}", indented(&result.insights.match_reason));
                }
            }
        }

        Commands::Consultant { id, json } => {
            let directory = ConsultantDirectory::load(config.consultants_path.as_deref())?;
            let c = directory.get(&id)?;

            if json {
                print_json(c)?;
            } else {
                println!("{} ({})", c.name, c.id);
                println!("Title: {}", c.title);
                println!("Location: {} ({}, {})", c.location, c.timezone, c.work_preference);
                println!("Rate: ${:.0}/hr", c.hourly_rate);
                println!("Availability: {}", c.availability);
                println!("Rating: {:.1} ({} reviews)", c.rating, c.review_count);
                println!("Experience: {} years", c.years_experience);
                println!("Skills: {}", c.skills.join(", "));
                if !c.specializations.is_empty() {
                    println!("Specializations: {}", c.specializations.join(", "));
                }
                if !c.certifications.is_empty() {
                    println!("Certifications: {}", c.certifications.join(", "));
                }
                if !c.education.is_empty() {
                    println!("Education: {}", c.education);
                }
                if !c.bio.is_empty() {
                    println!("\n{}", textwrap::fill(&c.bio, 80));
                }
                if !c.portfolio.is_empty() {
                    println!("\nPortfolio:");
                    for entry in &c.portfolio {
                        println!("  - {}: {}", entry.title, entry.description);
                        if !entry.impact.is_empty() {
                            println!("    Impact: {}", entry.impact);
                        }
                    }
                }
            }
        }

        Commands::Projects {
            skills,
            level,
            limit,
            json,
        } => {
            let source = GithubSource::new(
                &config.github_api_url,
                config.github_token.clone(),
                &config.user_agent,
                config.request_timeout(),
            )?;
            let criteria = SearchCriteria {
                skills,
                experience_level: level,
                ..Default::default()
            };
            let matcher = ProjectMatcher::new(
                source,
                skills::create_matcher(config.skill_matcher, config.fuzzy_threshold),
                limit.unwrap_or(config.max_results),
            );
            let search = matcher.search(&criteria).await;

            if json {
                print_json(&search)?;
            } else if search.results.is_empty() {
                println!("No projects found. Try a broader skill or a different level.");
            } else {
                if search.fallback {
                    println!("GitHub search is unavailable; showing suggested starter projects.\n");
                }
                println!(
                    "{:<5} {:<36} {:<12} {:>8} {:<13} {:>6}",
                    "RANK", "REPOSITORY", "LANGUAGE", "STARS", "LEVEL", "SCORE"
                );
                println!("{}", "-".repeat(85));
                for (i, result) in search.results.iter().enumerate() {
                    let repo = &result.candidate;
                    println!(
                        "{:<5} {:<36} {:<12} {:>8} {:<13} {:>6}",
                        i + 1,
                        truncate(&repo.full_name, 34),
                        truncate(repo.language.as_deref().unwrap_or("-"), 10),
                        repo.stars,
                        repo.difficulty.as_str(),
                        result.score
                    );
                    println!("{}", indented(&result.insights.match_reason));
                }
            }
        }

        Commands::Skills { query } => {
            let suggestions = skills::skill_suggestions(query.as_deref().unwrap_or(""));
            if suggestions.is_empty() {
                println!("No matching skills.");
            } else {
                for skill in suggestions {
                    println!("{}", skill);
                }
            }
        }

        Commands::Filters { json } => {
            let filters = source::popular_filters();
            if json {
                print_json(&filters)?;
            } else {
                println!("Skills: {}", filters.skills.join(", "));
                println!("Project types: {}", filters.project_types.join(", "));
                println!("\nBudget ranges:");
                for range in &filters.budget_ranges {
                    println!("  {}", range.label);
                }
                println!("\nExperience:");
                for level in &filters.experience_levels {
                    println!("  {}", level.label);
                }
            }
        }

        Commands::Analyze {
            file,
            language,
            json,
        } => {
            let code = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read source file: {}", file.display()))?;
            let report = analysis::analyze(&code, &language);

            if json {
                print_json(&report)?;
            } else {
                println!("{} ({})", file.display(), report.language);
                println!("Overall grade: {}", report.overall);
                println!("Security:        {:.1}/10", report.security.score);
                println!("Performance:     {:.1}/10", report.performance.score);
                println!("Maintainability: {:.1}/10", report.maintainability.score);

                let findings: Vec<_> = report
                    .security
                    .vulnerabilities
                    .iter()
                    .chain(&report.performance.issues)
                    .collect();
                if !findings.is_empty() {
                    println!("\n{:<6} {:<8} {:<22} {}", "LINE", "SEVERITY", "KIND", "SUGGESTION");
                    println!("{}", "-".repeat(80));
                    for finding in findings {
                        println!(
                            "{:<6} {:<8} {:<22} {}",
                            finding.line,
                            format!("{:?}", finding.severity).to_lowercase(),
                            finding.kind,
                            finding.suggestion
                        );
                    }
                }

                if !report.issues.is_empty() {
                    println!("\nLint:");
                    for issue in &report.issues {
                        println!("  line {}: {}", issue.line, issue.message);
                    }
                }

                for suggestion in &report.maintainability.suggestions {
                    println!("  - {}", suggestion);
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn indented(text: &str) -> String {
    let options = textwrap::Options::new(84)
        .initial_indent("      ")
        .subsequent_indent("      ");
    textwrap::fill(text, options)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer title", 10), "a much ...");
        assert_eq!(truncate("Zoë Müller-Schmidt", 8), "Zoë M...");
    }

    #[test]
    fn test_cli_parses_consultant_search() {
        let cli = Cli::try_parse_from([
            "tec", "consultants", "-s", "React", "-s", "AWS", "--budget", "130", "--available", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Consultants {
                skills,
                budget,
                available,
                ..
            } => {
                assert_eq!(skills, vec!["React", "AWS"]);
                assert_eq!(budget, Some(130.0));
                assert!(available);
            }
            _ => panic!("expected consultants command"),
        }
    }

    #[test]
    fn test_cli_analyze_defaults_to_javascript() {
        let cli = Cli::try_parse_from(["tec", "analyze", "app.js"]).unwrap();
        match cli.command {
            Commands::Analyze { language, json, .. } => {
                assert_eq!(language, "javascript");
                assert!(!json);
            }
            _ => panic!("expected analyze command"),
        }
    }
}
