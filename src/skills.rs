use serde::{Deserialize, Serialize};

// --- Matcher trait ---

/// Decides whether a requested skill is covered by an offered skill or technology.
pub trait SkillMatcher {
    fn matches(&self, requested: &str, offered: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    #[default]
    Substring,
    Fuzzy,
}

impl MatcherKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Some(MatcherKind::Substring),
            "fuzzy" => Some(MatcherKind::Fuzzy),
            _ => None,
        }
    }
}

pub fn create_matcher(kind: MatcherKind, fuzzy_threshold: f64) -> Box<dyn SkillMatcher> {
    match kind {
        MatcherKind::Substring => Box::new(SubstringMatcher),
        MatcherKind::Fuzzy => Box::new(FuzzySkillMatcher::new(fuzzy_threshold)),
    }
}

/// Case-insensitive substring match in either direction ("React" ~ "React Native").
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl SkillMatcher for SubstringMatcher {
    fn matches(&self, requested: &str, offered: &str) -> bool {
        let requested = requested.trim().to_lowercase();
        let offered = offered.trim().to_lowercase();
        if requested.is_empty() || offered.is_empty() {
            return false;
        }
        offered.contains(&requested) || requested.contains(&offered)
    }
}

/// Substring match, falling back to Jaro-Winkler similarity for typos ("Kubernets").
#[derive(Debug, Clone, Copy)]
pub struct FuzzySkillMatcher {
    threshold: f64,
}

impl FuzzySkillMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }
}

impl SkillMatcher for FuzzySkillMatcher {
    fn matches(&self, requested: &str, offered: &str) -> bool {
        if SubstringMatcher.matches(requested, offered) {
            return true;
        }
        let requested = requested.trim().to_lowercase();
        let offered = offered.trim().to_lowercase();
        if requested.is_empty() || offered.is_empty() {
            return false;
        }
        strsim::jaro_winkler(&requested, &offered) >= self.threshold
    }
}

/// Splits requested skills into (matched, unmatched) against an offered set, keeping request order.
pub fn partition_skills(
    matcher: &dyn SkillMatcher,
    requested: &[String],
    offered: &[String],
) -> (Vec<String>, Vec<String>) {
    requested
        .iter()
        .cloned()
        .partition(|skill| offered.iter().any(|o| matcher.matches(skill, o)))
}

/// Offered items not covered by any requested skill, keeping offered order.
pub fn uncovered(matcher: &dyn SkillMatcher, requested: &[String], offered: &[String]) -> Vec<String> {
    offered
        .iter()
        .filter(|o| !requested.iter().any(|skill| matcher.matches(skill, o)))
        .cloned()
        .collect()
}

// --- Catalogues ---

/// Technology name and the keywords that imply it in topics, names or descriptions.
pub const TECH_KEYWORDS: &[(&str, &[&str])] = &[
    ("React", &["react", "jsx", "create-react-app", "next.js", "gatsby"]),
    ("Vue.js", &["vue", "vuejs", "nuxt", "vue-cli"]),
    ("Angular", &["angular", "typescript", "ng", "angular-cli"]),
    ("Node.js", &["node", "nodejs", "express", "fastify", "koa"]),
    ("Python", &["python", "django", "flask", "fastapi", "pandas"]),
    ("JavaScript", &["javascript", "js", "es6", "typescript"]),
    ("TypeScript", &["typescript", "ts", "type-definitions"]),
    ("Go", &["golang", "go", "gin", "fiber"]),
    ("Rust", &["rust", "cargo", "actix", "tokio"]),
    ("Java", &["java", "spring", "maven", "gradle"]),
    ("C++", &["cpp", "c++", "cmake"]),
    ("Swift", &["swift", "ios", "swiftui"]),
    ("Kotlin", &["kotlin", "android"]),
    ("PHP", &["php", "laravel", "symfony"]),
    ("Ruby", &["ruby", "rails", "sinatra"]),
    ("C#", &["csharp", "dotnet", "asp.net"]),
    ("Solidity", &["solidity", "ethereum", "web3", "smart-contracts"]),
    ("Docker", &["docker", "dockerfile", "containers"]),
    ("Kubernetes", &["kubernetes", "k8s", "helm"]),
    ("GraphQL", &["graphql", "apollo", "relay"]),
    ("MongoDB", &["mongodb", "mongoose"]),
    ("PostgreSQL", &["postgresql", "postgres"]),
    ("Redis", &["redis", "cache"]),
    ("AWS", &["aws", "amazon-web-services", "lambda"]),
    ("Firebase", &["firebase", "firestore"]),
    ("Machine Learning", &["machine-learning", "ml", "tensorflow", "pytorch", "scikit-learn"]),
    ("Data Science", &["data-science", "pandas", "numpy", "jupyter"]),
    ("Blockchain", &["blockchain", "cryptocurrency", "bitcoin", "ethereum", "defi"]),
    ("Mobile", &["mobile", "react-native", "flutter", "ionic"]),
    ("Game Development", &["game", "unity", "unreal", "godot"]),
    ("DevOps", &["devops", "ci-cd", "jenkins", "github-actions"]),
    ("Security", &["security", "cybersecurity", "encryption", "auth"]),
    ("API", &["api", "rest", "graphql", "microservices"]),
    ("Frontend", &["frontend", "ui", "ux", "css", "html"]),
    ("Backend", &["backend", "server", "database", "api"]),
    ("Full Stack", &["fullstack", "full-stack", "mern", "mean"]),
    ("Open Source", &["open-source", "oss", "community"]),
    ("Education", &["education", "learning", "tutorial", "course"]),
    ("Healthcare", &["healthcare", "medical", "health", "telemedicine"]),
    ("Finance", &["finance", "fintech", "banking", "trading"]),
    ("E-commerce", &["ecommerce", "e-commerce", "shopping", "store"]),
    ("Social", &["social", "chat", "messaging", "community"]),
    ("Productivity", &["productivity", "tools", "automation", "workflow"]),
    ("Entertainment", &["entertainment", "media", "streaming", "music"]),
    ("IoT", &["iot", "internet-of-things", "sensors", "embedded"]),
    ("AR/VR", &["ar", "vr", "augmented-reality", "virtual-reality"]),
    ("Climate", &["climate", "environment", "sustainability", "green"]),
];

pub fn keywords_for(tech: &str) -> Option<&'static [&'static str]> {
    TECH_KEYWORDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tech))
        .map(|(_, keywords)| *keywords)
}

/// GitHub `language:` qualifier for a skill.
pub fn language_for(skill: &str) -> String {
    match skill {
        "JavaScript" => "javascript".to_string(),
        "TypeScript" => "typescript".to_string(),
        "Python" => "python".to_string(),
        "Java" => "java".to_string(),
        "Go" => "go".to_string(),
        "Rust" => "rust".to_string(),
        "C++" => "cpp".to_string(),
        "C#" => "csharp".to_string(),
        "PHP" => "php".to_string(),
        "Ruby" => "ruby".to_string(),
        "Swift" => "swift".to_string(),
        "Kotlin" => "kotlin".to_string(),
        "Solidity" => "solidity".to_string(),
        other => other.to_lowercase(),
    }
}

pub const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    ("Frontend", &["React", "Vue.js", "Angular", "JavaScript", "TypeScript", "HTML", "CSS"]),
    ("Backend", &["Node.js", "Python", "Java", "Go", "PHP", "Ruby", "C#"]),
    ("Mobile", &["React Native", "Flutter", "Swift", "Kotlin", "Ionic"]),
    ("Data Science", &["Python", "R", "SQL", "Pandas", "NumPy", "Scikit-learn"]),
    ("Machine Learning", &["TensorFlow", "PyTorch", "Keras", "OpenCV", "NLP"]),
    ("Cloud", &["AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform"]),
    ("Blockchain", &["Solidity", "Web3.js", "Ethereum", "Smart Contracts", "DeFi"]),
    ("DevOps", &["Jenkins", "GitLab CI", "Docker", "Kubernetes", "Ansible"]),
    ("Security", &["Penetration Testing", "Ethical Hacking", "Cryptography", "OWASP"]),
    ("Design", &["Figma", "Adobe XD", "Sketch", "UX/UI Design", "Prototyping"]),
];

const MAX_SUGGESTIONS: usize = 10;

/// Up to ten catalogue skills containing `query` (case-insensitive); the first ten when empty.
pub fn skill_suggestions(query: &str) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    SKILL_CATEGORIES
        .iter()
        .flat_map(|(_, skills)| skills.iter().copied())
        .filter(|skill| query.is_empty() || skill.to_lowercase().contains(&query))
        .take(MAX_SUGGESTIONS)
        .collect()
}
