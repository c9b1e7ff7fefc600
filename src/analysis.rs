use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: &'static str,
    pub severity: Severity,
    /// 1-based line of the match start.
    pub line: usize,
    pub description: &'static str,
    pub suggestion: &'static str,
}

struct Rule {
    kind: &'static str,
    regex: Regex,
    severity: Severity,
    description: &'static str,
    suggestion: &'static str,
    /// Drop the match when the rest of its line contains this text.
    unless_on_line: Option<&'static str>,
}

impl Rule {
    fn new(
        kind: &'static str,
        pattern: &str,
        severity: Severity,
        description: &'static str,
        suggestion: &'static str,
    ) -> Self {
        Self {
            kind,
            regex: Regex::new(pattern).unwrap(),
            severity,
            description,
            suggestion,
            unless_on_line: None,
        }
    }

    fn findings<'a>(&'a self, code: &'a str) -> impl Iterator<Item = Finding> + 'a {
        self.regex
            .find_iter(code)
            .filter(move |m| match self.unless_on_line {
                Some(needle) => {
                    let rest = &code[m.end()..];
                    let line_end = rest.find('\n').unwrap_or(rest.len());
                    !rest[..line_end].contains(needle)
                }
                None => true,
            })
            .map(move |m| Finding {
                kind: self.kind,
                severity: self.severity,
                line: line_number(code, m.start()),
                description: self.description,
                suggestion: self.suggestion,
            })
    }
}

pub fn line_number(code: &str, index: usize) -> usize {
    code[..index.min(code.len())].matches('\n').count() + 1
}

fn scan_rules(rules: &[Rule], code: &str) -> Vec<Finding> {
    rules.iter().flat_map(|rule| rule.findings(code)).collect()
}

// --- Scanners ---

pub trait PatternScanner {
    fn scan(&self, code: &str) -> Vec<Finding>;

    /// 10 for clean code, never below 1.
    fn score(&self, findings: usize) -> f64;
}

static SECURITY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(
            "xss",
            r"(?i)innerHTML\s*=\s*[^;]+(?:req\.body|req\.query|req\.params)",
            Severity::High,
            "Potential XSS vulnerability detected",
            "Use DOMPurify.sanitize() or proper escaping",
        ),
        Rule::new(
            "sqlInjection",
            r#"(?i)query\s*\(\s*["`'].*\$\{.*\}.*["`']\s*\)"#,
            Severity::High,
            "SQL injection vulnerability found",
            "Use parameterized queries or prepared statements",
        ),
        Rule::new(
            "hardcodedSecrets",
            r#"(?i)(password|secret|key|token)\s*[:=]\s*["`'][^"`']+["`']"#,
            Severity::Medium,
            "Hardcoded credentials detected",
            "Use environment variables for sensitive data",
        ),
        Rule::new(
            "unsafeEval",
            r"(?i)eval\s*\(",
            Severity::High,
            "Unsafe eval() usage found",
            "Avoid eval() or use safer alternatives",
        ),
        Rule::new(
            "insecureRandom",
            r"(?i)Math\.random\(\)",
            Severity::Low,
            "Insecure random number generation",
            "Use crypto.getRandomValues() for security-sensitive operations",
        ),
    ]
});

static PERFORMANCE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(
            "inefficientLoop",
            r"(?i)for\s*\([^)]*\)\s*\{[^}]*for\s*\([^)]*\)",
            Severity::High,
            "Nested loop over the same data",
            "Optimize nested loops or use more efficient algorithms",
        ),
        Rule::new(
            "unnecessaryRerender",
            r"(?i)useState\s*\([^)]*\)[^;]*;[^}]*return",
            Severity::Medium,
            "State hook may trigger unnecessary re-renders",
            "Use React.memo, useMemo, or useCallback",
        ),
        Rule {
            unless_on_line: Some("removeEventListener"),
            ..Rule::new(
                "memoryLeak",
                r"(?i)addEventListener\s*\([^)]*\)",
                Severity::High,
                "Event listener is never removed",
                "Add proper event listener cleanup",
            )
        },
        Rule::new(
            "inefficientQuery",
            r"(?i)querySelector(?:All)?\s*\([^)]*\)[^;]*;[^}]*querySelector",
            Severity::Medium,
            "Repeated DOM query",
            "Cache DOM queries or use refs",
        ),
    ]
});

pub struct SecurityScanner;

impl PatternScanner for SecurityScanner {
    fn scan(&self, code: &str) -> Vec<Finding> {
        scan_rules(&SECURITY_RULES, code)
    }

    fn score(&self, findings: usize) -> f64 {
        (10.0 - findings as f64 * 1.5).max(1.0)
    }
}

pub struct PerformanceScanner;

impl PatternScanner for PerformanceScanner {
    fn scan(&self, code: &str) -> Vec<Finding> {
        scan_rules(&PERFORMANCE_RULES, code)
    }

    fn score(&self, findings: usize) -> f64 {
        (10.0 - findings as f64 * 0.8).max(1.0)
    }
}

// --- Reports ---

#[derive(Debug, Clone, Serialize)]
pub struct SecurityReport {
    pub score: f64,
    pub vulnerabilities: Vec<Finding>,
    pub recommendations: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub score: f64,
    pub issues: Vec<Finding>,
    pub optimizations: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintainabilityMetrics {
    /// Decision points + 1, capped at 20.
    pub complexity: u32,
    /// Repeated non-trivial lines, capped at 10.
    pub duplicate_lines: u32,
    pub function_length: f64,
    pub naming: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintainabilityReport {
    pub score: f64,
    pub metrics: MaintainabilityMetrics,
    pub suggestions: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeMetrics {
    pub complexity: f64,
    pub maintainability: f64,
    pub security: f64,
    pub performance: f64,
    pub testability: f64,
    pub documentation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintIssue {
    pub kind: &'static str,
    pub severity: Severity,
    pub line: usize,
    pub message: &'static str,
    pub suggestion: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeAnalysis {
    pub language: String,
    pub overall: &'static str,
    pub metrics: CodeMetrics,
    pub issues: Vec<LintIssue>,
    pub suggestions: Vec<Suggestion>,
    pub security: SecurityReport,
    pub performance: PerformanceReport,
    pub maintainability: MaintainabilityReport,
    pub analyzed_at: DateTime<Utc>,
}

pub fn analyze(code: &str, language: &str) -> CodeAnalysis {
    CodeAnalysis {
        language: language.to_lowercase(),
        overall: overall_grade(code),
        metrics: code_metrics(code),
        issues: lint_issues(code, language),
        suggestions: suggestions(),
        security: security_report(code),
        performance: performance_report(code),
        maintainability: maintainability_report(code),
        analyzed_at: Utc::now(),
    }
}

pub fn security_report(code: &str) -> SecurityReport {
    let scanner = SecurityScanner;
    let vulnerabilities = scanner.scan(code);
    SecurityReport {
        score: scanner.score(vulnerabilities.len()),
        vulnerabilities,
        recommendations: vec![
            "Implement input validation and sanitization",
            "Use HTTPS for all communications",
            "Keep dependencies updated",
            "Implement proper authentication and authorization",
            "Use security headers and CSP policies",
        ],
    }
}

pub fn performance_report(code: &str) -> PerformanceReport {
    let scanner = PerformanceScanner;
    let issues = scanner.scan(code);
    PerformanceReport {
        score: scanner.score(issues.len()),
        issues,
        optimizations: vec![
            "Use code splitting with React.lazy()",
            "Implement proper memoization",
            "Optimize bundle size with tree shaking",
            "Use efficient data structures",
            "Minimize DOM manipulations",
        ],
    }
}

// --- Maintainability ---

static DECISION_POINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"if|for|while|switch|catch|&&|\|\|").unwrap());
static FUNCTION_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function\s+\w+\s*\([^)]*\)\s*\{[^}]*\}").unwrap());
static DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:const|let|var)\s+(\w+)").unwrap());
static CAMEL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap());

fn cyclomatic_complexity(code: &str) -> u32 {
    (DECISION_POINT.find_iter(code).count() as u32 + 1).min(20)
}

fn duplicate_lines(code: &str) -> u32 {
    let mut seen = HashSet::new();
    let repeats = code
        .lines()
        .filter(|line| line.trim().len() > 10)
        .filter(|line| !seen.insert(*line))
        .count();
    repeats.min(10) as u32
}

/// 10 for short functions, dropping a point per 10 lines of average length.
fn function_length_score(code: &str) -> f64 {
    let lengths: Vec<usize> = FUNCTION_BODY
        .find_iter(code)
        .map(|m| m.as_str().lines().count())
        .collect();
    let average = lengths.iter().sum::<usize>() as f64 / lengths.len().max(1) as f64;
    (10.0 - average / 10.0).clamp(1.0, 10.0)
}

/// Share of declared identifiers in camelCase, scaled to 0-10.
fn naming_score(code: &str) -> f64 {
    let names: Vec<&str> = DECLARATION
        .captures_iter(code)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    let good = names.iter().filter(|name| CAMEL_CASE.is_match(name)).count();
    (good as f64 / names.len().max(1) as f64 * 10.0).min(10.0)
}

pub fn maintainability_report(code: &str) -> MaintainabilityReport {
    let metrics = MaintainabilityMetrics {
        complexity: cyclomatic_complexity(code),
        duplicate_lines: duplicate_lines(code),
        function_length: function_length_score(code),
        naming: naming_score(code),
    };

    // complexity and duplication count against the score, so invert them onto 0-10
    let complexity_score = (10.0 - metrics.complexity as f64 / 2.0).max(0.0);
    let duplication_score = 10.0 - metrics.duplicate_lines as f64;
    let score = complexity_score * 0.3
        + duplication_score * 0.2
        + metrics.function_length * 0.25
        + metrics.naming * 0.25;

    let mut suggestions = Vec::new();
    if metrics.complexity > 7 {
        suggestions.push("Break down complex functions into smaller ones");
    }
    if metrics.duplicate_lines > 3 {
        suggestions.push("Extract duplicate code into reusable functions");
    }
    if metrics.function_length < 7.0 {
        suggestions.push("Consider splitting long functions");
    }
    if metrics.naming < 7.0 {
        suggestions.push("Improve variable and function naming");
    }

    MaintainabilityReport {
        score,
        metrics,
        suggestions,
    }
}

// --- Overall ---

const GRADES: &[&str] = &["A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D", "F"];

static BRANCH_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"if\s*\(", r"for\s*\(", r"while\s*\(", r"switch\s*\(", r"catch\s*\(", r"&&|\|\|"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});
static RISKY_SINKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"eval|innerHTML|document\.write").unwrap());
static NESTED_ITERATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"for.*for|while.*while").unwrap());
static COMMENT_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*\*|\*/|//").unwrap());

fn estimate_complexity(code: &str) -> usize {
    1 + BRANCH_INDICATORS
        .iter()
        .map(|re| re.find_iter(code).count())
        .sum::<usize>()
}

pub fn overall_grade(code: &str) -> &'static str {
    let mut score: i32 = 85;
    if code.len() > 5000 {
        score -= 10;
    }
    if estimate_complexity(code) > 15 {
        score -= 15;
    }
    if code.contains("eval(") {
        score -= 20;
    }
    if code.contains("innerHTML") {
        score -= 10;
    }
    if code.contains("fetch") && !code.contains("try") {
        score -= 5;
    }

    let index = ((100 - score) / 8).clamp(0, GRADES.len() as i32 - 1) as usize;
    GRADES[index]
}

pub fn code_metrics(code: &str) -> CodeMetrics {
    let lines = code.lines().count() as f64;
    CodeMetrics {
        complexity: (estimate_complexity(code) as f64).min(10.0),
        maintainability: (9.0 - lines / 100.0).max(1.0),
        security: (8.0 - RISKY_SINKS.find_iter(code).count() as f64).max(1.0),
        performance: (8.0 - NESTED_ITERATION.find_iter(code).count() as f64 * 2.0).max(1.0),
        testability: if code.contains("test") || code.contains("spec") { 9.0 } else { 6.0 },
        documentation: (COMMENT_MARKERS.find_iter(code).count() as f64 / 10.0).max(1.0),
    }
}

/// JavaScript-only lint checks; other languages yield nothing.
pub fn lint_issues(code: &str, language: &str) -> Vec<LintIssue> {
    if !matches!(language.to_lowercase().as_str(), "javascript" | "js") {
        return Vec::new();
    }

    let mut issues = Vec::new();
    if let Some(index) = code.find("var ") {
        issues.push(LintIssue {
            kind: "warning",
            severity: Severity::Medium,
            line: line_number(code, index),
            message: "Consider using const or let instead of var",
            suggestion: "Replace var with const for constants or let for variables",
        });
    }
    if !code.contains("===") {
        if let Some(index) = code.find("==") {
            issues.push(LintIssue {
                kind: "warning",
                severity: Severity::Medium,
                line: line_number(code, index),
                message: "Use strict equality (===) instead of loose equality (==)",
                suggestion: "Replace == with === for type-safe comparisons",
            });
        }
    }
    if let Some(index) = code.find("console.log") {
        issues.push(LintIssue {
            kind: "info",
            severity: Severity::Low,
            line: line_number(code, index),
            message: "Remove console.log statements before production",
            suggestion: "Use proper logging library or remove debug statements",
        });
    }
    issues
}

pub fn suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion {
            category: "optimization",
            title: "Use React.memo for performance",
            description: "Wrap components in React.memo to prevent unnecessary re-renders",
            example: "const MyComponent = React.memo(({ props }) => { ... });",
        },
        Suggestion {
            category: "security",
            title: "Add input validation",
            description: "Validate and sanitize user inputs to prevent security vulnerabilities",
            example: "const sanitizedInput = DOMPurify.sanitize(userInput);",
        },
        Suggestion {
            category: "maintainability",
            title: "Extract reusable logic",
            description: "Consider extracting common logic into custom hooks or utility functions",
            example: "const useCustomHook = () => { ... };",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_number() {
        let code = "a\nb\nc";
        assert_eq!(line_number(code, 0), 1);
        assert_eq!(line_number(code, 2), 2);
        assert_eq!(line_number(code, 4), 3);
        assert_eq!(line_number(code, 100), 3);
    }

    #[test]
    fn test_security_scan_reports_lines() {
        let code = "const password = \"hunter2\";\neval(userInput);\n";
        let report = security_report(code);
        let kinds: Vec<_> = report.vulnerabilities.iter().map(|f| (f.kind, f.line)).collect();
        assert_eq!(kinds, vec![("hardcodedSecrets", 1), ("unsafeEval", 2)]);
        assert_eq!(report.vulnerabilities[1].severity, Severity::High);
        assert_eq!(report.score, 7.0);
    }

    #[test]
    fn test_security_scan_clean_code() {
        let report = security_report("const total = items.length;\n");
        assert!(report.vulnerabilities.is_empty());
        assert_eq!(report.score, 10.0);
        assert_eq!(report.recommendations.len(), 5);
    }

    #[test]
    fn test_security_score_floor() {
        let code = "eval(a);\n".repeat(8);
        let report = security_report(&code);
        assert_eq!(report.vulnerabilities.len(), 8);
        assert_eq!(report.score, 1.0);
    }

    #[test]
    fn test_xss_and_sql_patterns() {
        let code = "el.innerHTML = '<b>' + req.query.name;\ndb.query(`SELECT * FROM users WHERE id = ${id}`);\nconst n = Math.random();";
        let kinds: Vec<_> = SecurityScanner.scan(code).into_iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&"xss"));
        assert!(kinds.contains(&"sqlInjection"));
        assert!(kinds.contains(&"insecureRandom"));
    }

    #[test]
    fn test_listener_leak_respects_cleanup_on_same_line() {
        let leaky = "window.addEventListener('resize', onResize);\n";
        let tidy = "el.addEventListener('click', f); el.removeEventListener('click', f);\n";
        assert_eq!(PerformanceScanner.scan(leaky).len(), 1);
        assert_eq!(PerformanceScanner.scan(leaky)[0].kind, "memoryLeak");
        assert!(PerformanceScanner.scan(tidy).is_empty());
    }

    #[test]
    fn test_nested_loop_detected() {
        let code = "for (let i = 0; i < n; i++) {\n  for (let j = 0; j < n; j++) {\n    sum += i * j;\n  }\n}\n";
        let report = performance_report(code);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, "inefficientLoop");
        assert_eq!(report.issues[0].line, 1);
        assert!((report.score - 9.2).abs() < 1e-9);
    }

    #[test]
    fn test_naming_score() {
        assert_eq!(naming_score("const userName = 1;\nlet Bad_name = 2;"), 5.0);
        assert_eq!(naming_score("no declarations here"), 0.0);
    }

    #[test]
    fn test_duplicate_lines() {
        let code = "doSomethingUseful();\ndoSomethingUseful();\ndoSomethingUseful();\nx++;\nx++;\n";
        // short lines are ignored
        assert_eq!(duplicate_lines(code), 2);
    }

    #[test]
    fn test_maintainability_score_in_range() {
        let simple = maintainability_report("const total = 1;\n");
        assert_eq!(simple.metrics.complexity, 1);
        assert!(simple.score > 9.0 && simple.score <= 10.0);
        assert!(simple.suggestions.is_empty());

        let tangled = "if (a && b || c) { while (x) { for (;;) {} } }\n".repeat(10);
        let report = maintainability_report(&tangled);
        assert_eq!(report.metrics.complexity, 20);
        assert!(report.score < simple.score);
        assert!(report.suggestions.contains(&"Break down complex functions into smaller ones"));
    }

    #[test]
    fn test_overall_grade() {
        assert_eq!(overall_grade("const total = 1;"), "A");
        assert_eq!(overall_grade("eval(x); el.innerHTML = y;"), "B-");
        assert_eq!(overall_grade("fetch(url).then(render);"), "A-");
    }

    #[test]
    fn test_javascript_lint_issues() {
        let code = "var x = 1;\nif (x == 2) console.log(x);";
        let issues = lint_issues(code, "JavaScript");
        let lines: Vec<_> = issues.iter().map(|i| (i.kind, i.line)).collect();
        assert_eq!(lines, vec![("warning", 1), ("warning", 2), ("info", 2)]);
        assert!(lint_issues(code, "python").is_empty());
    }

    #[test]
    fn test_strict_equality_not_flagged() {
        let issues = lint_issues("if (x === 2) {}", "javascript");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_analyze_assembles_report() {
        let analysis = analyze("const apiKey = \"abc123\";\n", "JavaScript");
        assert_eq!(analysis.language, "javascript");
        assert_eq!(analysis.security.vulnerabilities.len(), 1);
        assert_eq!(analysis.suggestions.len(), 3);
        assert!(analysis.metrics.documentation >= 1.0);
    }
}
