use crate::models::MatchResult;

/// Orders by score, highest first, and keeps at most `limit` results.
///
/// `sort_by` is stable, so equal scores keep their input order.
pub fn rank<C, I>(mut results: Vec<MatchResult<C, I>>, limit: usize) -> Vec<MatchResult<C, I>> {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreBreakdown;

    fn result(id: &'static str, score: u8) -> MatchResult<&'static str, ()> {
        MatchResult {
            candidate: id,
            score,
            breakdown: ScoreBreakdown::default(),
            insights: (),
        }
    }

    fn ids(results: &[MatchResult<&'static str, ()>]) -> Vec<&'static str> {
        results.iter().map(|r| r.candidate).collect()
    }

    #[test]
    fn test_rank_sorts_descending() {
        let ranked = rank(vec![result("a", 10), result("b", 90), result("c", 50)], 12);
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_keeps_input_order_for_ties() {
        let ranked = rank(
            vec![
                result("first", 70),
                result("low", 20),
                result("second", 70),
                result("third", 70),
            ],
            12,
        );
        assert_eq!(ids(&ranked), vec!["first", "second", "third", "low"]);
    }

    #[test]
    fn test_rank_truncates() {
        let results = (0..20).map(|i| result("x", i)).collect();
        let ranked = rank(results, 12);
        assert_eq!(ranked.len(), 12);
        assert_eq!(ranked[0].score, 19);
        assert_eq!(ranked[11].score, 8);
    }

    #[test]
    fn test_rank_empty() {
        let ranked: Vec<MatchResult<&str, ()>> = rank(vec![], 12);
        assert!(ranked.is_empty());
    }
}
