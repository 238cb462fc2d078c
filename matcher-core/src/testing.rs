//! Fixtures shared by the unit tests.

use chrono::Utc;

use crate::model::{MatchResult, SkillMatch};

pub(crate) fn sample_result(matched: &[&str], missing: &[&str], score: f64) -> MatchResult {
    MatchResult {
        match_score: score,
        similarity_score: 0.82,
        matched_skills: matched
            .iter()
            .map(|s| SkillMatch {
                skill: s.to_string(),
                matched: true,
                frequency: Some(1),
            })
            .collect(),
        missing_skills: missing.iter().map(|s| s.to_string()).collect(),
        experience_match: true,
        education_match: true,
        explanation: "Resume shows 75% skill match with semantic similarity of 0.82".into(),
        computed_at: Utc::now(),
    }
}
