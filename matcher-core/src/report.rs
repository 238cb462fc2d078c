//! Result presentation.
//!
//! Pure transformation of a [`MatchResult`] into display groupings. Nothing
//! here touches the network or any orchestrator state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{MatchResponse, MatchResult};

/// Placeholder shown when no skill matched.
pub const NO_MATCHED_SKILLS: &str = "No matched skills";

/// Placeholder shown when no skill is missing.
pub const NO_MISSING_SKILLS: &str = "All skills matched!";

/// Display emphasis for a match score. Never used for gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    /// Band for a `match_score` in `[0, 100]`.
    ///
    /// Total over all floats: anything not at least 60 (NaN included) is weak.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Strong
        } else if score >= 60.0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `matched / (matched + missing)`, or zero when there are no skills at all.
pub fn skill_ratio(matched: usize, missing: usize) -> f64 {
    let total = matched + missing;
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

/// A skill list that is never rendered as an empty region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum SkillList {
    Skills(Vec<String>),
    Empty { placeholder: &'static str },
}

impl SkillList {
    fn from_vec(skills: Vec<String>, placeholder: &'static str) -> Self {
        if skills.is_empty() {
            Self::Empty { placeholder }
        } else {
            Self::Skills(skills)
        }
    }

    /// Lines to render: the skills, or the single placeholder.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Skills(skills) => skills.iter().map(String::as_str).collect(),
            Self::Empty { placeholder } => vec![placeholder],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Everything the report screen shows, derived from one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub match_score: f64,
    pub band: ScoreBand,
    /// `similarity_score` scaled to a percentage.
    pub similarity_percent: f64,
    pub matched_count: usize,
    pub missing_count: usize,
    pub skill_ratio: f64,
    pub matched_skills: SkillList,
    pub missing_skills: SkillList,
    pub experience_match: bool,
    pub education_match: bool,
    pub explanation: String,
    pub recommendations: Vec<String>,
    pub computed_at: DateTime<Utc>,
}

impl ReportView {
    /// Present a bare result, with no recommendations.
    pub fn from_result(result: &MatchResult) -> Self {
        presentation(result, &[])
    }

    /// Present a full response: its result plus its recommendations.
    pub fn from_response(response: &MatchResponse) -> Self {
        presentation(&response.results, &response.recommendations)
    }

    /// Score as shown on the report, e.g. `87.5%`.
    pub fn score_label(&self) -> String {
        format!("{:.1}%", self.match_score)
    }

    pub fn similarity_label(&self) -> String {
        format!("{:.1}%", self.similarity_percent)
    }

    /// Skill tally as `matched/total`.
    pub fn skills_label(&self) -> String {
        format!("{}/{}", self.matched_count, self.matched_count + self.missing_count)
    }
}

/// Build the report view; `explanation` and `recommendations` pass verbatim.
pub fn presentation(result: &MatchResult, recommendations: &[String]) -> ReportView {
    let matched: Vec<String> = result
        .matched_skills
        .iter()
        .map(|m| m.skill.clone())
        .collect();
    let matched_count = matched.len();
    let missing_count = result.missing_skills.len();

    ReportView {
        match_score: result.match_score,
        band: ScoreBand::from_score(result.match_score),
        similarity_percent: result.similarity_score * 100.0,
        matched_count,
        missing_count,
        skill_ratio: skill_ratio(matched_count, missing_count),
        matched_skills: SkillList::from_vec(matched, NO_MATCHED_SKILLS),
        missing_skills: SkillList::from_vec(result.missing_skills.clone(), NO_MISSING_SKILLS),
        experience_match: result.experience_match,
        education_match: result.education_match,
        explanation: result.explanation.clone(),
        recommendations: recommendations.to_vec(),
        computed_at: result.computed_at,
    }
}
