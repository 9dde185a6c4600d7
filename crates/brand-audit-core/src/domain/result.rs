//! Canonical audit result shape shared by every outcome.

use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;

/// Maximum number of hard questions carried by a result.
pub const MAX_HARD_QUESTIONS: usize = 3;

/// Number of pillars in every result.
pub const PILLAR_COUNT: usize = 5;

/// The five fixed evaluation dimensions, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Clarity,
    Origin,
    OneVoice,
    Longevity,
    Outcome,
}

impl Pillar {
    pub const ALL: [Pillar; PILLAR_COUNT] = [
        Pillar::Clarity,
        Pillar::Origin,
        Pillar::OneVoice,
        Pillar::Longevity,
        Pillar::Outcome,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Clarity => "CLR",
            Self::Origin => "ORG",
            Self::OneVoice => "VOX",
            Self::Longevity => "LNG",
            Self::Outcome => "OUT",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Clarity => "Clarity",
            Self::Origin => "Origin",
            Self::OneVoice => "One Voice",
            Self::Longevity => "Longevity",
            Self::Outcome => "Outcome",
        }
    }

    /// The question the rubric asks for this pillar.
    pub fn rubric(self) -> &'static str {
        match self {
            Self::Clarity => {
                "Can a stranger say what this brand does, and for whom, within five seconds?"
            }
            Self::Origin => "Is there a real founding story or belief that nobody else can claim?",
            Self::OneVoice => {
                "Do copy, visuals and tone read as one author across every touchpoint?"
            }
            Self::Longevity => "Will the identity still hold in ten years, or is it chasing a trend?",
            Self::Outcome => "Does the brand promise a concrete change in the customer's life?",
        }
    }
}

/// One scored pillar. `score` is always 0..=10 and `critique` always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarScore {
    pub code: String,
    pub name: String,
    pub score: u8,
    pub critique: String,
}

impl PillarScore {
    pub fn new(code: &str, name: &str, score: u8, critique: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            score: score.min(10),
            critique: critique.to_string(),
        }
    }

    /// Score a canonical pillar.
    pub fn for_pillar(pillar: Pillar, score: u8, critique: &str) -> Self {
        Self::new(pillar.code(), pillar.name(), score, critique)
    }
}

/// A fully-formed audit result as seen on the wire.
///
/// Fields are read-only; the only constructor recomputes `total_score`
/// from the pillars, so an upstream total can never be carried through.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    total_score: f64,
    verdict: String,
    pillars: [PillarScore; PILLAR_COUNT],
    hard_questions: Vec<String>,
}

impl AuditResult {
    pub fn new(
        verdict: impl Into<String>,
        pillars: [PillarScore; PILLAR_COUNT],
        mut hard_questions: Vec<String>,
    ) -> Self {
        hard_questions.truncate(MAX_HARD_QUESTIONS);
        Self {
            total_score: aggregate(&pillars),
            verdict: verdict.into(),
            pillars,
            hard_questions,
        }
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn verdict(&self) -> &str {
        &self.verdict
    }

    pub fn pillars(&self) -> &[PillarScore; PILLAR_COUNT] {
        &self.pillars
    }

    pub fn hard_questions(&self) -> &[String] {
        &self.hard_questions
    }
}
