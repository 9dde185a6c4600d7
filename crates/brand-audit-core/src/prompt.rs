//! Instruction text sent to the model.
//!
//! Pure and deterministic: the same target always yields the same prompt.

use crate::domain::{AuditRequest, Pillar, MAX_HARD_QUESTIONS};

const PREAMBLE: &str = "You are a senior brand strategist performing a forensic brand audit. \
Be direct and specific. Judge only what is publicly visible for the target below.";

const CALIBRATION: &str = "\
Score each pillar as an integer from 1 to 10 using these anchors:
- 1-3: broken. The pillar is missing, contradictory or actively harmful.
- 4-6: average. Competent but interchangeable; this is where the majority of brands land.
- 7-8: strong. Distinctive and consistently executed.
- 9-10: exceptional and rare. Reserve for category-defining work.
Do not inflate. If in doubt between two bands, choose the lower one.";

/// Build the audit prompt for `request`.
pub fn build_prompt(request: &AuditRequest) -> String {
    let mut out = String::new();
    out.push_str(PREAMBLE);
    out.push_str("\n\nTARGET: ");
    out.push_str(request.target());
    out.push_str("\n\n## Pillars\n");
    for (idx, pillar) in Pillar::ALL.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({}): {}\n",
            idx + 1,
            pillar.name(),
            pillar.code(),
            pillar.rubric()
        ));
    }
    out.push_str("\n## Calibration\n");
    out.push_str(CALIBRATION);
    out.push_str("\n\n## Output\n");
    out.push_str(&output_contract());
    out
}

fn output_contract() -> String {
    let pillar_lines: Vec<String> = Pillar::ALL
        .iter()
        .map(|p| {
            format!(
                "    {{ \"code\": \"{}\", \"name\": \"{}\", \"score\": <integer 1-10>, \"critique\": \"<two sentences>\" }}",
                p.code(),
                p.name()
            )
        })
        .collect();

    format!(
        "Return ONLY a single JSON object. No prose before or after it, no markdown, no code fences.\n\
The object must match exactly this shape:\n\
{{\n  \"verdict\": \"<one sentence>\",\n  \"pillars\": [\n{}\n  ],\n  \"hardQuestions\": [\"<question>\", ...]\n}}\n\
Include all five pillars in the order shown and at most {} hard questions the founder should answer.",
        pillar_lines.join(",\n"),
        MAX_HARD_QUESTIONS
    )
}
