// All prompt constants for the AI service.
// Templates use `{placeholder}` markers, each filled once by `fill` before sending.
// The opening sentence of each template doubles as a marker for degraded-mode
// payload selection, so keep those sentences stable.

pub const SUGGESTION_SYSTEM: &str = "You provide professional resume writing assistance. \
    Respond in JSON format.";

pub const KEYWORD_SYSTEM: &str = "You are an expert ATS optimization specialist. \
    Respond in JSON format.";

pub const ANALYSIS_SYSTEM: &str = "You are an expert resume evaluator with experience \
    in HR and recruitment. Respond in JSON format.";

pub const ACHIEVEMENT_SYSTEM: &str =
    "You are an expert resume writer specializing in achievement-oriented content.";

pub const KEYWORD_MARKER: &str = "Analyze the following job description and resume content";
pub const ANALYSIS_MARKER: &str = "Perform a comprehensive analysis of the following resume";
pub const ACHIEVEMENT_MARKER: &str =
    "Transform the following job description into 3-5 achievement-oriented bullet points";

/// Replace: {section}, {content}
pub const SUGGESTION_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer and career coach. Review the following content from the "{section}" section of a resume.
Provide an improved version that enhances clarity, impact, and professionalism while maintaining the original intent.
Focus on using active verbs, quantifiable achievements, and concise language.

ORIGINAL CONTENT:
{content}

Respond with a structured JSON object that has these exact fields:
{
  "original": "the original text provided",
  "improved": "your improved version",
  "explanation": "explanation of your changes"
}

Keep your response as a valid JSON object with no additional text."#;

/// Replace: {job_description}, {resume_content}
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and resume content to identify important keywords and skills that are missing or could be emphasized better in the resume.
Suggest specific improvements for incorporating these keywords naturally.

JOB DESCRIPTION:
{job_description}

RESUME CONTENT:
{resume_content}

Respond with a structured JSON object that has these exact fields:
{
  "keywords": ["keyword1", "keyword2"],
  "suggestions": [
    {
      "section": "section name",
      "content": "suggested content",
      "reason": "reason for suggestion"
    }
  ]
}

Keep your response as a valid JSON object with no additional text."#;

/// Replace: {role_clause}, {resume_content}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Perform a comprehensive analysis of the following resume{role_clause}.
Evaluate the content, structure, impact, and overall effectiveness.
Provide a detailed assessment with strengths, weaknesses, and specific improvement suggestions.

RESUME CONTENT:
{resume_content}

Respond with a structured JSON object that has these exact fields:
{
  "overallScore": 75,
  "strengths": ["strength1", "strength2"],
  "weaknesses": ["weakness1", "weakness2"],
  "improvementSuggestions": [
    {
      "section": "section name",
      "suggestion": "suggestion text",
      "priority": "high"
    }
  ]
}

"overallScore" is an integer between 0 and 100. "priority" is one of "high", "medium" or "low".
Keep your response as a valid JSON object with no additional text."#;

/// Replace: {job_description}
pub const ACHIEVEMENT_PROMPT_TEMPLATE: &str = r#"Transform the following job description into 3-5 achievement-oriented bullet points.
Use the STAR (Situation, Task, Action, Result) or PAR (Problem, Action, Result) format where applicable.
Focus on quantifiable results and specific accomplishments rather than responsibilities.
Start every bullet point on its own line with "• ".

JOB DESCRIPTION:
{job_description}"#;

/// Substitutes `{name}` markers in a single pass over the template, so values
/// are never themselves scanned for markers. Unknown braces are left as they are.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        rest = &rest[open..];

        let hit = values.iter().find_map(|(name, value)| {
            rest.strip_prefix('{')
                .and_then(|r| r.strip_prefix(*name))
                .and_then(|r| r.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn suggestion_prompt(content: &str, section: &str) -> String {
    fill(
        SUGGESTION_PROMPT_TEMPLATE,
        &[("section", section), ("content", content)],
    )
}

pub fn keyword_prompt(resume_content: &str, job_description: &str) -> String {
    fill(
        KEYWORD_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_content", resume_content),
        ],
    )
}

pub fn analysis_prompt(resume_content: &str, target_role: Option<&str>) -> String {
    let role_clause = target_role
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| format!(" for a {r} position"))
        .unwrap_or_default();

    fill(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("role_clause", role_clause.as_str()),
            ("resume_content", resume_content),
        ],
    )
}

pub fn achievement_prompt(job_description: &str) -> String {
    fill(
        ACHIEVEMENT_PROMPT_TEMPLATE,
        &[("job_description", job_description)],
    )
}
