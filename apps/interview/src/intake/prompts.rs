// LLM prompt constants for candidate intake.

/// System prompt for profile extraction — enforces JSON-only output.
pub const PROFILE_EXTRACT_SYSTEM: &str =
    "You are an experienced technical recruiter analyzing a candidate's \
    self-introduction before an interview. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Profile extraction prompt template. Replace `{intro_text}` before sending.
pub const PROFILE_EXTRACT_PROMPT_TEMPLATE: &str = r#"Analyze the candidate's introduction below and extract structured information.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "candidate name or null",
  "position": "position applied for",
  "grade": "junior | middle | senior | lead",
  "experience": 3,
  "skills": ["Python", "SQL", "Git"],
  "summary": "one or two sentence summary in the candidate's own register"
}

Rules:
- Use null for any field that cannot be determined from the text.
- "experience" is years of experience as a plain number, or null.
- "skills" is always a list, even for a single mentioned skill.
- "summary" must be short (1-2 sentences), based only on the text.

Example input: "Hi. I'm Alex, applying for Junior Backend Developer. I know Python, SQL and Git."
Example output:
{
  "name": "Alex",
  "position": "Backend Developer",
  "grade": "junior",
  "experience": null,
  "skills": ["Python", "SQL", "Git"],
  "summary": "Aspiring backend developer without commercial experience"
}

CANDIDATE INTRODUCTION:
{intro_text}"#;
