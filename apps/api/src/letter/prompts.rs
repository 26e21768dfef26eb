// All LLM prompt constants for the letter pipeline.
// Templates use `{placeholder}` markers filled by `render_prompt`.
// System prompts double as stage identifiers in tests, so each must be unique.

/// System prompt for CV fact extraction.
pub const FACTS_SYSTEM: &str = "You extract factual statements from a CV.";

/// Fact extraction prompt. Replace `{no_inference}` and `{cv_text}`.
pub const FACTS_PROMPT_TEMPLATE: &str = r#"{no_inference}
Return a bullet list. Each bullet starts with "- " and holds one short fact that is present in the CV text.
Cover roles, employers, dates, skills and education where the CV states them.

CV:
{cv_text}
"#;

/// System prompt for recent job station extraction.
pub const STATIONS_SYSTEM: &str = "You extract recent job stations from a CV.";

/// Job station prompt. Replace `{max_stations}` and `{cv_text}`.
pub const STATIONS_PROMPT_TEMPLATE: &str = r#"Extract up to {max_stations} most recent job stations from the CV.
Return a bullet list with one station per bullet in this format:
- YYYY–YYYY | Role | Company
Only use explicit info from the CV. If a field is missing, omit it.

CV:
{cv_text}
"#;

/// System prompt for job description summaries.
pub const JOB_SUMMARY_SYSTEM: &str = "You extract structured info from a job description.";

/// Job summary prompt. Replace `{jd_text}`.
pub const JOB_SUMMARY_PROMPT_TEMPLATE: &str = r#"Return JSON with keys: company_name, role_title, requirements, contact_person.
Requirements must be a list of short strings, only what is explicitly in the job description.
Use null for company_name, role_title or contact_person when the job description does not state them.
Return ONLY the JSON object, no code fences.

JOB DESCRIPTION:
{jd_text}
"#;

/// System prompt for drafting the letter.
pub const DRAFT_SYSTEM: &str = "You write job application letters using only provided facts.";

/// Drafting prompt.
/// Replace: {grounding_instruction}, {plain_text_instruction}, {example_text},
///          {facts_block}, {summary_block}
pub const DRAFT_PROMPT_TEMPLATE: &str = r#"Write a one-page job application letter (about 250-350 words).

{grounding_instruction}

Constraints:
- Use ONLY candidate facts from FACTS.
- Do NOT fabricate experience, dates, skills or qualifications to satisfy a requirement.
- It is OK to mention the company name and role from the job summary.
- Use more recent FACTS rather than older ones.
- Use the name of the contact person in the greeting, if available.
- Use the example letter ONLY for tone and structure, never as a source of facts.
- {plain_text_instruction}

EXAMPLE LETTER (style reference only — do not copy content):
{example_text}

FACTS (the only facts you may state about the candidate):
{facts_block}

JOB SUMMARY (requirements to address, only where supported by facts):
{summary_block}
"#;

/// System prompt for the advisory verification pass.
pub const VERIFY_SYSTEM: &str = "You are a strict factual checker for application letters.";

/// Verification prompt. Replace `{facts_block}` and `{letter}`.
pub const VERIFY_PROMPT_TEMPLATE: &str = r#"Compare LETTER against FACTS.
List every sentence of LETTER that states candidate information not present in FACTS.
Quote each such sentence exactly, one per line, starting with "- ".
If every statement about the candidate is supported by FACTS, reply with exactly: CLEAN

FACTS:
{facts_block}

LETTER:
{letter}
"#;

/// System prompt for the user-requested revision pass.
pub const REVISE_SYSTEM: &str = "You are a strict factual editor.";

/// Revision prompt. Replace `{plain_text_instruction}`, `{facts_block}` and `{letter}`.
pub const REVISE_PROMPT_TEMPLATE: &str = r#"Remove or rewrite any sentence that introduces candidate info not present in FACTS.
If a sentence cannot be fully supported by FACTS, delete it.
Return only the revised letter. {plain_text_instruction}

FACTS:
{facts_block}

LETTER:
{letter}
"#;

/// Fills `{name}` placeholders in a single pass over the template.
///
/// Substituted values are never rescanned, so placeholder-like text inside a
/// CV, job description or example letter stays literal. Braces that do not
/// name a known placeholder are kept as written.
pub fn render_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let known = after.find('}').and_then(|end| {
            let name = &after[..end];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match known {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
