//! Local grounding check: a deterministic second opinion next to the model verifier.
//!
//! Collects the proper-noun-like and numeric terms of a letter (capitalised
//! words past the start of a sentence, anything containing a digit) and
//! reports those that occur in none of the facts, the job stations, or the
//! company/role/contact of the job summary. Requirements are deliberately not
//! a source: a skill the job asks for is exactly what must not leak in.
//!
//! Advisory only. Results are shown next to the letter and never block it.

use std::collections::HashSet;

use crate::letter::facts::ExtractedFacts;
use crate::letter::job_summary::JobSummary;

/// Salutation and closing words, plus the pronoun `I`.
const COMMON_LETTER_WORDS: &[&str] = &[
    "i", "dear", "sincerely", "regards", "kind", "best", "yours", "faithfully", "truly", "thank",
    "thanks", "mr", "mrs", "ms", "dr", "hello",
];

/// Generic greetings skipped as a whole. Their words stay unknown elsewhere,
/// so a claimed "Engineering Manager" title is still reported.
const GENERIC_SALUTATIONS: &[&str] = &[
    "dear hiring manager",
    "dear hiring team",
    "dear recruiting team",
    "dear recruiter",
    "dear sir or madam",
    "to whom it may concern",
];

const SENTENCE_BREAKS: &[char] = &['.', '!', '?', ':', ';', '\n'];

/// Terms of `letter` with no source in the facts or the job summary's names.
pub fn ungrounded_terms(letter: &str, facts: &ExtractedFacts, summary: &JobSummary) -> Vec<String> {
    let mut known: HashSet<String> = HashSet::new();
    let sources = facts
        .bullet_facts
        .iter()
        .chain(facts.recent_stations.iter())
        .chain([&summary.company, &summary.role])
        .chain(summary.contact_person.iter());
    for source in sources {
        known.extend(words(source).map(str::to_lowercase));
    }
    known.extend(COMMON_LETTER_WORDS.iter().map(|w| w.to_string()));

    let mut seen: HashSet<String> = HashSet::new();
    let mut terms = Vec::new();
    for sentence in letter.split(SENTENCE_BREAKS) {
        if is_generic_salutation(sentence) {
            continue;
        }
        // The first word of a sentence is capitalised by grammar, not because it is a name.
        for word in words(sentence).skip(1) {
            if !is_candidate(word) {
                continue;
            }
            let lower = word.to_lowercase();
            if known.contains(&lower) || !seen.insert(lower) {
                continue;
            }
            terms.push(word.to_string());
        }
    }
    terms
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|w| !w.is_empty())
}

fn is_generic_salutation(sentence: &str) -> bool {
    let greeting = sentence.trim().trim_end_matches(',').to_lowercase();
    GENERIC_SALUTATIONS.contains(&greeting.as_str())
}

fn is_candidate(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase) || word.chars().any(|c| c.is_ascii_digit())
}
