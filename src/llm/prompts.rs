//! ATS analysis prompt sent to the remote model
//!
//! The wording below is the contract the response parser relies on: the key
//! names, their types and the "JSON only" instruction must stay in sync with
//! `llm::response`.

use log::debug;

pub const JOB_DESCRIPTION_LABEL: &str = "--- JOB DESCRIPTION ---";
pub const RESUME_LABEL: &str = "--- RESUME TEXT ---";

const INSTRUCTIONS: &str = "You are an advanced Applicant Tracking System (ATS). \
Your task is to analyze the provided resume against the job description. \
Provide a detailed analysis in a strict JSON format. \
The JSON object must have exactly the following keys: \
'score' (an integer from 0 to 100 representing the match percentage), \
'matchingKeywords' (a JSON array of strings), \
'missingKeywords' (a JSON array of strings with the top 5-7 most important missing skills or keywords), and \
'suggestions' (a string containing actionable advice for the applicant to improve their resume for this specific job). \
Do not include any text outside of the JSON object.";

/// Build the analysis prompt. Both texts are embedded verbatim, job
/// description first.
pub fn build_prompt(resume_text: &str, job_description: &str) -> String {
    debug!(
        "Building analysis prompt: resume {} chars, job description {} chars",
        resume_text.len(),
        job_description.len()
    );

    let mut prompt = String::with_capacity(
        INSTRUCTIONS.len() + job_description.len() + resume_text.len() + 64,
    );
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(JOB_DESCRIPTION_LABEL);
    prompt.push('\n');
    prompt.push_str(job_description);
    prompt.push_str("\n\n");
    prompt.push_str(RESUME_LABEL);
    prompt.push('\n');
    prompt.push_str(resume_text);

    debug!("Final prompt length: {}", prompt.len());
    prompt
}
