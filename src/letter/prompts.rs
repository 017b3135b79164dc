// src/letter/prompts.rs
use crate::llm::Prompt;
use crate::utils::truncate_chars;

/// Characters of the posting sent for metadata extraction.
pub const METADATA_INPUT_CHARS: usize = 2000;

pub const COVER_LETTER_SYSTEM: &str = "You are an expert career counselor and cover letter writer. Create compelling, personalized cover letters that:
- Highlight relevant experience and skills from the candidate's background
- Match specific requirements from the job posting
- Use a professional yet engaging tone
- Are concise (300-400 words)
- Include specific examples and achievements
- Show genuine interest in the role and company
- Format as a proper business letter with greeting and closing
- Use the candidate's actual name and contact information from their CV";

pub fn cover_letter_prompt(cv_text: &str, job_posting: &str) -> Prompt {
    let user = format!(
        r#"Based on this CV and job posting, write a tailored cover letter.

CV:
{}

JOB POSTING:
{}

Create a cover letter that highlights the most relevant experience and skills for this specific role."#,
        cv_text, job_posting
    );

    Prompt::new(COVER_LETTER_SYSTEM, user)
}

pub fn metadata_prompt(job_posting: &str) -> Prompt {
    let excerpt = truncate_chars(job_posting, METADATA_INPUT_CHARS);

    Prompt::user_only(format!(
        r#"Extract the company name and the job position from the job posting below.

Respond with a single JSON object and nothing else, in exactly this shape:
{{"company": "<company name>", "position": "<job title>"}}

If a value cannot be determined, use "Unknown".

JOB POSTING:
{}"#,
        excerpt
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_letter_prompt_carries_cv_and_posting() {
        let prompt = cover_letter_prompt("Jane Doe\njane@example.com", "Backend Engineer at Acme");
        assert_eq!(prompt.system.as_deref(), Some(COVER_LETTER_SYSTEM));
        assert!(prompt.user.contains("CV:\nJane Doe\njane@example.com"));
        assert!(prompt.user.contains("JOB POSTING:\nBackend Engineer at Acme"));
    }

    #[test]
    fn metadata_prompt_truncates_posting() {
        let posting = format!("{}TAIL", "x".repeat(METADATA_INPUT_CHARS));
        let prompt = metadata_prompt(&posting);
        assert!(prompt.system.is_none());
        assert!(!prompt.user.contains("TAIL"));
        assert!(prompt.user.contains(r#"{"company": "<company name>", "position": "<job title>"}"#));
    }
}
