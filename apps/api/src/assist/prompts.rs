use serde::Deserialize;

use crate::ai_client::prompts::system_prompt;
use crate::errors::AppError;

/// Longest content accepted for a single assist call, in characters.
pub const MAX_CONTENT_CHARS: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistKind {
    /// Write a professional summary from the resume body.
    Summary,
    /// Rewrite experience bullets with stronger verbs and outcomes.
    Bullets,
    /// Tailor the resume text to a job description.
    Tailor,
    /// ATS-style review of the resume against a job description.
    Ats,
}

impl AssistKind {
    pub fn needs_job_description(self) -> bool {
        matches!(self, AssistKind::Tailor | AssistKind::Ats)
    }

    fn role(self) -> &'static str {
        match self {
            AssistKind::Summary => {
                "You are an expert resume writer. Write a 3-4 sentence professional summary \
                 in the first person without pronouns."
            }
            AssistKind::Bullets => {
                "You are an expert resume writer. Rewrite each experience bullet to open with \
                 a strong action verb and state the outcome. Return one bullet per line, \
                 each starting with '- '."
            }
            AssistKind::Tailor => {
                "You are an expert resume writer. Rewrite the resume content so the most \
                 relevant experience for the job description comes first and uses the \
                 job description's terminology where it honestly applies."
            }
            AssistKind::Ats => {
                "You are an applicant tracking system reviewer. Give a score from 0 to 100 on \
                 the first line as 'Score: N', then list missing keywords and concrete fixes."
            }
        }
    }
}

/// A prompt pair ready for the AI client.
#[derive(Debug)]
pub struct AssistPrompt {
    pub system: String,
    pub user: String,
}

pub fn build_prompt(
    kind: AssistKind,
    content: &str,
    job_description: Option<&str>,
) -> Result<AssistPrompt, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::Validation(format!(
            "content exceeds {MAX_CONTENT_CHARS} characters"
        )));
    }

    let job_description = job_description.map(str::trim).filter(|jd| !jd.is_empty());
    let user = match (kind.needs_job_description(), job_description) {
        (true, None) => {
            return Err(AppError::Validation(
                "job_description is required for this request".to_string(),
            ))
        }
        (_, Some(jd)) => format!("RESUME CONTENT:\n{content}\n\nJOB DESCRIPTION:\n{jd}"),
        (false, None) => format!("RESUME CONTENT:\n{content}"),
    };

    Ok(AssistPrompt {
        system: system_prompt(kind.role()),
        user,
    })
}
