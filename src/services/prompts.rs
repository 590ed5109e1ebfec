// Prompt builders for the AI-backed features.

use crate::models::{CandidateProfile, JobPosting};

/// Output contract appended to the match prompt
pub const MATCH_OUTPUT_FORMAT: &str = "\
OUTPUT FORMAT (JSON ONLY):
{
    \"score\": <number 0-100>,
    \"reason\": \"<one direct sentence of at most 20 words explaining the score>\",
    \"missing_skills\": [\"<skill1>\", \"<skill2>\"]
}";

/// Prompt asking the provider to act as a strict academic recruiter
pub fn match_prompt(job: &JobPosting, profile: &CandidateProfile) -> String {
    let education = profile
        .education
        .iter()
        .map(|e| {
            format!(
                "{} in {} at {} ({})",
                e.degree,
                e.field_of_study.as_deref().unwrap_or("unspecified field"),
                e.institution,
                e.end_date.as_deref().unwrap_or("ongoing")
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    let experience = profile
        .experience
        .iter()
        .map(|e| {
            format!(
                "Role: {} at {} ({}). Details: {}",
                e.role, e.company, e.duration, e.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let publications = profile
        .publications
        .iter()
        .map(|p| {
            format!(
                "{} ({}, {})",
                p.title,
                p.venue.as_deref().unwrap_or("unknown venue"),
                p.date.as_deref().unwrap_or("n.d.")
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    let awards = profile
        .awards
        .iter()
        .map(|a| a.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let job_json = serde_json::to_string(job).unwrap_or_default();

    format!(
        "You are a strict and honest academic recruiter. Critically evaluate how well the \
candidate's CV matches the job below.

JOB DETAILS:
Title: {title}
Employer: {employer}
Description: {job_json}

CANDIDATE CV:
Summary: {summary}
Skills: {skills}
Education: {education}
Experience: {experience}
Publications: {publications}
Awards: {awards}

INSTRUCTIONS:
1. Weigh the overlap in research interests, technical skills and education level.
2. Be critical. Penalize heavily when the post requires a PhD and the candidate has a lower degree.
3. When the research area matches but the specific niche is missing, say so.

{format}",
        title = job.title,
        employer = job.employer_name(),
        job_json = job_json,
        summary = profile.summary(),
        skills = profile.skills.join(", "),
        education = education,
        experience = experience,
        publications = publications,
        awards = awards,
        format = MATCH_OUTPUT_FORMAT,
    )
}

/// Prompt asking the provider to tighten one CV section
pub fn improve_text_prompt(text: &str, section: &str) -> String {
    format!(
        "You are an expert academic CV editor.
Refine the following {section} section so it is punchy, professional and impact-driven.
- Use strong action verbs.
- Focus on achievements and metrics.
- Keep it suitable for an academic or research role.
- Return ONLY the improved text.

Original text:
\"{text}\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, PersonalDetails};

    #[test]
    fn test_match_prompt_includes_profile_and_job() {
        let profile = CandidateProfile {
            personal: PersonalDetails {
                summary: Some("Computational linguist".to_string()),
                ..Default::default()
            },
            skills: vec!["NLP".to_string(), "Rust".to_string()],
            education: vec![Education {
                degree: "PhD".to_string(),
                institution: "Edinburgh".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let job = JobPosting {
            title: "Research Associate in NLP".to_string(),
            employer: "Oxford".to_string(),
            ..Default::default()
        };

        let prompt = match_prompt(&job, &profile);

        assert!(prompt.contains("Title: Research Associate in NLP"));
        assert!(prompt.contains("Employer: Oxford"));
        assert!(prompt.contains("Skills: NLP, Rust"));
        assert!(prompt.contains("PhD in unspecified field at Edinburgh (ongoing)"));
        assert!(prompt.contains("\"missing_skills\""));
    }

    #[test]
    fn test_improve_prompt_quotes_text() {
        let prompt = improve_text_prompt("ran experiments", "experience");
        assert!(prompt.contains("following experience section"));
        assert!(prompt.ends_with("\"ran experiments\""));
    }
}
