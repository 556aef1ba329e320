use crate::model::Subject;

/// Prefix sent in front of extracted text when asking for a short note.
pub const SUMMARIZE_PREFIX: &str = "Summarize: ";

/// Build the prompt that turns extracted text into a short note.
pub fn summarize_prompt(text: &str) -> String {
    format!("{}{}", SUMMARIZE_PREFIX, text)
}

/// Build the subject-scoped tutoring prompt for a student question.
pub fn tutor_prompt(subject: Subject, question: &str) -> String {
    format!(
        "You are an AI Tutor specializing in {}. Provide a step-by-step solution, real-world applications, and concept explanations for the following question: \"{}\"",
        subject.as_str(),
        question
    )
}
