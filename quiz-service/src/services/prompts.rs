//! Prompt templates for quiz generation.

/// Exam-style question generation instructions.
pub const QUIZ_PROMPT: &str = "Generate 10 quiz questions for the given document.
The questions are single-choice questions with 4 options.
The questions should be like in an exam, meaning they shouldn't contain details that nobody cares about.
Those questions will prepare students for an exam.
Make sure that the whole slide is covered by the questions.";

/// System instruction sent with every quiz generation request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates quiz questions for a given document.";
