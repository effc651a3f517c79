use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use uuid::Uuid;

/// Question shape the model is asked to emit, enforced via response schema.
/// The four options stay as discrete fields so the schema pins their count.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LlmQuizQuestion {
    /// The question to be answered
    pub question: String,
    /// The first option
    pub option1: String,
    /// The second option
    pub option2: String,
    /// The third option
    pub option3: String,
    /// The fourth option
    pub option4: String,
    /// The index of the correct answer
    pub correct_answer: u8,
    /// The explanation of the correct answer
    pub explanation: String,
}

/// Public quiz question shape returned to clients.
#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: u8,
    pub explanation: String,
}

impl TryFrom<LlmQuizQuestion> for QuizQuestion {
    type Error = AppError;

    /// Assign a fresh id and flatten the four option fields into one ordered
    /// list; `options[correct_answer]` is the declared correct option.
    fn try_from(question: LlmQuizQuestion) -> Result<Self, Self::Error> {
        if question.correct_answer > 3 {
            return Err(AppError::MalformedModelOutput(format!(
                "correct_answer index {} is outside 0..=3",
                question.correct_answer
            )));
        }

        Ok(QuizQuestion {
            id: Uuid::new_v4().to_string(),
            question: question.question,
            options: vec![
                question.option1,
                question.option2,
                question.option3,
                question.option4,
            ],
            correct_answer: question.correct_answer,
            explanation: question.explanation,
        })
    }
}
