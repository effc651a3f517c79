//! Prompt templates for summary generation.

/// Canned summary when the document has no chunks to summarize.
pub const NO_CONTENT_SUMMARY: &str = "No content available to summarize for this document.";

/// Marker appended when the combined chunk text was cut off.
pub const TRUNCATION_MARKER: &str = "...\n\n[Content truncated due to length]";

/// Summary template. `{content}` is replaced at render time.
pub const SUMMARY_PROMPT: &str = r#"You are an expert document summarizer. Your task is to create a comprehensive, well-structured summary of the provided document content.

INSTRUCTIONS:
1. Create a concise but comprehensive summary that captures the main themes, key points, and important details
2. Use markdown formatting to structure your summary with clear sections, headings, and bullet points
3. Structure your response with the following format:
   - Start with a brief overview paragraph
   - Use ## headings for main sections
   - Use bullet points for key information within sections
   - Use **bold** for important terms or concepts
   - Use *italics* for emphasis where appropriate
4. Focus on the most important information and insights
5. Be objective and factual, avoiding personal opinions
6. Aim for a summary that is about 10-20% of the original length but captures all essential information

DOCUMENT CONTENT:
{content}

SUMMARY:"#;

pub fn render_summary_prompt(content: &str) -> String {
    SUMMARY_PROMPT.replace("{content}", content)
}

pub fn render_system_prompt(document_name: &str) -> String {
    format!(
        "You are an expert document summarizer. Create a comprehensive summary of the document '{}'.",
        document_name
    )
}
