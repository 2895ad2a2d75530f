/// Instruction for subject classification. The response format is parsed
/// line by line in `classifier::parse_response`.
pub const CLASSIFY_INSTRUCTIONS: &str = r#"You sort school worksheets into subject folders.

Read the worksheet content below and answer with EXACTLY two lines and nothing else:

label: <one of the allowed subjects, lowercase>
name: <a short title found in the content>

RULES:
1. The label MUST be one of the allowed subjects. Use "other" if none fits.
2. The name is a chapter or section number (e.g. "9.2"), a short phrase
   (e.g. "Linear Equations"), or a quoted story / book title that appears
   in the content. Keep it under 6 words.
3. No explanation, no markdown, no extra lines."#;

/// Build the classification prompt. Only the first `char_budget`
/// characters of `content` are sent.
pub fn build_classification_prompt(subjects: &[String], content: &str, char_budget: usize) -> String {
    let mut allowed: Vec<&str> = subjects.iter().map(|s| s.as_str()).collect();
    allowed.push(crate::models::OTHER_LABEL);

    let excerpt: String = content.chars().take(char_budget).collect();

    format!(
        r#"{}

ALLOWED SUBJECTS: {}

CONTENT:
---
{}
---"#,
        CLASSIFY_INSTRUCTIONS,
        allowed.join(", "),
        excerpt
    )
}

/// Instruction for the printable answer key
pub const ANSWER_KEY_INSTRUCTIONS: &str = r#"You are preparing an answer key for a school worksheet that was scanned with OCR.

Reproduce the worksheet as a single, self-contained HTML document that prints well:

RULES:
1. Keep every original question, in order, with its original wording.
2. Silently fix OCR spelling artifacts (broken words, stray characters) but do NOT
   change what a question asks.
3. Insert the correct answer directly after each question.
4. Put all styling in one <style> block inside <head>. No external CSS, fonts or scripts.
5. Original question text is black; inserted answers are a distinct color
   (e.g. #1a56db) so they stand out on paper.
6. Output ONLY the HTML document, starting with <!DOCTYPE html>."#;

/// Build the answer-key prompt. The full text is sent, untruncated.
pub fn build_answer_key_prompt(content: &str) -> String {
    format!(
        r#"{}

WORKSHEET TEXT:
---
{}
---"#,
        ANSWER_KEY_INSTRUCTIONS, content
    )
}
