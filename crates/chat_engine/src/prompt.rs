const INSTRUCTION: &str = "Answer the question below concisely and in point form. \
Put each point on its own line and keep every point short.";

/// Wraps a user query in the fixed instruction sent with every request.
pub fn build_prompt(query: &str) -> String {
    format!("{INSTRUCTION}\n\nQuestion: {}", query.trim())
}
