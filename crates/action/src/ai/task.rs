//! Task types and prompt-based detection.

use serde::{Deserialize, Serialize};

/// Prompts longer than this route to the long-context task type.
const LONG_CONTEXT_THRESHOLD: usize = 2000;

/// What kind of work a prompt is asking for.
///
/// Drives provider selection through the directory's policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Sentiment or emotion classification.
    SentimentAnalysis,
    /// Summaries of longer text.
    Summarization,
    /// Language translation.
    Translation,
    /// Code generation.
    CodeGeneration,
    /// Mathematical reasoning.
    MathReasoning,
    /// Short, fast decisions.
    QuickDecision,
    /// General text analysis.
    TextAnalysis,
    /// Structured data extraction.
    DataExtraction,
    /// Chinese-language work.
    ChineseTasks,
    /// Prompts exceeding the long-context threshold.
    LongContext,
    /// Everything else.
    ContentGeneration,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SentimentAnalysis => "sentiment_analysis",
            Self::Summarization => "summarization",
            Self::Translation => "translation",
            Self::CodeGeneration => "code_generation",
            Self::MathReasoning => "math_reasoning",
            Self::QuickDecision => "quick_decision",
            Self::TextAnalysis => "text_analysis",
            Self::DataExtraction => "data_extraction",
            Self::ChineseTasks => "chinese_tasks",
            Self::LongContext => "long_context",
            Self::ContentGeneration => "content_generation",
        };
        f.write_str(name)
    }
}

impl TaskType {
    /// Parse the snake_case wire form.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(raw.to_owned())).ok()
    }

    /// Detect the task type from prompt text.
    ///
    /// Keyword rules are checked in a fixed order; the first match wins.
    /// Prompts containing CJK characters route to Chinese tasks, and
    /// anything over the length threshold to long context.
    #[must_use]
    pub fn detect(prompt: &str) -> Self {
        let lowered = prompt.to_lowercase();
        let has_any = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

        if has_any(&["sentiment", "emotion"]) {
            Self::SentimentAnalysis
        } else if has_any(&["summarize", "summary"]) {
            Self::Summarization
        } else if has_any(&["translate", "translation"]) {
            Self::Translation
        } else if has_any(&["code", "program", "function"]) {
            Self::CodeGeneration
        } else if has_any(&["math", "calculate", "equation"]) {
            Self::MathReasoning
        } else if has_any(&["decide", "choose", "quick"]) {
            Self::QuickDecision
        } else if has_any(&["analyze", "analysis"]) {
            Self::TextAnalysis
        } else if has_any(&["extract", "extraction"]) {
            Self::DataExtraction
        } else if prompt.chars().any(is_cjk) {
            Self::ChineseTasks
        } else if prompt.chars().count() > LONG_CONTEXT_THRESHOLD {
            Self::LongContext
        } else {
            Self::ContentGeneration
        }
    }
}

/// CJK unified ideograph ranges (base plane plus extension A).
fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}
