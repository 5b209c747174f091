use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Name of the structured output format in batch requests.
pub const SCHEMA_NAME: &str = "sentiment_analysis";

/// The model's answer for one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SentimentAssessment {
    /// Brief explanation (1-2 sentences) of the analysis
    pub reasoning_process: String,

    /// -1 (extremely bad) to 1 (must buy right now), 0 is neutral
    #[schemars(range(min = -1, max = 1))]
    pub sentiment_score: f64,
}

/// Build the sentiment prompt for one article about `symbol` / `company`.
pub fn build_prompt(article_content: &str, symbol: &str, company: &str) -> String {
    format!(
        r#"You are a Financial Sentiment Analysis Expert specializing in stock market sentiment evaluation.
Analyze the provided company news and predict the likely impact on the company's stock performance after earnings reports.

The article text may contain information about other companies. Only consider the symbol {symbol} of the company {company} when forming your analysis.
The article was automatically scraped from the web, so it may include irrelevant or unrelated information. Ignore anything that does not pertain to {company}.

Output Requirements:
Return ONLY a JSON object with exactly these fields:

- "reasoning_process": Brief explanation (1-2 sentences) of your analysis.
- "sentiment_score": A number between -1 (extremely bad choice) and 1 (must buy right now), with 0 being neutral.
- The sentiment_score MUST be a numeric value (e.g., 0.75, -0.4, 0), not text, not words, and without any extra symbols or formatting.

Example Outputs:
{{
"reasoning_process": "Company reported strong revenue growth and raised guidance, indicating positive market momentum.",
"sentiment_score": 0.85
}}
{{
"reasoning_process": "CEO resignation amid fraud investigation is likely to damage investor confidence.",
"sentiment_score": -0.9
}}
{{
"reasoning_process": "Earnings met expectations but guidance was conservative due to market uncertainties, though the product pipeline remains strong.",
"sentiment_score": 0.1
}}

Article:
{article_content}
"#
    )
}
