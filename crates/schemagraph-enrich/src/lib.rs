//! # schemagraph-enrich
//!
//! Optional assistance for filling in a [`GenerationRequest`] before it
//! is handed to `schemagraph_core::generate`: AI suggestions, fact-sheet
//! extraction, and a scrape of the business's current website.
//!
//! ```text
//! business name/url ──▶ suggestion prompt ──▶ Suggestions    ─┐
//! fact-sheet text   ──▶ extraction prompt ──▶ FactSheet      ─┤
//! topic names       ──▶ topic prompt      ──▶ Vec<Topic>     ─┼─▶ merge (empty fields only)
//! website url       ──▶ HTML scrape       ──▶ BusinessFields ─┘
//! ```
//!
//! Every model call goes through an [`LlmProvider`]; [`OpenAiCompatibleClient`]
//! talks to OpenRouter or any OpenAI-compatible endpoint, [`MockProvider`]
//! replays scripted answers in tests. Failures never block generation: the
//! non-`try` methods on [`Enricher`] log a warning and return nothing.
//!
//! [`GenerationRequest`]: schemagraph_core::GenerationRequest

pub mod enricher;
pub mod llm;
pub mod merge;
pub mod prompts;
pub mod scrape;
pub mod suggestions;

pub use enricher::Enricher;
pub use llm::{
    CompletionRequest, CompletionResponse, ConfigError, EnrichError, LlmConfig, LlmProvider,
    MockProvider, MockReply, OpenAiCompatibleClient,
};
pub use merge::{apply_fact_sheet, apply_scraped, apply_suggestions, apply_topics};
pub use scrape::{extract_business, prefill_from_website, scrape_business_page, ScrapeError};
pub use suggestions::{parse_json, strip_code_fences, FactSheet, Suggestions};
