//! Named prompt templates derived from each issue
//!
//! Templates are pure string functions over [`PromptInput`]. A [`PromptSet`]
//! renders its templates in order into the record's `derived` object, so new
//! prompt styles can be added without touching the normalization code.

use super::record::DerivedPrompts;
use super::text::truncate_chars;

/// Maximum description characters quoted in a prompt
pub const DESCRIPTION_EXCERPT_CHARS: usize = 400;

/// Text a template may draw from
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    /// Whitespace-collapsed description
    pub description: &'a str,
    /// Summary exactly as stored
    pub raw_summary: &'a str,
    /// Whitespace-collapsed summary
    pub summary: &'a str,
}

impl<'a> PromptInput<'a> {
    pub fn description_excerpt(&self) -> &'a str {
        truncate_chars(self.description, DESCRIPTION_EXCERPT_CHARS)
    }
}

pub trait PromptTemplate: Send + Sync {
    /// Key under which the rendered prompt is stored
    fn name(&self) -> &str;

    fn render(&self, input: &PromptInput<'_>) -> String;
}

/// Template backed by a plain function
#[derive(Clone, Copy)]
pub struct FnTemplate {
    name: &'static str,
    render: fn(&PromptInput<'_>) -> String,
}

impl FnTemplate {
    pub const fn new(name: &'static str, render: fn(&PromptInput<'_>) -> String) -> Self {
        Self { name, render }
    }
}

impl PromptTemplate for FnTemplate {
    fn name(&self) -> &str {
        self.name
    }

    fn render(&self, input: &PromptInput<'_>) -> String {
        (self.render)(input)
    }
}

fn summary_task(input: &PromptInput<'_>) -> String {
    format!("Summarize this issue: {}", input.description_excerpt())
}

fn classification_task(input: &PromptInput<'_>) -> String {
    format!(
        "Classify the issue priority and type: {}",
        input.description_excerpt()
    )
}

fn qna_task(input: &PromptInput<'_>) -> String {
    format!(
        "Question: What is this issue about?\nAnswer: {}",
        input.raw_summary
    )
}

pub const SUMMARY_TASK: FnTemplate = FnTemplate::new("summary_task", summary_task);
pub const CLASSIFICATION_TASK: FnTemplate =
    FnTemplate::new("classification_task", classification_task);
pub const QNA_TASK: FnTemplate = FnTemplate::new("qna_task", qna_task);

/// Ordered collection of prompt templates
#[derive(Default)]
pub struct PromptSet {
    templates: Vec<Box<dyn PromptTemplate>>,
}

impl PromptSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `summary_task`, `classification_task` and `qna_task`, in that order
    pub fn standard() -> Self {
        Self::empty()
            .with(SUMMARY_TASK)
            .with(CLASSIFICATION_TASK)
            .with(QNA_TASK)
    }

    pub fn with(mut self, template: impl PromptTemplate + 'static) -> Self {
        self.templates.push(Box::new(template));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name()).collect()
    }

    pub fn render_all(&self, input: &PromptInput<'_>) -> DerivedPrompts {
        let mut derived = DerivedPrompts::default();
        for template in &self.templates {
            derived.push(template.name(), template.render(input));
        }
        derived
    }
}

impl std::fmt::Debug for PromptSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSet")
            .field("templates", &self.names())
            .finish()
    }
}
