//! LLM prompt engineering for concept and claim extraction

/// System prompt for extraction calls
pub const SYSTEM_PROMPT: &str =
    "You are an expert academic researcher skilled at extracting key information from papers.";

/// Builds the extraction prompt for one document
pub struct PromptBuilder<'a> {
    title: &'a str,
    excerpt: &'a str,
    focus_area: Option<&'a str>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for a document title and its bounded excerpt
    pub fn new(title: &'a str, excerpt: &'a str) -> Self {
        Self {
            title,
            excerpt,
            focus_area: None,
        }
    }

    /// Steer extraction toward a focus area
    pub fn with_focus_area(mut self, focus_area: Option<&'a str>) -> Self {
        self.focus_area = focus_area.filter(|f| !f.trim().is_empty());
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(self.excerpt.len() + 1024);

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        let title = if self.title.trim().is_empty() {
            "Unknown"
        } else {
            self.title
        };
        prompt.push_str(&format!("Paper Title: {}\n\n", title));

        prompt.push_str("Content:\n---\n");
        prompt.push_str(self.excerpt);
        prompt.push_str("\n---\n\n");

        if let Some(focus) = self.focus_area {
            prompt.push_str(&format!("Focus Area: {}\n\n", focus));
        }

        prompt.push_str(OUTPUT_FORMAT);
        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Analyze this academic paper and extract:

1. KEY CONCEPTS: Main ideas, theories, methods, and phenomena discussed
2. CLAIMS: Specific findings, assertions, or conclusions made

Rules:
- Each concept is a named idea, not a sentence
- Each claim is one specific, checkable assertion from the paper
- Rate importance and confidence in [0.0, 1.0]"#;

const OUTPUT_FORMAT: &str = r#"Return a JSON object with:
{
    "concepts": [
        {
            "name": "concept name",
            "type": "theory|method|finding|phenomenon",
            "description": "brief description",
            "domain": "field of study",
            "importance": 0.0-1.0
        }
    ],
    "claims": [
        {
            "text": "the specific claim or finding",
            "claim_type": "finding|method|theory|observation",
            "confidence": 0.0-1.0,
            "page_reference": "if identifiable"
        }
    ]
}

Return ONLY valid JSON."#;
