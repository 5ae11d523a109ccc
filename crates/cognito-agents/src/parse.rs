//! Grammar for free-text hypothesis lists
//!
//! Two strategies are tried in order:
//!
//! 1. **Markers**: `HYPOTHESIS n:`, `RATIONALE:` and `EXPECTED OUTCOME:`,
//!    matched case-insensitively anywhere in the text. Text before the first
//!    `HYPOTHESIS n:` is preamble and is discarded.
//! 2. **Line boundaries**: every line starting with a digit, `-`, `*` or `•`
//!    opens a new hypothesis; following unmarked lines continue it. Lines
//!    before the first boundary are discarded.
//!
//! When neither strategy finds anything the result is
//! [`HypothesisParse::Unparsed`] carrying the raw text. A hypothesis is never
//! made up from text that matched no strategy.

/// Which strategy produced the hypotheses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// Explicit section markers
    Markers,
    /// Numbered or bulleted lines
    LineBoundaries,
}

impl ParseStrategy {
    /// How much the structure of the reply can be trusted
    pub fn confidence(&self) -> f64 {
        match self {
            ParseStrategy::Markers => 0.9,
            ParseStrategy::LineBoundaries => 0.5,
        }
    }

    /// Stable label
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::Markers => "markers",
            ParseStrategy::LineBoundaries => "line_boundaries",
        }
    }
}

/// One hypothesis recovered from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHypothesis {
    /// The hypothesis statement
    pub statement: String,
    /// Text following `RATIONALE:`
    pub rationale: Option<String>,
    /// Text following `EXPECTED OUTCOME:`
    pub expected_outcome: Option<String>,
}

impl ParsedHypothesis {
    fn statement(statement: String) -> Self {
        Self {
            statement,
            rationale: None,
            expected_outcome: None,
        }
    }
}

/// Result of parsing a free-text reply
#[derive(Debug, Clone, PartialEq)]
pub enum HypothesisParse {
    /// At least one hypothesis was found
    Parsed {
        /// Strategy that matched
        strategy: ParseStrategy,
        /// Hypotheses in reply order
        hypotheses: Vec<ParsedHypothesis>,
    },
    /// Nothing recognisable
    Unparsed {
        /// The reply as received
        raw: String,
    },
}

impl HypothesisParse {
    /// Parsed hypotheses, empty when unparsed
    pub fn hypotheses(&self) -> &[ParsedHypothesis] {
        match self {
            HypothesisParse::Parsed { hypotheses, .. } => hypotheses,
            HypothesisParse::Unparsed { .. } => &[],
        }
    }

    /// Strategy label, `"unparsed"` when nothing matched
    pub fn strategy_label(&self) -> &'static str {
        match self {
            HypothesisParse::Parsed { strategy, .. } => strategy.as_str(),
            HypothesisParse::Unparsed { .. } => "unparsed",
        }
    }

    /// Parse confidence, 0 when nothing matched
    pub fn confidence(&self) -> f64 {
        match self {
            HypothesisParse::Parsed { strategy, .. } => strategy.confidence(),
            HypothesisParse::Unparsed { .. } => 0.0,
        }
    }
}

/// Parse a free-text reply into hypotheses
pub fn parse_hypotheses(text: &str) -> HypothesisParse {
    let by_markers = parse_markers(text);
    if !by_markers.is_empty() {
        return HypothesisParse::Parsed {
            strategy: ParseStrategy::Markers,
            hypotheses: by_markers,
        };
    }

    let by_lines = parse_line_boundaries(text);
    if !by_lines.is_empty() {
        return HypothesisParse::Parsed {
            strategy: ParseStrategy::LineBoundaries,
            hypotheses: by_lines,
        };
    }

    HypothesisParse::Unparsed {
        raw: text.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Hypothesis,
    Rationale,
    Outcome,
}

/// Length of a marker starting at the beginning of `upper`, if any
///
/// `upper` is ASCII-uppercased, so byte offsets match the original text.
fn marker_at(upper: &[u8]) -> Option<(Marker, usize)> {
    if upper.starts_with(b"RATIONALE:") {
        return Some((Marker::Rationale, b"RATIONALE:".len()));
    }
    if let Some(rest) = upper.strip_prefix(b"EXPECTED") {
        let spaces = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
        if spaces > 0 && rest[spaces..].starts_with(b"OUTCOME:") {
            return Some((Marker::Outcome, b"EXPECTED".len() + spaces + b"OUTCOME:".len()));
        }
        return None;
    }
    let rest = upper.strip_prefix(b"HYPOTHESIS")?;
    let spaces = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
    let digits = rest[spaces..].iter().take_while(|b| b.is_ascii_digit()).count();
    if spaces == 0 || digits == 0 {
        return None;
    }
    let after = &rest[spaces + digits..];
    let pad = after.iter().take_while(|b| **b == b' ' || **b == b'\t').count();
    if after.get(pad) == Some(&b':') {
        Some((Marker::Hypothesis, b"HYPOTHESIS".len() + spaces + digits + pad + 1))
    } else {
        None
    }
}

/// Strip whitespace and Markdown emphasis around a section body
fn clean_section(section: &str) -> String {
    section
        .trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '_' || c == '#')
        .to_string()
}

fn parse_markers(text: &str) -> Vec<ParsedHypothesis> {
    let upper = text.to_ascii_uppercase();
    let bytes = upper.as_bytes();

    // (marker, start of marker, start of body)
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if let Some((marker, len)) = marker_at(&bytes[i..]) {
            found.push((marker, i, i + len));
            i += len;
        } else {
            i += 1;
        }
    }

    let mut hypotheses: Vec<ParsedHypothesis> = Vec::new();
    for (k, &(marker, _, body_start)) in found.iter().enumerate() {
        let body_end = found.get(k + 1).map(|&(_, start, _)| start).unwrap_or(text.len());
        let body = clean_section(&text[body_start..body_end]);

        match marker {
            Marker::Hypothesis => {
                if !body.is_empty() {
                    hypotheses.push(ParsedHypothesis::statement(body));
                }
            }
            Marker::Rationale => {
                if let Some(current) = hypotheses.last_mut() {
                    current.rationale = Some(body).filter(|b| !b.is_empty());
                }
            }
            Marker::Outcome => {
                if let Some(current) = hypotheses.last_mut() {
                    current.expected_outcome = Some(body).filter(|b| !b.is_empty());
                }
            }
        }
    }
    hypotheses
}

fn is_boundary(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '*' | '•'))
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '*' | '•' | ')' | '.')
    })
}

fn flush(parts: Vec<&str>, out: &mut Vec<ParsedHypothesis>) {
    let joined = parts.join(" ");
    if !joined.is_empty() {
        out.push(ParsedHypothesis::statement(joined));
    }
}

fn parse_line_boundaries(text: &str) -> Vec<ParsedHypothesis> {
    let mut hypotheses = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_boundary(line) {
            if let Some(parts) = current.take() {
                flush(parts, &mut hypotheses);
            }
            let cleaned = strip_bullet(line);
            current = Some(if cleaned.is_empty() {
                Vec::new()
            } else {
                vec![cleaned]
            });
        } else if let Some(parts) = current.as_mut() {
            parts.push(line);
        }
    }
    if let Some(parts) = current {
        flush(parts, &mut hypotheses);
    }
    hypotheses
}
