//! Inline markup for message content
//!
//! Message text is split into paragraphs on `\n` and each paragraph into
//! runs on the `**` delimiter. Runs at odd positions are emphasized. The
//! parser is total: unbalanced or empty delimiters are kept as-is rather
//! than repaired.

#[cfg(test)]
mod proptests;

/// Bold delimiter recognized inside a paragraph
pub const EMPHASIS_DELIMITER: &str = "**";

/// A run of display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Emphasis(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(text) | Segment::Emphasis(text) => text,
        }
    }

    pub fn is_emphasis(&self) -> bool {
        matches!(self, Segment::Emphasis(_))
    }
}

/// One line of a message, as an ordered list of runs
pub type Paragraph = Vec<Segment>;

/// Parse message content into paragraphs of display segments.
///
/// Every line yields a paragraph, including empty ones, so blank-line
/// spacing survives rendering. Empty runs between adjacent delimiters are
/// emitted too.
pub fn parse(content: &str) -> Vec<Paragraph> {
    content.split('\n').map(parse_paragraph).collect()
}

fn parse_paragraph(line: &str) -> Paragraph {
    line.split(EMPHASIS_DELIMITER)
        .enumerate()
        .map(|(index, run)| {
            if index % 2 == 1 {
                Segment::Emphasis(run.to_string())
            } else {
                Segment::Plain(run.to_string())
            }
        })
        .collect()
}

/// Flatten parsed paragraphs back to undecorated text
pub fn plain_text(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(|paragraph| paragraph.iter().map(Segment::text).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
