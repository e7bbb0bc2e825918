//! Line-preserving model of the engine's `key = value` configuration format.
//!
//! Unedited lines keep their original text, so `parse` followed by `render`
//! reproduces the input exactly.

use std::fmt;

/// One `key = value` setting, possibly commented out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// Trailing `# ...` text, if any
    pub comment: Option<String>,
    /// `false` for a commented-out setting such as `# maxVisits = 500`
    pub enabled: bool,
}

impl Entry {
    fn render(&self) -> String {
        let prefix = if self.enabled { "" } else { "# " };
        format!("{}{} = {}", prefix, self.key, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Entry(Entry),
}

/// A parsed line together with the text it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    raw: String,
    /// Line ended in `\r\n`; `raw` holds the text without the `\r`
    crlf: bool,
}

impl Line {
    pub fn parse(raw: &str) -> Self {
        let (raw, crlf) = match raw.strip_suffix('\r') {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };
        Self {
            kind: classify(raw),
            raw: raw.to_string(),
            crlf,
        }
    }

    pub fn from_entry(entry: Entry) -> Self {
        let raw = entry.render();
        Self {
            kind: LineKind::Entry(entry),
            raw,
            crlf: false,
        }
    }

    pub fn comment(text: &str) -> Self {
        Self {
            kind: LineKind::Comment,
            raw: format!("# {}", text),
            crlf: false,
        }
    }

    /// Line text without its terminator.
    pub fn text(&self) -> &str {
        &self.raw
    }

    fn with_crlf(mut self, crlf: bool) -> Self {
        self.crlf = crlf;
        self
    }

    /// A comment such as `# Rules-----` that opens a new section.
    pub fn is_section_header(&self) -> bool {
        matches!(self.kind, LineKind::Comment)
            && self.raw.trim_start().starts_with('#')
            && self.raw.trim_end().ends_with("---")
    }

    pub fn entry(&self) -> Option<&Entry> {
        match &self.kind {
            LineKind::Entry(entry) => Some(entry),
            _ => None,
        }
    }
}

fn is_key(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn classify(raw: &str) -> LineKind {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    let (body, enabled) = match trimmed.strip_prefix('#') {
        Some(rest) => (rest.trim_start_matches('#').trim_start(), false),
        None => (trimmed, true),
    };

    let Some((key, rest)) = body.split_once('=') else {
        return LineKind::Comment;
    };
    let key = key.trim();
    if !is_key(key) {
        return LineKind::Comment;
    }

    let (value, comment) = match rest.find('#') {
        Some(pos) => (&rest[..pos], Some(rest[pos..].trim_end().to_string())),
        None => (rest, None),
    };
    let value = value.trim();
    // "# foo =" in prose is a comment, an active "foo =" is an empty setting
    if value.is_empty() && !enabled {
        return LineKind::Comment;
    }

    LineKind::Entry(Entry {
        key: key.to_string(),
        value: value.to_string(),
        comment,
        enabled,
    })
}

/// A whole configuration file as an ordered list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl EngineConfig {
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let trailing_newline = text.ends_with('\n');
        let body = if trailing_newline {
            &text[..text.len() - 1]
        } else {
            text
        };
        Self {
            lines: body.split('\n').map(Line::parse).collect(),
            trailing_newline,
        }
    }

    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(|line| {
                if line.crlf {
                    format!("{}\r", line.raw)
                } else {
                    line.raw.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Index of the line holding `key`: the first active entry, else the first
    /// commented-out one.
    pub fn find(&self, key: &str) -> Option<usize> {
        let mut commented = None;
        for (idx, line) in self.lines.iter().enumerate() {
            if let Some(entry) = line.entry() {
                if entry.key == key {
                    if entry.enabled {
                        return Some(idx);
                    }
                    commented.get_or_insert(idx);
                }
            }
        }
        commented
    }

    /// The active value for `key`, if the setting is enabled.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key)
            .and_then(|idx| self.lines[idx].entry())
            .filter(|entry| entry.enabled)
            .map(|entry| entry.value.as_str())
    }

    /// Replaced lines keep the terminator of the line they replace.
    pub(crate) fn set_line(&mut self, idx: usize, line: Line) {
        let crlf = self.lines[idx].crlf;
        self.lines[idx] = line.with_crlf(crlf);
    }

    /// Inserted lines take the terminator of the first line in `range`.
    pub(crate) fn splice(&mut self, range: std::ops::RangeInclusive<usize>, lines: Vec<Line>) {
        let crlf = self.lines[*range.start()].crlf;
        self.lines
            .splice(range, lines.into_iter().map(|line| line.with_crlf(crlf)));
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("# See the docs for details"), LineKind::Comment);
        assert_eq!(
            classify("# Some other legal values are: \"chinese\", \"japanese\""),
            LineKind::Comment
        );
        assert_eq!(
            classify("maxVisits = 500"),
            LineKind::Entry(Entry {
                key: "maxVisits".to_string(),
                value: "500".to_string(),
                comment: None,
                enabled: true,
            })
        );
        assert_eq!(
            classify("# koRule = SIMPLE       # Simple ko rules (triple ko = no result)"),
            LineKind::Entry(Entry {
                key: "koRule".to_string(),
                value: "SIMPLE".to_string(),
                comment: Some("# Simple ko rules (triple ko = no result)".to_string()),
                enabled: false,
            })
        );
        assert_eq!(classify("# if x = then"), LineKind::Comment);
    }

    #[test]
    fn test_find_prefers_active_entry() {
        let config = EngineConfig::parse("# maxTime = 10\nmaxTime = 5\n# maxTime = 1\n");
        assert_eq!(config.find("maxTime"), Some(1));
        assert_eq!(config.get("maxTime"), Some("5"));

        let config = EngineConfig::parse("# koRule = SIMPLE\n# koRule = POSITIONAL\n");
        assert_eq!(config.find("koRule"), Some(0));
        assert_eq!(config.get("koRule"), None);
        assert_eq!(config.find("scoringRule"), None);
    }

    #[test]
    fn test_render_without_trailing_newline() {
        let text = "a = 1\n\n# b = 2";
        let config = EngineConfig::parse(text);
        assert_eq!(config.line_count(), 3);
        assert_eq!(config.render(), text);
    }

    #[test]
    fn test_crlf_lines_keep_terminator() {
        let text = "# Logs---\r\nlogSearchInfo = false\r\nmaxTime = 10\r\n";
        let mut config = EngineConfig::parse(text);
        assert_eq!(config.render(), text);
        assert_eq!(config.lines()[2].text(), "maxTime = 10");
        assert!(config.lines()[0].is_section_header());

        config
            .apply_edit(&crate::engine_config::ConfigEdit::set("maxTime", "1.0"))
            .unwrap();
        assert_eq!(
            config.render(),
            "# Logs---\r\nlogSearchInfo = false\r\nmaxTime = 1.0\r\n"
        );
    }

    proptest! {
        #[test]
        fn parse_render_is_identity(text in "[ -~\t\n]{0,400}") {
            prop_assert_eq!(EngineConfig::parse(&text).render(), text);
        }

        #[test]
        fn line_count_matches_newlines(lines in proptest::collection::vec("[a-zA-Z=# .0-9]{0,20}", 1..40)) {
            let text = format!("{}\n", lines.join("\n"));
            prop_assert_eq!(EngineConfig::parse(&text).line_count(), lines.len());
        }
    }
}
