//! Order-preserving INI document used for the relay client configuration.
//!
//! Only the keys that are set change; every other section, key, comment and
//! blank line is written back as it was read. Entries are rendered as
//! `key = value`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Entry { key: String, value: String },
    /// Comment, blank or unparseable line, kept verbatim.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    /// `None` for lines before the first `[section]` header.
    name: Option<String>,
    lines: Vec<Line>,
    /// Added by `set` rather than read from text.
    created: bool,
}

/// A parsed INI document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    /// Parse INI text. Never fails: lines that are neither headers nor
    /// `key = value` / `key: value` pairs are kept verbatim.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut sections = vec![Section {
            name: None,
            lines: Vec::new(),
            created: false,
        }];

        for raw in text.lines() {
            let trimmed = raw.trim();
            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                sections.push(Section {
                    name: Some(name.trim().to_string()),
                    lines: Vec::new(),
                    created: false,
                });
                continue;
            }

            let line = parse_entry(trimmed).map_or_else(
                || Line::Verbatim(raw.to_string()),
                |(key, value)| Line::Entry { key, value },
            );
            if let Some(current) = sections.last_mut() {
                current.lines.push(line);
            }
        }

        if sections.first().is_some_and(|s| s.lines.is_empty()) {
            sections.remove(0);
        }
        Self { sections }
    }

    /// Look up `key` in `section`.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.lines.iter().find_map(|l| match l {
            Line::Entry { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Names of all `[section]` headers, in document order.
    #[must_use]
    pub fn section_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|s| s.name.as_deref())
            .collect()
    }

    /// Set `key` in `section` to `value`.
    ///
    /// Replaces the value in place when the key exists. Otherwise the entry is
    /// appended after the section's last entry, creating the section at the
    /// end of the document if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl fmt::Display) {
        let value = value.to_string();
        let idx = match self
            .sections
            .iter()
            .position(|s| s.name.as_deref() == Some(section))
        {
            Some(idx) => idx,
            None => {
                self.sections.push(Section {
                    name: Some(section.to_string()),
                    lines: Vec::new(),
                    created: true,
                });
                self.sections.len() - 1
            }
        };
        let lines = &mut self.sections[idx].lines;

        for line in lines.iter_mut() {
            if let Line::Entry { key: k, value: v } = line
                && k == key
            {
                *v = value;
                return;
            }
        }

        let insert_at = lines
            .iter()
            .rposition(|l| matches!(l, Line::Entry { .. }))
            .map_or(0, |i| i + 1);
        lines.insert(
            insert_at,
            Line::Entry {
                key: key.to_string(),
                value,
            },
        );
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name.as_deref() == Some(name))
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if let Some(name) = &section.name {
                let prev_ends_blank = i == 0
                    || self.sections[i - 1]
                        .lines
                        .last()
                        .is_none_or(|l| matches!(l, Line::Verbatim(s) if s.trim().is_empty()));
                if section.created && !prev_ends_blank {
                    writeln!(f)?;
                }
                writeln!(f, "[{name}]")?;
            }
            for line in &section.lines {
                match line {
                    Line::Entry { key, value } => writeln!(f, "{key} = {value}")?,
                    Line::Verbatim(raw) => writeln!(f, "{raw}")?,
                }
            }
        }
        Ok(())
    }
}

fn parse_entry(line: &str) -> Option<(String, String)> {
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
        return None;
    }
    let split = line.find(['=', ':'])?;
    let key = line[..split].trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), line[split + 1..].trim().to_string()))
}
