//! Named positions inside terminal content

use std::collections::HashMap;

use pagescroll_core::AnchorResolver;

/// Anchor name to `(column, line)` content position
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    anchors: HashMap<String, (u16, u16)>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor every Markdown-style heading ("# Title", "## Title") at its line
    ///
    /// Names are slugs of the heading text: "## Getting Started" becomes
    /// "getting-started". The first heading wins on duplicate slugs.
    pub fn from_headings<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut map = Self::new();
        for (index, line) in lines.iter().enumerate() {
            let Some(title) = heading_text(line.as_ref()) else {
                continue;
            };
            let slug = slugify(title);
            if slug.is_empty() || map.anchors.contains_key(&slug) {
                continue;
            }
            map.insert(slug, 0, u16::try_from(index).unwrap_or(u16::MAX));
        }
        map
    }

    pub fn insert(&mut self, name: impl Into<String>, column: u16, line: u16) {
        self.anchors.insert(name.into(), (column, line));
    }

    pub fn get(&self, name: &str) -> Option<(u16, u16)> {
        self.anchors.get(name).copied()
    }

    /// Anchor names ordered by line
    pub fn names(&self) -> Vec<&str> {
        let mut entries: Vec<(&str, (u16, u16))> = self
            .anchors
            .iter()
            .map(|(name, position)| (name.as_str(), *position))
            .collect();
        entries.sort_by(|a, b| (a.1 .1, a.1 .0, a.0).cmp(&(b.1 .1, b.1 .0, b.0)));
        entries.into_iter().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl AnchorResolver for AnchorMap {
    fn resolve(&self, anchor: &str) -> Option<(f64, f64)> {
        self.get(anchor)
            .map(|(column, line)| (f64::from(column), f64::from(line)))
    }
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    if level == 0 || level > 6 || !rest.starts_with(' ') {
        return None;
    }
    Some(rest.trim())
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_headings() {
        let lines = [
            "# Intro",
            "some text",
            "",
            "## Getting Started!",
            "#not a heading",
            "### Intro",
            "####### too deep",
        ];
        let map = AnchorMap::from_headings(&lines);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("intro"), Some((0, 0)));
        assert_eq!(map.get("getting-started"), Some((0, 3)));
        assert_eq!(map.names(), vec!["intro", "getting-started"]);
    }

    #[test]
    fn test_resolve_returns_content_coordinates() {
        let mut map = AnchorMap::new();
        map.insert("table", 12, 40);
        assert_eq!(map.resolve("table"), Some((12.0, 40.0)));
        assert_eq!(map.resolve("missing"), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello,  World"), "hello-world");
        assert_eq!(slugify("  snake_case - title "), "snake-case-title");
        assert_eq!(slugify("???"), "");
    }
}
