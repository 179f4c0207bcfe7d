//! Tag filtering and prev/next navigation over the filtered files.

use crate::archive::model::{ManifestEntry, TagIndex};

/// How tag member lists are matched against manifest paths.
///
/// One rule is chosen at startup and used for every filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagMatchRule {
    /// Whole-path equality.
    #[default]
    Exact,
    /// The member is a trailing run of whole path segments.
    Suffix,
    /// Last segments are equal.
    Filename,
}

impl TagMatchRule {
    /// Parse from a config string; unknown values fall back to `Exact`.
    pub fn from_name(s: &str) -> Self {
        match s {
            "suffix" => TagMatchRule::Suffix,
            "filename" => TagMatchRule::Filename,
            _ => TagMatchRule::Exact,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TagMatchRule::Exact => "exact",
            TagMatchRule::Suffix => "suffix",
            TagMatchRule::Filename => "filename",
        }
    }

    pub fn matches(&self, entry_path: &str, member: &str) -> bool {
        let path = normalize(entry_path);
        let member = normalize(member);
        if member.is_empty() {
            return false;
        }
        match self {
            TagMatchRule::Exact => path == member,
            TagMatchRule::Suffix => {
                path == member
                    || path
                        .strip_suffix(member)
                        .is_some_and(|head| head.ends_with('/'))
            }
            TagMatchRule::Filename => file_name(path) == file_name(member),
        }
    }
}

fn normalize(path: &str) -> &str {
    let mut p = path;
    loop {
        if let Some(rest) = p.strip_prefix("./") {
            p = rest;
        } else if let Some(rest) = p.strip_prefix('/') {
            p = rest;
        } else {
            return p;
        }
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Manifest entries tagged `tag`, in manifest order. Unknown tags give nothing.
pub fn filter_by_tag(
    manifest: &[ManifestEntry],
    tags: &TagIndex,
    tag: &str,
    rule: TagMatchRule,
) -> Vec<ManifestEntry> {
    let members = tags.members(tag);
    if members.is_empty() {
        return Vec::new();
    }
    manifest
        .iter()
        .filter(|entry| {
            entry
                .path()
                .is_some_and(|p| members.iter().any(|m| rule.matches(p, m)))
        })
        .cloned()
        .collect()
}

/// The active tag, its files, and the selected position.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub current_tag: Option<String>,
    pub files: Vec<ManifestEntry>,
    /// `None` means nothing is selected.
    pub current_index: Option<usize>,
}

impl FilterState {
    /// Replace the filtered set with `tag`'s files and select the first one.
    ///
    /// Returns the entry to load, or `None` when the tag has no files.
    pub fn select_tag(
        &mut self,
        manifest: &[ManifestEntry],
        tags: &TagIndex,
        tag: &str,
        rule: TagMatchRule,
    ) -> Option<&ManifestEntry> {
        self.current_tag = Some(tag.to_string());
        self.files = filter_by_tag(manifest, tags, tag, rule);
        self.current_index = if self.files.is_empty() { None } else { Some(0) };
        self.current()
    }

    /// Select a position; out-of-range positions leave the selection unchanged.
    pub fn select_index(&mut self, index: usize) -> Option<&ManifestEntry> {
        if index >= self.files.len() {
            return None;
        }
        self.current_index = Some(index);
        self.current()
    }

    pub fn next(&mut self) -> Option<&ManifestEntry> {
        let index = self.current_index.map_or(0, |i| i + 1);
        self.select_index(index)
    }

    pub fn previous(&mut self) -> Option<&ManifestEntry> {
        match self.current_index {
            Some(i) if i > 0 => self.select_index(i - 1),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&ManifestEntry> {
        self.current_index.and_then(|i| self.files.get(i))
    }

    /// A tag was chosen but nothing matched it.
    pub fn is_no_results(&self) -> bool {
        self.current_tag.is_some() && self.files.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// `"2 / 5 · spring"`, `"no results · spring"`, or empty with no tag.
    pub fn status_line(&self) -> String {
        let Some(tag) = self.current_tag.as_deref() else {
            return String::new();
        };
        if self.files.is_empty() {
            return format!("no results · {}", tag);
        }
        match self.current_index {
            Some(i) => format!("{} / {} · {}", i + 1, self.files.len(), tag),
            None => format!("{} files · {}", self.files.len(), tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::model::{TagRecord, TagsDocument};

    fn tags(tag: &str, files: &[&str]) -> TagIndex {
        TagIndex::from(TagsDocument {
            tags: vec![TagRecord {
                tag: tag.to_string(),
                files: files.iter().map(|f| f.to_string()).collect(),
            }],
        })
    }

    fn manifest() -> Vec<ManifestEntry> {
        vec![
            ManifestEntry::new(1, "archive/2021/a.html"),
            ManifestEntry::new(2, "archive/2022/a.html"),
            ManifestEntry::new(3, "archive/2021/b.html"),
        ]
    }

    fn paths(entries: &[ManifestEntry]) -> Vec<&str> {
        entries.iter().filter_map(ManifestEntry::path).collect()
    }

    #[test]
    fn exact_tag_match_yields_single_entry() {
        let index = tags("spring", &["archive/2021/a.html"]);
        let files = filter_by_tag(&manifest(), &index, "spring", TagMatchRule::Exact);
        assert_eq!(paths(&files), vec!["archive/2021/a.html"]);
    }

    #[test]
    fn unknown_tag_yields_nothing() {
        let index = tags("spring", &["archive/2021/a.html"]);
        assert!(filter_by_tag(&manifest(), &index, "winter", TagMatchRule::Exact).is_empty());
    }

    #[test]
    fn exact_ignores_leading_root_markers() {
        assert!(TagMatchRule::Exact.matches("/archive/a.html", "./archive/a.html"));
        assert!(!TagMatchRule::Exact.matches("archive/a.html", "a.html"));
    }

    #[test]
    fn suffix_requires_segment_boundary() {
        let rule = TagMatchRule::Suffix;
        assert!(rule.matches("archive/2021/a.html", "2021/a.html"));
        assert!(rule.matches("archive/2021/a.html", "a.html"));
        assert!(!rule.matches("archive/2021/ba.html", "a.html"));
        assert!(!rule.matches("archive/2021/a.html", ""));
    }

    #[test]
    fn filename_rule_matches_every_same_named_entry() {
        let index = tags("spring", &["a.html"]);
        let files = filter_by_tag(&manifest(), &index, "spring", TagMatchRule::Filename);
        assert_eq!(paths(&files), vec!["archive/2021/a.html", "archive/2022/a.html"]);
    }

    #[test]
    fn results_keep_manifest_order() {
        let index = tags("both", &["archive/2021/b.html", "archive/2021/a.html"]);
        let files = filter_by_tag(&manifest(), &index, "both", TagMatchRule::Exact);
        assert_eq!(paths(&files), vec!["archive/2021/a.html", "archive/2021/b.html"]);
    }

    #[test]
    fn rule_names_round_trip_through_config() {
        assert_eq!(TagMatchRule::from_name("suffix"), TagMatchRule::Suffix);
        assert_eq!(TagMatchRule::from_name("filename"), TagMatchRule::Filename);
        assert_eq!(TagMatchRule::from_name("bogus"), TagMatchRule::Exact);
        assert_eq!(TagMatchRule::Filename.label(), "filename");
    }

    #[test]
    fn select_tag_auto_selects_first() {
        let index = tags("spring", &["archive/2021/a.html", "archive/2021/b.html"]);
        let mut state = FilterState::default();
        let first = state
            .select_tag(&manifest(), &index, "spring", TagMatchRule::Exact)
            .cloned();
        assert_eq!(first.unwrap().path(), Some("archive/2021/a.html"));
        assert_eq!(state.current_index, Some(0));
        assert_eq!(state.status_line(), "1 / 2 · spring");
    }

    #[test]
    fn select_unknown_tag_is_no_results() {
        let index = tags("spring", &["archive/2021/a.html"]);
        let mut state = FilterState::default();
        state.select_tag(&manifest(), &index, "spring", TagMatchRule::Exact);
        assert!(state
            .select_tag(&manifest(), &index, "winter", TagMatchRule::Exact)
            .is_none());
        assert!(state.is_no_results());
        assert!(state.files.is_empty());
        assert_eq!(state.current_index, None);
        assert_eq!(state.status_line(), "no results · winter");
    }

    #[test]
    fn navigation_is_bounded() {
        let index = tags("spring", &["archive/2021/a.html", "archive/2021/b.html"]);
        let mut state = FilterState::default();
        state.select_tag(&manifest(), &index, "spring", TagMatchRule::Exact);
        assert!(state.previous().is_none());
        assert_eq!(state.current_index, Some(0));
        assert_eq!(state.next().unwrap().path(), Some("archive/2021/b.html"));
        assert!(state.next().is_none());
        assert_eq!(state.current_index, Some(1));
        assert_eq!(state.previous().unwrap().path(), Some("archive/2021/a.html"));
        assert!(state.select_index(9).is_none());
        assert_eq!(state.current_index, Some(0));
    }

    #[test]
    fn clear_forgets_everything() {
        let index = tags("spring", &["archive/2021/a.html"]);
        let mut state = FilterState::default();
        state.select_tag(&manifest(), &index, "spring", TagMatchRule::Exact);
        state.clear();
        assert!(state.current_tag.is_none());
        assert!(!state.is_no_results());
        assert_eq!(state.status_line(), "");
    }
}
