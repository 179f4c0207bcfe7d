//! Typed views of the archive's static JSON documents.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Identifier of an archived item. Generators emit either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

// ── Lenient field readers ──

/// `null` reads as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Records that fail to parse are logged and dropped; the rest survive.
fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, "Skipping malformed record: {}", e);
                None
            }
        })
        .collect())
}

/// Unsigned integers stay numeric; any other non-null scalar becomes text.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<ItemId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(ItemId::Text(s)),
        Some(value) => Some(match value.as_u64() {
            Some(n) => ItemId::Number(n),
            None => ItemId::Text(value.to_string()),
        }),
    })
}

/// One archived item from `manifest.json`. Identity is `path_html`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub path_html: Option<String>,
    #[serde(default)]
    pub path_json: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl ManifestEntry {
    /// Build an entry with a numeric id and an HTML path.
    #[cfg(test)]
    pub fn new(id: u64, path_html: &str) -> Self {
        Self {
            id: Some(ItemId::Number(id)),
            path_html: Some(path_html.to_string()),
            ..Default::default()
        }
    }

    /// The HTML path, if present and non-empty.
    pub fn path(&self) -> Option<&str> {
        self.path_html.as_deref().filter(|p| !p.is_empty())
    }

    /// Last segment of the HTML path.
    #[cfg(test)]
    pub fn file_name(&self) -> &str {
        self.path()
            .and_then(|p| p.rsplit('/').find(|s| !s.is_empty()))
            .unwrap_or("")
    }
}

/// `{ items: [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestDocument {
    #[serde(default, deserialize_with = "skip_invalid")]
    pub items: Vec<ManifestEntry>,
}

/// One `{ tag, files }` record of `tags.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagRecord {
    pub tag: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<String>,
}

/// `{ tags: [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsDocument {
    #[serde(default, deserialize_with = "skip_invalid")]
    pub tags: Vec<TagRecord>,
}

/// Tag label to member file list, keeping the document's tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    order: Vec<String>,
    members: HashMap<String, Vec<String>>,
}

impl TagIndex {
    /// All tag labels in document order.
    pub fn tags(&self) -> &[String] {
        &self.order
    }

    /// Member list for `tag`; empty for unknown tags.
    pub fn members(&self, tag: &str) -> &[String] {
        self.members.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.members.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tags whose label contains `query`, case-insensitively, in document order.
    pub fn matching(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        self.order
            .iter()
            .filter(|t| t.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }
}

impl From<TagsDocument> for TagIndex {
    fn from(doc: TagsDocument) -> Self {
        let mut index = TagIndex::default();
        for record in doc.tags {
            // A repeated label keeps its first position; the later file list wins.
            if !index.members.contains_key(&record.tag) {
                index.order.push(record.tag.clone());
            }
            index.members.insert(record.tag, record.files);
        }
        index
    }
}

/// `{ path_html }` inside the current-pick and status documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentHaiku {
    #[serde(default)]
    pub path_html: Option<String>,
}

/// `{ current_haiku: { path_html }, current_count? }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentStatus {
    #[serde(default)]
    pub current_haiku: Option<CurrentHaiku>,
    #[serde(default)]
    pub current_count: Option<serde_json::Value>,
}

impl CurrentStatus {
    pub fn path_html(&self) -> Option<&str> {
        self.current_haiku
            .as_ref()
            .and_then(|c| c.path_html.as_deref())
            .filter(|p| !p.is_empty())
    }

    /// The count, only when the document carries it as a non-negative integer.
    pub fn count(&self) -> Option<u64> {
        self.current_count.as_ref().and_then(serde_json::Value::as_u64)
    }
}

/// The resolved "current pick": its path, the count, and its HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPick {
    pub path_html: String,
    pub count: Option<u64>,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_accepts_numeric_and_string_ids() {
        let json = r#"{"items":[
            {"id": 1, "path_html": "2020/01/a.html"},
            {"id": "b-2", "path_html": "2020/02/b.html", "path_json": "2020/02/b.json", "tags": ["spring"]}
        ]}"#;
        let doc: ManifestDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].id, Some(ItemId::Number(1)));
        assert_eq!(doc.items[1].id.as_ref().unwrap().to_string(), "b-2");
        assert_eq!(doc.items[1].tags, vec!["spring".to_string()]);
    }

    #[test]
    fn manifest_tolerates_missing_fields() {
        let doc: ManifestDocument = serde_json::from_str(r#"{"items":[{"id":3}]}"#).unwrap();
        assert_eq!(doc.items[0].path(), None);
        assert_eq!(doc.items[0].file_name(), "");

        let empty: ManifestDocument = serde_json::from_str("{}").unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn null_tags_do_not_reject_the_manifest() {
        let json = r#"{"items":[
            {"id": 1, "path_html": "2020/a.html"},
            {"id": 2, "path_html": "2020/b.html", "tags": null}
        ]}"#;
        let doc: ManifestDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[1].path(), Some("2020/b.html"));
        assert!(doc.items[1].tags.is_empty());
    }

    #[test]
    fn unusual_ids_become_text() {
        let json = r#"{"items":[
            {"id": -2, "path_html": "a.html"},
            {"id": 1.5, "path_html": "b.html"},
            {"id": null, "path_html": "c.html"}
        ]}"#;
        let doc: ManifestDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.items[0].id, Some(ItemId::Text("-2".into())));
        assert_eq!(doc.items[1].id, Some(ItemId::Text("1.5".into())));
        assert_eq!(doc.items[2].id, None);
    }

    #[test]
    fn malformed_items_are_skipped() {
        let json = r#"{"items":[
            {"id": 1, "path_html": "2020/a.html"},
            {"id": 2, "path_html": 5},
            "not an object",
            {"id": 3, "path_html": "2020/c.html", "tags": ["x", 7]}
        ]}"#;
        let doc: ManifestDocument = serde_json::from_str(json).unwrap();
        let paths: Vec<_> = doc.items.iter().filter_map(ManifestEntry::path).collect();
        assert_eq!(paths, vec!["2020/a.html"]);

        let null_items: ManifestDocument = serde_json::from_str(r#"{"items":null}"#).unwrap();
        assert!(null_items.items.is_empty());
    }

    #[test]
    fn null_files_leave_other_tags_intact() {
        let json = r#"{"tags":[
            {"tag": "moon", "files": null},
            {"tag": "frog", "files": ["a.html"]},
            {"files": ["b.html"]},
            {"tag": 9, "files": []}
        ]}"#;
        let index = TagIndex::from(serde_json::from_str::<TagsDocument>(json).unwrap());
        assert_eq!(index.tags(), &["moon".to_string(), "frog".to_string()]);
        assert!(index.members("moon").is_empty());
        assert_eq!(index.members("frog"), &["a.html".to_string()]);
    }

    #[test]
    fn file_name_is_last_segment() {
        let entry = ManifestEntry::new(1, "archive/2021-05-09/haiku-003.html");
        assert_eq!(entry.file_name(), "haiku-003.html");
    }

    #[test]
    fn tag_index_keeps_document_order() {
        let json = r#"{"tags":[
            {"tag":"winter","files":["a.html"]},
            {"tag":"Spring","files":["b.html","c.html"]}
        ]}"#;
        let doc: TagsDocument = serde_json::from_str(json).unwrap();
        let index = TagIndex::from(doc);
        assert_eq!(index.tags(), &["winter".to_string(), "Spring".to_string()]);
        assert_eq!(index.members("Spring").len(), 2);
        assert!(index.members("autumn").is_empty());
        assert!(!index.contains("autumn"));
    }

    #[test]
    fn repeated_tag_replaces_files_but_keeps_position() {
        let doc = TagsDocument {
            tags: vec![
                TagRecord {
                    tag: "moon".into(),
                    files: vec!["a.html".into()],
                },
                TagRecord {
                    tag: "sea".into(),
                    files: vec![],
                },
                TagRecord {
                    tag: "moon".into(),
                    files: vec!["b.html".into()],
                },
            ],
        };
        let index = TagIndex::from(doc);
        assert_eq!(index.len(), 2);
        assert_eq!(index.tags()[0], "moon");
        assert_eq!(index.members("moon"), &["b.html".to_string()]);
    }

    #[test]
    fn matching_tags_is_case_insensitive_substring() {
        let doc: TagsDocument = serde_json::from_str(
            r#"{"tags":[{"tag":"Spring Rain"},{"tag":"autumn"},{"tag":"springtime"}]}"#,
        )
        .unwrap();
        let index = TagIndex::from(doc);
        assert_eq!(index.matching("SPRING"), vec!["Spring Rain", "springtime"]);
        assert_eq!(index.matching("").len(), 3);
        assert!(index.matching("zzz").is_empty());
    }

    #[test]
    fn current_status_count_requires_number() {
        let status: CurrentStatus = serde_json::from_str(
            r#"{"current_haiku":{"path_html":"2021/a.html"},"current_count":1234}"#,
        )
        .unwrap();
        assert_eq!(status.path_html(), Some("2021/a.html"));
        assert_eq!(status.count(), Some(1234));

        let text_count: CurrentStatus =
            serde_json::from_str(r#"{"current_count":"1234"}"#).unwrap();
        assert_eq!(text_count.count(), None);
        assert_eq!(text_count.path_html(), None);
    }
}
