//! Bidirectional index between tags and marker ids.
//!
//! Built once from the marker registry feed and shared read-only afterwards.
//! Both directions are ordered maps of ordered sets, so iteration order is
//! independent of the order records arrive in.

use std::collections::{BTreeMap, BTreeSet};

use layered_markers::MarkerRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    /// tag -> marker ids carrying it
    tag_to_ids: BTreeMap<String, BTreeSet<String>>,
    /// marker id -> its tags
    id_to_tags: BTreeMap<String, BTreeSet<String>>,
}

impl TagIndex {
    /// Build both directions from marker records.
    ///
    /// Records without an id are skipped. A record with an id but no tags
    /// still appears in `id_to_tags` with an empty set. A repeated id unions
    /// its tags.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MarkerRecord>,
    {
        let mut tag_to_ids: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut id_to_tags: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for record in records {
            let Some(id) = record.id.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };

            let tags = id_to_tags.entry(id.to_string()).or_default();
            for tag in record.tags() {
                tags.insert(tag.clone());
                tag_to_ids
                    .entry(tag.clone())
                    .or_default()
                    .insert(id.to_string());
            }
        }

        Self {
            tag_to_ids,
            id_to_tags,
        }
    }

    /// Marker ids carrying `tag`; `None` when no marker has it.
    pub fn ids_for_tag(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.tag_to_ids.get(tag)
    }

    pub fn tags_for_id(&self, marker_id: &str) -> Option<&BTreeSet<String>> {
        self.id_to_tags.get(marker_id)
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tag_to_ids.contains_key(tag)
    }

    pub fn tag_to_ids(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.tag_to_ids
    }

    pub fn id_to_tags(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.id_to_tags
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_markers::MarkerRegistryFeed;

    fn records() -> Vec<MarkerRecord> {
        vec![
            MarkerRecord::new("HARSH_INSULT", ["insult", "derogation"]),
            MarkerRecord::new("PROFANITY_MARKER", ["insult"]),
            MarkerRecord::new("DIRECT_THREAT", ["threat"]),
            MarkerRecord {
                id: None,
                tags: Some(vec!["threat".into()]),
                ..Default::default()
            },
            MarkerRecord {
                id: Some("UNTAGGED".into()),
                tags: None,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_both_directions() {
        let index = TagIndex::build(&records());

        insta::assert_debug_snapshot!(index.tag_to_ids(), @r###"
        {
            "derogation": {
                "HARSH_INSULT",
            },
            "insult": {
                "HARSH_INSULT",
                "PROFANITY_MARKER",
            },
            "threat": {
                "DIRECT_THREAT",
            },
        }
        "###);
        assert_eq!(index.tags_for_id("UNTAGGED").map(|t| t.len()), Some(0));
        assert!(index.tags_for_id("HARSH_INSULT").unwrap().contains("derogation"));
    }

    #[test]
    fn test_legacy_feed_ids_index_under_current_prefix() {
        let feed = MarkerRegistryFeed::from_json_str(
            r#"[{"id": "A_HARSH_INSULT", "tags": ["insult"]}, {"id": "HARSH_INSULT_V2", "tags": ["insult"]}]"#,
        )
        .unwrap();
        let index = TagIndex::build(feed.records());

        let ids: Vec<_> = index.ids_for_tag("insult").unwrap().iter().cloned().collect();
        assert_eq!(ids, ["ATO_HARSH_INSULT", "HARSH_INSULT_V2"]);
        assert!(index.tags_for_id("A_HARSH_INSULT").is_none());
    }

    #[test]
    fn test_unknown_tag_is_not_an_error() {
        let index = TagIndex::build(&records());
        assert!(index.ids_for_tag("sarcasm").is_none());
        assert!(!index.contains_tag("sarcasm"));
    }

    #[test]
    fn test_rebuild_is_idempotent_and_order_independent() {
        let forward = records();
        let mut reversed = records();
        reversed.reverse();

        assert_eq!(TagIndex::build(&forward), TagIndex::build(&forward));
        assert_eq!(TagIndex::build(&forward), TagIndex::build(&reversed));
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let records = vec![
            MarkerRecord::new("DIRECT_THREAT", ["threat", "threat"]),
            MarkerRecord::new("DIRECT_THREAT", ["ultimatum"]),
        ];
        let index = TagIndex::build(&records);
        assert_eq!(index.ids_for_tag("threat").unwrap().len(), 1);
        assert_eq!(index.tags_for_id("DIRECT_THREAT").unwrap().len(), 2);
    }
}
