use serde::{Deserialize, Serialize};

/// Ordered list of unique, trimmed strings.
///
/// Used for the "tools used" and "skills applied" editors. Matching is exact
/// and case-sensitive; entries keep the order in which they were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagList {
    items: Vec<String>,
}

impl TagList {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an entry. Returns false (and leaves the list untouched) when the
    /// trimmed input is empty or already present.
    pub fn add(&mut self, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() || self.contains(item) {
            return false;
        }
        self.items.push(item.to_string());
        true
    }

    /// Remove an entry. Returns false when it was not in the list.
    pub fn remove(&mut self, item: &str) -> bool {
        match self.items.iter().position(|existing| existing == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|existing| existing == item)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }
}

impl From<Vec<String>> for TagList {
    fn from(items: Vec<String>) -> Self {
        let mut list = TagList::new();
        for item in items {
            list.add(&item);
        }
        list
    }
}

impl From<TagList> for Vec<String> {
    fn from(list: TagList) -> Self {
        list.items
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Parse a comma-separated string into a tag list (CLI `--tools a,b,c`)
pub fn parse_comma_separated(input: Option<&str>) -> TagList {
    let mut list = TagList::new();
    if let Some(input) = input {
        for part in input.split(',') {
            list.add(part);
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_appends_in_order() {
        let mut list = TagList::new();
        assert!(list.add("  Git "));
        assert!(list.add("Docker"));
        assert_eq!(list.as_slice(), &["Git".to_string(), "Docker".to_string()]);
    }

    #[test]
    fn test_add_rejects_empty_and_duplicates() {
        let mut list = TagList::new();
        assert!(!list.add("   "));
        assert!(list.add("Git"));
        assert!(!list.add("Git"));
        assert!(!list.add(" Git"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_is_case_sensitive() {
        let mut list = TagList::new();
        list.add("git");
        list.add("Git");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_add_twice_equals_add_once() {
        let mut once = TagList::new();
        once.add("Figma");

        let mut twice = TagList::new();
        twice.add("Figma");
        twice.add("Figma");

        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list = TagList::from(vec!["Git".to_string()]);
        assert!(!list.remove("Jira"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_mixed_sequence_keeps_first_insertion_order() {
        let mut list = TagList::new();
        let ops: &[(&str, bool)] = &[
            ("a", true),
            ("b", true),
            ("a", true),
            ("c", true),
            ("b", false),
            ("d", true),
            ("b", true),
            ("a", false),
            ("a", true),
        ];
        for (item, is_add) in ops {
            if *is_add {
                list.add(item);
            } else {
                list.remove(item);
            }
        }

        // Survivors in the order they were (re-)inserted
        assert_eq!(list.to_vec(), vec!["c", "d", "b", "a"]);

        let mut seen = std::collections::HashSet::new();
        assert!(list.iter().all(|item| seen.insert(item.clone())));
    }

    #[test]
    fn test_every_short_sequence_matches_model() {
        const ITEMS: [&str; 3] = ["a", "b", "c"];
        const MAX_LEN: u32 = 6;
        // Op k adds ITEMS[k / 2] when k is even and removes it otherwise
        let op_count = ITEMS.len() * 2;

        for len in 0..=MAX_LEN {
            for code in 0..op_count.pow(len) {
                let mut list = TagList::new();
                let mut model: Vec<String> = Vec::new();
                let mut rest = code;
                for _ in 0..len {
                    let op = rest % op_count;
                    rest /= op_count;
                    let item = ITEMS[op / 2];
                    if op % 2 == 0 {
                        let absent = !model.iter().any(|m| m == item);
                        if absent {
                            model.push(item.to_string());
                        }
                        assert_eq!(list.add(item), absent);
                    } else {
                        let before = model.len();
                        model.retain(|m| m != item);
                        assert_eq!(list.remove(item), model.len() != before);
                    }
                    assert_eq!(list.contains(item), op % 2 == 0, "code {} len {}", code, len);
                }
                assert_eq!(list.as_slice(), model.as_slice(), "code {} len {}", code, len);
            }
        }
    }

    #[test]
    fn test_deserialize_sanitizes_input() {
        let list: TagList = serde_json::from_str(r#"["Git", " Git ", "", "Jira"]"#).unwrap();
        assert_eq!(list.to_vec(), vec!["Git", "Jira"]);
    }

    #[test]
    fn test_parse_comma_separated() {
        let list = parse_comma_separated(Some("Git, Docker,,Git "));
        assert_eq!(list.to_vec(), vec!["Git", "Docker"]);
        assert!(parse_comma_separated(None).is_empty());
    }
}
