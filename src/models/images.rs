use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered image URLs for a listing.
///
/// Accepts either a comma-separated string or a JSON array on input and
/// always holds trimmed, non-empty URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageList(Vec<String>);

impl ImageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse free text such as `"a, b , c"`
    pub fn from_text(text: &str) -> Self {
        Self::from_items(text.split(','))
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .filter_map(|item| {
                    let url = item.as_ref().trim();
                    (!url.is_empty()).then(|| url.to_string())
                })
                .collect(),
        )
    }

    /// Append a URL at the end; blank input is ignored
    pub fn push(&mut self, url: impl AsRef<str>) -> bool {
        let url = url.as_ref().trim();
        if url.is_empty() {
            return false;
        }
        self.0.push(url.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for ImageList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImages {
    List(Vec<Option<String>>),
    Text(String),
}

impl<'de> Deserialize<'de> for ImageList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawImages>::deserialize(deserializer)? {
            Some(RawImages::List(items)) => Self::from_items(items.iter().flatten()),
            Some(RawImages::Text(text)) => Self::from_text(&text),
            None => Self::default(),
        })
    }
}

impl Serialize for ImageList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn text_and_sequence_normalize_alike() {
        let from_text = ImageList::from_text("a, b , c");
        let from_seq = ImageList::from_items(["a", "b", "c"]);
        assert_eq!(from_text, from_seq);
        assert_eq!(from_text.into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn drops_blank_entries() {
        let list = ImageList::from_text(" , a,, ,b ,");
        assert_eq!(list.as_slice(), ["a", "b"]);
    }

    #[test]
    fn deserializes_either_shape() {
        let from_str: ImageList = serde_json::from_str(r#""x.jpg, y.jpg""#).unwrap();
        let from_arr: ImageList = serde_json::from_str(r#"[" x.jpg", null, "", "y.jpg"]"#).unwrap();
        let from_null: ImageList = serde_json::from_str("null").unwrap();

        assert_eq!(from_str.as_slice(), ["x.jpg", "y.jpg"]);
        assert_eq!(from_arr, from_str);
        assert!(from_null.is_empty());
        assert_eq!(serde_json::to_string(&from_arr).unwrap(), r#"["x.jpg","y.jpg"]"#);
    }

    #[test]
    fn remove_by_position_keeps_order() {
        let mut list = ImageList::from_items(["a", "b", "c"]);
        assert_eq!(list.remove(1).as_deref(), Some("b"));
        assert_eq!(list.remove(5), None);
        assert!(!list.push("   "));
        assert!(list.push(" d "));
        assert_eq!(list.as_slice(), ["a", "c", "d"]);
        assert_eq!(list.first(), Some("a"));
    }

    proptest! {
        #[test]
        fn joined_text_matches_sequence(urls in prop::collection::vec("[a-z0-9/:.]{1,20}", 0..8)) {
            let text = urls.join(" , ");
            prop_assert_eq!(ImageList::from_text(&text), ImageList::from_items(&urls));
            prop_assert_eq!(ImageList::from_text(&text).len(), urls.len());
        }
    }
}
