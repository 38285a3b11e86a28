//! Path and query string building for generated `path()` methods

use std::collections::BTreeMap;
use std::fmt::Display;

/// Replace the first `{name}` in `template` with `value`
///
/// Replacement is literal. A value whose text equals another placeholder
/// (for example `"{other}"`) will be picked up by the next substitution.
pub fn substitute(template: &str, name: &str, value: impl Display) -> String {
    let placeholder = format!("{{{name}}}");
    template.replacen(&placeholder, &value.to_string(), 1)
}

/// Query parameters ordered by key; repeated keys keep insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: BTreeMap<String, Vec<String>>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: impl Display) -> &mut Self {
        self.pairs
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// One `name=value` pair per item
    pub fn push_all<I>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        for value in values {
            self.push(name, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Form-encoded query, without the leading `?`
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, values) in &self.pairs {
            for value in values {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }

    /// `path` followed by `?` and the encoded query; the `?` is always present
    pub fn finish(&self, path: &str) -> String {
        format!("{path}?{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_with_unset_optional_query() {
        let path = substitute("/items/{id}", "id", "42");
        assert_eq!(QueryString::new().finish(&path), "/items/42?");
    }

    #[test]
    fn test_substitute_replaces_first_occurrence_only() {
        assert_eq!(substitute("/a/{x}/b/{x}", "x", 1), "/a/1/b/{x}");
        // literal substitution: a value spelled like a placeholder is not escaped
        let once = substitute("/{a}/{b}", "a", "{b}");
        assert_eq!(substitute(&once, "b", "z"), "/z/{b}");
    }

    #[test]
    fn test_query_is_sorted_and_encoded() {
        let mut query = QueryString::new();
        query.push("zeta", "last");
        query.push_all("tags", ["a b", "c&d"]);
        query.push("alpha", 1);
        assert_eq!(
            query.finish("/items"),
            "/items?alpha=1&tags=a+b&tags=c%26d&zeta=last"
        );
    }
}
