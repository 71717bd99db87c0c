//! Ordered form field accumulator.

/// Ordered list of form fields. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    entries: Vec<(String, String)>,
}

impl FormFields {
    /// Creates an empty field list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns the field names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no field has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes as `application/x-www-form-urlencoded`.
    pub fn to_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl IntoIterator for FormFields {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_names_keep_order() {
        let mut fields = FormFields::new();
        fields.push("o:tag", "first");
        fields.push("subject", "Hi");
        fields.push("o:tag", "second");

        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("o:tag"), Some("first"));
        assert_eq!(fields.get_all("o:tag"), vec!["first", "second"]);
        assert_eq!(fields.names(), vec!["o:tag", "subject", "o:tag"]);
    }

    #[test]
    fn test_to_urlencoded_escapes() {
        let mut fields = FormFields::new();
        fields.push("to", "Bob <bob@x.com>");
        fields.push("subject", "Hi & bye");

        assert_eq!(
            fields.to_urlencoded(),
            "to=Bob+%3Cbob%40x.com%3E&subject=Hi+%26+bye"
        );
    }
}
