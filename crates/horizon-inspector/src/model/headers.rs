//! Property lists and header labels.
//!
//! Models can be restricted to an explicit, ordered list of property names,
//! each optionally carrying a display label. The list is configured either
//! entry by entry with [`PropertyHeaders::add_property`] or all at once from
//! the textual form `"name0: Header 0, name1, name2: Header 2"`.

use std::collections::HashMap;

use super::address::PropertyAddress;

/// The explicit property list and the label overrides of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyHeaders {
    names: Vec<String>,
    labels: HashMap<String, String>,
}

impl PropertyHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list from `"name: header, name, ..."`.
    ///
    /// Blank fields are skipped.
    ///
    /// ```
    /// use horizon_inspector::model::PropertyHeaders;
    ///
    /// let mut headers = PropertyHeaders::new();
    /// headers.set_properties("count: Count, , flag ,size:Size");
    /// assert_eq!(headers.names(), ["count", "flag", "size"]);
    /// assert_eq!(headers.label("count"), "Count");
    /// assert_eq!(headers.label("flag"), "flag");
    /// ```
    pub fn set_properties(&mut self, spec: &str) {
        self.names.clear();
        self.labels.clear();
        for field in spec.split(',').filter(|f| !f.trim().is_empty()) {
            self.add_property(field);
        }
    }

    /// Append one entry: `"name"` or `"name: header"`.
    pub fn add_property(&mut self, entry: &str) {
        match entry.split_once(':') {
            Some((name, label)) => {
                let name = name.trim().to_string();
                self.labels.insert(name.clone(), label.trim().to_string());
                self.names.push(name);
            }
            None => self.names.push(entry.trim().to_string()),
        }
    }

    /// Explicit property names in order. Empty means "all properties".
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The explicit name at `position`.
    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    /// Returns `true` when the list is empty or contains `name`.
    pub fn allows(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| n == name)
    }

    /// The label override for `name`, or `name` itself.
    pub fn label<'a>(&'a self, name: &'a str) -> &'a str {
        self.labels.get(name).map_or(name, String::as_str)
    }

    /// Label for a possibly dotted name.
    ///
    /// An override registered for the full dotted name is used as is.
    /// Otherwise the owner path prefix is kept in front of the leaf's label.
    ///
    /// ```
    /// use horizon_inspector::model::PropertyHeaders;
    ///
    /// let mut headers = PropertyHeaders::new();
    /// headers.set_properties("wheel.radius, count: Count, wheel.count, body.mass: Mass");
    /// assert_eq!(headers.path_label("wheel.radius"), "wheel.radius");
    /// assert_eq!(headers.path_label("wheel.count"), "wheel.Count");
    /// assert_eq!(headers.path_label("body.mass"), "Mass");
    /// ```
    pub fn path_label(&self, dotted: &str) -> String {
        if let Some(label) = self.labels.get(dotted) {
            return label.clone();
        }
        let address = PropertyAddress::parse(dotted);
        format!("{}{}", address.child_path_prefix(), self.label(address.leaf()))
    }
}
