//! Dotted property addressing.
//!
//! A column or row name such as `"body.wheel.radius"` addresses the property
//! `radius` on the object reached from a row object by looking up the child
//! named `body`, then its child named `wheel`.

use horizon_inspector_core::{ObjectId, ObjectSubstrate};

/// Follow `path` from `root` by named direct-child lookups.
///
/// Each `.`-separated segment is looked up among the children of the object
/// reached so far. Resolution fails as soon as one segment is missing or
/// empty; no partially resolved object is ever returned. A path without a
/// `.` is a single child lookup, never `root` itself.
///
/// # Example
///
/// ```
/// use horizon_inspector::model::resolve_descendant;
/// use horizon_inspector_core::{ClassInfo, ObjectSubstrate, SharedObjectRegistry};
///
/// let registry = SharedObjectRegistry::new();
/// registry.register_class(ClassInfo::new("Part")).unwrap();
/// let car = registry.create("Part", None).unwrap();
/// let body = registry.create("Part", Some(car)).unwrap();
/// let wheel = registry.create("Part", Some(body)).unwrap();
/// registry.set_object_name(body, "body").unwrap();
/// registry.set_object_name(wheel, "wheel").unwrap();
///
/// assert_eq!(resolve_descendant(&registry, car, "body.wheel"), Some(wheel));
/// assert_eq!(resolve_descendant(&registry, car, "wheel"), None);
/// assert_eq!(resolve_descendant(&registry, car, "body.door"), None);
/// ```
pub fn resolve_descendant(substrate: &dyn ObjectSubstrate, root: ObjectId, path: &str) -> Option<ObjectId> {
    if path.is_empty() {
        return None;
    }
    let mut current = root;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = substrate.find_child(current, segment).ok().flatten()?;
    }
    Some(current)
}

/// A dotted name split at its last `.` into an owner path and a leaf
/// property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAddress {
    owner_path: Option<String>,
    leaf: String,
}

impl PropertyAddress {
    /// Split `dotted` at its last `.`.
    ///
    /// ```
    /// use horizon_inspector::model::PropertyAddress;
    ///
    /// let address = PropertyAddress::parse("body.wheel.radius");
    /// assert_eq!(address.owner_path(), Some("body.wheel"));
    /// assert_eq!(address.leaf(), "radius");
    /// assert_eq!(address.child_path_prefix(), "body.wheel.");
    ///
    /// let plain = PropertyAddress::parse("radius");
    /// assert_eq!(plain.owner_path(), None);
    /// assert_eq!(plain.child_path_prefix(), "");
    /// ```
    pub fn parse(dotted: &str) -> Self {
        match dotted.rfind('.') {
            Some(pos) => Self {
                owner_path: Some(dotted[..pos].to_string()),
                leaf: dotted[pos + 1..].to_string(),
            },
            None => Self {
                owner_path: None,
                leaf: dotted.to_string(),
            },
        }
    }

    /// The path to the owning object, if the name was dotted.
    pub fn owner_path(&self) -> Option<&str> {
        self.owner_path.as_deref()
    }

    /// The property name on the owning object.
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// The owner path including its trailing `.`, or `""`.
    pub fn child_path_prefix(&self) -> String {
        self.owner_path
            .as_ref()
            .map(|path| format!("{path}."))
            .unwrap_or_default()
    }

    /// The object owning the leaf property, starting from `root`.
    pub fn resolve_owner(&self, substrate: &dyn ObjectSubstrate, root: ObjectId) -> Option<ObjectId> {
        match &self.owner_path {
            Some(path) => resolve_descendant(substrate, root, path),
            None => substrate.contains(root).then_some(root),
        }
    }
}
