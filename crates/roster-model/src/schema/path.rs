use std::fmt;

/// Parent-to-child sequence of key names locating a value in a nested document.
///
/// Paths are plain segment lists, never parsed out of an encoded string:
/// `node.resources.gpu` is `["node", "resources", "gpu"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Path of the document root (no segments).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend this path with one more key, returning the child path.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    /// The segments from outermost to innermost key.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` for the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("(document root)")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::KeyPath;

    #[test]
    fn root_is_empty_and_displays_as_marker() {
        let root = KeyPath::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "(document root)");
    }

    #[test]
    fn child_appends_without_mutating_parent() {
        let parent = KeyPath::root().child("node");
        let child = parent.child("resources").child("gpu");

        assert_eq!(parent.segments(), ["node"]);
        assert_eq!(child.segments(), ["node", "resources", "gpu"]);
    }

    #[test]
    fn displays_as_dotted_path() {
        let path: KeyPath = ["connection", "api_server", "port"].into_iter().collect();
        assert_eq!(path.to_string(), "connection.api_server.port");
    }

    #[test]
    fn collects_from_iterator_of_strings() {
        let a: KeyPath = ["a", "b"].into_iter().collect();
        let b = KeyPath::root().child("a").child("b");
        assert_eq!(a, b);
    }
}
