/*
 * Responsibility
 * - Which request paths need a bearer token before they go downstream
 * - Plain string-prefix match (`/tasks` also covers `/tasks/42` and `/tasksfoo`)
 */

/// Prefixes protected when nothing else is configured.
pub const DEFAULT_PROTECTED_PREFIXES: [&str; 3] = ["/tasks", "/profile", "/search"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedPaths {
    prefixes: Vec<String>,
}

impl ProtectedPaths {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for ProtectedPaths {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_PREFIXES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefixes_cover_the_three_services() {
        let paths = ProtectedPaths::default();

        assert!(paths.is_protected("/tasks"));
        assert!(paths.is_protected("/tasks/42"));
        assert!(paths.is_protected("/profile"));
        assert!(paths.is_protected("/search?q=x"));
    }

    #[test]
    fn other_paths_are_not_protected() {
        let paths = ProtectedPaths::default();

        assert!(!paths.is_protected("/health"));
        assert!(!paths.is_protected("/"));
        assert!(!paths.is_protected(""));
        assert!(!paths.is_protected("/login"));
        assert!(!paths.is_protected("/api/tasks"));
    }

    #[test]
    fn match_is_a_plain_string_prefix() {
        let paths = ProtectedPaths::default();
        assert!(paths.is_protected("/tasksfoo"));
        assert!(!paths.is_protected("/Tasks"));
    }

    #[test]
    fn custom_prefix_set_replaces_defaults() {
        let paths = ProtectedPaths::new(["/admin"]);

        assert!(paths.is_protected("/admin/users"));
        assert!(!paths.is_protected("/tasks"));
        assert_eq!(paths.prefixes(), &["/admin".to_string()]);
    }

    #[test]
    fn empty_prefix_set_protects_nothing() {
        let paths = ProtectedPaths::new(Vec::<String>::new());
        assert!(!paths.is_protected("/tasks"));
    }
}
