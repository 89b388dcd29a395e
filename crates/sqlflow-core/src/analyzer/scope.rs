//! Name resolution for column qualifiers.

use std::collections::{HashMap, HashSet};

use super::state::UNKNOWN_TABLE;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    Table(String),
    /// Derived table or CTE reference; its columns have no physical owner.
    Derived,
}

/// Qualifiers visible inside one query block. Child blocks start from a copy
/// of their parent, so correlated references still resolve.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    bindings: HashMap<String, Binding>,
    ctes: HashSet<String>,
}

impl Scope {
    pub(crate) fn child(&self) -> Self {
        self.clone()
    }

    /// Binds a FROM table. Unaliased dotted names also bind their last segment,
    /// so `FROM shop.orders ... orders.id` resolves to `shop.orders`.
    pub(crate) fn bind_table(&mut self, name: &str, alias: Option<&str>) {
        match alias {
            Some(alias) => {
                self.bindings
                    .insert(alias.to_string(), Binding::Table(name.to_string()));
            }
            None => {
                if let Some((_, last)) = name.rsplit_once('.') {
                    self.bindings
                        .insert(last.to_string(), Binding::Table(name.to_string()));
                }
            }
        }
    }

    pub(crate) fn bind_derived(&mut self, alias: &str) {
        self.bindings.insert(alias.to_string(), Binding::Derived);
    }

    pub(crate) fn add_cte(&mut self, name: &str) {
        self.ctes.insert(name.to_string());
    }

    pub(crate) fn is_cte(&self, name: &str) -> bool {
        self.ctes.contains(name)
    }

    /// Table owning a column with the given qualifier.
    ///
    /// Unqualified references and references through derived tables or CTEs
    /// resolve to [`UNKNOWN_TABLE`]; an unbound qualifier is taken as a table
    /// name verbatim.
    pub(crate) fn resolve(&self, qualifier: Option<&str>) -> String {
        let Some(qualifier) = qualifier else {
            return UNKNOWN_TABLE.to_string();
        };
        match self.bindings.get(qualifier) {
            Some(Binding::Table(name)) => name.clone(),
            Some(Binding::Derived) => UNKNOWN_TABLE.to_string(),
            None if self.is_cte(qualifier) => UNKNOWN_TABLE.to_string(),
            None => qualifier.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_alias_and_verbatim_qualifier() {
        let mut scope = Scope::default();
        scope.bind_table("users", Some("u"));
        assert_eq!(scope.resolve(Some("u")), "users");
        assert_eq!(scope.resolve(Some("orders")), "orders");
        assert_eq!(scope.resolve(None), UNKNOWN_TABLE);
    }

    #[test]
    fn test_resolve_schema_qualified_table_by_last_segment() {
        let mut scope = Scope::default();
        scope.bind_table("shop.orders", None);
        assert_eq!(scope.resolve(Some("orders")), "shop.orders");
        assert_eq!(scope.resolve(Some("shop.orders")), "shop.orders");
    }

    #[test]
    fn test_derived_and_cte_qualifiers_are_unknown() {
        let mut scope = Scope::default();
        scope.bind_derived("sub");
        scope.add_cte("recent");
        assert_eq!(scope.resolve(Some("sub")), UNKNOWN_TABLE);
        assert_eq!(scope.resolve(Some("recent")), UNKNOWN_TABLE);
    }

    #[test]
    fn test_child_scope_does_not_leak_into_parent() {
        let parent = Scope::default();
        let mut child = parent.child();
        child.bind_table("users", Some("u"));
        assert_eq!(parent.resolve(Some("u")), "u");
        assert_eq!(child.resolve(Some("u")), "users");
    }
}
