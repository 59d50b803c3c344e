use fxhash::FxBuildHasher;
use indexmap::IndexMap;

/// Symbol table of label -> mailbox address, in definition order.
///
/// Built during pass one of assembly and carried on the finished image for
/// diagnostics only; the simulator never sees labels. Each pipeline owns its
/// table, so concurrent assemblies are independent.
#[derive(Clone, Default, Debug)]
pub struct SymbolTable {
    map: IndexMap<String, u16, FxBuildHasher>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Register a label. Returns the previously bound address if the label
    /// was already defined.
    pub fn insert(&mut self, label: &str, addr: u16) -> Option<u16> {
        self.map.insert(label.to_string(), addr)
    }

    /// Look up the address a label resolves to. Case-sensitive.
    pub fn get(&self, label: &str) -> Option<u16> {
        self.map.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate labels in definition (= ascending address) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.map.iter().map(|(label, addr)| (label.as_str(), *addr))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_reports_redefinition() {
        let mut symbols = SymbolTable::new();
        assert_eq!(symbols.insert("count", 3), None);
        assert_eq!(symbols.insert("count", 5), Some(3));
    }

    #[test]
    fn labels_are_case_sensitive() {
        let mut symbols = SymbolTable::new();
        let _ = symbols.insert("Count", 1);
        assert_eq!(symbols.get("count"), None);
        assert_eq!(symbols.get("Count"), Some(1));
    }

    #[test]
    fn iterates_in_definition_order() {
        let mut symbols = SymbolTable::new();
        let _ = symbols.insert("z", 0);
        let _ = symbols.insert("a", 1);
        let order: Vec<&str> = symbols.iter().map(|(label, _)| label).collect();
        assert_eq!(order, vec!["z", "a"]);
    }
}
