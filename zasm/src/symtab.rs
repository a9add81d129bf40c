use std::collections::HashMap;

/// Symbol table: upper-case names of at most eight characters, mapped to
/// their values. Values live in the evaluator's 32-bit domain and are
/// narrowed to 16 bits where an address is needed.
#[derive(Debug, Default)]
pub struct SymTab {
    map: HashMap<String, i32>,
}

impl SymTab {
    pub fn new() -> SymTab {
        SymTab::default()
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.map.get(name).copied()
    }

    /// Insert or overwrite; definition policy (`EQU` once, `DEFL` freely)
    /// is the caller's business.
    pub fn insert(&mut self, name: &str, val: i32) {
        self.map.insert(name.to_string(), val);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Flat copy of all entries, for the sorted listing appendix.
    pub fn entries(&self) -> Vec<(String, i32)> {
        self.map
            .iter()
            .map(|(name, &val)| (name.clone(), val))
            .collect()
    }
}

/// Sort entries by symbol name.
pub fn sort_by_name(entries: &mut [(String, i32)]) {
    entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
}

/// Sort entries by address, comparing values narrowed to 16 bits.
pub fn sort_by_addr(entries: &mut [(String, i32)]) {
    entries.sort_unstable_by_key(|e| (e.1 & 0xffff) as u16);
}
