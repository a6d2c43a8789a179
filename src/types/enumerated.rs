//! ENUMERATED (universal tag 10): INTEGER encoding constrained to a closed,
//! named set of values.

/// A bijective name/value table for one ENUMERATED or `enum:`-constrained
/// INTEGER declaration. Validated in both directions on assignment and on
/// decode (`spec.md` §4.2).
#[derive(Debug, Clone)]
pub struct EnumTable {
    entries: Vec<(String, i64)>,
}

impl EnumTable {
    pub fn new(entries: impl IntoIterator<Item = (impl Into<String>, i64)>) -> Self {
        Self {
            entries: entries.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }

    pub fn contains_value(&self, value: i64) -> bool {
        self.entries.iter().any(|(_, v)| *v == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_both_directions() {
        let table = EnumTable::new([("red", 0), ("green", 1), ("blue", 2)]);
        assert_eq!(table.value_of("green"), Some(1));
        assert_eq!(table.name_of(2), Some("blue"));
        assert!(table.contains_value(0));
        assert!(!table.contains_value(3));
    }
}
