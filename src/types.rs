/// Raw key bytes. Ordering is byte-wise lexicographic.
pub type Key = Vec<u8>;

/// Raw value bytes.
pub type Value = Vec<u8>;

/// An immutable key/value pair, the unit the table builder consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub key: Key,
    pub value: Value,
}

impl Item {
    pub fn new(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Item {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<Key>, V: Into<Value>> From<(K, V)> for Item {
    fn from((key, value): (K, V)) -> Self {
        Item::new(key, value)
    }
}
