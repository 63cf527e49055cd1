//! Component properties with dirty tracking.
//!
//! A [`PropsObject`] keeps two ordered maps: the current values and the values
//! as of the last synchronization. Dirtiness is computed by walking the
//! current map only, so keys that linger in the synchronized map after being
//! dropped from current never make an instance dirty.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

/// Props shared between a memoized instance and the events bound to it.
pub type SharedProps = Rc<RefCell<PropsObject>>;

/// Advisory `(property, expected type name)` pairs. Stored and exposed, never
/// enforced.
pub type PropSchema = Vec<(String, String)>;

/// Ordered `key -> value` list. Props are small; linear lookup keeps source
/// order without another map type.
#[derive(Debug, Clone, Default, PartialEq)]
struct PropMap(Vec<(String, Value)>);

impl PropMap {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn insert(&mut self, key: &str, value: Value) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key.to_owned(), value)),
        }
    }
}

/// Current and last-synchronized property values of one component instance.
#[derive(Debug, Clone, Default)]
pub struct PropsObject {
    current: PropMap,
    synced: PropMap,
    schema: PropSchema,
}

impl PropsObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an advisory schema (builder).
    pub fn with_schema(mut self, schema: PropSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &[(String, String)] {
        &self.schema
    }

    /// Current value of `key`, or [`Value::Undefined`].
    pub fn get(&self, key: &str) -> Value {
        self.current.get(key).cloned().unwrap_or_default()
    }

    /// Write `value` to the current map. With `mark_dirty == false` the same
    /// value is also written to the synchronized map, so the write does not
    /// make the instance dirty.
    pub fn set(&mut self, key: &str, value: impl Into<Value>, mark_dirty: bool) {
        let value = value.into();
        if !mark_dirty {
            self.synced.insert(key, value.clone());
        }
        self.current.insert(key, value);
    }

    /// `set(key, value, true)`.
    pub fn set_dirty(&mut self, key: &str, value: impl Into<Value>) {
        self.set(key, value, true);
    }

    /// `set(key, value, false)`.
    pub fn set_clean(&mut self, key: &str, value: impl Into<Value>) {
        self.set(key, value, false);
    }

    /// Overlay every pair whose value is not `Undefined`. Undefined values and
    /// keys not mentioned are left untouched.
    pub fn merge<K, V, I>(&mut self, other: I)
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in other {
            let value = value.into();
            if !value.is_undefined() {
                self.current.insert(key.as_ref(), value);
            }
        }
    }

    /// True iff some current key is missing from the synchronized map or holds
    /// a different value there.
    pub fn check_is_dirty(&self) -> bool {
        self.current
            .0
            .iter()
            .any(|(key, value)| self.synced.get(key) != Some(value))
    }

    /// Copy every current value into the synchronized map. Extra synchronized
    /// keys are kept.
    pub fn sync_last_props(&mut self) {
        for (key, value) in &self.current.0 {
            self.synced.insert(key, value.clone());
        }
    }

    /// Current keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.current.0.iter().map(|(k, _)| k.as_str())
    }

    /// Current `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.current.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Owned copy of the current values.
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.current.0.clone()
    }

    pub fn len(&self) -> usize {
        self.current.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_missing_is_undefined() {
        let props = PropsObject::new();
        assert_eq!(props.get("nope"), Value::Undefined);
    }

    #[test]
    fn clean_set_is_not_dirty() {
        let mut props = PropsObject::new();
        props.set("name", "app", false);
        props.set_clean("count", 3);
        assert!(!props.check_is_dirty());
        assert_eq!(props.get("name"), Value::from("app"));
    }

    #[test]
    fn dirty_set_until_sync() {
        let mut props = PropsObject::new();
        props.set_clean("count", 1);
        props.set("count", 2, true);
        assert!(props.check_is_dirty());
        props.sync_last_props();
        assert!(!props.check_is_dirty());
    }

    #[test]
    fn new_key_is_dirty() {
        let mut props = PropsObject::new();
        props.set_dirty("fresh", true);
        assert!(props.check_is_dirty());
    }

    #[test]
    fn writing_same_value_back_is_clean() {
        let mut props = PropsObject::new();
        props.set_clean("n", 1);
        props.set_dirty("n", 2);
        props.set_dirty("n", 1);
        assert!(!props.check_is_dirty());
    }

    #[test]
    fn nan_is_always_dirty() {
        let mut props = PropsObject::new();
        props.set_clean("n", f64::NAN);
        assert!(props.check_is_dirty());
    }

    #[test]
    fn merge_skips_undefined() {
        let mut props = PropsObject::new();
        props.set_clean("a", "keep");
        props.merge([("a", Value::Undefined), ("b", Value::from(2))]);
        assert_eq!(props.get("a"), Value::from("keep"));
        assert_eq!(props.get("b"), Value::from(2));
        assert!(props.check_is_dirty());
    }

    #[test]
    fn merge_leaves_unmentioned_keys() {
        let mut props = PropsObject::new();
        props.set_clean("x", 1);
        props.merge(Vec::<(String, Value)>::new());
        assert_eq!(props.get("x"), Value::from(1));
    }

    #[test]
    fn stale_synced_keys_do_not_affect_dirtiness() {
        let mut props = PropsObject::new();
        props.set_clean("gone", 1);
        // Rebuild current without `gone`; synced still holds it.
        let mut fresh = PropsObject {
            synced: props.synced.clone(),
            ..PropsObject::new()
        };
        fresh.set_clean("other", 2);
        assert!(!fresh.check_is_dirty());
        fresh.sync_last_props();
        assert_eq!(fresh.synced.get("gone"), Some(&Value::from(1)));
    }

    #[test]
    fn keys_preserve_insertion_order() {
        let mut props = PropsObject::new();
        props.set_clean("b", 1);
        props.set_clean("a", 2);
        props.set_dirty("b", 3);
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(
            props.snapshot(),
            vec![("b".to_string(), Value::from(3)), ("a".to_string(), Value::from(2))]
        );
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn schema_is_advisory() {
        let mut props =
            PropsObject::new().with_schema(vec![("count".into(), "number".into())]);
        props.set_clean("count", "not a number");
        assert_eq!(props.schema().len(), 1);
        assert_eq!(props.get("count"), Value::from("not a number"));
    }
}
