//! Component state as a shallow name → JSON value mapping.

use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct State(Map<String, Value>);

impl State {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Shallow merge; every entry of `partial` overwrites the existing one.
    pub fn merge(&mut self, partial: State) {
        for (name, value) in partial.0 {
            self.0.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Map<String, Value>> for State {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for State {
    type Error = Value;

    /// Only JSON objects convert; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_is_shallow_last_writer_wins() {
        let mut state = State::new().with("number", 0).with("label", "a");
        state.merge(State::new().with("number", 3).with("extra", true));
        assert_eq!(state.get_i64("number"), Some(3));
        assert_eq!(state.get_str("label"), Some("a"));
        assert_eq!(state.get_bool("extra"), Some(true));
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn only_objects_convert() {
        let state = State::try_from(json!({ "n": 1 })).unwrap();
        assert_eq!(state.get_i64("n"), Some(1));
        assert!(State::try_from(json!([1, 2])).is_err());
    }
}
