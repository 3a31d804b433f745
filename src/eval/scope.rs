use std::collections::HashMap;

/// Variable bindings visible to an expression, in first-definition order.
#[derive(Debug, Clone)]
pub struct Scope<V> {
    names: Vec<String>,
    values: HashMap<String, V>,
}

impl<V> Scope<V> {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            values: HashMap::new(),
        }
    }

    /// Bind `name`, replacing any earlier binding.
    pub fn bind(&mut self, name: &str, value: V) {
        if self.values.insert(name.to_string(), value).is_none() {
            self.names.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.names
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name.as_str(), v)))
    }
}

impl<V> Default for Scope<V> {
    fn default() -> Self {
        Self::new()
    }
}
