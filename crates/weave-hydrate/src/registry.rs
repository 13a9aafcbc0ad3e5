//! Consumer-owned component registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::live::LiveProps;

/// A presentation component.
///
/// Receives the element's props (children included) and its children
/// already rendered to HTML. Closures with the same signature implement this
/// trait.
pub trait Component: Send + Sync {
    fn render(&self, props: &LiveProps, children_html: &str) -> String;
}

impl<F> Component for F
where
    F: Fn(&LiveProps, &str) -> String + Send + Sync,
{
    fn render(&self, props: &LiveProps, children_html: &str) -> String {
        self(props, children_html)
    }
}

/// Closed map from component name to implementation.
///
/// Lookup is exact-string. A registered name also takes precedence over a
/// built-in tag of the same name.
#[derive(Clone, Default)]
pub struct Registry {
    components: HashMap<String, Arc<dyn Component>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, component: impl Component + 'static) {
        self.components.insert(name.into(), Arc::new(component));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, component: impl Component + 'static) -> Self {
        self.register(name, component);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Component>> {
        self.components.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("components", &self.names())
            .finish()
    }
}
