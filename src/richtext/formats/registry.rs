//! Renderer lookup by name

use super::json::{JsonRenderer, TokensRenderer};
use super::treeviz::{AstTreevizRenderer, TreevizRenderer};
use super::{FormatError, Renderer};
use crate::richtext::pipeline::Document;
use std::collections::HashMap;

/// Registry of renderers, keyed by [`Renderer::name`].
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let output = registry.render(&document, "treeviz")?;
/// ```
pub struct FormatRegistry {
    renderers: HashMap<String, Box<dyn Renderer>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            renderers: HashMap::new(),
        }
    }

    /// Registry with every built-in renderer, treeviz without offsets.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TreevizRenderer::default());
        registry.register(AstTreevizRenderer::default());
        registry.register(JsonRenderer);
        registry.register(TokensRenderer);
        registry
    }

    /// Registers `renderer`, replacing any renderer with the same name.
    pub fn register<R: Renderer + 'static>(&mut self, renderer: R) {
        self.renderers
            .insert(renderer.name().to_string(), Box::new(renderer));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Renderer, FormatError> {
        self.renderers
            .get(name)
            .map(|renderer| renderer.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.renderers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name and description of every renderer, sorted by name.
    pub fn describe(&self) -> Vec<(String, String)> {
        self.list_formats()
            .into_iter()
            .map(|name| {
                let description = self.renderers[&name].description().to_string();
                (name, description)
            })
            .collect()
    }

    pub fn render(&self, document: &Document, format: &str) -> Result<String, FormatError> {
        self.get(format)?.render(document)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::pipeline::{process, ProcessOptions};

    struct Shouting;

    impl Renderer for Shouting {
        fn name(&self) -> &str {
            "shout"
        }

        fn render(&self, document: &Document) -> Result<String, FormatError> {
            Ok(document.plain_text().to_uppercase())
        }
    }

    #[test]
    fn test_defaults_are_registered() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.list_formats(),
            vec!["ast", "json", "tokens", "treeviz"]
        );
        assert!(registry.has("treeviz"));
        assert!(!registry.has("html"));
    }

    #[test]
    fn test_unknown_format() {
        let registry = FormatRegistry::new();
        match registry.get("treeviz") {
            Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "treeviz"),
            _ => panic!("expected FormatNotFound"),
        }
    }

    #[test]
    fn test_custom_renderer() {
        let mut registry = FormatRegistry::new();
        registry.register(Shouting);
        let document = process(b"<Bold>hi</Bold> there", &ProcessOptions::default(), None)
            .unwrap();
        assert_eq!(registry.render(&document, "shout").unwrap(), "HI THERE");
        assert_eq!(
            registry.describe(),
            vec![("shout".to_string(), String::new())]
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(TreevizRenderer::with_offsets());
        assert_eq!(registry.list_formats().len(), 4);
    }
}
