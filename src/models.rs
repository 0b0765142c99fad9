/// A selectable model: the id Ollama knows it by, plus a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEntry {
    pub id: &'static str,
    pub name: &'static str,
}

/// Models offered in the selector. Extend this list to match
/// whatever is pulled into the local Ollama install.
pub const AVAILABLE_MODELS: &[ModelEntry] = &[
    ModelEntry { id: "llama3.2", name: "Llama 3.2 (3B)" },
    ModelEntry { id: "gemma3:1b", name: "Gemma 3 (1B)" },
    ModelEntry { id: "qwen3:8b", name: "Qwen 3 (8B)" },
    ModelEntry { id: "llama3.2:1b", name: "Llama 3.2 (1B)" },
];

/// Look up a catalog entry by model id.
pub fn find(id: &str) -> Option<&'static ModelEntry> {
    AVAILABLE_MODELS.iter().find(|m| m.id == id)
}

/// Id used when the config names no model (or names an unknown one).
pub fn default_model_id() -> &'static str {
    AVAILABLE_MODELS[0].id
}

/// Position of a model id in the catalog, for selector highlighting.
pub fn position(id: &str) -> Option<usize> {
    AVAILABLE_MODELS.iter().position(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_known_and_unknown() {
        assert_eq!(find("llama3.2").map(|m| m.name), Some("Llama 3.2 (3B)"));
        assert!(find("gpt-4o").is_none());
    }

    #[test]
    fn default_is_in_catalog() {
        assert!(find(default_model_id()).is_some());
        assert_eq!(position(default_model_id()), Some(0));
    }
}
