//! Default texts and the model catalogue offered per provider

use crate::models::LlmProvider;

/// Greeting shown as the first transcript entry of a new session
pub const DEFAULT_GREETING: &str = "Hello there!";

/// Backend assumed when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// A selectable model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub label: &'static str,
    pub id: &'static str,
}

const HUGGINGFACE_MODELS: &[ModelOption] = &[
    ModelOption {
        label: "bloom-7b1",
        id: "bigscience/bloom-7b1",
    },
    ModelOption {
        label: "Llama-2-7b-chat-hf",
        id: "meta-llama/Llama-2-7b-chat-hf",
    },
    ModelOption {
        label: "Microsoft Phi2",
        id: "microsoft/phi-2",
    },
    ModelOption {
        label: "Mistral-7B-Instruct-v0.2",
        id: "mistralai/Mistral-7B-Instruct-v0.2",
    },
    ModelOption {
        label: "Mistral-7B-v0.1",
        id: "mistralai/Mistral-7B-v0.1",
    },
];

const VERTEX_AI_MODELS: &[ModelOption] = &[
    ModelOption {
        label: "Gemini Flash 001",
        id: "gemini-1.5-flash-001",
    },
    ModelOption {
        label: "Gemini Pro 001",
        id: "gemini-1.5-pro-001",
    },
    ModelOption {
        label: "Gemma 2",
        id: "gemma2-2b-it",
    },
    ModelOption {
        label: "Palm 2",
        id: "text-bison",
    },
];

/// Models available for a provider
pub fn models_for(provider: LlmProvider) -> &'static [ModelOption] {
    match provider {
        LlmProvider::VertexAi => VERTEX_AI_MODELS,
        LlmProvider::Huggingface => HUGGINGFACE_MODELS,
    }
}

/// Looks a model up by id or label (case-insensitive label match)
pub fn find_model(provider: LlmProvider, needle: &str) -> Option<&'static ModelOption> {
    let needle = needle.trim();
    models_for(provider)
        .iter()
        .find(|m| m.id == needle || m.label.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_models_by_id_and_label() {
        let by_id = find_model(LlmProvider::VertexAi, "gemma2-2b-it").unwrap();
        assert_eq!(by_id.label, "Gemma 2");
        let by_label = find_model(LlmProvider::Huggingface, "microsoft phi2").unwrap();
        assert_eq!(by_label.id, "microsoft/phi-2");
        assert!(find_model(LlmProvider::Huggingface, "gemma2-2b-it").is_none());
    }
}
