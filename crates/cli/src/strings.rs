// Centralized menu strings and labels.

pub const TITLE_MENU: &str = "=== OpenAI-compatible API client ===";
pub const TITLE_MODELS: &str = "=== Available models ===";
pub const TITLE_SELECT: &str = "=== Select model ===";
pub const TITLE_SIMPLE: &str = "=== Simple chat ===";
pub const TITLE_DETAILED: &str = "=== Detailed chat request ===";
pub const TITLE_INTERACTIVE: &str = "=== Interactive chat ===";

pub const RULE: &str = "--------------------------------";
pub const RULE_DOUBLE: &str = "================================";

pub const MENU_ITEMS: [&str; 6] = [
    "1. List available models",
    "2. Select/change model",
    "3. Simple chat",
    "4. Detailed chat request (customizable)",
    "5. Interactive chat",
    "6. Exit",
];

pub const PROMPT_CHOICE: &str = "Choose (1-6): ";
pub const PROMPT_MESSAGE: &str = "Enter a message: ";
pub const PROMPT_SYSTEM: &str = "System prompt (optional): ";
pub const PROMPT_USER: &str = "User message: ";
pub const PROMPT_MAX_TOKENS: &str = "Max tokens (default: 300): ";
pub const PROMPT_TEMPERATURE: &str = "Temperature (0.0-2.0, default: 0.7): ";
pub const PROMPT_SELECTION: &str = "Choose: ";
pub const PROMPT_MODEL_NAME: &str = "Enter a model name: ";
pub const PROMPT_MODEL_NAME_FALLBACK: &str =
    "Could not get the model list. Enter a model name manually: ";
pub const PROMPT_YOU: &str = "You: ";
pub const PROMPT_CONTINUE: &str = "Continue the conversation? (y/n) ";
pub const PRESS_ENTER: &str = "Press Enter to return to the menu...";

pub const MANUAL_ENTRY: &str = "0. Enter a model name manually";
pub const FETCHING_MODELS: &str = "Fetching model list...";
pub const NO_MODELS: &str = "No models available.";
pub const WAITING: &str = "Waiting for a response...";
pub const NO_MESSAGE: &str = "No message entered.";
pub const USER_MESSAGE_REQUIRED: &str = "A user message is required.";
pub const INVALID_CHOICE: &str = "Invalid choice. Please try again.";
pub const INVALID_SELECTION: &str = "Invalid selection.";
pub const NO_REPLY: &str = "Could not get a response.";
pub const CHAT_HELP: &str = "Type 'exit' to leave, 'clear' to clear the conversation history.";
pub const CHAT_CLEARED: &str = "Conversation history cleared.";
pub const CHAT_ENDED: &str = "Chat ended.";
pub const GOODBYE: &str = "Goodbye.";

pub fn current_model(model: &str) -> String {
    format!("Current model: {}", model)
}

pub fn model_set(model: &str) -> String {
    format!("Model set to '{}'.", model)
}

pub fn model_entry(id: &str, owned_by: &str) -> String {
    format!("- {} (owned by: {})", id, owned_by)
}

pub fn api_error(e: &dyn std::fmt::Display) -> String {
    format!("API request error: {}", e)
}

pub fn other_error(e: &dyn std::fmt::Display) -> String {
    format!("Error: {}", e)
}
