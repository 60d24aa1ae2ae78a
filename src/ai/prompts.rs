//! Prompts and message builders for the day recap.

use super::openai::Message;

/// System prompt that turns a list of log entries into a first-person recap.
pub const RECAP_SYSTEM_PROMPT: &str = "Generate a short summary in prose form, based on the list of log entries provided. \
This summary should adhere to the following criteria:

- Character Limit: The summary must strictly have less than 1000 characters.

- Language Use: The summary must be in first person and must use a simple language.

- Always include the exact dates, times and names mentioned.

- Content Focus: Concentrate mostly on non-routine activities, particularly emphasizing those \
entries marked with a '!'. These are the important events/activities of the day and should be \
featured prominently in the summary.

- Flow and Coherence: The summary should read as a coherent narrative, smoothly transitioning \
from one log to the next to create a full picture of the day.

- Start the summary with \"I...\" and without adding an introduction sentence.

- Do not exaggerate or sugarcoat the emotions or activities described in the logs, keep them \
closely tight to the original text.";

/// Builds the conversation asking for a recap of `logs` (one entry per line).
///
/// # Examples
///
/// ```
/// use bitacora::ai::recap_summary_prompt;
///
/// let messages = recap_summary_prompt("08:00 am Gym\n! 07:00 pm Dinner with Ana");
/// assert_eq!(messages.len(), 2);
/// assert!(messages[1].content.ends_with("Dinner with Ana"));
/// ```
pub fn recap_summary_prompt(logs: &str) -> Vec<Message> {
    vec![
        Message::system(RECAP_SYSTEM_PROMPT),
        Message::user(format!("Here are the log entries:\n\n{}", logs)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recap_prompt_roles() {
        let messages = recap_summary_prompt("a\nb");
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "Here are the log entries:\n\na\nb");
    }

    #[test]
    fn test_system_prompt_constraints() {
        assert!(RECAP_SYSTEM_PROMPT.contains("less than 1000 characters"));
        assert!(RECAP_SYSTEM_PROMPT.contains("first person"));
        assert!(RECAP_SYSTEM_PROMPT.contains("\"I...\""));
    }
}
