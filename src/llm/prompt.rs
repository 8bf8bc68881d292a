//! Prompt construction for summarization and action extraction.

/// Build the full recap prompt for a call transcript.
///
/// The section ordering (Goal, Key points, Actions/tasks, Summary) is a
/// contract: the Markdown export and downstream consumers rely on it.
pub fn summary_prompt(text: &str) -> String {
    format!(
        "You are an assistant for analyzing business calls.\n\
         \n\
         Analyze the following call transcript and produce a recap with\n\
         these sections, in Markdown, in exactly this order of headings:\n\
         - Goal\n\
         - Key points\n\
         - Actions/tasks\n\
         - Summary (2-3 sentences)\n\
         \n\
         Call transcript:\n\
         {text}"
    )
}

/// Build the action-extraction prompt for a call transcript.
///
/// The model is instructed to answer with strict JSON matching the
/// `ExtractedActions` shape parsed in [`crate::llm::actions`].
pub fn actions_prompt(text: &str) -> String {
    format!(
        "You are an assistant for extracting action items from a call\n\
         transcript.\n\
         \n\
         Example:\n\
         Transcript: 'Igor must prepare the work report by 22.08'\n\
         Answer:\n\
         {{\"actions\": [{{\"title\": \"Prepare the report\", \"deadline\": \"22.08\", \"responsible\": \"Igor\"}}]}}\n\
         \n\
         Rules:\n\
         - Answer with strict JSON only, no prose around it.\n\
         - Each action has \"title\" (required), and \"deadline\" (DD.MM if\n\
           known), \"responsible\", \"details\" when the transcript provides\n\
           them; omit or null otherwise.\n\
         \n\
         Extract the action items from this transcript:\n\
         {text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_embeds_text() {
        let prompt = summary_prompt("we discussed the release");
        assert!(prompt.contains("we discussed the release"));
    }

    #[test]
    fn test_summary_prompt_section_order() {
        let prompt = summary_prompt("x");
        let goal = prompt.find("Goal").unwrap();
        let key = prompt.find("Key points").unwrap();
        let actions = prompt.find("Actions/tasks").unwrap();
        let summary = prompt.find("Summary").unwrap();
        assert!(goal < key && key < actions && actions < summary);
    }

    #[test]
    fn test_actions_prompt_embeds_text() {
        let prompt = actions_prompt("Igor will do it");
        assert!(prompt.contains("Igor will do it"));
        assert!(prompt.contains("\"actions\""));
    }
}
