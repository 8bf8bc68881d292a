//! Markdown rendering of finished job results.

use crate::dialogue::DialogueSegment;
use crate::job::types::JobResult;
use crate::llm::ActionItem;

/// Render seconds as `MM:SS`, truncating sub-second precision.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Render a dialogue as a Markdown transcript, one line per turn.
pub fn dialogue_to_markdown(dialogue: &[DialogueSegment]) -> String {
    let mut out = String::new();
    for segment in dialogue {
        out.push_str(&format!(
            "**{}** [{} – {}]: {}\n",
            segment.speaker,
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            segment.text.trim()
        ));
    }
    out
}

fn actions_to_markdown(actions: &[ActionItem]) -> String {
    let mut out = String::new();
    for action in actions {
        out.push_str(&format!("- **{}**", action.title));
        if let Some(responsible) = &action.responsible {
            out.push_str(&format!(" — {responsible}"));
        }
        if let Some(deadline) = &action.deadline {
            out.push_str(&format!(" (due {deadline})"));
        }
        out.push('\n');
        if let Some(details) = &action.details {
            out.push_str(&format!("  {details}\n"));
        }
    }
    out
}

/// Render a whole job result as one Markdown document.
///
/// Sections for disabled features are omitted entirely rather than rendered
/// empty.
pub fn recap_to_markdown(result: &JobResult) -> String {
    let mut out = String::from("# Call Recap\n");

    if let Some(summary) = &result.summary {
        out.push_str(&format!("\n## Summary\n\n{}\n", summary.trim()));
    }

    if let Some(actions) = &result.actions {
        out.push_str("\n## Action Items\n\n");
        if actions.is_empty() {
            out.push_str("_None identified._\n");
        } else {
            out.push_str(&actions_to_markdown(actions));
        }
    }

    if let Some(dialogue) = &result.dialogue {
        out.push_str("\n## Dialogue\n\n");
        out.push_str(&dialogue_to_markdown(dialogue));
    }

    out
}
