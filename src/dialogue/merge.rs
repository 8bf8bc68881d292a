//! Coalescing of adjacent same-speaker utterances.

use crate::dialogue::DialogueSegment;

/// Merge maximal runs of consecutive same-speaker segments.
///
/// A single left-to-right scan: while the next segment has the same speaker
/// as the open group, its text is appended (no separator beyond what the
/// source text already carries) and the group's `end` advances. A speaker
/// change closes the group. Merging already-merged output is a no-op.
pub fn merge(aligned: &[DialogueSegment]) -> Vec<DialogueSegment> {
    let mut merged: Vec<DialogueSegment> = Vec::new();

    for segment in aligned {
        match merged.last_mut() {
            Some(group) if group.speaker == segment.speaker => {
                group.text.push_str(&segment.text);
                group.end = segment.end;
            }
            _ => merged.push(segment.clone()),
        }
    }

    merged
}
