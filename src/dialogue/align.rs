//! Speaker assignment by maximum temporal overlap.

use crate::asr::diarizer::SpeakerSegment;
use crate::asr::transcriber::RecognitionSegment;
use crate::dialogue::DialogueSegment;

/// Assign a speaker to each recognition segment.
///
/// For every recognition segment the diarization interval with the largest
/// temporal overlap wins; ties go to the earlier-starting interval. An
/// interval with no positive overlap is still eligible when the gap between
/// the two intervals is within `tolerance` seconds. Recognition segments
/// with no eligible interval at all are dropped — no placeholder speaker is
/// emitted.
///
/// Both inputs are sorted by start time before scanning (stably, so ties
/// keep their input order); output preserves recognition order. The scan is
/// O(R·D), which is fine for minutes-long calls with segment counts in the
/// hundreds.
pub fn align(
    diarization: &[SpeakerSegment],
    recognition: &[RecognitionSegment],
    tolerance: f64,
) -> Vec<DialogueSegment> {
    let mut diarization: Vec<&SpeakerSegment> = diarization.iter().collect();
    diarization.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut recognition: Vec<&RecognitionSegment> = recognition.iter().collect();
    recognition.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut aligned = Vec::with_capacity(recognition.len());

    for rec in recognition {
        let mut best: Option<(&SpeakerSegment, f64)> = None;

        for dia in &diarization {
            let overlap = rec.end.min(dia.end) - rec.start.max(dia.start);
            let within_tolerance =
                rec.end >= dia.start - tolerance && rec.start <= dia.end + tolerance;
            if overlap <= 0.0 && !within_tolerance {
                continue;
            }
            // Strict > keeps the earliest-starting interval on overlap ties,
            // since candidates arrive in start order.
            match best {
                Some((_, best_overlap)) if overlap <= best_overlap => {}
                _ => best = Some((dia, overlap)),
            }
        }

        if let Some((dia, _)) = best {
            aligned.push(DialogueSegment {
                speaker: dia.speaker.clone(),
                text: rec.text.clone(),
                start: rec.start,
                end: rec.end,
            });
        }
    }

    aligned
}
