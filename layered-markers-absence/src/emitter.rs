//! Synthetic hits for gated windows.

use layered_markers::{Hit, BOTH_SPEAKERS, WINDOW_SPEAKER};

use crate::absence_set::ResolvedAbsenceSets;
use crate::config::GatingConfig;
use crate::window::WindowSlice;

/// Marker placed on every window whose gate opened.
pub const CONFLICT_CONTEXT: &str = "CONFLICT_CONTEXT";

/// `MEMA_ABSENCE_OF_<CATEGORY>_IN_CONFLICT`
pub fn window_absence_marker(category: &str) -> String {
    format!("MEMA_ABSENCE_OF_{}_IN_CONFLICT", category.to_uppercase())
}

/// `MEMA_SPKR_ABSENCE_OF_<CATEGORY>_IN_CONFLICT`
pub fn speaker_absence_marker(category: &str) -> String {
    format!("MEMA_SPKR_ABSENCE_OF_{}_IN_CONFLICT", category.to_uppercase())
}

/// Speakers with at least `min_messages` messages in the window, in order of
/// first appearance.
///
/// Speakers are taken from the window's messages, not from its hits. A
/// speaker who wrote enough messages but produced no hits is still judged,
/// and every category is absent for them.
pub fn qualifying_speakers<'a>(slice: &WindowSlice<'a>, min_messages: usize) -> Vec<&'a str> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for message in slice.messages {
        match counts.iter_mut().find(|(speaker, _)| *speaker == message.speaker) {
            Some((_, count)) => *count += 1,
            None => counts.push((message.speaker.as_str(), 1)),
        }
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count >= min_messages)
        .map(|(speaker, _)| speaker)
        .collect()
}

/// Synthetic hits for a window whose gate is open.
///
/// Order: `CONFLICT_CONTEXT`, then one `BOTH` hit per passing category, then
/// per qualifying speaker one hit per passing category. Everything sits at
/// the window's last message index.
pub fn emit_for_window(
    slice: &WindowSlice<'_>,
    sets: &ResolvedAbsenceSets,
    gating: &GatingConfig,
) -> Vec<Hit> {
    let at = slice.window.last_index();
    let mut out = vec![Hit::new(at, WINDOW_SPEAKER, CONFLICT_CONTEXT)];

    if gating.per_window {
        let window_markers = || slice.hits.iter().map(|hit| hit.marker_id.as_str());
        for set in sets.iter() {
            if gating.policy.passes(set.count_present(window_markers())) {
                out.push(Hit::new(at, BOTH_SPEAKERS, window_absence_marker(&set.name)));
            }
        }
    }

    if gating.per_speaker {
        for speaker in qualifying_speakers(slice, gating.min_participation_msgs) {
            let speaker_markers = || {
                slice
                    .hits
                    .iter()
                    .filter(move |hit| hit.speaker == speaker)
                    .map(|hit| hit.marker_id.as_str())
            };
            for set in sets.iter() {
                if gating.policy.passes(set.count_present(speaker_markers())) {
                    out.push(Hit::new(at, speaker, speaker_absence_marker(&set.name)));
                }
            }
        }
    }

    out
}
