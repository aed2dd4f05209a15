use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::chord::{ChordDictionary, ChordShape};
use crate::cursor::FretCursor;
use crate::output::FretPosition;

fn standard() -> Tuning {
    Tuning::preset("standard").unwrap()
}

fn note(id: u64, pitch: u8, start: f64, end: f64) -> NoteInterval {
    NoteInterval::new(id, pitch, start, end).unwrap()
}

fn timeline(notes: Vec<NoteInterval>) -> NoteTimeline {
    NoteTimeline::new(notes).unwrap()
}

fn pos(string: usize, fret: u8) -> Option<FretPosition> {
    Some(FretPosition { string, fret })
}

fn dictionary(shapes: &[(&str, Vec<Option<u8>>)]) -> Arc<ChordDictionary> {
    let tuning = standard();
    let mut dict = ChordDictionary::new();
    for (name, pattern) in shapes {
        let shape = ChordShape::new(*name, "standard", pattern.clone(), None, &tuning).unwrap();
        dict.insert(shape).unwrap();
    }
    Arc::new(dict)
}

fn chord_resolver(dict: Arc<ChordDictionary>) -> ChordAwareResolver {
    ChordAwareResolver::new(standard(), "standard", dict, ChordTolerance::default())
}

#[test]
fn test_greedy_prefers_rest_position() {
    let mut r = GreedyResolver::new(standard());
    // 59 is fret 19 on E, 14 on A, 9 on D, 4 on G, 0 on B
    assert_eq!(r.resolve_next(&note(1, 59, 0.0, 1.0)), Outcome::Fretted(FretPosition { string: 4, fret: 0 }));
}

#[test]
fn test_greedy_follows_hand_position() {
    let mut r = GreedyResolver::new(standard());
    let res = r.resolve_all(&timeline(vec![
        note(1, 52, 0.0, 1.0),
        note(2, 45, 1.0, 2.0),
        note(3, 52, 2.0, 3.0),
    ]));
    assert_eq!(res.position_for(NoteId(1)), pos(2, 2));
    // Open A: string 1 unused (distance 0) beats string 0 fret 5
    assert_eq!(res.position_for(NoteId(2)), pos(1, 0));
    // Back to D fret 2: distance 0 from its last fret
    assert_eq!(res.position_for(NoteId(3)), pos(2, 2));
}

#[test]
fn test_greedy_previous_string_tie_break() {
    // Two identical strings: distance ties everywhere
    let tuning = Tuning::new(vec![50, 50], 12).unwrap();
    let mut r = GreedyResolver::new(tuning);
    let res = r.resolve_all(&timeline(vec![
        note(1, 52, 0.0, 1.0), // both at distance 2, lowest index wins
        note(2, 54, 1.0, 2.0), // string 0: |4-2| = 2, string 1: |4-0| = 4
        note(3, 50, 2.0, 3.0), // string 0: 4, string 1: 0
        note(4, 52, 3.0, 4.0), // string 0: |2-4| = 2, string 1: |2-0| = 2, previous is 1
    ]));
    assert_eq!(res.position_for(NoteId(1)), pos(0, 2));
    assert_eq!(res.position_for(NoteId(2)), pos(0, 4));
    assert_eq!(res.position_for(NoteId(3)), pos(1, 0));
    assert_eq!(res.position_for(NoteId(4)), pos(1, 2));
}

#[test]
fn test_greedy_conflict_vs_unplayable() {
    let tuning = Tuning::new(vec![40], 5).unwrap();
    let mut r = GreedyResolver::new(tuning);
    assert_eq!(r.resolve_next(&note(1, 42, 0.0, 2.0)), Outcome::Fretted(FretPosition { string: 0, fret: 2 }));
    assert_eq!(r.resolve_next(&note(2, 43, 1.0, 3.0)), Outcome::Conflict);
    assert_eq!(r.resolve_next(&note(3, 60, 1.0, 3.0)), Outcome::Unplayable);
    // String is free again once the first note ends
    assert_eq!(r.resolve_next(&note(4, 43, 2.0, 3.0)), Outcome::Fretted(FretPosition { string: 0, fret: 3 }));
}

#[test]
fn test_greedy_never_reuses_sounding_string() {
    let mut r = GreedyResolver::new(standard());
    // Six held Es: five strings reach 64, the sixth note finds none free
    let notes: Vec<_> = (0..6).map(|i| note(i, 64, 0.0, 4.0)).collect();
    let res = r.resolve_all(&timeline(notes));
    let mut strings: Vec<usize> = res.positions().values().map(|p| p.string).collect();
    strings.sort_unstable();
    strings.dedup();
    assert_eq!(res.fretted_count(), 5);
    assert_eq!(strings, vec![1, 2, 3, 4, 5]);
    assert_eq!(res.outcome(NoteId(5)), Some(Outcome::Conflict));
}

#[test]
fn test_chord_group_length() {
    let r = chord_resolver(Arc::new(ChordDictionary::new()));
    let notes = timeline(vec![
        note(1, 40, 0.0, 1.0),
        note(2, 45, 0.01, 1.0),
        note(3, 52, 0.02, 1.0),
        note(4, 55, 0.5, 1.0), // outside the 30ms window
    ]);
    assert_eq!(r.next_group_len(notes.notes()), 3);
    assert_eq!(r.next_group_len(&notes.notes()[3..]), 1);
    assert_eq!(r.next_group_len(&[]), 0);

    // A note that ended before the next onset breaks the group
    let staccato = timeline(vec![note(1, 40, 0.0, 0.005), note(2, 45, 0.01, 1.0)]);
    assert_eq!(r.next_group_len(staccato.notes()), 1);
}

#[test]
fn test_group_member_cannot_take_string_still_sounding_at_onset() {
    // The low E rings until 1.01; the group starting at 1.0 is placed at once,
    // so the F (only playable on string 0) finds that string busy.
    let notes = timeline(vec![
        note(1, 40, 0.0, 1.01),
        note(2, 45, 1.0, 2.0),
        note(3, 41, 1.02, 2.0),
    ]);
    let r = chord_resolver(Arc::new(ChordDictionary::new()));
    assert_eq!(r.next_group_len(&notes.notes()[1..]), 2);

    let mut cursor = FretCursor::new(r, notes.clone());
    cursor.advance(0.5);
    cursor.advance(1.0);
    let active: Vec<(NoteId, usize)> = cursor
        .active_positions()
        .iter()
        .map(|a| (a.note_id, a.string_index))
        .collect();
    assert_eq!(active, vec![(NoteId(1), 0), (NoteId(2), 1)]);
    assert_eq!(cursor.resolution().outcome(NoteId(3)), Some(Outcome::Conflict));

    let batch = chord_resolver(Arc::new(ChordDictionary::new())).resolve_all(&notes);
    assert_eq!(&batch, cursor.resolution());
}

#[test]
fn test_chord_shape_blocked_until_group_onset_is_free() {
    let dict = dictionary(&[("A5", vec![None, Some(0), Some(2), Some(2), None, None])]);
    let mut r = chord_resolver(dict);
    let res = r.resolve_all(&timeline(vec![
        // Open D rings just past the chord's first onset
        note(1, 50, 0.0, 1.01),
        note(2, 45, 1.0, 2.0),
        note(3, 52, 1.02, 2.0),
        note(4, 57, 1.02, 2.0),
    ]));
    assert_eq!(res.position_for(NoteId(1)), pos(2, 0));
    // Shape needs string 2 at 1.0, so every member goes through the greedy path
    assert_eq!(res.position_for(NoteId(2)), pos(1, 0));
    assert_eq!(res.position_for(NoteId(3)), pos(0, 12));
    assert_eq!(res.position_for(NoteId(4)), pos(3, 2));
}

#[test]
fn test_chord_tolerance_in_beats() {
    let dict = Arc::new(ChordDictionary::new());
    let r = ChordAwareResolver::new(
        standard(),
        "standard",
        dict,
        ChordTolerance::Beats { beats: 0.25, bpm: 60.0 },
    );
    let notes = timeline(vec![note(1, 40, 0.0, 2.0), note(2, 45, 0.2, 2.0), note(3, 50, 0.3, 2.0)]);
    assert_eq!(r.next_group_len(notes.notes()), 2);
}

#[test]
fn test_chord_shape_overrides_greedy() {
    // A major barre at the fifth fret: greedy alone would use open strings
    let dict = dictionary(&[(
        "A barre",
        vec![Some(5), Some(7), Some(7), Some(6), Some(5), Some(5)],
    )]);
    let mut r = chord_resolver(dict);
    let pitches = [45, 52, 57, 61, 64, 69];
    let notes: Vec<_> = pitches
        .iter()
        .enumerate()
        .map(|(i, &p)| note(i as u64, p, 0.0, 1.0))
        .collect();
    let res = r.resolve_all(&timeline(notes));

    let frets: Vec<Option<FretPosition>> = (0..6).map(|i| res.position_for(NoteId(i))).collect();
    assert_eq!(
        frets,
        vec![pos(0, 5), pos(1, 7), pos(2, 7), pos(3, 6), pos(4, 5), pos(5, 5)]
    );
}

#[test]
fn test_chord_falls_back_without_match() {
    let dict = dictionary(&[("Em", vec![Some(0), Some(2), Some(2), Some(0), Some(0), Some(0)])]);
    let mut with_dict = chord_resolver(dict);
    let mut greedy = GreedyResolver::new(standard());

    // Only part of Em: no exact match, identical to greedy
    let notes = timeline(vec![note(1, 40, 0.0, 1.0), note(2, 47, 0.0, 1.0), note(3, 52, 0.0, 1.0)]);
    assert_eq!(with_dict.resolve_all(&notes), greedy.resolve_all(&notes));
}

#[test]
fn test_chord_falls_back_when_string_busy() {
    let dict = dictionary(&[("A5", vec![None, Some(0), Some(2), Some(2), None, None])]);
    let mut r = chord_resolver(dict);
    let res = r.resolve_all(&timeline(vec![
        // Held open D string blocks the shape's third string
        note(1, 50, 0.0, 4.0),
        note(2, 45, 1.0, 2.0),
        note(3, 52, 1.0, 2.0),
        note(4, 57, 1.0, 2.0),
    ]));
    assert_eq!(res.position_for(NoteId(1)), pos(2, 0));
    assert_eq!(res.position_for(NoteId(2)), pos(1, 0));
    assert_eq!(res.position_for(NoteId(3)), pos(0, 12));
    assert_eq!(res.position_for(NoteId(4)), pos(3, 2));
}

#[test]
fn test_chord_with_unison_pitches() {
    // Open E on string 5 and fret 5 on string 4 sound the same pitch
    let dict = dictionary(&[("unison", vec![None, None, None, None, Some(5), Some(0)])]);
    let mut r = chord_resolver(dict);
    let res = r.resolve_all(&timeline(vec![note(1, 64, 0.0, 1.0), note(2, 64, 0.0, 1.0)]));
    assert_eq!(res.position_for(NoteId(1)), pos(4, 5));
    assert_eq!(res.position_for(NoteId(2)), pos(5, 0));
}

#[test]
fn test_chord_strings_release_per_note() {
    let dict = dictionary(&[("fifth", vec![Some(0), None, Some(2), None, None, None])]);
    let mut r = chord_resolver(dict);
    r.resolve_group(&[note(1, 40, 0.0, 1.0), note(2, 52, 0.0, 3.0)]);
    // Low string frees at 1.0 while the other is still sounding
    let released = r.release_expired(1.0);
    assert_eq!(released, vec![NoteId(1)]);
    assert!(r.occupancy().is_free(0, 1.0));
    assert!(!r.occupancy().is_free(2, 1.0));
}

#[test]
fn test_boxed_fretter_matches_concrete() {
    let notes = timeline(vec![note(1, 45, 0.0, 1.0), note(2, 57, 0.0, 1.0), note(3, 30, 0.0, 1.0)]);
    let mut boxed: Box<dyn Fretter> = Box::new(GreedyResolver::new(standard()));
    let mut concrete = GreedyResolver::new(standard());
    assert_eq!(boxed.resolve_all(&notes), concrete.resolve_all(&notes));
    assert_eq!(boxed.tuning().string_count(), 6);
}
