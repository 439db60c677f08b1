use mer_rs::mer::prelude::*;
use pretty_assertions::assert_eq;

const HEADER: &str = "\
#MUSIC_FILE_PATH audio.ogg
#BODY
0 0 2 120.00
0 0 3 4 4
";

fn chart_of(body: &str) -> MerOutput {
    let source = format!("{HEADER}{body}");
    parse_mer(&source).expect("chart must load")
}

#[test]
fn chain_reconstruction_ignores_physical_line_order() {
    // The same chain 1 -> 2 -> 3(end) written in three different line orders. Only
    // lines at or after the hold start participate, so the start always comes first.
    const IN_ORDER: &str = "\
1 0 1 9 1 20 10 1 2
1 960 1 10 2 22 9 0 3
2 0 1 11 3 24 8 1
5 0 1 14
";
    const END_BEFORE_RELAY: &str = "\
1 0 1 9 1 20 10 1 2
2 0 1 11 3 24 8 1
1 960 1 10 2 22 9 0 3
5 0 1 14
";
    const INTERLEAVED: &str = "\
1 0 1 9 1 20 10 1 2
1 480 1 1 7 40 6
2 0 1 11 3 24 8 1
1 960 1 10 2 22 9 0 3
5 0 1 14
";

    let in_order = chart_of(IN_ORDER);
    let end_first = chart_of(END_BEFORE_RELAY);
    let interleaved = chart_of(INTERLEAVED);
    assert_eq!(in_order.warnings, vec![]);
    assert_eq!(end_first.warnings, vec![]);
    assert_eq!(interleaved.warnings, vec![]);

    assert_eq!(in_order.chart.hold_notes, end_first.chart.hold_notes);
    assert_eq!(in_order.chart.hold_notes, interleaved.chart.hold_notes);

    let chain = &in_order.chart.hold_notes[0];
    assert_eq!(chain.segments.len(), 3);
    assert!(chain.is_terminated());
    assert_eq!(
        chain
            .segments
            .iter()
            .map(|segment| segment.note_type)
            .collect::<Vec<_>>(),
        vec![NoteType::HoldStart, NoteType::HoldSegment, NoteType::HoldEnd],
    );
    // Segments come out in play order even when their lines were not.
    assert_eq!(
        chain
            .segments
            .iter()
            .map(|segment| segment.pos)
            .collect::<Vec<_>>(),
        vec![
            ChartPos::new(1, 0),
            ChartPos::new(1, 960),
            ChartPos::new(2, 0)
        ],
    );
}

#[test]
fn segments_live_only_inside_the_chain() {
    const BODY: &str = "\
1 0 1 9 1 20 10 1 2
1 960 1 10 2 22 9 0 3
2 0 1 11 3 24 8 1
5 0 1 14
";
    let MerOutput { chart, warnings } = chart_of(BODY);
    assert_eq!(warnings, vec![]);
    assert_eq!(chart.notes, vec![]);
    assert_eq!(chart.hold_notes.len(), 1);

    // The hidden relay keeps its render flag off.
    let relay = chart.hold_notes[0].segments[1];
    assert!(!relay.render);
    assert!(chart.hold_notes[0].segments[0].render);
}

#[test]
fn every_segment_gets_a_time() {
    const BODY: &str = "\
1 0 1 9 1 20 10 1 2
1 960 1 10 2 22 9 0 3
2 0 1 11 3 24 8 1
5 0 1 14
";
    let MerOutput { chart, .. } = chart_of(BODY);
    let times: Vec<f64> = chart.hold_notes[0]
        .segments
        .iter()
        .map(|segment| segment.time.expect("segment must be stamped"))
        .collect();
    // One 4/4 measure at 120 BPM takes 2000 ms.
    assert_eq!(times, vec![2000.0, 3000.0, 4000.0]);
}

#[test]
fn unterminated_chain_survives_with_warning() {
    const BODY: &str = "\
1 0 1 9 1 20 10 1 2
1 960 1 10 2 22 9 0 3
5 0 1 14
";
    let MerOutput { chart, warnings } = chart_of(BODY);
    assert_eq!(
        warnings,
        vec![MerWarning::Parse(ParseWarning::UnterminatedHold(
            ChartPos::new(1, 0)
        ))]
    );
    let chain = &chart.hold_notes[0];
    assert_eq!(chain.segments.len(), 2);
    assert!(!chain.is_terminated());
}

#[test]
fn two_chains_resolve_independently() {
    const BODY: &str = "\
1 0 1 9 1 20 10 1 2
1 480 1 25 4 40 6 1 5
1 960 1 10 2 22 9 0 3
2 0 1 11 3 24 8 1
2 0 1 11 5 44 5 1
5 0 1 14
";
    let MerOutput { chart, warnings } = chart_of(BODY);
    assert_eq!(warnings, vec![]);
    assert_eq!(chart.hold_notes.len(), 2);
    assert!(chart.hold_notes[0].is_terminated());
    assert!(chart.hold_notes[1].is_terminated());
    assert_eq!(chart.hold_notes[0].segments.len(), 3);
    assert_eq!(chart.hold_notes[1].segments.len(), 2);
    assert_eq!(
        chart.hold_notes[1].start().map(|note| note.bonus_type),
        Some(BonusType::RNote)
    );
}

#[test]
fn cyclic_references_yield_the_partial_chain() {
    // Segment 2 points back at itself. The chain stops where the cycle starts:
    // the relay appears exactly once, never duplicated.
    const BODY: &str = "\
1 0 1 9 1 20 10 1 2
1 960 1 10 2 22 9 0 2
5 0 1 14
";
    let MerOutput { chart, warnings } = chart_of(BODY);
    assert_eq!(
        warnings,
        vec![MerWarning::Parse(ParseWarning::UnterminatedHold(
            ChartPos::new(1, 0)
        ))]
    );
    let chain = &chart.hold_notes[0];
    assert!(!chain.is_terminated());
    assert_eq!(
        chain
            .segments
            .iter()
            .map(|segment| segment.pos)
            .collect::<Vec<_>>(),
        vec![ChartPos::new(1, 0), ChartPos::new(1, 960)],
    );
}

#[test]
fn mutually_referencing_relays_stay_strictly_increasing() {
    // Relays 2 and 5 point at each other. Each line joins the chain once; the
    // segment positions must stay strictly increasing.
    const BODY: &str = "\
1 0 1 9 1 20 10 1 2
1 480 1 10 2 22 9 0 5
1 960 1 10 5 24 8 0 2
5 0 1 14
";
    let MerOutput { chart, warnings } = chart_of(BODY);
    assert_eq!(
        warnings,
        vec![MerWarning::Parse(ParseWarning::UnterminatedHold(
            ChartPos::new(1, 0)
        ))]
    );
    let chain = &chart.hold_notes[0];
    assert_eq!(chain.segments.len(), 3);
    assert!(!chain.is_terminated());
    assert!(
        chain
            .segments
            .windows(2)
            .all(|pair| pair[0].pos < pair[1].pos),
        "segments must be strictly increasing: {:?}",
        chain.segments.iter().map(|segment| segment.pos).collect::<Vec<_>>(),
    );
}
