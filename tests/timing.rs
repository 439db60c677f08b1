use mer_rs::mer::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn stamps_through_tempo_changes() {
    const SRC: &str = "\
#MUSIC_FILE_PATH audio.ogg
#BODY
0 0 2 120.00
0 0 3 4 4
1 0 1 1 1 0 10
2 0 2 240.00
2 0 3 3 4
3 0 1 1 2 20 10
4 0 1 14
";
    let MerOutput { chart, warnings } = parse_mer(SRC).expect("chart must load");
    assert_eq!(warnings, vec![]);

    let map = chart.tempo_map.as_ref().expect("tempo map must exist");
    // The simultaneous BPM and time signature change collapses into one entry.
    assert_eq!(map.entries().len(), 2);
    assert_eq!(map.entries()[0].time, 0.0);
    assert_eq!(map.entries()[1].time, 4000.0);

    // 4/4 at 120 BPM is 2000 ms per measure; 3/4 at 240 BPM is 750 ms.
    assert_eq!(chart.notes[0].time, Some(2000.0));
    assert_eq!(chart.notes[1].time, Some(4750.0));
    assert_eq!(
        chart.end_of_chart.and_then(|end| end.time),
        Some(4000.0 + 2.0 * 750.0)
    );
}

#[test]
fn times_are_monotonic_over_positions() {
    const SRC: &str = "\
#MUSIC_FILE_PATH audio.ogg
#BODY
0 0 2 90.00
0 0 3 7 8
1 0 1 1 1 0 10
1 640 1 1 2 10 10
2 320 2 180.00
2 960 1 1 3 20 10
3 0 3 4 4
3 1440 1 1 4 30 10
4 0 1 1 5 40 10
5 0 1 14
";
    let MerOutput { chart, warnings } = parse_mer(SRC).expect("chart must load");
    assert_eq!(warnings, vec![]);

    let times: Vec<f64> = chart
        .notes
        .iter()
        .map(|note| note.time.expect("note must be stamped"))
        .collect();
    assert!(
        times.windows(2).all(|pair| pair[0] <= pair[1]),
        "times must not decrease: {times:?}"
    );
}

#[test]
fn resolution_is_deterministic() {
    const SRC: &str = "\
#MUSIC_FILE_PATH audio.ogg
#BODY
0 0 2 173.00
0 0 3 7 8
1 960 2 86.50
2 0 3 4 4
1 0 1 1 1 0 10
1 480 1 9 2 20 10 1 3
2 0 1 11 3 22 9 1
2 960 1 16 4 40 6
3 0 5 1.50
4 0 1 14
";
    let first = parse_mer(SRC).expect("chart must load");
    let second = parse_mer(SRC).expect("chart must load");
    // Bit-identical, including every stamped f64.
    assert_eq!(first, second);
}

#[test]
fn objects_before_the_first_entry_extrapolate_backwards() {
    // The first tempo data sits at measure 1, but objects exist before it. They
    // extrapolate backwards from entry 0 and may come out negative.
    const SRC: &str = "\
#MUSIC_FILE_PATH audio.ogg
#BODY
1 0 2 120.00
1 0 3 4 4
0 0 1 1 1 0 10
2 0 1 14
";
    let MerOutput { chart, warnings } = parse_mer(SRC).expect("chart must load");
    assert_eq!(warnings, vec![]);
    assert_eq!(chart.notes[0].time, Some(-2000.0));
}

#[test]
fn chart_without_tempo_data_keeps_times_unset() {
    const SRC: &str = "\
#MUSIC_FILE_PATH audio.ogg
#BODY
0 0 2 120.00
1 0 1 1 1 0 10
2 0 1 14
";
    let MerOutput { chart, warnings } = parse_mer(SRC).expect("chart must load");
    assert_eq!(
        warnings,
        vec![MerWarning::Timing(TimingError::MissingTempoData)]
    );
    assert_eq!(chart.tempo_map, None);
    assert_eq!(chart.notes[0].time, None);
    assert_eq!(chart.end_of_chart.and_then(|end| end.time), None);
}

#[test]
fn hi_speed_and_stop_gimmicks_are_stamped() {
    const SRC: &str = "\
#MUSIC_FILE_PATH audio.ogg
#BODY
0 0 2 120.00
0 0 3 4 4
1 0 5 0.50
2 0 9
2 960 10
3 0 1 14
";
    let MerOutput { chart, warnings } = parse_mer(SRC).expect("chart must load");
    assert_eq!(warnings, vec![]);
    assert_eq!(chart.hi_speed_gimmicks[0].time, Some(2000.0));
    assert_eq!(chart.stop_gimmicks[0].time, Some(4000.0));
    assert_eq!(chart.stop_gimmicks[1].time, Some(5000.0));
}
