use super::*;

#[yare::parameterized(
    nanos = { "500ns", Duration::from_nanos(500) },
    micros = { "250us", Duration::from_micros(250) },
    millis = { "500ms", Duration::from_millis(500) },
    seconds = { "5s", Duration::from_secs(5) },
    minutes = { "2m", Duration::from_secs(120) },
    hours = { "1h", Duration::from_secs(3600) },
)]
fn parses_common_suffixes(raw: &str, expected: Duration) {
    assert_eq!(parse_duration(raw).unwrap(), expected);
}

#[test]
fn rejects_garbage() {
    assert!(parse_duration("banana").is_err());
}

#[test]
fn human_duration_roundtrips_through_yaml() {
    let d: HumanDuration = serde_yaml::from_str("\"500ms\"").unwrap();
    assert_eq!(d.as_duration(), Duration::from_millis(500));
}
