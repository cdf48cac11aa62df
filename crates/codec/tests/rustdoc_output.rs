use implidx_codec::{Handoff, ImplementorsFile, MergePolicy};

const DEBUG: &str = include_str!("fixtures/trait.Debug.js");
const SYNC: &str = include_str!("fixtures/trait.Sync.js");

#[test]
fn test_rustdoc_output_round_trips_byte_for_byte() {
    for src in [DEBUG, SYNC] {
        let (file, handoff) = ImplementorsFile::parse_with_handoff(src).unwrap();
        assert!(handoff.is_default());
        assert_eq!(file.render(&handoff).unwrap(), src);
    }
}

#[test]
fn test_debug_fixture_contents() {
    let file: ImplementorsFile = DEBUG.parse().unwrap();
    assert_eq!(file.crates().collect::<Vec<_>>(), vec!["pkmnapi_db"]);
    assert_eq!(file.len(), 5);
    let records = file.get("pkmnapi_db").unwrap();
    assert!(records.iter().all(|r| r.is_explicit()));
    assert_eq!(records[0].primary_type(), Some("pkmnapi_db::cry::channel::Channel"));
    assert_eq!(records[4].primary_type(), Some("pkmnapi_db::PkmnapiDB"));
    assert!(records.iter().all(|r| r.crate_name() == Some("pkmnapi_db")));
}

#[test]
fn test_sync_fixture_is_synthetic() {
    let file: ImplementorsFile = SYNC.parse().unwrap();
    let records = file.get("pkmnapi_sql").unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.synthetic));
    assert_eq!(records[3].primary_type(), Some("pkmnapi_sql::PkmnapiSQL"));
}

#[test]
fn test_merging_two_crates_of_one_trait() {
    let mut db: ImplementorsFile = DEBUG.parse().unwrap();
    // Pretend `pkmnapi_sql` documented a Debug impl list as well.
    let sql: ImplementorsFile = SYNC.parse().unwrap();
    db.merge(sql, MergePolicy::Strict).unwrap();
    assert_eq!(db.crates().collect::<Vec<_>>(), vec!["pkmnapi_db", "pkmnapi_sql"]);
    assert_eq!(db.len(), 9);

    let rendered = db.render(&Handoff::default()).unwrap();
    assert_eq!(rendered.lines().count(), 4);
    assert_eq!(ImplementorsFile::parse(&rendered).unwrap(), db);
}
