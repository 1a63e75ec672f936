//! Integration tests for the SQLite store: same contract as the in-memory store, plus durability.

mod common;

use common::FailingStore;
use swiss_tournament_web::{
    create_tournament, delete_matches, import_players_csv, pair_for_next_round, record_bye,
    record_match, register_player, standings, ErrorKind, MatchLedger, PlayerId, ScoreDelta,
    Scorecard, ScorecardStore, SqliteStore, StoreSession, TournamentError, TournamentId,
    TournamentStore,
};

fn tournament_with_players(n: usize) -> (SqliteStore, TournamentId, Vec<PlayerId>) {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let t = create_tournament(&mut store, "Test").unwrap().id;
    let ids = (0..n)
        .map(|i| register_player(&mut store, t, &format!("P{i}")).unwrap().id)
        .collect();
    (store, t, ids)
}

#[test]
fn new_players_have_empty_standings() {
    let (store, t, ids) = tournament_with_players(2);
    let table = standings(&store, t).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].player_id, ids[0]);
    assert_eq!(table[1].name, "P1");
    assert!(table.iter().all(|e| e.score == 0 && e.played == 0 && e.bye_count == 0));
    assert_eq!(store.count_players(t).unwrap(), 2);
}

#[test]
fn outcomes_update_scorecards_and_ledger() {
    let (mut store, t, ids) = tournament_with_players(5);
    record_match(&mut store, t, ids[0], ids[1], false).unwrap();
    record_match(&mut store, t, ids[2], ids[3], true).unwrap();
    record_bye(&mut store, t, ids[4]).unwrap();

    let table = standings(&store, t).unwrap();
    let summary: Vec<_> = table
        .iter()
        .map(|e| (e.player_id, e.score, e.played, e.bye_count))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ids[0], 3, 1, 0),
            (ids[4], 3, 0, 1),
            (ids[2], 1, 1, 0),
            (ids[3], 1, 1, 0),
            (ids[1], 0, 1, 0),
        ]
    );

    assert!(store.have_played(t, ids[1], ids[0]).unwrap());
    assert!(store.have_played(t, ids[3], ids[2]).unwrap());
    assert!(!store.have_played(t, ids[0], ids[2]).unwrap());

    let records = store.matches(t).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!((records[0].winner, records[0].loser, records[0].is_draw), (ids[0], ids[1], false));
    assert!(records[1].is_draw);
}

#[test]
fn odd_round_on_sqlite() {
    let (mut store, t, ids) = tournament_with_players(5);
    record_match(&mut store, t, ids[0], ids[1], false).unwrap();
    record_match(&mut store, t, ids[2], ids[3], false).unwrap();

    let round = pair_for_next_round(&mut store, t).unwrap();
    assert_eq!(round.bye.unwrap().player_id, ids[4]);
    let pairs: Vec<_> = round
        .pairings
        .iter()
        .map(|p| (p.player1_id, p.player2_id))
        .collect();
    assert_eq!(pairs, vec![(ids[0], ids[2]), (ids[1], ids[3])]);
    assert_eq!(store.scorecard(t, ids[4]).unwrap().unwrap().bye_count, 1);
}

#[test]
fn dropped_session_rolls_back() {
    let (mut store, t, ids) = tournament_with_players(1);
    {
        let mut session = store.begin().unwrap();
        session.add_to_scorecard(t, ids[0], ScoreDelta::BYE).unwrap();
        assert_eq!(session.scorecard(t, ids[0]).unwrap().unwrap().score, 3);
    }
    assert_eq!(store.scorecard(t, ids[0]).unwrap().unwrap().score, 0);
}

#[test]
fn failed_loser_update_rolls_back_the_transaction() {
    let (inner, t, ids) = tournament_with_players(2);
    let mut store = FailingStore {
        inner,
        fail_for: ids[1],
    };

    // The match insert and the winner update already ran inside the transaction.
    let err = record_match(&mut store, t, ids[0], ids[1], false).unwrap_err();
    assert!(matches!(err, TournamentError::InvalidInput(_)));
    assert_ne!(err.kind(), ErrorKind::IntegrityViolation);

    assert!(store.matches(t).unwrap().is_empty());
    assert!(!store.have_played(t, ids[0], ids[1]).unwrap());
    for &id in &ids {
        assert_eq!(store.scorecard(t, id).unwrap().unwrap(), Scorecard::default());
    }

    // The connection is usable again once the session is gone.
    record_bye(&mut store, t, ids[0]).unwrap();
    assert_eq!(store.scorecard(t, ids[0]).unwrap().unwrap().bye_count, 1);
}

#[test]
fn csv_import_on_sqlite_keeps_file_order() {
    let (mut store, t, _) = tournament_with_players(0);
    let csv = "name\nMarkov Chaney\nJoe Malik\nAtlanta Hope\n";
    let players = import_players_csv(&mut store, t, csv.as_bytes()).unwrap();
    assert_eq!(players.len(), 3);

    let names: Vec<_> = standings(&store, t).unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(names, ["Markov Chaney", "Joe Malik", "Atlanta Hope"]);

    let err = import_players_csv(&mut store, t, "name\nMao Tsu-hsi\n\" \"\n".as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(store.count_players(t).unwrap(), 3);
}

#[test]
fn unknown_scorecard_is_not_found() {
    let (mut store, t, ids) = tournament_with_players(1);
    let err = record_bye(&mut store, t, uuid::Uuid::new_v4()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = record_match(&mut store, t, uuid::Uuid::new_v4(), ids[0], false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(store.matches(t).unwrap().is_empty());
}

#[test]
fn names_with_quotes_are_bound_not_interpolated() {
    let (mut store, t, _) = tournament_with_players(0);
    let player = store
        .register_player(t, "Robert'); DROP TABLE players;--")
        .unwrap();
    let table = standings(&store, t).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].player_id, player.id);
    assert_eq!(table[0].name, player.name);
}

#[test]
fn delete_tournament_removes_everything() {
    let (mut store, t, ids) = tournament_with_players(2);
    record_match(&mut store, t, ids[0], ids[1], false).unwrap();
    assert_eq!(delete_matches(&mut store, t).unwrap(), 1);
    record_match(&mut store, t, ids[1], ids[0], false).unwrap();

    store.delete_tournament(t).unwrap();
    assert!(store.tournament(t).unwrap().is_none());
    assert_eq!(store.count_players(t).unwrap_err().kind(), ErrorKind::NotFound);
    assert!(store.matches(t).unwrap().is_empty());
}

#[test]
fn data_survives_reopening_the_file() {
    let path = std::env::temp_dir().join(format!("swiss-{}.db", uuid::Uuid::new_v4()));
    let (t, winner) = {
        let mut store = SqliteStore::open(&path).unwrap();
        let t = create_tournament(&mut store, "Durable").unwrap().id;
        let a = register_player(&mut store, t, "A").unwrap().id;
        let b = register_player(&mut store, t, "B").unwrap().id;
        record_match(&mut store, t, a, b, false).unwrap();
        (t, a)
    };

    let store = SqliteStore::open(&path).unwrap();
    let table = standings(&store, t).unwrap();
    assert_eq!(table[0].player_id, winner);
    assert_eq!(table[0].score, 3);
    assert_eq!(store.tournament(t).unwrap().unwrap().name, "Durable");

    drop(store);
    let _ = std::fs::remove_file(&path);
}
