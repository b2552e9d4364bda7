use chrono::{DateTime, Duration, Utc};
use tourney_protocol::{MatchId, SportId, TournamentId, UserId};
use tourney_store::*;

fn uid(n: u64) -> UserId {
    UserId(n)
}

fn draft(name: &str) -> TournamentDraft {
    TournamentDraft::named(name)
}

fn team(name: &str) -> Side {
    Side::Team(name.into())
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

// =========================================================================
// Fixtures
// =========================================================================

#[test]
fn test_seeded_store_loads_fixture_tournaments() {
    let store = TournamentStore::seeded();
    assert_eq!(store.len(), 2);

    let summer = store.by_join_code("SUM123").unwrap();
    assert_eq!(summer.name, "Summer Championship 2023");
    assert_eq!(summer.status, TournamentStatus::Live);
    assert!(summer.is_participant(uid(2)));

    let winter = store.by_join_code("win456").unwrap();
    assert_eq!(winter.id, TournamentId(2));
    assert_eq!(winter.sports, vec!["Chess", "Ludo"]);
}

#[test]
fn test_empty_store_has_no_records() {
    let store = TournamentStore::empty();
    assert!(store.is_empty());
    assert!(store.by_join_code("SUM123").is_none());
    assert!(store.upcoming_matches().is_empty());
}

#[test]
fn test_seeded_ids_continue_after_fixtures() {
    let mut store = TournamentStore::seeded();
    let id = store.create_tournament(draft("Autumn Cup"), uid(1)).unwrap().id;
    assert_eq!(id, TournamentId(3));

    let sport = store
        .add_sport(
            id,
            SportDraft {
                name: "Football".into(),
                kind: SportKind::Team,
                max_players: 11,
            },
        )
        .unwrap();
    assert_eq!(sport.id, SportId(4));
}

// =========================================================================
// Tournaments
// =========================================================================

#[test]
fn test_create_tournament_host_is_first_participant() {
    let mut store = TournamentStore::empty();
    let t = store.create_tournament(draft("  Spring Open "), uid(7)).unwrap();

    assert_eq!(t.name, "Spring Open");
    assert_eq!(t.status, TournamentStatus::Upcoming);
    assert_eq!(t.participants.len(), 1);
    assert_eq!(t.participants[0].user, uid(7));
    assert!(t.is_host(uid(7)));
}

#[test]
fn test_create_tournament_generates_unique_codes() {
    let mut store = TournamentStore::empty();
    let mut codes = std::collections::HashSet::new();
    for i in 0..50 {
        let t = store
            .create_tournament(draft(&format!("Cup {i}")), uid(1))
            .unwrap();
        assert_eq!(t.join_code.len(), 6);
        assert!(t.join_code.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b)));
        assert!(codes.insert(t.join_code.clone()));
    }
}

#[test]
fn test_create_tournament_respects_code_length() {
    let mut store = TournamentStore::new(StoreConfig {
        join_code_len: 8,
        seed_fixtures: false,
    });
    let t = store.create_tournament(draft("Long"), uid(1)).unwrap();
    assert_eq!(t.join_code.len(), 8);
}

#[test]
fn test_create_tournament_blank_name_rejected() {
    let mut store = TournamentStore::empty();
    let err = store.create_tournament(draft("   "), uid(1)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidDraft(_)));
    assert!(store.is_empty());
}

#[test]
fn test_create_tournament_end_before_start_rejected() {
    let mut store = TournamentStore::empty();
    let start = at("2024-03-10T09:00:00Z");
    let d = TournamentDraft {
        start_date: Some(start),
        end_date: Some(start - Duration::days(1)),
        ..draft("Backwards")
    };
    assert!(matches!(
        store.create_tournament(d, uid(1)),
        Err(StoreError::InvalidDraft(_))
    ));
}

#[test]
fn test_join_tournament_adds_participant() {
    let mut store = TournamentStore::seeded();
    let t = store.join_tournament(" win456 ", uid(2)).unwrap();
    assert!(t.is_participant(uid(2)));
    assert_eq!(t.participants.len(), 2);

    let mine: Vec<_> = store.tournaments_for(uid(2)).iter().map(|t| t.id).collect();
    assert_eq!(mine, vec![TournamentId(1), TournamentId(2)]);
}

#[test]
fn test_join_tournament_unknown_code_is_invalid() {
    let mut store = TournamentStore::seeded();
    let err = store.join_tournament("NOPE00", uid(3)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidJoinCode(code) if code == "NOPE00"));
}

#[test]
fn test_join_tournament_twice_is_already_participating() {
    let mut store = TournamentStore::seeded();
    let err = store.join_tournament("SUM123", uid(2)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::AlreadyParticipating(u, t) if u == uid(2) && t == TournamentId(1)
    ));
}

#[test]
fn test_join_tournament_completed_is_rejected() {
    let mut store = TournamentStore::seeded();
    store.advance_status(TournamentId(1)).unwrap();
    let err = store.join_tournament("SUM123", uid(9)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidState {
            status: TournamentStatus::Completed,
            ..
        }
    ));
}

#[test]
fn test_advance_status_walks_lifecycle_then_stops() {
    let mut store = TournamentStore::seeded();
    let id = TournamentId(2);
    assert_eq!(store.advance_status(id).unwrap(), TournamentStatus::Live);
    assert_eq!(store.advance_status(id).unwrap(), TournamentStatus::Completed);
    assert!(matches!(
        store.advance_status(id),
        Err(StoreError::InvalidState { .. })
    ));
}

#[test]
fn test_advance_status_unknown_tournament() {
    let mut store = TournamentStore::empty();
    assert!(matches!(
        store.advance_status(TournamentId(42)),
        Err(StoreError::TournamentNotFound(TournamentId(42)))
    ));
}

// =========================================================================
// Sports
// =========================================================================

#[test]
fn test_add_sport_appends_name_once() {
    let mut store = TournamentStore::seeded();
    let id = TournamentId(2);
    store
        .add_sport(
            id,
            SportDraft {
                name: "Cricket".into(),
                kind: SportKind::Team,
                max_players: 11,
            },
        )
        .unwrap();
    store
        .add_sport(
            id,
            SportDraft {
                name: "chess".into(),
                kind: SportKind::Individual,
                max_players: 1,
            },
        )
        .unwrap();

    let t = store.tournament(id).unwrap();
    assert_eq!(t.sports, vec!["Chess", "Ludo", "Cricket"]);
    assert_eq!(store.sports_for(id).len(), 3);
}

#[test]
fn test_add_sport_live_tournament_rejected() {
    let mut store = TournamentStore::seeded();
    let err = store
        .add_sport(
            TournamentId(1),
            SportDraft {
                name: "Tennis".into(),
                kind: SportKind::Individual,
                max_players: 1,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidState {
            status: TournamentStatus::Live,
            ..
        }
    ));
}

#[test]
fn test_add_sport_zero_players_rejected() {
    let mut store = TournamentStore::seeded();
    let err = store
        .add_sport(
            TournamentId(2),
            SportDraft {
                name: "Ghost".into(),
                kind: SportKind::Team,
                max_players: 0,
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidDraft(_)));
}

#[test]
fn test_register_for_sport_requires_participation() {
    let mut store = TournamentStore::seeded();
    let err = store.register_for_sport(SportId(3), uid(2)).unwrap_err();
    assert!(matches!(err, StoreError::NotParticipant(u, _) if u == uid(2)));

    store.join_tournament("WIN456", uid(2)).unwrap();
    let sport = store.register_for_sport(SportId(3), uid(2)).unwrap();
    assert_eq!(sport.participants, vec![uid(1), uid(2)]);
}

#[test]
fn test_register_for_sport_twice_is_already_registered() {
    let mut store = TournamentStore::seeded();
    let err = store.register_for_sport(SportId(1), uid(1)).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyRegistered(u, s) if u == uid(1) && s == SportId(1)));
}

#[test]
fn test_register_for_unknown_sport() {
    let mut store = TournamentStore::seeded();
    assert!(matches!(
        store.register_for_sport(SportId(99), uid(1)),
        Err(StoreError::SportNotFound(SportId(99)))
    ));
}

// =========================================================================
// Matches
// =========================================================================

#[test]
fn test_create_match_is_pending_in_sport_tournament() {
    let mut store = TournamentStore::seeded();
    let m = store
        .create_match(MatchDraft {
            sport: SportId(3),
            home: Side::User(uid(1)),
            away: Side::User(uid(2)),
            scheduled_for: at("2023-12-11T10:00:00Z"),
        })
        .unwrap();
    assert_eq!(m.id, MatchId(3));
    assert_eq!(m.tournament, TournamentId(2));
    assert_eq!(m.status, MatchStatus::Pending);
    assert!(m.score.is_none());
}

#[test]
fn test_create_match_same_side_rejected() {
    let mut store = TournamentStore::seeded();
    let err = store
        .create_match(MatchDraft {
            sport: SportId(1),
            home: team("Team Alpha"),
            away: team("Team Alpha"),
            scheduled_for: at("2023-06-18T10:00:00Z"),
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidDraft(_)));
}

#[test]
fn test_update_match_score_completes_match() {
    let mut store = TournamentStore::seeded();
    let m = store
        .update_match_score(MatchId(2), "1-0", Some(Side::User(uid(2))))
        .unwrap();
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(m.score.as_deref(), Some("1-0"));
    assert_eq!(m.winner, Some(Side::User(uid(2))));
    assert!(store.upcoming_matches().is_empty());
}

#[test]
fn test_update_match_score_draw_has_no_winner() {
    let mut store = TournamentStore::seeded();
    let m = store.update_match_score(MatchId(2), "½-½", None).unwrap();
    assert_eq!(m.winner, None);
}

#[test]
fn test_update_match_score_rejects_outside_winner() {
    let mut store = TournamentStore::seeded();
    let err = store
        .update_match_score(MatchId(2), "1-0", Some(team("Team Gamma")))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidWinner(MatchId(2))));
    assert_eq!(
        store.match_by_id(MatchId(2)).unwrap().status,
        MatchStatus::Pending
    );
}

#[test]
fn test_update_match_score_completed_match_rejected() {
    let mut store = TournamentStore::seeded();
    let err = store
        .update_match_score(MatchId(1), "0-0", None)
        .unwrap_err();
    assert!(matches!(err, StoreError::MatchAlreadyCompleted(MatchId(1))));
}

#[test]
fn test_upcoming_matches_sorted_by_time() {
    let mut store = TournamentStore::seeded();
    store
        .create_match(MatchDraft {
            sport: SportId(1),
            home: team("Team Alpha"),
            away: team("Team Beta"),
            scheduled_for: at("2023-06-16T09:00:00Z"),
        })
        .unwrap();

    let ids: Vec<_> = store.upcoming_matches().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![MatchId(3), MatchId(2)]);
    assert_eq!(store.matches_for(TournamentId(1)).len(), 3);
}
