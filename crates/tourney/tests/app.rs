use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tourney::prelude::*;

fn app() -> (Tourney, mpsc::UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Tourney::new(TourneyConfig::default(), Arc::new(tx)), rx)
}

fn last(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Notification {
    let mut last = None;
    while let Ok(n) = rx.try_recv() {
        last = Some(n);
    }
    last.expect("no notification emitted")
}

fn as_host(app: &mut Tourney) {
    app.login("host@example.com", "password123").unwrap();
}

fn as_player(app: &mut Tourney) {
    app.login("player@example.com", "password123").unwrap();
}

// =========================================================================
// Accounts
// =========================================================================

#[test]
fn test_login_success_notifies_account() {
    let (mut app, mut rx) = app();
    let user = app.login("HOST@example.com ", "password123").unwrap();
    assert_eq!(user.name, "John Host");

    let n = last(&mut rx);
    assert_eq!(n.level, NoticeLevel::Success);
    assert_eq!(n.kind, NoticeKind::Account);
    assert_eq!(app.current_user().map(|u| u.id), Some(UserId(1)));
}

#[test]
fn test_login_wrong_password_notifies_error() {
    let (mut app, mut rx) = app();
    let err = app.login("host@example.com", "nope").unwrap_err();
    assert!(matches!(err, TourneyError::Identity(IdentityError::InvalidCredentials)));

    let n = last(&mut rx);
    assert!(n.is_error());
    assert_eq!(n.kind.to_string(), "error:invalid_credentials");
    assert!(app.current_user().is_none());
}

#[test]
fn test_register_signs_in_new_player() {
    let (mut app, _rx) = app();
    let user = app
        .register(Registration::new("Sam", "sam@example.com", "pw", Role::Player))
        .unwrap();
    assert_eq!(user.id, UserId(3));
    assert_eq!(user.virtual_money, 10_000);
    assert_eq!(app.current_user().map(|u| u.id), Some(UserId(3)));
}

#[test]
fn test_logout_without_session_is_not_signed_in() {
    let (mut app, mut rx) = app();
    assert!(app.logout().is_err());
    assert_eq!(last(&mut rx).kind.to_string(), "error:not_signed_in");
}

// =========================================================================
// Tournaments
// =========================================================================

#[test]
fn test_create_tournament_requires_host_account() {
    let (mut app, mut rx) = app();
    as_player(&mut app);
    let err = app.create_tournament(TournamentDraft::named("Jane's Cup")).unwrap_err();
    assert!(matches!(err, TourneyError::HostAccountRequired(UserId(2))));
    assert_eq!(last(&mut rx).kind.to_string(), "error:host_account_required");
}

#[test]
fn test_create_tournament_links_host_and_shares_code() {
    let (mut app, mut rx) = app();
    as_host(&mut app);
    let t = app.create_tournament(TournamentDraft::named("Autumn Cup")).unwrap();

    assert_eq!(t.status, TournamentStatus::Upcoming);
    assert!(last(&mut rx).message.contains(&t.join_code));
    assert!(app.current_user().unwrap().tournaments.contains(&t.id));
    assert!(app.store().by_join_code(&t.join_code).is_some());
}

#[test]
fn test_join_tournament_by_code() {
    let (mut app, mut rx) = app();
    as_player(&mut app);
    let t = app.join_tournament("win456").unwrap();
    assert_eq!(t.id, TournamentId(2));
    assert!(t.is_participant(UserId(2)));
    assert!(app.current_user().unwrap().tournaments.contains(&TournamentId(2)));
    assert_eq!(last(&mut rx).kind, NoticeKind::Tournament);

    let err = app.join_tournament("WIN456").unwrap_err();
    assert!(matches!(err, TourneyError::Store(StoreError::AlreadyParticipating(..))));
    assert_eq!(last(&mut rx).kind.to_string(), "error:already_participating");
}

#[test]
fn test_join_tournament_signed_out_is_rejected() {
    let (mut app, mut rx) = app();
    let err = app.join_tournament("SUM123").unwrap_err();
    assert_eq!(err.reason(), "not_signed_in");
    assert!(last(&mut rx).is_error());
}

#[test]
fn test_add_sport_by_non_host_is_rejected() {
    let (mut app, mut rx) = app();
    as_player(&mut app);
    let err = app
        .add_sport(
            TournamentId(2),
            SportDraft {
                name: "Cricket".into(),
                kind: SportKind::Team,
                max_players: 11,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TourneyError::NotHost {
            user: UserId(2),
            tournament: TournamentId(2)
        }
    ));
    assert_eq!(last(&mut rx).kind.to_string(), "error:not_host");
}

#[test]
fn test_host_adds_sport_and_player_registers() {
    let (mut app, _rx) = app();
    as_host(&mut app);
    let sport = app
        .add_sport(
            TournamentId(2),
            SportDraft {
                name: "Cricket".into(),
                kind: SportKind::Team,
                max_players: 11,
            },
        )
        .unwrap();

    as_player(&mut app);
    app.join_tournament("WIN456").unwrap();
    let sport = app.register_for_sport(sport.id).unwrap();
    assert_eq!(sport.participants, vec![UserId(2)]);
}

#[test]
fn test_advance_status_host_only() {
    let (mut app, _rx) = app();
    as_player(&mut app);
    assert!(app.advance_status(TournamentId(2)).is_err());

    as_host(&mut app);
    assert_eq!(app.advance_status(TournamentId(2)).unwrap(), TournamentStatus::Live);
}

// =========================================================================
// Matches
// =========================================================================

#[test]
fn test_update_match_score_records_user_results() {
    let (mut app, mut rx) = app();
    as_host(&mut app);
    let m = app
        .update_match_score(MatchId(2), "0-1", Some(Side::User(UserId(2))))
        .unwrap();
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(last(&mut rx).kind, NoticeKind::Tournament);

    let winner = app.identity().user(UserId(2)).unwrap();
    assert_eq!(winner.stats.wins, 9);
    assert_eq!(winner.stats.points, 90);
    let loser = app.identity().user(UserId(1)).unwrap();
    assert_eq!(loser.stats.losses, 6);
}

#[test]
fn test_update_match_score_by_player_is_rejected() {
    let (mut app, _rx) = app();
    as_player(&mut app);
    let err = app
        .update_match_score(MatchId(2), "1-0", Some(Side::User(UserId(2))))
        .unwrap_err();
    assert_eq!(err.reason(), "not_host");
    assert_eq!(
        app.store().match_by_id(MatchId(2)).unwrap().status,
        MatchStatus::Pending
    );
}

#[test]
fn test_create_match_for_host() {
    let (mut app, _rx) = app();
    as_host(&mut app);
    let m = app
        .create_match(MatchDraft {
            sport: SportId(1),
            home: Side::Team("Team Alpha".into()),
            away: Side::Team("Team Beta".into()),
            scheduled_for: "2023-06-18T14:00:00Z".parse().unwrap(),
        })
        .unwrap();
    assert_eq!(m.tournament, TournamentId(1));
    assert_eq!(m.status, MatchStatus::Pending);
}

#[test]
fn test_profile_for_signed_in_user() {
    let (mut app, _rx) = app();
    assert!(app.profile().is_err());
    as_player(&mut app);
    let profile = app.profile().unwrap();
    assert_eq!(profile.wins, 8);
    assert_eq!(profile.matches_played, 10);
}

// =========================================================================
// Auctions
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_open_auction_runs_on_team_sport() {
    let (mut app, mut rx) = app();
    as_host(&mut app);

    let (auction, task) = app.open_auction(SportId(1), &StaticRoster::demo()).unwrap();
    let opened = last(&mut rx);
    assert_eq!(opened.level, NoticeLevel::Success);
    assert_eq!(opened.kind, NoticeKind::Tournament);
    assert_eq!(opened.message, "Auction started");

    auction.start_bidding().await.unwrap();
    auction.place_bid("Team Beta", 1500).await.unwrap();
    tokio::time::sleep(Duration::from_secs_f64(15.5)).await;
    auction.confirm_sale().await.unwrap();
    auction.shutdown().await.unwrap();

    let session = task.await.unwrap();
    assert_eq!(session.team("Team Beta").unwrap().budget, 3500);

    // Auction events reach the same sink.
    let mut kinds = Vec::new();
    while let Ok(n) = rx.try_recv() {
        kinds.push(n.kind.to_string());
    }
    assert!(kinds.contains(&"sold".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_open_auction_default_config_takes_custom_roster() {
    let (mut app, _rx) = app();
    as_host(&mut app);
    let roster = StaticRoster::new(
        vec![Player::new(PlayerId(10), "Kim Lee")],
        vec![Team::new("Rovers", 2000), Team::new("Wanderers", 2000)],
    );

    let (auction, _task) = app.open_auction(SportId(1), &roster).unwrap();
    auction.start_bidding().await.unwrap();
    let snap = auction.snapshot().await.unwrap();
    assert!(snap.highest_bidder.is_none());

    auction.place_bid("Rovers", 1000).await.unwrap();
    auction.force_sold().await.unwrap();
    let outcome = auction.confirm_sale().await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Sold {
            player: PlayerId(10),
            team: "Rovers".into(),
            price: 1000
        }
    );
}

#[tokio::test]
async fn test_open_auction_individual_sport_is_rejected() {
    let (mut app, mut rx) = app();
    as_host(&mut app);
    let err = app.open_auction(SportId(2), &StaticRoster::demo()).unwrap_err();
    assert!(matches!(err, TourneyError::NotTeamSport(SportId(2))));
    assert_eq!(last(&mut rx).kind.to_string(), "error:not_team_sport");
}

#[tokio::test]
async fn test_open_auction_by_player_is_rejected() {
    let (mut app, _rx) = app();
    as_player(&mut app);
    let err = app.open_auction(SportId(1), &StaticRoster::demo()).unwrap_err();
    assert_eq!(err.reason(), "not_host");
}
