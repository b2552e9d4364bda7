//! Seed data loaded by [`TournamentStore::seeded`](crate::TournamentStore::seeded).

use chrono::{DateTime, Utc};
use tourney_protocol::{MatchId, SportId, TournamentId, UserId};

use crate::{
    Match, MatchStatus, Participant, ParticipantStatus, Side, Sport, SportKind, Tournament,
    TournamentStatus,
};

fn at(rfc3339: &str) -> DateTime<Utc> {
    rfc3339.parse().unwrap_or_default()
}

fn registered(ids: &[u64]) -> Vec<Participant> {
    ids.iter()
        .map(|&id| Participant {
            user: UserId(id),
            status: ParticipantStatus::Registered,
        })
        .collect()
}

pub(crate) struct Fixtures {
    pub tournaments: Vec<Tournament>,
    pub sports: Vec<Sport>,
    pub matches: Vec<Match>,
}

pub(crate) fn fixtures() -> Fixtures {
    let tournaments = vec![
        Tournament {
            id: TournamentId(1),
            name: "Summer Championship 2023".into(),
            host: UserId(1),
            join_code: "SUM123".into(),
            sports: vec!["Cricket".into(), "Football".into(), "Chess".into()],
            participants: registered(&[1, 2]),
            status: TournamentStatus::Live,
            rules: "Standard tournament rules apply.".into(),
            start_date: Some(at("2023-06-15T09:00:00Z")),
            end_date: Some(at("2023-06-20T18:00:00Z")),
            created_at: at("2023-05-10T10:00:00Z"),
        },
        Tournament {
            id: TournamentId(2),
            name: "Winter Games 2023".into(),
            host: UserId(1),
            join_code: "WIN456".into(),
            sports: vec!["Chess".into(), "Ludo".into()],
            participants: registered(&[1]),
            status: TournamentStatus::Upcoming,
            rules: "Winter games special rules.".into(),
            start_date: Some(at("2023-12-10T09:00:00Z")),
            end_date: Some(at("2023-12-15T18:00:00Z")),
            created_at: at("2023-11-05T15:30:00Z"),
        },
    ];

    let sports = vec![
        Sport {
            id: SportId(1),
            tournament: TournamentId(1),
            name: "Cricket".into(),
            kind: SportKind::Team,
            max_players: 11,
            participants: vec![UserId(1), UserId(2)],
        },
        Sport {
            id: SportId(2),
            tournament: TournamentId(1),
            name: "Chess".into(),
            kind: SportKind::Individual,
            max_players: 1,
            participants: vec![UserId(1), UserId(2)],
        },
        Sport {
            id: SportId(3),
            tournament: TournamentId(2),
            name: "Ludo".into(),
            kind: SportKind::Individual,
            max_players: 1,
            participants: vec![UserId(1)],
        },
    ];

    let matches = vec![
        Match {
            id: MatchId(1),
            tournament: TournamentId(1),
            sport: SportId(1),
            home: Side::Team("Team Alpha".into()),
            away: Side::Team("Team Beta".into()),
            score: Some("120-115".into()),
            winner: Some(Side::Team("Team Alpha".into())),
            scheduled_for: at("2023-06-16T14:00:00Z"),
            status: MatchStatus::Completed,
            created_at: at("2023-05-10T10:00:00Z"),
        },
        Match {
            id: MatchId(2),
            tournament: TournamentId(1),
            sport: SportId(2),
            home: Side::User(UserId(1)),
            away: Side::User(UserId(2)),
            score: None,
            winner: None,
            scheduled_for: at("2023-06-17T10:00:00Z"),
            status: MatchStatus::Pending,
            created_at: at("2023-05-10T10:00:00Z"),
        },
    ];

    Fixtures {
        tournaments,
        sports,
        matches,
    }
}
