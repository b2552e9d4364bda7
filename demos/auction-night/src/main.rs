use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tourney::prelude::*;
use tourney::tick::TickConfig;

// ---------------------------------------------------------------------------
// Bidding script
// ---------------------------------------------------------------------------

/// Scouts pass on anyone whose average rating is below this.
const MIN_AVERAGE_SKILL: u64 = 76;

/// A team stops raising once the price passes this many coins per
/// average skill point.
const COINS_PER_SKILL_POINT: u64 = 25;

fn average_skill(player: &Player) -> u64 {
    if player.skills.is_empty() {
        return 0;
    }
    let total: u64 = player.skills.values().map(|&r| u64::from(r)).sum();
    total / player.skills.len() as u64
}

/// Runs one player's auction: teams take turns raising by the suggested
/// step until the price passes the player's value, then the clock runs out.
async fn auction_player(
    auction: &AuctionHandle,
    player: &Player,
    teams: &[String],
    tick: Duration,
) -> Result<(), TourneyError> {
    let rating = average_skill(player);
    if rating < MIN_AVERAGE_SKILL {
        auction.skip().await?;
        return Ok(());
    }

    auction.start_bidding().await?;
    let cap = rating * COINS_PER_SKILL_POINT;

    for team in teams.iter().cycle() {
        let snap = auction.snapshot().await?;
        if snap.highest_bidder.as_deref() == Some(team.as_str()) {
            continue;
        }
        if snap.suggested_bid > cap {
            break;
        }
        match auction.place_bid(team.clone(), snap.suggested_bid).await {
            Ok(()) => {}
            Err(AuctionError::InsufficientBudget { .. }) => break,
            Err(err) => return Err(err.into()),
        }
        tokio::time::sleep(tick * 3).await;
    }

    while auction.snapshot().await?.phase == Phase::Active {
        tokio::time::sleep(tick).await;
    }
    auction.confirm_sale().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// Defaults with a 20 Hz countdown so the whole night takes seconds.
/// Team Alpha opens every player at the starting bid.
fn demo_config() -> TourneyConfig {
    TourneyConfig {
        auction: AuctionConfig {
            tick: TickConfig::with_rate(20),
            ..AuctionConfig::default().with_opening_bidder("Team Alpha")
        },
        ..TourneyConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => TourneyConfig::load(path)?,
        None => demo_config(),
    };
    tourney::logging::init(&config.log.filter);
    let tick = config.auction.tick.tick_duration();

    let (toasts, mut toast_rx) = mpsc::unbounded_channel::<Notification>();
    let printer = tokio::spawn(async move {
        while let Some(toast) = toast_rx.recv().await {
            println!("  {toast}");
        }
    });

    let mut app = Tourney::new(config, Arc::new(toasts));
    app.login("host@example.com", "password123")?;

    let tournament = app
        .store()
        .by_join_code("SUM123")
        .ok_or("Summer Championship fixture missing")?;
    let sport = app
        .store()
        .sports_for(tournament.id)
        .into_iter()
        .find(|s| s.kind == SportKind::Team)
        .ok_or("no team sport to auction")?;
    println!("Auction night: {} / {}", tournament.name, sport.name);
    let sport_id = sport.id;

    let roster = StaticRoster::demo();
    let (auction, task) = app.open_auction(sport_id, &roster)?;
    let teams: Vec<String> = roster.teams().into_iter().map(|t| t.name).collect();

    loop {
        let snap = auction.snapshot().await?;
        let Some(player) = snap.current_player else {
            break;
        };
        println!(
            "Up next ({}/{}): {}",
            snap.current_player_index + 1,
            snap.roster_len,
            player.name
        );
        auction_player(&auction, &player, &teams, tick).await?;
    }

    auction.shutdown().await?;
    let session = task.await?;
    drop(app);
    drop(auction);

    println!();
    println!("Final squads");
    for team in session.teams() {
        println!("{} (budget left {})", team.name, team.budget);
        for player in &team.acquired_players {
            println!("  {} {}", player.avatar, player.name);
        }
    }
    let unsold = session.outcomes().iter().filter(|o| !o.is_sold()).count();
    println!("Unsold: {unsold}");

    drop(session);
    printer.await?;
    Ok(())
}
