/// Many tasks sharing one floor: the ledger and the active-round map must
/// stay consistent under contention.
use arcade_floor::{Floor, FloorError, FloorSettings, GameId, MemoryStore, RoundOptions};
use std::sync::Arc;
use tokio::task::JoinSet;

fn shared_floor(seed: u64) -> Arc<Floor> {
    Arc::new(Floor::open(FloorSettings::seeded(seed), Arc::new(MemoryStore::new())).expect("open floor"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_round_per_game_wins_the_race() {
    let floor = shared_floor(31);
    let mut join_set = JoinSet::new();
    for _ in 0..16 {
        let floor = Arc::clone(&floor);
        join_set.spawn(async move { floor.start_round(GameId::Crash, 20.0, RoundOptions::default()) });
    }

    let mut started = 0;
    let mut refused = 0;
    while let Some(result) = join_set.join_next().await {
        match result.expect("task completed") {
            Ok(_) => started += 1,
            Err(FloorError::IllegalAction { .. }) => refused += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(started, 1);
    assert_eq!(refused, 15);
    assert_eq!(floor.balance().unwrap(), 980);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_instant_rounds_keep_the_books_balanced() {
    let floor = shared_floor(32);
    let mut join_set = JoinSet::new();
    for i in 0..40 {
        let floor = Arc::clone(&floor);
        let game = if i % 2 == 0 { GameId::Slots } else { GameId::Skee };
        join_set.spawn(async move { floor.start_round(game, 20.0, RoundOptions::default()) });
    }
    while let Some(result) = join_set.join_next().await {
        result.expect("task completed").expect("round settled");
    }

    let stats = floor.stats().unwrap();
    assert_eq!(stats.rounds, 40);
    let expected = 1000 - stats.total_lost as i64 + stats.total_won as i64;
    assert_eq!(floor.balance().unwrap() as i64, expected);
}
