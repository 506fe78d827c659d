pub mod clock;
pub mod errors;
pub mod events;
pub mod floor;
pub mod games;
pub mod history;
pub mod ledger;
pub mod logging;
pub mod pacing;
pub mod presenter;
pub mod profile;
pub mod round;
pub mod settings;
pub mod stats;
pub mod store;
pub mod tables;

pub use clock::{Clock, ManualClock, TokioClock};
pub use errors::FloorError;
pub use events::{EventBus, EventSubscription, FloorEvent, Topic};
pub use floor::Floor;
pub use history::{SettlementEntry, SettlementLog, DEFAULT_LOG_CAPACITY};
pub use ledger::{BalanceChange, Bankroll, DEFAULT_STARTING_CREDITS};
pub use logging::{
    init_logging, init_logging_with_filter, init_test_logging, LogEntry, LogFormat,
    TestLogSubscriber,
};
pub use pacing::Pacer;
pub use presenter::{present, Confirm, ConfirmGate, Presenter, DEFAULT_CONFIRM_WINDOW};
pub use profile::{normalize_alias, Profile, MAX_ALIAS_CHARS};
pub use round::{
    Action, CardFace, GameId, LaneState, Pick, RoundHandle, RoundOptions, RoundState, RoundView,
    RunnerView, SeatView, Stage, TileState, TimerRequest, Tone,
};
pub use settings::{FloorSettings, SettingsError};
pub use stats::{StatsRecord, StatsSnapshot, StatsTracker};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use tables::{GameTables, StakeLimits};
