use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

use coin_sim::export::SeriesCsvWriter;
use coin_sim::journal::{FlipJournal, FlipLogEvent, FlipLogEventKind, InMemoryFlipJournal};
use coin_sim::{
    CoinSource, EngineConfig, EngineError, FairCoin, FlipRecord, SeededCoin, SeriesPoint,
    Simulation, SimulationState, Statistics,
};
use tokio::sync::broadcast;

/// Keeps seeded sessions on distinct streams (same mixing constant family
/// as splitmix64).
const SEED_STREAM_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSettings {
    pub initial_amount: f64,
    pub coin_seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            initial_amount: 100.0,
            coin_seed: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartSessionError {
    SessionIdOverflow,
    Engine(EngineError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOpError {
    NotFound,
    Engine(EngineError),
    ExportFailed,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SessionEvent {
    Connected {
        session_id: Option<u64>,
    },
    SessionStarted {
        session_id: u64,
        amount: f64,
    },
    FlipApplied {
        session_id: u64,
        is_win: bool,
        amount: f64,
    },
    SessionReset {
        session_id: u64,
        amount: f64,
    },
}

impl SessionEvent {
    pub fn connected() -> Self {
        Self::Connected { session_id: None }
    }

    pub fn session_started(session_id: u64, amount: f64) -> Self {
        Self::SessionStarted { session_id, amount }
    }

    pub fn flip_applied(session_id: u64, is_win: bool, amount: f64) -> Self {
        Self::FlipApplied {
            session_id,
            is_win,
            amount,
        }
    }

    pub fn session_reset(session_id: u64, amount: f64) -> Self {
        Self::SessionReset { session_id, amount }
    }
}

/// Read-only projection of one session's engine state, returned by every
/// mutating endpoint and serialized as JSON.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SessionSnapshot {
    pub session_id: u64,
    pub amount: f64,
    pub recent_history: Vec<FlipRecord>,
    pub series: Vec<SeriesPoint>,
    pub stats: Statistics,
}

impl SessionSnapshot {
    fn capture(session_id: u64, state: &SimulationState) -> Self {
        Self {
            session_id,
            amount: state.amount,
            recent_history: state.recent_history.iter().copied().collect(),
            series: state.series.clone(),
            stats: state.stats,
        }
    }
}

struct Session {
    sim: Simulation,
    coin: Box<dyn CoinSource + Send>,
    journal: InMemoryFlipJournal,
}

#[derive(Clone)]
pub struct AppState {
    next_session_id: Arc<AtomicU64>,
    sessions: Arc<Mutex<HashMap<u64, Session>>>,
    events_tx: broadcast::Sender<SessionEvent>,
    settings: SessionSettings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(SessionSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SessionSettings) -> Self {
        let (events_tx, _) = broadcast::channel(256);
        Self {
            next_session_id: Arc::new(AtomicU64::new(0)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            events_tx,
            settings,
        }
    }

    pub fn start_session(&self) -> Result<SessionSnapshot, StartSessionError> {
        let previous = self
            .next_session_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_add(1)
            })
            .map_err(|_| StartSessionError::SessionIdOverflow)?;
        let session_id = previous + 1;

        let config = EngineConfig {
            initial_amount: self.settings.initial_amount,
            ..EngineConfig::default()
        };
        let sim = Simulation::new(config).map_err(StartSessionError::Engine)?;
        let coin: Box<dyn CoinSource + Send> = match self.settings.coin_seed {
            Some(seed) => Box::new(SeededCoin::new(
                seed ^ session_id.wrapping_mul(SEED_STREAM_MIX),
            )),
            None => Box::new(FairCoin::new()),
        };

        let session = Session {
            sim,
            coin,
            journal: InMemoryFlipJournal::new(),
        };
        let snapshot = SessionSnapshot::capture(session_id, session.sim.state());
        self.sessions_guard().insert(session_id, session);

        let _ = self.publish_event(SessionEvent::session_started(session_id, snapshot.amount));
        Ok(snapshot)
    }

    pub fn session_snapshot(&self, session_id: u64) -> Result<SessionSnapshot, SessionOpError> {
        let sessions = self.sessions_guard();
        let session = sessions.get(&session_id).ok_or(SessionOpError::NotFound)?;
        Ok(SessionSnapshot::capture(session_id, session.sim.state()))
    }

    pub fn apply_flip(
        &self,
        session_id: u64,
        stake_fraction: f64,
    ) -> Result<SessionSnapshot, SessionOpError> {
        let (snapshot, is_win) = {
            let mut sessions = self.sessions_guard();
            let session = sessions
                .get_mut(&session_id)
                .ok_or(SessionOpError::NotFound)?;

            session
                .sim
                .flip(stake_fraction, session.coin.as_mut())
                .map_err(SessionOpError::Engine)?;

            let state = session.sim.state();
            let is_win = state
                .recent_history
                .back()
                .map(|record| record.is_win)
                .unwrap_or_default();
            let snapshot = SessionSnapshot::capture(session_id, state);
            session.journal.write(FlipLogEvent::new(
                snapshot.stats.total_flips,
                FlipLogEventKind::FlipApplied,
                Some(is_win),
            ));
            (snapshot, is_win)
        };

        let _ = self.publish_event(SessionEvent::flip_applied(
            session_id,
            is_win,
            snapshot.amount,
        ));
        Ok(snapshot)
    }

    pub fn reset_session(
        &self,
        session_id: u64,
        initial_amount: Option<f64>,
    ) -> Result<SessionSnapshot, SessionOpError> {
        let snapshot = {
            let mut sessions = self.sessions_guard();
            let session = sessions
                .get_mut(&session_id)
                .ok_or(SessionOpError::NotFound)?;

            match initial_amount {
                Some(amount) => {
                    session
                        .sim
                        .reset_with(amount)
                        .map_err(SessionOpError::Engine)?;
                }
                None => {
                    session.sim.reset();
                }
            }

            session.journal.write(FlipLogEvent::new(
                0,
                FlipLogEventKind::SessionReset,
                None,
            ));
            SessionSnapshot::capture(session_id, session.sim.state())
        };

        let _ = self.publish_event(SessionEvent::session_reset(session_id, snapshot.amount));
        Ok(snapshot)
    }

    pub fn export_csv(&self, session_id: u64) -> Result<String, SessionOpError> {
        let mut sessions = self.sessions_guard();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(SessionOpError::NotFound)?;

        let flip = session.sim.state().stats.total_flips;
        let mut output = Vec::new();
        let mut writer = SeriesCsvWriter::new(&mut output);
        writer
            .write_header_and_log(flip, &mut session.journal)
            .map_err(|_| SessionOpError::ExportFailed)?;
        writer
            .append_series(&session.sim.state().series)
            .map_err(|_| SessionOpError::ExportFailed)?;

        String::from_utf8(output).map_err(|_| SessionOpError::ExportFailed)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    pub fn publish_event(
        &self,
        event: SessionEvent,
    ) -> Result<usize, broadcast::error::SendError<SessionEvent>> {
        self.events_tx.send(event)
    }

    fn sessions_guard(&self) -> MutexGuard<'_, HashMap<u64, Session>> {
        self.sessions
            .lock()
            .expect("session registry lock poisoned")
    }

    #[cfg(test)]
    pub(crate) fn with_next_session_id_for_test(next_session_id: u64) -> Self {
        let state = Self::new();
        state
            .next_session_id
            .store(next_session_id, Ordering::Relaxed);
        state
    }

    #[cfg(test)]
    pub(crate) fn journal_events_for_test(&self, session_id: u64) -> Vec<FlipLogEvent> {
        self.sessions_guard()
            .get(&session_id)
            .map(|session| session.journal.events().to_vec())
            .unwrap_or_default()
    }
}
