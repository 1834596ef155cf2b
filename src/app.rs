use std::time::Duration;

use timer_core::{
    format_stopwatch, format_timer, CompletionReport, LapRecord, TaskAggregator, TimerKind,
    TimerState, COUNTDOWN_TICK_MS, STOPWATCH_TICK_MS,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::alerts::{fire_sound, SoundEvent, SoundPlayer};
use crate::entry::{Engine, TimerEntry};
use crate::error::{AppError, AppResult};
use crate::pump::Pump;
use crate::storage::TimerStorage;

/// Messages delivered to the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppOp {
    Pump { id: u64, generation: u64 },
    Input(String),
    Redraw,
    Quit,
}

/// Everything the user can ask for. This is the only way state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddStopwatch { label: Option<String> },
    AddTimer { label: Option<String> },
    Remove { id: u64 },
    Start { id: u64 },
    Stop { id: u64 },
    Lap { id: u64 },
    Reset { id: u64 },
    Relabel { id: u64, label: String },
    /// Ask the front end for a new label; answered by `LabelEdited`.
    RequestLabel { id: u64 },
    /// `None` means the edit was cancelled.
    LabelEdited { id: u64, label: Option<String> },
    SetTarget { id: u64, minutes: Option<u64> },
    SetDuration { id: u64, input: String },
    SetCategory { id: u64, category: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Done,
    Added(u64),
    LabelPrompt { id: u64, current: String },
    Lapped(LapRecord),
    Completed(CompletionReport),
}

/// Read-only view of one entry for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: u64,
    pub kind: TimerKind,
    pub label: String,
    pub category: String,
    pub state: TimerState,
    /// Elapsed for stopwatches, remaining for timers.
    pub time_ms: u64,
    pub display: String,
    pub progress: Option<f64>,
    pub laps: Vec<LapRecord>,
    pub duration_input: Option<String>,
}

struct TimerSlot {
    entry: TimerEntry,
    engine: Engine,
    pump: Option<Pump>,
    generation: u64,
}

impl TimerSlot {
    fn new(entry: TimerEntry) -> Self {
        let engine = Engine::for_kind(entry.kind);
        Self {
            entry,
            engine,
            pump: None,
            generation: 0,
        }
    }

    /// Cancel any pending pump and invalidate ticks already queued from it.
    fn cancel_pump(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.cancel();
        }
        self.generation += 1;
    }

    fn schedule_pump(&mut self, tx: UnboundedSender<AppOp>) {
        self.cancel_pump();
        let period = match self.engine {
            Engine::Stopwatch(_) => STOPWATCH_TICK_MS,
            Engine::Timer(_) => COUNTDOWN_TICK_MS,
        };
        self.pump = Some(Pump::spawn(
            self.entry.id,
            self.generation,
            Duration::from_millis(period),
            tx,
        ));
    }

    fn snapshot(&self) -> Snapshot {
        let (state, time_ms, display, progress, laps, duration_input) = match &self.engine {
            Engine::Stopwatch(sw) => (
                sw.state(),
                sw.elapsed_ms(),
                format_stopwatch(sw.elapsed_ms()),
                sw.progress_percent(),
                sw.laps().to_vec(),
                None,
            ),
            Engine::Timer(cd) => (
                cd.state(),
                cd.remaining_ms(),
                format_timer(cd.remaining_ms()),
                Some(cd.progress_percent()),
                Vec::new(),
                Some(cd.input().to_string()),
            ),
        };
        Snapshot {
            id: self.entry.id,
            kind: self.entry.kind,
            label: self.entry.label.clone(),
            category: self.entry.category().to_string(),
            state,
            time_ms,
            display,
            progress,
            laps,
            duration_input,
        }
    }
}

/// Owns the board: entries, their engines and pumps, and the completed
/// task log.
pub struct TimersApp {
    slots: Vec<TimerSlot>,
    aggregator: TaskAggregator,
    storage: TimerStorage,
    player: Box<dyn SoundPlayer>,
    pump_tx: UnboundedSender<AppOp>,
    next_id: u64,
}

impl TimersApp {
    pub fn new(
        storage: TimerStorage,
        player: Box<dyn SoundPlayer>,
        pump_tx: UnboundedSender<AppOp>,
    ) -> Self {
        let mut entries = storage.load_entries();
        log::info!("Restored {} timer(s) from {}", entries.len(), storage.dir().display());
        let max_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
        let (next_id, renumbered) = match max_id.checked_add(1) {
            Some(next) => (next, false),
            None => {
                log::warn!("Stored timer ids are out of range, renumbering");
                let mut next = 1;
                for entry in &mut entries {
                    entry.id = next;
                    next += 1;
                }
                (next, true)
            }
        };
        let app = Self {
            slots: entries.into_iter().map(TimerSlot::new).collect(),
            aggregator: TaskAggregator::new(),
            storage,
            player,
            pump_tx,
            next_id,
        };
        if renumbered {
            app.persist();
        }
        app
    }

    pub fn handle_intent(&mut self, intent: Intent) -> AppResult<Response> {
        log::debug!("intent {:?}", intent);
        match intent {
            Intent::AddStopwatch { label } => self.add(TimerKind::Stopwatch, label),
            Intent::AddTimer { label } => self.add(TimerKind::Timer, label),
            Intent::Remove { id } => self.remove(id),
            Intent::Start { id } => self.start(id),
            Intent::Stop { id } => self.stop(id),
            Intent::Lap { id } => self.lap(id),
            Intent::Reset { id } => {
                let slot = self.slot_mut(id)?;
                slot.cancel_pump();
                match &mut slot.engine {
                    Engine::Stopwatch(sw) => sw.reset(),
                    Engine::Timer(cd) => cd.reset(),
                }
                Ok(Response::Done)
            }
            Intent::Relabel { id, label } => self.relabel(id, &label),
            Intent::RequestLabel { id } => {
                let current = self.slot_mut(id)?.entry.label.clone();
                Ok(Response::LabelPrompt { id, current })
            }
            Intent::LabelEdited { id, label } => match label {
                Some(label) if !label.trim().is_empty() => self.relabel(id, &label),
                _ => {
                    self.index_of(id)?;
                    log::debug!("label edit for {} cancelled", id);
                    Ok(Response::Done)
                }
            },
            Intent::SetTarget { id, minutes } => match &mut self.slot_mut(id)?.engine {
                Engine::Stopwatch(sw) => {
                    sw.set_target(minutes);
                    Ok(Response::Done)
                }
                Engine::Timer(_) => Err(AppError::wrong_kind(id, TimerKind::Stopwatch)),
            },
            Intent::SetDuration { id, input } => match &mut self.slot_mut(id)?.engine {
                Engine::Timer(cd) => {
                    cd.configure_str(&input)?;
                    Ok(Response::Done)
                }
                Engine::Stopwatch(_) => Err(AppError::wrong_kind(id, TimerKind::Timer)),
            },
            Intent::SetCategory { id, category } => {
                self.slot_mut(id)?.entry.category = category.trim().to_string();
                self.persist();
                Ok(Response::Done)
            }
        }
    }

    /// Apply one pump tick. Returns the report when a countdown finishes.
    pub fn handle_pump(&mut self, id: u64, generation: u64) -> Option<CompletionReport> {
        let Some(slot) = self.slots.iter_mut().find(|s| s.entry.id == id) else {
            log::trace!("tick for removed timer {}", id);
            return None;
        };
        if slot.pump.is_none() || slot.generation != generation {
            log::trace!("stale tick for {} (gen {} != {})", id, generation, slot.generation);
            return None;
        }

        let report = match &mut slot.engine {
            Engine::Stopwatch(sw) => {
                sw.tick();
                return None;
            }
            Engine::Timer(cd) => cd.tick()?,
        };
        slot.cancel_pump();
        let report = report.labelled(&slot.entry.label, slot.entry.category());
        log::info!("timer {} \"{}\" finished", id, report.label());

        self.aggregator.record_completion(report.clone());
        fire_sound(self.player.as_ref(), SoundEvent::Stopped);
        Some(report)
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.slots.iter().map(TimerSlot::snapshot).collect()
    }

    pub fn snapshot(&self, id: u64) -> Option<Snapshot> {
        self.slots.iter().find(|s| s.entry.id == id).map(TimerSlot::snapshot)
    }

    pub fn entries(&self) -> Vec<TimerEntry> {
        self.slots.iter().map(|s| s.entry.clone()).collect()
    }

    pub fn aggregator(&self) -> &TaskAggregator {
        &self.aggregator
    }

    pub fn any_running(&self) -> bool {
        self.slots.iter().any(|s| s.engine.is_running())
    }

    /// Cancel every pump and flush entries to storage.
    pub fn shutdown(&mut self) {
        for slot in &mut self.slots {
            slot.cancel_pump();
        }
        self.persist();
        log::info!("Timers shut down");
    }

    fn add(&mut self, kind: TimerKind, label: Option<String>) -> AppResult<Response> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(AppError::IdsExhausted)?;
        let label = match label.as_deref().map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => match kind {
                TimerKind::Stopwatch => format!("Task {}", self.slots.len() + 1),
                TimerKind::Timer => format!("Timer {}", self.slots.len() + 1),
            },
        };
        self.slots.push(TimerSlot::new(TimerEntry::new(id, kind, label)));
        self.persist();
        Ok(Response::Added(id))
    }

    fn remove(&mut self, id: u64) -> AppResult<Response> {
        let index = self.index_of(id)?;
        let mut slot = self.slots.remove(index);
        slot.cancel_pump();
        self.persist();
        Ok(Response::Done)
    }

    fn start(&mut self, id: u64) -> AppResult<Response> {
        let tx = self.pump_tx.clone();
        let slot = self.slot_mut(id)?;
        let started = match &mut slot.engine {
            Engine::Stopwatch(sw) => sw.start(),
            Engine::Timer(cd) => cd.start()?,
        };
        if started {
            slot.schedule_pump(tx);
            fire_sound(self.player.as_ref(), SoundEvent::Started);
        }
        Ok(Response::Done)
    }

    fn stop(&mut self, id: u64) -> AppResult<Response> {
        let slot = self.slot_mut(id)?;
        slot.cancel_pump();
        let (stopped, report) = match &mut slot.engine {
            Engine::Stopwatch(sw) => match sw.stop() {
                Some(done) => (true, Some(done.labelled(&slot.entry.label, slot.entry.category()))),
                None => (false, None),
            },
            Engine::Timer(cd) => (cd.stop(), None),
        };
        if stopped {
            fire_sound(self.player.as_ref(), SoundEvent::Stopped);
        }
        match report {
            Some(report) => {
                self.aggregator.record_completion(report.clone());
                Ok(Response::Completed(report))
            }
            None => Ok(Response::Done),
        }
    }

    fn lap(&mut self, id: u64) -> AppResult<Response> {
        let lap = match &mut self.slot_mut(id)?.engine {
            Engine::Stopwatch(sw) => sw.lap().cloned(),
            Engine::Timer(_) => return Err(AppError::wrong_kind(id, TimerKind::Stopwatch)),
        };
        match lap {
            Some(lap) => {
                fire_sound(self.player.as_ref(), SoundEvent::Lapped);
                Ok(Response::Lapped(lap))
            }
            None => Ok(Response::Done),
        }
    }

    fn relabel(&mut self, id: u64, label: &str) -> AppResult<Response> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::EmptyLabel);
        }
        self.slot_mut(id)?.entry.label = label.to_string();
        self.persist();
        Ok(Response::Done)
    }

    fn persist(&self) {
        self.storage.save_entries(&self.entries());
    }

    fn index_of(&self, id: u64) -> AppResult<usize> {
        self.slots
            .iter()
            .position(|s| s.entry.id == id)
            .ok_or(AppError::UnknownTimer(id))
    }

    fn slot_mut(&mut self, id: u64) -> AppResult<&mut TimerSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.entry.id == id)
            .ok_or(AppError::UnknownTimer(id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::sleep;

    use super::*;
    use crate::alerts::testing::{Broken, Recorder};
    use crate::storage::testing::temp_dir;

    fn app_with(name: &str, player: Box<dyn SoundPlayer>) -> (TimersApp, UnboundedReceiver<AppOp>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = TimersApp::new(TimerStorage::new(temp_dir(name)), player, tx);
        (app, rx)
    }

    /// Let pump tasks run, then apply every queued tick.
    async fn drain(
        app: &mut TimersApp,
        rx: &mut UnboundedReceiver<AppOp>,
    ) -> Vec<CompletionReport> {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        let mut reports = Vec::new();
        while let Ok(op) = rx.try_recv() {
            if let AppOp::Pump { id, generation } = op {
                reports.extend(app.handle_pump(id, generation));
            }
        }
        reports
    }

    fn added(resp: AppResult<Response>) -> u64 {
        match resp.unwrap() {
            Response::Added(id) => id,
            other => panic!("expected Added, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restores_default_entry() {
        let (app, _rx) = app_with("app_default", Box::new(Recorder::default()));
        let snaps = app.snapshots();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].id, 1);
        assert_eq!(snaps[0].label, "Task 1");
        assert_eq!(snaps[0].display, "00:00.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopwatch_tracks_running_time() {
        let rec = Recorder::default();
        let (mut app, mut rx) = app_with("app_stopwatch", Box::new(rec.clone()));

        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        sleep(Duration::from_millis(1005)).await;
        drain(&mut app, &mut rx).await;
        assert_eq!(app.snapshot(1).unwrap().time_ms, 1000);

        let lap = app.handle_intent(Intent::Lap { id: 1 }).unwrap();
        assert!(matches!(lap, Response::Lapped(LapRecord { sequence: 1, elapsed_ms: 1000, .. })));

        let report = match app.handle_intent(Intent::Stop { id: 1 }).unwrap() {
            Response::Completed(report) => report,
            other => panic!("expected a report, got {other:?}"),
        };
        assert_eq!(report.label(), "Task 1");
        assert_eq!(report.category(), "stopwatch");
        assert_eq!(report.final_duration_ms(), 1000);
        assert_eq!(report.laps().len(), 1);

        // idle interval is not counted
        sleep(Duration::from_millis(2000)).await;
        drain(&mut app, &mut rx).await;
        assert_eq!(app.snapshot(1).unwrap().time_ms, 1000);

        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        sleep(Duration::from_millis(505)).await;
        drain(&mut app, &mut rx).await;
        app.handle_intent(Intent::Stop { id: 1 }).unwrap();
        assert_eq!(app.snapshot(1).unwrap().time_ms, 1500);

        assert_eq!(app.aggregator().total_productive_ms(), 2500);
        assert_eq!(
            *rec.events.borrow(),
            vec![
                SoundEvent::Started,
                SoundEvent::Lapped,
                SoundEvent::Stopped,
                SoundEvent::Started,
                SoundEvent::Stopped
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_intents_are_noops() {
        let rec = Recorder::default();
        let (mut app, mut rx) = app_with("app_redundant", Box::new(rec.clone()));

        assert_eq!(app.handle_intent(Intent::Lap { id: 1 }).unwrap(), Response::Done);
        assert_eq!(app.handle_intent(Intent::Stop { id: 1 }).unwrap(), Response::Done);

        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        sleep(Duration::from_millis(105)).await;
        drain(&mut app, &mut rx).await;
        // a second start must not double the tick rate
        assert_eq!(app.snapshot(1).unwrap().time_ms, 100);
        assert_eq!(*rec.events.borrow(), vec![SoundEvent::Started]);
        assert!(app.aggregator().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_ticks_dropped_after_reset() {
        let (mut app, mut rx) = app_with("app_stale", Box::new(Recorder::default()));

        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        sleep(Duration::from_millis(505)).await;
        tokio::task::yield_now().await;
        // ticks are queued but not applied yet
        app.handle_intent(Intent::Reset { id: 1 }).unwrap();
        drain(&mut app, &mut rx).await;
        let snap = app.snapshot(1).unwrap();
        assert_eq!(snap.time_ms, 0);
        assert_eq!(snap.state, TimerState::Idle);

        // restarting does not revive ticks from the previous run
        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        sleep(Duration::from_millis(55)).await;
        drain(&mut app, &mut rx).await;
        assert_eq!(app.snapshot(1).unwrap().time_ms, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_finishes_once() {
        let rec = Recorder::default();
        let (mut app, mut rx) = app_with("app_countdown", Box::new(rec.clone()));
        let id = added(app.handle_intent(Intent::AddTimer { label: Some("Tea".to_string()) }));
        assert_eq!(id, 2);

        app.handle_intent(Intent::SetDuration { id, input: "00:00:05".to_string() }).unwrap();
        app.handle_intent(Intent::Start { id }).unwrap();
        sleep(Duration::from_millis(3500)).await;
        assert!(drain(&mut app, &mut rx).await.is_empty());
        assert_eq!(app.snapshot(id).unwrap().display, "00:00:02");

        sleep(Duration::from_millis(4000)).await;
        let reports = drain(&mut app, &mut rx).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].label(), "Tea");
        assert_eq!(reports[0].final_duration_ms(), 5000);
        assert!(reports[0].reached_target());

        let snap = app.snapshot(id).unwrap();
        assert_eq!(snap.state, TimerState::Idle);
        assert_eq!(snap.progress, Some(100.0));
        assert_eq!(app.aggregator().len(), 1);
        assert_eq!(
            *rec.events.borrow(),
            vec![SoundEvent::Started, SoundEvent::Stopped]
        );

        // the pump was cancelled with the finish
        sleep(Duration::from_millis(3000)).await;
        assert!(drain(&mut app, &mut rx).await.is_empty());
        assert_eq!(app.aggregator().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_manual_stop_has_no_report() {
        let (mut app, mut rx) = app_with("app_pause", Box::new(Recorder::default()));
        let id = added(app.handle_intent(Intent::AddTimer { label: None }));
        assert_eq!(app.snapshot(id).unwrap().label, "Timer 2");

        app.handle_intent(Intent::SetDuration { id, input: "00:01:00".to_string() }).unwrap();
        app.handle_intent(Intent::Start { id }).unwrap();
        sleep(Duration::from_millis(2500)).await;
        drain(&mut app, &mut rx).await;
        assert_eq!(app.handle_intent(Intent::Stop { id }).unwrap(), Response::Done);

        let snap = app.snapshot(id).unwrap();
        assert_eq!(snap.state, TimerState::Paused);
        assert_eq!(snap.time_ms, 58_000);
        assert!(app.aggregator().is_empty());

        // a new duration is refused until reset
        assert!(matches!(
            app.handle_intent(Intent::SetDuration { id, input: "00:00:10".to_string() }),
            Err(AppError::Timer(timer_core::TimerError::Busy))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_duration_keeps_timer_idle() {
        let (mut app, _rx) = app_with("app_bad_duration", Box::new(Recorder::default()));
        let id = added(app.handle_intent(Intent::AddTimer { label: None }));

        let err = app
            .handle_intent(Intent::SetDuration { id, input: "5 minutes".to_string() })
            .unwrap_err();
        assert!(matches!(err, AppError::Timer(_)));
        assert!(app.handle_intent(Intent::Start { id }).is_err());

        let snap = app.snapshot(id).unwrap();
        assert_eq!(snap.state, TimerState::Idle);
        assert_eq!(snap.time_ms, 0);
        assert!(!app.any_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_cancels_pump() {
        let (mut app, mut rx) = app_with("app_remove", Box::new(Recorder::default()));
        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        app.handle_intent(Intent::Remove { id: 1 }).unwrap();
        assert!(app.snapshots().is_empty());

        sleep(Duration::from_millis(100)).await;
        drain(&mut app, &mut rx).await;
        assert!(rx.try_recv().is_err());
        assert!(matches!(
            app.handle_intent(Intent::Start { id: 1 }),
            Err(AppError::UnknownTimer(1))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_persist_across_restart() {
        let dir = temp_dir("app_persist");
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = TimersApp::new(TimerStorage::new(&dir), Box::new(Recorder::default()), tx);
        let id = added(app.handle_intent(Intent::AddTimer { label: Some("Tea".to_string()) }));
        app.handle_intent(Intent::Relabel { id: 1, label: "Report".to_string() }).unwrap();
        app.handle_intent(Intent::SetCategory { id, category: "break".to_string() }).unwrap();
        app.shutdown();

        let (tx, _rx) = mpsc::unbounded_channel();
        let app = TimersApp::new(TimerStorage::new(&dir), Box::new(Recorder::default()), tx);
        let entries = app.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Report");
        assert_eq!(entries[1].label, "Tea");
        assert_eq!(entries[1].category(), "break");

        // ids keep increasing after a restore
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = TimersApp::new(TimerStorage::new(&dir), Box::new(Recorder::default()), tx);
        assert_eq!(added(app.handle_intent(Intent::AddStopwatch { label: None })), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_stored_ids_are_renumbered() {
        let dir = temp_dir("app_max_id");
        std::fs::create_dir_all(&dir).unwrap();
        let stored = format!(
            r#"[{{"id":5,"type":"timer","label":"Tea"}},
                {{"id":{},"type":"stopwatch","label":"Big"}}]"#,
            u64::MAX
        );
        std::fs::write(dir.join("timers.json"), stored).unwrap();

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = TimersApp::new(TimerStorage::new(&dir), Box::new(Recorder::default()), tx);
        let ids: Vec<u64> = app.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(app.snapshot(2).unwrap().label, "Big");
        assert_eq!(added(app.handle_intent(Intent::AddStopwatch { label: None })), 3);

        // the renumbering was written back
        let reloaded: Vec<u64> =
            TimerStorage::new(&dir).load_entries().iter().map(|e| e.id).collect();
        assert_eq!(reloaded, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_refuses_when_ids_run_out() {
        let dir = temp_dir("app_last_id");
        std::fs::create_dir_all(&dir).unwrap();
        let stored = format!(r#"[{{"id":{},"type":"stopwatch","label":"Last"}}]"#, u64::MAX - 1);
        std::fs::write(dir.join("timers.json"), stored).unwrap();

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = TimersApp::new(TimerStorage::new(&dir), Box::new(Recorder::default()), tx);
        assert!(matches!(
            app.handle_intent(Intent::AddTimer { label: None }),
            Err(AppError::IdsExhausted)
        ));
        assert_eq!(app.entries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_label_edit_round_trip() {
        let (mut app, _rx) = app_with("app_label", Box::new(Recorder::default()));

        let prompt = app.handle_intent(Intent::RequestLabel { id: 1 }).unwrap();
        assert_eq!(prompt, Response::LabelPrompt { id: 1, current: "Task 1".to_string() });

        app.handle_intent(Intent::LabelEdited { id: 1, label: None }).unwrap();
        assert_eq!(app.snapshot(1).unwrap().label, "Task 1");

        app.handle_intent(Intent::LabelEdited { id: 1, label: Some("  Inbox  ".to_string()) })
            .unwrap();
        assert_eq!(app.snapshot(1).unwrap().label, "Inbox");

        assert!(matches!(
            app.handle_intent(Intent::Relabel { id: 1, label: " ".to_string() }),
            Err(AppError::EmptyLabel)
        ));
        assert!(app.handle_intent(Intent::LabelEdited { id: 9, label: None }).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_target_on_stopwatch_only() {
        let (mut app, mut rx) = app_with("app_target", Box::new(Recorder::default()));
        app.handle_intent(Intent::SetTarget { id: 1, minutes: Some(1) }).unwrap();
        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        sleep(Duration::from_millis(45_005)).await;
        drain(&mut app, &mut rx).await;
        assert_eq!(app.snapshot(1).unwrap().progress, Some(75.0));

        let report = match app.handle_intent(Intent::Stop { id: 1 }).unwrap() {
            Response::Completed(r) => r,
            other => panic!("{other:?}"),
        };
        assert_eq!(report.final_duration_ms(), 45_000);
        assert!(!report.reached_target());

        let id = added(app.handle_intent(Intent::AddTimer { label: None }));
        assert!(matches!(
            app.handle_intent(Intent::SetTarget { id, minutes: Some(5) }),
            Err(AppError::WrongKind { .. })
        ));
        assert!(matches!(
            app.handle_intent(Intent::Lap { id }),
            Err(AppError::WrongKind { .. })
        ));
        assert!(matches!(
            app.handle_intent(Intent::SetDuration { id: 1, input: "00:00:01".to_string() }),
            Err(AppError::WrongKind { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sound_failure_does_not_affect_state() {
        let (mut app, mut rx) = app_with("app_broken_sound", Box::new(Broken));
        app.handle_intent(Intent::Start { id: 1 }).unwrap();
        sleep(Duration::from_millis(205)).await;
        drain(&mut app, &mut rx).await;
        app.handle_intent(Intent::Lap { id: 1 }).unwrap();
        let resp = app.handle_intent(Intent::Stop { id: 1 }).unwrap();
        assert!(matches!(resp, Response::Completed(_)));
        assert_eq!(app.snapshot(1).unwrap().laps.len(), 1);
        assert_eq!(app.aggregator().total_productive_ms(), 200);
    }
}
