// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use sublist_app::{Dataset, RecordSource};

use crate::chain::ListingModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadEvent {
    Loading,
    Ready { rows: usize },
    Failed { message: String },
}

/// Cleared when the owning pipeline is dropped; a worker holding a dead
/// token discards its result instead of delivering it.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    alive: Arc<AtomicBool>,
    generation: u64,
}

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct Completion {
    generation: u64,
    outcome: std::result::Result<Dataset, String>,
}

/// Runs the record source on a worker thread and hands the finished dataset
/// back to the owning thread, which swaps it into the model. At most one
/// load runs at a time.
pub struct ReloadPipeline {
    source: Arc<dyn RecordSource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    alive: Arc<AtomicBool>,
    generation: u64,
    in_flight: Option<InFlight>,
}

struct InFlight {
    generation: u64,
    worker: JoinHandle<()>,
}

impl std::fmt::Debug for ReloadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadPipeline")
            .field("generation", &self.generation)
            .field("loading", &self.is_loading())
            .finish()
    }
}

impl ReloadPipeline {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            alive: Arc::new(AtomicBool::new(true)),
            generation: 0,
            in_flight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn liveness(&self) -> LivenessToken {
        LivenessToken {
            alive: Arc::clone(&self.alive),
            generation: self.generation,
        }
    }

    /// Starts a load. Returns `None` without doing anything while a previous
    /// load is still running.
    pub fn trigger(&mut self) -> Result<Option<ReloadEvent>> {
        if self.in_flight.is_some() {
            tracing::debug!(generation = self.generation, "reload already in flight");
            return Ok(None);
        }

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let token = self.liveness();

        let worker = thread::Builder::new()
            .name("sublist-reload".to_owned())
            .spawn(move || {
                let outcome = source
                    .load()
                    .and_then(|dataset| dataset.validate().map(|()| dataset))
                    .map_err(|error| format!("{error:#}"));
                if !token.is_alive() {
                    return;
                }
                let _ = tx.send(Completion {
                    generation,
                    outcome,
                });
            })
            .context("spawn reload worker")?;

        tracing::info!(generation, "reload started");
        self.in_flight = Some(InFlight { generation, worker });
        Ok(Some(ReloadEvent::Loading))
    }

    /// Applies a finished load to `model` if one is ready. Never blocks.
    pub fn poll(&mut self, model: &mut ListingModel) -> Option<ReloadEvent> {
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(event) = self.complete(model, completion) {
                return Some(event);
            }
        }

        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.worker.is_finished());
        if !finished {
            return None;
        }

        // The worker may have sent just before finishing.
        if let Ok(completion) = self.rx.try_recv()
            && let Some(event) = self.complete(model, completion)
        {
            return Some(event);
        }
        self.abandon("reload worker exited without a result")
    }

    /// Blocks until the current load completes or `timeout` passes.
    pub fn wait(&mut self, model: &mut ListingModel, timeout: Duration) -> Option<ReloadEvent> {
        while self.in_flight.is_some() {
            match self.rx.recv_timeout(timeout) {
                Ok(completion) => {
                    if let Some(event) = self.complete(model, completion) {
                        return Some(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return self.poll(model),
                Err(RecvTimeoutError::Disconnected) => {
                    return self.abandon("reload channel closed");
                }
            }
        }
        None
    }

    fn complete(&mut self, model: &mut ListingModel, completion: Completion) -> Option<ReloadEvent> {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == completion.generation);
        if !current {
            tracing::debug!(
                generation = completion.generation,
                "dropping stale reload result"
            );
            return None;
        }
        self.join_worker();

        match completion.outcome {
            Ok(dataset) => {
                let rows = dataset.rows.len();
                model.load(dataset);
                tracing::info!(generation = completion.generation, rows, "reload finished");
                Some(ReloadEvent::Ready { rows })
            }
            Err(message) => {
                tracing::warn!(generation = completion.generation, %message, "reload failed");
                Some(ReloadEvent::Failed { message })
            }
        }
    }

    fn abandon(&mut self, message: &str) -> Option<ReloadEvent> {
        self.join_worker();
        tracing::warn!(generation = self.generation, message, "reload failed");
        Some(ReloadEvent::Failed {
            message: message.to_owned(),
        })
    }

    fn join_worker(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            let _ = in_flight.worker.join();
        }
    }
}

impl Drop for ReloadPipeline {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::{ReloadEvent, ReloadPipeline};
    use crate::chain::ListingModel;
    use crate::row_store::CellPolicy;
    use anyhow::{Result, bail};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use sublist_app::{Column, Dataset, RecordSource, Row};

    const WAIT: Duration = Duration::from_secs(5);

    fn rows(count: usize) -> Dataset {
        Dataset::new(
            vec![Column::new("n", "N")],
            (0..count).map(|n| Row::new().with("n", n)).collect(),
        )
    }

    /// Blocks each load until the test releases it.
    struct GatedSource {
        calls: AtomicUsize,
        gate: Mutex<mpsc::Receiver<Result<Dataset>>>,
    }

    impl RecordSource for GatedSource {
        fn load(&self) -> Result<Dataset> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self
                .gate
                .lock()
                .map_err(|_| anyhow::anyhow!("gate poisoned"))?;
            gate.recv()?
        }
    }

    fn gated() -> (Arc<GatedSource>, mpsc::Sender<Result<Dataset>>) {
        let (tx, rx) = mpsc::channel();
        let source = Arc::new(GatedSource {
            calls: AtomicUsize::new(0),
            gate: Mutex::new(rx),
        });
        (source, tx)
    }

    #[test]
    fn second_trigger_while_loading_is_ignored() -> Result<()> {
        let (source, release) = gated();
        let mut pipeline = ReloadPipeline::new(source.clone());
        let mut model = ListingModel::new(CellPolicy::new());

        assert_eq!(pipeline.trigger()?, Some(ReloadEvent::Loading));
        assert_eq!(pipeline.trigger()?, None);
        assert!(pipeline.is_loading());

        release.send(Ok(rows(4)))?;
        assert_eq!(
            pipeline.wait(&mut model, WAIT),
            Some(ReloadEvent::Ready { rows: 4 })
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.total_rows(), 4);
        assert!(!pipeline.is_loading());
        Ok(())
    }

    #[test]
    fn failure_keeps_the_previous_rows() -> Result<()> {
        let (source, release) = gated();
        let mut pipeline = ReloadPipeline::new(source);
        let mut model = ListingModel::new(CellPolicy::new());

        pipeline.trigger()?;
        release.send(Ok(rows(3)))?;
        pipeline.wait(&mut model, WAIT);

        pipeline.trigger()?;
        release.send(Err(anyhow::anyhow!("subGroup.json unreadable")))?;
        let event = pipeline.wait(&mut model, WAIT);
        assert_eq!(
            event,
            Some(ReloadEvent::Failed {
                message: "subGroup.json unreadable".to_owned()
            })
        );
        assert_eq!(model.total_rows(), 3);

        assert_eq!(pipeline.trigger()?, Some(ReloadEvent::Loading));
        release.send(Ok(rows(1)))?;
        assert_eq!(
            pipeline.wait(&mut model, WAIT),
            Some(ReloadEvent::Ready { rows: 1 })
        );
        Ok(())
    }

    #[test]
    fn invalid_dataset_is_reported_as_failure() -> Result<()> {
        let source = Arc::new(|| -> Result<Dataset> {
            Ok(Dataset::new(
                vec![Column::new("n", "N"), Column::new("n", "Again")],
                Vec::new(),
            ))
        });
        let mut pipeline = ReloadPipeline::new(source);
        let mut model = ListingModel::new(CellPolicy::new());

        pipeline.trigger()?;
        match pipeline.wait(&mut model, WAIT) {
            Some(ReloadEvent::Failed { message }) => {
                assert!(message.contains("duplicate column key"));
            }
            other => bail!("expected failure, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn poll_without_a_load_is_quiet() {
        let source = Arc::new(|| -> Result<Dataset> { Ok(rows(0)) });
        let mut pipeline = ReloadPipeline::new(source);
        let mut model = ListingModel::new(CellPolicy::new());
        assert_eq!(pipeline.poll(&mut model), None);
    }

    #[test]
    fn dropping_the_pipeline_kills_its_token() -> Result<()> {
        let (source, release) = gated();
        let mut pipeline = ReloadPipeline::new(source);
        pipeline.trigger()?;
        let token = pipeline.liveness();
        assert!(token.is_alive());

        drop(pipeline);
        assert!(!token.is_alive());
        let _ = release.send(Ok(rows(2)));
        Ok(())
    }
}
