// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

pub const DEFAULT_FILTER_DEBOUNCE: Duration = Duration::from_millis(250);

/// Coalesces bursts of edits into one action. Each `schedule` bumps the
/// token; when the timer fires the receiver checks `is_current` and drops
/// everything but the newest request.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    token: u64,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_DEBOUNCE)
    }
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self { window, token: 0 }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Sends `make_event(token)` on `tx` once the window has passed.
    pub fn schedule<E, F>(&mut self, tx: &Sender<E>, make_event: F) -> u64
    where
        E: Send + 'static,
        F: FnOnce(u64) -> E + Send + 'static,
    {
        self.token = self.token.wrapping_add(1);
        let token = self.token;
        let window = self.window;
        let sender = tx.clone();
        thread::spawn(move || {
            thread::sleep(window);
            let _ = sender.send(make_event(token));
        });
        token
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.token
    }

    /// Invalidates whatever is pending.
    pub fn cancel(&mut self) {
        self.token = self.token.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_FILTER_DEBOUNCE, Debounce};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn only_the_last_request_in_a_burst_is_current() {
        let (tx, rx) = mpsc::channel();
        let mut debounce = Debounce::new(Duration::from_millis(10));

        let first = debounce.schedule(&tx, |token| token);
        let second = debounce.schedule(&tx, |token| token);
        let third = debounce.schedule(&tx, |token| token);

        let mut fired = Vec::new();
        for _ in 0..3 {
            let token = rx
                .recv_timeout(Duration::from_secs(5))
                .expect("timer fires");
            if debounce.is_current(token) {
                fired.push(token);
            }
        }
        assert_eq!(fired, vec![third]);
        assert!(!debounce.is_current(first));
        assert!(!debounce.is_current(second));
    }

    #[test]
    fn cancel_invalidates_pending_request() {
        let (tx, rx) = mpsc::channel();
        let mut debounce = Debounce::new(Duration::from_millis(1));
        debounce.schedule(&tx, |token| token);
        debounce.cancel();

        let token = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("timer fires");
        assert!(!debounce.is_current(token));
    }

    #[test]
    fn default_window_is_a_quarter_second() {
        assert_eq!(Debounce::default().window(), DEFAULT_FILTER_DEBOUNCE);
        assert_eq!(DEFAULT_FILTER_DEBOUNCE, Duration::from_millis(250));
    }
}
