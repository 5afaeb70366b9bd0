//! Background worker thread: network fetches run here, one at a time.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Every
//! response carries the ticket it was requested with; the controller decides
//! whether it is still current.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use updown_core::controller::LoadTicket;
use updown_core::data::{FetchError, MarketDataProvider};
use updown_core::domain::Series;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Fetch { ticket: LoadTicket },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Fetched {
        ticket: LoadTicket,
        result: Result<Series, FetchError>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    provider: Box<dyn MarketDataProvider>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("updown-worker".into())
        .spawn(move || worker_loop(provider.as_ref(), rx, tx))
}

/// Ask the worker to stop. Joins only when no fetch is in flight.
pub fn shutdown_worker(
    tx: &Sender<WorkerCommand>,
    handle: JoinHandle<()>,
    fetch_in_flight: bool,
) {
    let _ = tx.send(WorkerCommand::Shutdown);
    if fetch_in_flight {
        debug!("leaving worker to finish its fetch");
        return;
    }
    let _ = handle.join();
}

fn worker_loop(
    provider: &dyn MarketDataProvider,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) {
    info!(provider = provider.name(), "worker started");
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Fetch { ticket }) => {
                debug!(ticker = %ticket.ticker, generation = ticket.generation, "fetch");
                let result = provider.fetch_daily(&ticket.ticker);
                if tx.send(WorkerResponse::Fetched { ticket, result }).is_err() {
                    break;
                }
            }
        }
    }
    info!("worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::mpsc;
    use std::time::Duration;
    use updown_core::domain::DayBar;

    struct StaticProvider;

    impl MarketDataProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        fn fetch_daily(&self, symbol: &str) -> Result<Series, FetchError> {
            if symbol == "GOOD" {
                let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
                Ok(Series::from_bars(vec![DayBar::new(date, 10.0)]))
            } else {
                Err(FetchError::InvalidSymbol {
                    symbol: symbol.to_string(),
                })
            }
        }
    }

    fn ticket(ticker: &str, generation: u64) -> LoadTicket {
        LoadTicket {
            ticker: ticker.to_string(),
            generation,
        }
    }

    #[test]
    fn fetches_in_order_and_echoes_tickets() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(StaticProvider), cmd_rx, resp_tx).unwrap();

        cmd_tx.send(WorkerCommand::Fetch { ticket: ticket("GOOD", 1) }).unwrap();
        cmd_tx.send(WorkerCommand::Fetch { ticket: ticket("BAD", 2) }).unwrap();

        let WorkerResponse::Fetched { ticket: t1, result: r1 } =
            resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(t1, ticket("GOOD", 1));
        assert_eq!(r1.unwrap().len(), 1);

        let WorkerResponse::Fetched { ticket: t2, result: r2 } =
            resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(t2.generation, 2);
        assert!(matches!(r2, Err(FetchError::InvalidSymbol { .. })));

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    /// Blocks every fetch until the test releases it.
    struct GatedProvider(std::sync::Mutex<mpsc::Receiver<()>>);

    impl MarketDataProvider for GatedProvider {
        fn name(&self) -> &str {
            "gated"
        }

        fn fetch_daily(&self, _symbol: &str) -> Result<Series, FetchError> {
            let _ = self.0.lock().unwrap().recv();
            Err(FetchError::Network("released".into()))
        }
    }

    #[test]
    fn shutdown_does_not_wait_on_a_blocked_fetch() {
        let (gate_tx, gate_rx) = mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let provider = GatedProvider(std::sync::Mutex::new(gate_rx));
        let handle = spawn_worker(Box::new(provider), cmd_rx, resp_tx).unwrap();
        cmd_tx.send(WorkerCommand::Fetch { ticket: ticket("SLOW", 1) }).unwrap();

        let (done_tx, done_rx) = mpsc::channel();
        let tx = cmd_tx.clone();
        std::thread::spawn(move || {
            shutdown_worker(&tx, handle, true);
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());

        gate_tx.send(()).unwrap();
        assert!(resp_rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn shutdown_joins_an_idle_worker() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(StaticProvider), cmd_rx, resp_tx).unwrap();
        shutdown_worker(&cmd_tx, handle, false);
        assert!(cmd_tx.send(WorkerCommand::Shutdown).is_err());
    }

    #[test]
    fn stops_when_commands_hang_up() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(StaticProvider), cmd_rx, resp_tx).unwrap();
        drop(cmd_tx);
        handle.join().unwrap();
    }
}
