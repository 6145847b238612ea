use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::config::StandingsSource;
use crate::standings_fetch::load_database;
use crate::state::{Delta, ProviderCommand};

/// Load the standings once in the background, then again on every `Reload`.
/// The thread exits when the command channel closes.
pub fn spawn_loader(source: StandingsSource, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        load_and_send(&source, &tx);
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Reload => load_and_send(&source, &tx),
            }
        }
    });
}

fn load_and_send(source: &StandingsSource, tx: &Sender<Delta>) {
    let _ = tx.send(Delta::Log(format!(
        "[INFO] Loading standings from {}",
        source.describe()
    )));
    match load_database(source) {
        Ok(database) => {
            let _ = tx.send(Delta::SetDatabase {
                source: source.describe(),
                database,
            });
        }
        Err(err) => {
            let _ = tx.send(Delta::LoadFailed(format!("{err:#}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn demo_source_loads_and_reloads() {
        let (tx, rx) = mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel();
        spawn_loader(StandingsSource::Demo { seed: Some(5) }, tx, cmd_rx);

        let mut loaded = 0;
        cmd_tx.send(ProviderCommand::Reload).expect("loader alive");
        while loaded < 2 {
            match rx.recv_timeout(Duration::from_secs(10)).expect("delta") {
                Delta::SetDatabase { database, .. } => {
                    assert_eq!(database.len(), 3);
                    loaded += 1;
                }
                Delta::Log(_) => {}
                Delta::LoadFailed(err) => panic!("unexpected failure: {err}"),
            }
        }
    }

    #[test]
    fn missing_file_reports_failure() {
        let (tx, rx) = mpsc::channel();
        let (_cmd_tx, cmd_rx) = mpsc::channel();
        spawn_loader(
            StandingsSource::File("/nonexistent/standings.json".into()),
            tx,
            cmd_rx,
        );
        loop {
            match rx.recv_timeout(Duration::from_secs(10)).expect("delta") {
                Delta::LoadFailed(err) => {
                    assert!(err.contains("/nonexistent/standings.json"));
                    break;
                }
                Delta::Log(_) => {}
                Delta::SetDatabase { .. } => panic!("file should not load"),
            }
        }
    }
}
