//! Hintergrund-Job fuer die Hollowing-Berechnung.
//!
//! Der Job laeuft auf einem Worker-Thread und liefert sein Ergebnis ueber
//! einen mpsc-Kanal; der Controller pollt jeden Frame mit `try_recv`. Das
//! Ergebnis wird damit erst im naechsten Frame sichtbar — niemals eine
//! teilweise Mutation. Ein erneuter Trigger ersetzt den Empfaenger des
//! alten Jobs (last-write-wins, keine Cancellation).

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::core::TriangleMesh;
use crate::shared::options::HollowingParams;

/// Der externe Hollowing-Schritt: Mesh + Parameter → Shell-Mesh.
///
/// `None` bedeutet, dass die Berechnung fehlgeschlagen ist oder kein
/// Ergebnis liefert.
pub type HollowingEngine =
    Arc<dyn Fn(&TriangleMesh, &HollowingParams) -> Option<TriangleMesh> + Send + Sync>;

/// Laufender Hollowing-Job.
pub struct HollowJob {
    receiver: Receiver<Option<TriangleMesh>>,
}

impl HollowJob {
    /// Startet den Job auf einem Worker-Thread und kehrt sofort zurueck.
    pub fn spawn(engine: HollowingEngine, mesh: Arc<TriangleMesh>, params: HollowingParams) -> Self {
        let (sender, receiver) = channel();
        thread::spawn(move || {
            let result = engine(&mesh, &params);
            // Empfaenger kann bereits durch einen neueren Job ersetzt sein
            let _ = sender.send(result);
        });
        Self { receiver }
    }

    /// Pollt das Job-Ergebnis (nicht-blockierend).
    ///
    /// `None` solange der Job laeuft; `Some(result)` genau einmal, sobald er
    /// fertig ist. Ein abgebrochener Worker (Panic) liefert `Some(None)`.
    pub fn try_take(&mut self) -> Option<Option<TriangleMesh>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Hollowing-Worker wurde ohne Ergebnis beendet");
                Some(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_result(job: &mut HollowJob) -> Option<TriangleMesh> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if let Some(result) = job.try_take() {
                return result;
            }
            assert!(Instant::now() < deadline, "Job-Ergebnis kam nicht rechtzeitig");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn job_delivers_engine_result_on_poll() {
        let engine: HollowingEngine = Arc::new(|mesh, _params| Some(mesh.clone()));
        let mesh = Arc::new(TriangleMesh::cube(5.0));
        let mut job = HollowJob::spawn(engine, mesh.clone(), HollowingParams::default());

        let result = wait_for_result(&mut job).expect("Engine liefert ein Mesh");
        assert_eq!(result.triangle_count(), mesh.triangle_count());
    }

    #[test]
    fn failed_engine_yields_none() {
        let engine: HollowingEngine = Arc::new(|_mesh, _params| None);
        let mut job = HollowJob::spawn(
            engine,
            Arc::new(TriangleMesh::cube(1.0)),
            HollowingParams::default(),
        );
        assert!(wait_for_result(&mut job).is_none());
    }
}
