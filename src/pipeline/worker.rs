//! Background classification worker.
//!
//! A [`ClassifierWorker`] owns a [`Pipeline`] on a dedicated thread so that an
//! interactive caller never blocks on decoding or inference. Requests are
//! served in submission order; each one completes through a callback or a
//! [`PendingVerdict`] handle.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use ::image::DynamicImage;

use crate::error::{Error, Result};
use crate::model::InferenceEngine;
use crate::verdict::Verdict;

use super::Pipeline;

/// Input for one classification request.
#[derive(Debug, Clone)]
pub enum Scan {
    /// Scan file to decode on the worker.
    File(PathBuf),
    /// Already decoded image.
    Decoded(DynamicImage),
}

impl From<PathBuf> for Scan {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<DynamicImage> for Scan {
    fn from(img: DynamicImage) -> Self {
        Self::Decoded(img)
    }
}

type Callback = Box<dyn FnOnce(Result<Verdict>) + Send>;

struct Job {
    scan: Scan,
    on_complete: Callback,
}

/// Handle to a verdict that is still being computed.
pub struct PendingVerdict {
    rx: mpsc::Receiver<Result<Verdict>>,
}

impl PendingVerdict {
    /// Block until the verdict is ready.
    ///
    /// # Errors
    ///
    /// Returns the classification error, or [`Error::WorkerStopped`] if the
    /// worker went away before answering.
    pub fn wait(self) -> Result<Verdict> {
        self.rx.recv().map_err(|_| Error::WorkerStopped)?
    }

    /// The verdict if it is ready, without blocking.
    #[must_use]
    pub fn try_wait(&self) -> Option<Result<Verdict>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(Error::WorkerStopped)),
        }
    }
}

/// Dedicated thread running a classification pipeline.
pub struct ClassifierWorker {
    tx: Option<mpsc::Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl ClassifierWorker {
    /// Move `pipeline` onto a new worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<E>(pipeline: Pipeline<E>) -> Result<Self>
    where
        E: InferenceEngine + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Job>();

        let handle = thread::Builder::new()
            .name("lungscan-worker".to_string())
            .spawn(move || run(pipeline, &rx))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue a scan; `on_complete` fires once its verdict is resolved.
    ///
    /// If the worker has stopped, `on_complete` is called immediately with
    /// [`Error::WorkerStopped`]. A panic in `on_complete` is logged and does
    /// not stop the worker.
    pub fn submit_with<F>(&self, scan: impl Into<Scan>, on_complete: F)
    where
        F: FnOnce(Result<Verdict>) + Send + 'static,
    {
        let job = Job {
            scan: scan.into(),
            on_complete: Box::new(on_complete),
        };

        let Some(tx) = &self.tx else {
            (job.on_complete)(Err(Error::WorkerStopped));
            return;
        };

        if let Err(mpsc::SendError(job)) = tx.send(job) {
            (job.on_complete)(Err(Error::WorkerStopped));
        }
    }

    /// Queue a scan and get a handle to wait on.
    pub fn submit(&self, scan: impl Into<Scan>) -> PendingVerdict {
        let (tx, rx) = mpsc::channel();
        self.submit_with(scan, move |result| {
            // Receiver may have been dropped by a caller that stopped caring.
            let _ = tx.send(result);
        });
        PendingVerdict { rx }
    }
}

impl Drop for ClassifierWorker {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Classification worker panicked");
            }
        }
    }
}

fn run<E: InferenceEngine>(mut pipeline: Pipeline<E>, rx: &mpsc::Receiver<Job>) {
    tracing::debug!("Classification worker started");

    for job in rx {
        let result = match &job.scan {
            Scan::File(path) => pipeline.classify_file(path),
            Scan::Decoded(img) => pipeline.classify_image(img),
        };

        if let Err(err) = &result {
            tracing::warn!("Classification failed: {err}");
        }

        let on_complete = job.on_complete;
        if panic::catch_unwind(AssertUnwindSafe(move || on_complete(result))).is_err() {
            tracing::error!("Verdict callback panicked");
        }
    }

    tracing::debug!("Classification worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::pipeline::classify::tests::FixedEngine;
    use crate::verdict::{ConfidenceBand, TissueClass};

    fn worker(scores: &[f32]) -> ClassifierWorker {
        ClassifierWorker::spawn(Pipeline::with_engine(FixedEngine::new(scores))).unwrap()
    }

    #[test]
    fn test_submit_and_wait() {
        let worker = worker(&[0.961, 0.02, 0.019]);

        let verdict = worker.submit(DynamicImage::new_rgb8(50, 50)).wait().unwrap();

        assert_eq!(verdict.class, TissueClass::Adenocarcinoma);
        assert_eq!(verdict.band, ConfidenceBand::Uncertain);
    }

    #[test]
    fn test_callbacks_in_order() {
        let worker = worker(&[0.0, 1.0, 0.0]);
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in 0..4 {
            let order = Arc::clone(&order);
            worker.submit_with(DynamicImage::new_rgb8(10, 10), move |result| {
                assert!(result.is_ok());
                order.lock().unwrap().push(id);
            });
        }
        drop(worker);

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_panicking_callback_keeps_worker() {
        let worker = worker(&[0.0, 0.0, 1.0]);
        let fired = Arc::new(Mutex::new(0));

        worker.submit_with(DynamicImage::new_rgb8(8, 8), |_| panic!("callback failure"));
        for _ in 0..2 {
            let fired = Arc::clone(&fired);
            worker.submit_with(DynamicImage::new_rgb8(8, 8), move |result| {
                assert!(result.is_ok());
                *fired.lock().unwrap() += 1;
            });
        }

        let verdict = worker.submit(DynamicImage::new_rgb8(8, 8)).wait().unwrap();
        assert_eq!(verdict.class, TissueClass::SquamousCellCarcinoma);
        assert_eq!(*fired.lock().unwrap(), 2);
    }

    #[test]
    fn test_error_delivered() {
        let worker = worker(&[1.0, 0.0, 0.0]);

        let err = worker
            .submit(PathBuf::from("no/such/scan.png"))
            .wait()
            .unwrap_err();

        assert!(matches!(err, Error::ImageLoad { .. }));
    }

    #[test]
    fn test_submit_after_stop() {
        let mut worker = worker(&[1.0, 0.0, 0.0]);
        drop(worker.tx.take());

        let err = worker.submit(DynamicImage::new_rgb8(1, 1)).wait().unwrap_err();
        assert!(matches!(err, Error::WorkerStopped));
    }
}
