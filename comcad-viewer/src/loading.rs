//! Plan loading on a worker thread.
//!
//! The UI starts a load and polls for the result once per frame, so parsing a
//! large drawing never blocks painting.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use comcad_core::{load_file, Capabilities, LoadOptions, LoadResult, PdfBackends};

#[derive(Default)]
pub struct BackgroundLoader {
    pending: Option<(PathBuf, Receiver<LoadResult>)>,
}

impl BackgroundLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `path`. A load already in flight is abandoned.
    pub fn start(
        &mut self,
        path: PathBuf,
        options: LoadOptions,
        caps: Capabilities,
        backends: PdfBackends,
    ) {
        if let Some((previous, _)) = &self.pending {
            tracing::debug!("Abandoning load of {}", previous.display());
        }

        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        std::thread::spawn(move || {
            let result = load_file(&worker_path, &options, &caps, &backends);
            // The receiver is gone when the load was abandoned.
            let _ = tx.send(result);
        });
        self.pending = Some((path, rx));
    }

    /// The finished result, once available.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let (path, rx) = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Loader thread for {} exited without a result", path.display());
                self.pending = None;
                None
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_path(&self) -> Option<&Path> {
        self.pending.as_ref().map(|(path, _)| path.as_path())
    }
}
