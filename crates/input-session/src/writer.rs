//! Trace recording.
//!
//! Events are buffered per frame and written out when the frame's `Sync`
//! arrives, so a trace cut short by a crash or kill ends on a frame
//! boundary and always replays cleanly.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use trackpad_common::error::{TrackpadError, TrackpadResult};
use trackpad_touch_model::event::{header_line, TouchEvent, TraceHeader};

/// Writes touch events to a JSONL trace, one complete frame at a time.
pub struct TraceWriter<W: Write = File> {
    out: W,
    frame: String,
    frame_events: usize,
    events_written: u64,
    frames_written: u64,
}

impl TraceWriter {
    /// Create (or truncate) a trace file at `path`.
    pub fn create(path: &Path, header: &TraceHeader) -> TrackpadResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path).map_err(|e| {
            TrackpadError::trace(format!("Failed to create {}: {e}", path.display()))
        })?;
        Self::from_writer(file, header)
    }
}

impl<W: Write> TraceWriter<W> {
    /// Start a trace on `out` by writing the header line.
    pub fn from_writer(mut out: W, header: &TraceHeader) -> TrackpadResult<Self> {
        writeln!(out, "{}", header_line(header)?)
            .and_then(|()| out.flush())
            .map_err(|e| TrackpadError::trace(format!("Failed to write header: {e}")))?;
        Ok(Self {
            out,
            frame: String::new(),
            frame_events: 0,
            events_written: 0,
            frames_written: 0,
        })
    }

    /// Add an event to the open frame; a `Sync` commits the frame.
    pub fn write_event(&mut self, event: &TouchEvent) -> TrackpadResult<()> {
        self.frame.push_str(&serde_json::to_string(event)?);
        self.frame.push('\n');
        self.frame_events += 1;

        if event.is_sync() {
            self.commit_frame()?;
        }
        Ok(())
    }

    fn commit_frame(&mut self) -> TrackpadResult<()> {
        self.out
            .write_all(self.frame.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| TrackpadError::trace(format!("Failed to write frame: {e}")))?;
        self.events_written += self.frame_events as u64;
        self.frames_written += 1;
        self.frame.clear();
        self.frame_events = 0;
        Ok(())
    }

    /// Flush committed frames. An unfinished frame stays buffered.
    pub fn flush(&mut self) -> TrackpadResult<()> {
        self.out
            .flush()
            .map_err(|e| TrackpadError::trace(format!("Failed to flush trace: {e}")))
    }

    /// Events in committed frames.
    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Events waiting for their frame's `Sync`.
    pub fn pending_events(&self) -> usize {
        self.frame_events
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Drop for TraceWriter<W> {
    fn drop(&mut self) {
        if self.frame_events > 0 {
            tracing::debug!(
                events = self.frame_events,
                "Dropping unfinished frame at end of trace"
            );
        }
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "Failed to flush trace");
        }
    }
}
