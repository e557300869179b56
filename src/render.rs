//! Renderer port
//!
//! The game loop hands each renderer an owned [`GameSnapshot`] after every
//! tick. Drawing itself (fonts, colours, pixels) lives outside this crate.

use std::io::Write;

use crate::sim::{GamePhase, GameSnapshot, Score};

pub trait Renderer {
    fn render(&mut self, snapshot: &GameSnapshot);
}

/// Draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &GameSnapshot) {}
}

/// Logs phase and score changes
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: Option<(GamePhase, Score)>,
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &GameSnapshot) {
        let current = (snapshot.phase, snapshot.score);
        if self.last == Some(current) {
            return;
        }

        let text = match (snapshot.headline(), snapshot.phase) {
            (Some(text), _) => text,
            (None, GamePhase::Menu { selection }) => format!("Menu > {}", selection.label()),
            (None, phase) => phase.name().to_string(),
        };
        log::debug!("[{}] {} | {}", snapshot.tick, snapshot.scoreboard(), text);
        self.last = Some(current);
    }
}

/// Streams snapshots as JSON lines
///
/// Writes one line every `every` ticks and whenever the phase or score
/// changes. After the first write error the sink goes quiet.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    every: u64,
    last: Option<(GamePhase, Score)>,
    failed: bool,
    written: u64,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            every: every.max(1),
            last: None,
            failed: false,
            written: 0,
        }
    }

    /// Lines written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, snapshot: &GameSnapshot) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, snapshot: &GameSnapshot) {
        if self.failed {
            return;
        }
        let current = (snapshot.phase, snapshot.score);
        let changed = self.last != Some(current);
        if !changed && snapshot.tick % self.every != 0 {
            return;
        }
        self.last = Some(current);

        match self.write_line(snapshot) {
            Ok(()) => self.written += 1,
            Err(e) => {
                log::warn!("Snapshot stream closed: {}", e);
                self.failed = true;
            }
        }
    }
}

/// Keeps every snapshot; used by tests and replay tooling
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub frames: Vec<GameSnapshot>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<&GameSnapshot> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, snapshot: &GameSnapshot) {
        self.frames.push(snapshot.clone());
    }
}
