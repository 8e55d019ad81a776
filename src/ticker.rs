use crate::frame::Frame;
use crate::tick::{Tick, TickSource, TransformedState};

/// The incremental tick collector. Useless and redundant ticks are filtered
/// inline — a traced run may produce one tick per executed line, so the
/// filter only ever compares against the single previous retained tick.
#[derive(Default)]
pub struct Ticker {
    next_tick_id: u64,
    ticks: Vec<Tick>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a candidate tick, dropping it when it observes nothing
    /// (no console text and every component state null) or when it repeats
    /// the previous retained tick without printing anything.
    pub fn tick(
        &mut self,
        source: TickSource,
        lineno: u32,
        console_logs: String,
        states: Vec<Option<TransformedState>>,
    ) {
        let has_console_logs = !console_logs.is_empty();

        if !has_console_logs && states.iter().all(Option::is_none) {
            tracing::trace!(?source, lineno, "dropping useless tick");
            return;
        }

        let candidate = Tick {
            id: self.next_tick_id,
            source,
            lineno,
            console_logs,
            states,
        };

        if !has_console_logs
            && self
                .ticks
                .last()
                .is_some_and(|prev| prev.same_observation(&candidate))
        {
            tracing::trace!(?source, lineno, "dropping redundant tick");
            return;
        }

        self.next_tick_id += 1;
        self.ticks.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Styles every retained tick through `build`, drops meaningless frames,
    /// and compresses the rest.
    #[tracing::instrument(skip_all, fields(ticks = self.ticks.len()))]
    pub fn to_frames<F>(&self, build: F) -> Vec<Frame>
    where
        F: Fn(&Tick) -> Frame,
    {
        let frames = self
            .ticks
            .iter()
            .map(build)
            .filter(Frame::is_meaningful)
            .collect();
        merge_frames(frames)
    }
}

/// The two-phase frame compression.
///
/// Pass 1 walks the list and keeps a frame only when it differs from the
/// previously kept one or carries console text — frames with console text
/// are never silently dropped. Pass 2 coalesces adjacent style-equal frames
/// that both carry console text, so consecutive prints between visually
/// identical states collapse into one frame. Idempotent.
pub fn merge_frames(frames: Vec<Frame>) -> Vec<Frame> {
    // Pass 1: sequential fold against the previous frame.
    let mut kept: Vec<Frame> = Vec::new();
    for frame in frames {
        let keep = match kept.last() {
            None => true,
            Some(prev) => *prev != frame || frame.has_console_logs(),
        };
        if keep {
            kept.push(frame);
        } else {
            tracing::trace!("pass 1 dropped a repeated silent frame");
        }
    }

    // Pass 2: merge runs of equal frames that all print something.
    let mut merged: Vec<Frame> = Vec::with_capacity(kept.len());
    for mut frame in kept {
        let mergeable = merged
            .last()
            .is_some_and(|prev| *prev == frame && prev.has_console_logs() && frame.has_console_logs());
        if mergeable {
            if let Some(earlier) = merged.pop() {
                frame.absorb_earlier(earlier);
            }
        }
        merged.push(frame);
    }

    merged
}
