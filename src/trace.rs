//! In-RAM history of controller transitions.
//!
//! The die has no serial port, so the last few transitions are kept in a small
//! ring that a debugger (or the host simulator) can dump with `ufmt`.
use crate::timer::TimerMode;
#[cfg(any(test, feature = "trace"))]
use heapless::HistoryBuffer;
use ufmt::derive::uDebug;

pub const TRACE_DEPTH: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum TraceEvent {
    Armed { mode: TimerMode, seed: u8 },
    Released { counter: u8, mix: u8, face: u8 },
    AnimationTick { face: u8 },
    TimedOut,
}

/// Without the `trace` feature the log keeps nothing, so firmware builds pay no
/// SRAM for it. Unit tests always keep the history.
pub struct TraceLog {
    #[cfg(any(test, feature = "trace"))]
    events: HistoryBuffer<TraceEvent, TRACE_DEPTH>,
}

#[cfg(any(test, feature = "trace"))]
impl TraceLog {
    pub const fn new() -> Self {
        TraceLog {
            events: HistoryBuffer::new(),
        }
    }

    #[inline(always)]
    pub fn record(&mut self, event: TraceEvent) {
        self.events.write(event);
    }

    pub fn last(&self) -> Option<&TraceEvent> {
        self.events.recent()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.oldest_ordered()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(not(any(test, feature = "trace")))]
impl TraceLog {
    pub const fn new() -> Self {
        TraceLog {}
    }

    #[inline(always)]
    pub fn record(&mut self, _event: TraceEvent) {}

    pub fn last(&self) -> Option<&TraceEvent> {
        None
    }

    pub fn len(&self) -> usize {
        0
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceEvent> {
        core::iter::empty()
    }

    pub fn clear(&mut self) {}
}

impl TraceLog {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dump<W: ufmt::uWrite + ?Sized>(&self, w: &mut W) -> Result<(), W::Error> {
        for event in self.iter() {
            ufmt::uwriteln!(w, "{:?}", event)?;
        }
        Ok(())
    }
}

impl Default for TraceLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_most_recent_events() {
        let mut log = TraceLog::new();
        for face in 0..(TRACE_DEPTH as u8 + 3) {
            log.record(TraceEvent::AnimationTick { face });
        }
        assert_eq!(log.len(), TRACE_DEPTH);
        assert_eq!(
            log.iter().next(),
            Some(&TraceEvent::AnimationTick { face: 3 })
        );
        assert_eq!(
            log.last(),
            Some(&TraceEvent::AnimationTick {
                face: TRACE_DEPTH as u8 + 2
            })
        );
    }

    #[test]
    fn dump_renders_with_ufmt() {
        let mut log = TraceLog::new();
        log.record(TraceEvent::Armed {
            mode: TimerMode::EntropyCollect,
            seed: 3,
        });
        log.record(TraceEvent::Released {
            counter: 5,
            mix: 6,
            face: 1,
        });
        log.record(TraceEvent::TimedOut);

        let mut out = String::new();
        log.dump(&mut out).unwrap();
        assert_eq!(
            out,
            "Armed { mode: EntropyCollect, seed: 3 }\n\
             Released { counter: 5, mix: 6, face: 1 }\n\
             TimedOut\n"
        );
    }
}
