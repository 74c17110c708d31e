//! Timed playback of the current sequence.
//!
//! Playback is split in two: [`PlaybackScheduler::plan`] computes the exact
//! list of timed cues as a pure function, and [`PlaybackScheduler::play`]
//! walks that plan on tokio timers, forwarding each cue to the state machine
//! tagged with the generation it was issued for.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument, trace};

use super::{CellIndex, Event};

/// Quiet delay before the first cell lights up.
pub const LEAD_IN: Duration = Duration::from_millis(500);
/// How long each cell stays lit.
pub const HOLD: Duration = Duration::from_millis(600);
/// Pause after a cell goes dark, before the next one.
pub const GAP: Duration = Duration::from_millis(200);
/// Pause between a completed round and the next playback.
pub const ROUND_DELAY: Duration = Duration::from_millis(500);

/// Fixed delays used by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackTiming {
    /// Delay before the first activation.
    pub lead_in: Duration,
    /// Time each cell is held active.
    pub hold: Duration,
    /// Gap after clearing a cell.
    pub gap: Duration,
    /// Delay after a completed round before the next playback begins.
    pub round_delay: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            lead_in: LEAD_IN,
            hold: HOLD,
            gap: GAP,
            round_delay: ROUND_DELAY,
        }
    }
}

impl PlaybackTiming {
    /// Multiplies every delay by `factor`. Non-finite or negative factors
    /// collapse the delays to zero.
    pub fn scaled(self, factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            0.0
        };
        Self {
            lead_in: self.lead_in.mul_f64(factor),
            hold: self.hold.mul_f64(factor),
            gap: self.gap.mul_f64(factor),
            round_delay: self.round_delay.mul_f64(factor),
        }
    }
}

/// A playback the state machine wants run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    /// Session generation the playback belongs to.
    pub generation: u64,
    /// Full sequence to replay, from the beginning.
    pub sequence: Vec<CellIndex>,
    /// Extra wait before the lead-in (the post-round delay, or zero).
    pub pre_delay: Duration,
}

/// What happens at a point in a playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCue {
    /// Light up a cell.
    Show(CellIndex),
    /// Turn the lit cell off.
    Clear,
    /// Playback is done; input may open.
    Finish,
}

/// One cue and its offset from the start of the playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStep {
    /// Time since playback was started.
    pub offset: Duration,
    /// Cue fired at `offset`.
    pub cue: PlaybackCue,
}

/// Replays a sequence as timed activate/clear cues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackScheduler {
    timing: PlaybackTiming,
}

impl PlaybackScheduler {
    /// Creates a scheduler with the given timing.
    pub fn new(timing: PlaybackTiming) -> Self {
        Self { timing }
    }

    /// Returns the timing in use.
    pub fn timing(&self) -> PlaybackTiming {
        self.timing
    }

    /// Duration of a playback of `len` cells, excluding any pre-delay.
    pub fn total_duration(&self, len: usize) -> Duration {
        let per_step = self.timing.hold + self.timing.gap;
        let steps = u32::try_from(len).unwrap_or(u32::MAX);
        self.timing.lead_in + per_step * steps
    }

    /// Computes every cue of a playback, in firing order.
    ///
    /// Cells are shown strictly one at a time: each `Show` is followed by a
    /// `Clear` before the next `Show`. The plan always ends with `Finish`.
    #[instrument(skip(self, request), fields(generation = request.generation, len = request.sequence.len()))]
    pub fn plan(&self, request: &PlaybackRequest) -> Vec<PlaybackStep> {
        let mut steps = Vec::with_capacity(request.sequence.len() * 2 + 1);
        let mut offset = request.pre_delay + self.timing.lead_in;

        for &cell in &request.sequence {
            steps.push(PlaybackStep {
                offset,
                cue: PlaybackCue::Show(cell),
            });
            offset += self.timing.hold;
            steps.push(PlaybackStep {
                offset,
                cue: PlaybackCue::Clear,
            });
            offset += self.timing.gap;
        }

        steps.push(PlaybackStep {
            offset,
            cue: PlaybackCue::Finish,
        });
        steps
    }

    /// Runs a playback on tokio timers, sending each cue to `tx`.
    ///
    /// Returns early if the receiving side has gone away. Cancellation is
    /// the caller's business: abort the task, or let the generation tag make
    /// late cues stale.
    #[instrument(skip(self, request, tx), fields(generation = request.generation, len = request.sequence.len()))]
    pub async fn play(self, request: PlaybackRequest, tx: UnboundedSender<Event>) {
        let generation = request.generation;
        let start = Instant::now();
        debug!("Playback started");

        for step in self.plan(&request) {
            sleep_until(start + step.offset).await;
            let event = match step.cue {
                PlaybackCue::Show(cell) => Event::PlaybackStep {
                    generation,
                    active: Some(cell),
                },
                PlaybackCue::Clear => Event::PlaybackStep {
                    generation,
                    active: None,
                },
                PlaybackCue::Finish => Event::PlaybackFinished { generation },
            };
            trace!(?event, offset_ms = step.offset.as_millis() as u64, "Playback cue");
            if tx.send(event).is_err() {
                debug!("Receiver dropped, abandoning playback");
                return;
            }
        }

        debug!("Playback finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sequence: Vec<CellIndex>) -> PlaybackRequest {
        PlaybackRequest {
            generation: 1,
            sequence,
            pre_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_plan_alternates_show_and_clear() {
        let steps = PlaybackScheduler::default().plan(&request(vec![4, 4, 9]));
        let cues: Vec<_> = steps.iter().map(|s| s.cue).collect();
        assert_eq!(
            cues,
            vec![
                PlaybackCue::Show(4),
                PlaybackCue::Clear,
                PlaybackCue::Show(4),
                PlaybackCue::Clear,
                PlaybackCue::Show(9),
                PlaybackCue::Clear,
                PlaybackCue::Finish,
            ]
        );
    }

    #[test]
    fn test_plan_offsets_follow_timing() {
        let scheduler = PlaybackScheduler::default();
        let steps = scheduler.plan(&request(vec![1, 2]));

        let offsets: Vec<_> = steps.iter().map(|s| s.offset.as_millis()).collect();
        assert_eq!(offsets, vec![500, 1100, 1300, 1900, 2100]);
        assert_eq!(
            steps.last().map(|s| s.offset),
            Some(scheduler.total_duration(2))
        );
    }

    #[test]
    fn test_pre_delay_shifts_every_cue() {
        let scheduler = PlaybackScheduler::default();
        let mut delayed = request(vec![1]);
        delayed.pre_delay = ROUND_DELAY;

        let steps = scheduler.plan(&delayed);
        assert_eq!(steps[0].offset, Duration::from_millis(1000));
        assert_eq!(steps[2].offset, ROUND_DELAY + scheduler.total_duration(1));
    }

    #[test]
    fn test_empty_sequence_only_finishes() {
        let steps = PlaybackScheduler::default().plan(&request(Vec::new()));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].cue, PlaybackCue::Finish);
        assert_eq!(steps[0].offset, LEAD_IN);
    }

    #[test]
    fn test_total_duration_saturates_huge_lengths() {
        let scheduler = PlaybackScheduler::default();
        assert_eq!(
            scheduler.total_duration(usize::MAX),
            LEAD_IN + (HOLD + GAP) * u32::MAX
        );
    }

    #[test]
    fn test_scaled_timing() {
        let fast = PlaybackTiming::default().scaled(0.5);
        assert_eq!(fast.hold, Duration::from_millis(300));
        assert_eq!(fast.round_delay, Duration::from_millis(250));
        assert_eq!(PlaybackTiming::default().scaled(f64::NAN).lead_in, Duration::ZERO);
    }
}
