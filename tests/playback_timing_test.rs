//! Tests for playback timing on tokio's paused clock.

use std::time::Duration;

use color_rush::{
    CellIndex, Event, GAP, HOLD, LEAD_IN, PlaybackRequest, PlaybackScheduler, PlaybackTiming,
    ROUND_DELAY,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

fn request(sequence: Vec<CellIndex>, pre_delay: Duration) -> PlaybackRequest {
    PlaybackRequest {
        generation: 4,
        sequence,
        pre_delay,
    }
}

/// Runs a playback to completion, recording when each event arrived.
async fn record(request: PlaybackRequest) -> Vec<(Duration, Event)> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let start = Instant::now();
    tokio::spawn(PlaybackScheduler::default().play(request, tx));

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push((start.elapsed(), event));
    }
    events
}

#[tokio::test(start_paused = true)]
async fn test_cells_highlighted_in_order_one_at_a_time() {
    let sequence = vec![3, 3, 12, 0];
    let events = record(request(sequence.clone(), Duration::ZERO)).await;

    let mut shown = Vec::new();
    let mut lit: Option<CellIndex> = None;
    for (_, event) in &events {
        if let Event::PlaybackStep { active, generation } = event {
            assert_eq!(*generation, 4);
            match active {
                Some(cell) => {
                    assert!(lit.is_none(), "two cells lit at once");
                    lit = Some(*cell);
                    shown.push(*cell);
                }
                None => {
                    assert!(lit.is_some(), "clear without a lit cell");
                    lit = None;
                }
            }
        }
    }

    assert_eq!(shown, sequence);
    assert!(lit.is_none());
    assert_eq!(
        events.last().map(|(_, e)| *e),
        Some(Event::PlaybackFinished { generation: 4 })
    );
}

#[tokio::test(start_paused = true)]
async fn test_events_arrive_on_schedule() {
    let events = record(request(vec![1, 2], Duration::ZERO)).await;
    let times: Vec<Duration> = events.iter().map(|(t, _)| *t).collect();

    assert_eq!(
        times,
        vec![
            LEAD_IN,
            LEAD_IN + HOLD,
            LEAD_IN + HOLD + GAP,
            LEAD_IN + HOLD * 2 + GAP,
            LEAD_IN + (HOLD + GAP) * 2,
        ]
    );
    assert_eq!(
        times.last().copied(),
        Some(PlaybackScheduler::default().total_duration(2))
    );
}

#[tokio::test(start_paused = true)]
async fn test_round_delay_precedes_lead_in() {
    let events = record(request(vec![6], ROUND_DELAY)).await;
    assert_eq!(events[0].0, ROUND_DELAY + LEAD_IN);
    assert_eq!(
        events.last().map(|(t, _)| *t),
        Some(ROUND_DELAY + PlaybackScheduler::default().total_duration(1))
    );
}

#[tokio::test(start_paused = true)]
async fn test_playback_stops_when_receiver_dropped() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let start = Instant::now();
    let playback = PlaybackScheduler::default().play(request(vec![1, 2, 3], Duration::ZERO), tx);
    tokio::spawn(playback).await.expect("playback task");

    // Only the first cue is ever attempted
    assert!(start.elapsed() < LEAD_IN + HOLD);
}

#[tokio::test(start_paused = true)]
async fn test_custom_timing() {
    let timing = PlaybackTiming {
        lead_in: Duration::from_millis(10),
        hold: Duration::from_millis(20),
        gap: Duration::from_millis(5),
        round_delay: Duration::ZERO,
    };
    let scheduler = PlaybackScheduler::new(timing);
    assert_eq!(scheduler.total_duration(3), Duration::from_millis(85));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let start = Instant::now();
    tokio::spawn(scheduler.play(request(vec![0, 1, 2], Duration::ZERO), tx));
    let mut last = None;
    while let Some(event) = rx.recv().await {
        last = Some((start.elapsed(), event));
    }
    assert_eq!(
        last,
        Some((Duration::from_millis(85), Event::PlaybackFinished { generation: 4 }))
    );
}
