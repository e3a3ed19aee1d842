//! Integration tests for the location selector and assessment board.
//!
//! Most tests drive the selector with in-process assessment sources whose
//! completion order the test controls; one runs the real requester against a
//! closed port to exercise demo mode end to end.

use floodwatch_common::{Coordinate, EnvironmentalReading, RiskAssessment, RiskLevel};
use floodwatch_predict::{
    AssessmentOutcome, AssessmentRequester, AssessmentSource, FallbackConfig, FallbackRanges,
    ServiceConfig,
};
use floodwatch_runner::{AssessmentBoard, LocationSelector, MapClick};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

fn fixture(coordinate: Coordinate) -> RiskAssessment {
    RiskAssessment {
        location: coordinate,
        environmental_data: EnvironmentalReading {
            rainfall: 120.0,
            elevation: 15.0,
            soil_moisture: 80.0,
            water_level: 3.2,
            river_distance: 1.5,
        },
        flood_risk: RiskLevel::High,
    }
}

// ============================================================================
// Test Sources
// ============================================================================

/// Holds each request until the test releases the gate for its latitude.
struct GatedSource {
    gates: Mutex<HashMap<u64, oneshot::Receiver<()>>>,
}

impl GatedSource {
    fn new(gates: Vec<(f64, oneshot::Receiver<()>)>) -> Self {
        Self {
            gates: Mutex::new(
                gates
                    .into_iter()
                    .map(|(lat, gate)| (lat.to_bits(), gate))
                    .collect(),
            ),
        }
    }
}

impl AssessmentSource for GatedSource {
    fn assess(&self, coordinate: Coordinate) -> impl Future<Output = AssessmentOutcome> + Send {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .remove(&coordinate.latitude().to_bits());
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            AssessmentOutcome::Served(fixture(coordinate))
        }
    }
}

/// Answers immediately and records every coordinate it was asked about.
#[derive(Default)]
struct RecordingSource {
    seen: Mutex<Vec<Coordinate>>,
}

impl AssessmentSource for RecordingSource {
    fn assess(&self, coordinate: Coordinate) -> impl Future<Output = AssessmentOutcome> + Send {
        self.seen.lock().unwrap().push(coordinate);
        async move { AssessmentOutcome::Substituted(fixture(coordinate)) }
    }
}

/// Fails every request by panicking inside the task.
struct PanickingSource;

impl AssessmentSource for PanickingSource {
    fn assess(&self, coordinate: Coordinate) -> impl Future<Output = AssessmentOutcome> + Send {
        async move {
            // Coordinates are always finite, so this always panics.
            if coordinate.latitude().is_finite() {
                panic!("assessment source failure at {}", coordinate);
            }
            AssessmentOutcome::Served(fixture(coordinate))
        }
    }
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn test_scenario_c_late_response_overwrites() {
    let (release_first, first_gate) = oneshot::channel();
    let (release_second, second_gate) = oneshot::channel();
    let source = Arc::new(GatedSource::new(vec![(10.5, first_gate), (20.5, second_gate)]));
    let board = AssessmentBoard::new();
    let selector = LocationSelector::new(source, board.clone());

    let first = selector.on_click(MapClick::new(10.5, 76.2)).unwrap();
    let second = selector.on_click(MapClick::new(20.5, 76.2)).unwrap();
    assert_eq!((first.click, second.click), (1, 2));
    assert!(board.current().is_none());

    // Second response arrives first.
    release_second.send(()).unwrap();
    second.join().await.expect("second request should finish");
    let shown = board.current().unwrap();
    assert_eq!(shown.click, 2);
    assert_eq!(shown.assessment.location, Coordinate::new(20.5, 76.2).unwrap());
    assert!(!board.is_stale());

    // First response arrives later and overwrites it.
    release_first.send(()).unwrap();
    first.join().await.expect("first request should finish");
    let shown = board.current().unwrap();
    assert_eq!(shown.click, 1);
    assert_eq!(shown.assessment.location, Coordinate::new(10.5, 76.2).unwrap());
    assert!(board.is_stale());
}

#[tokio::test]
async fn test_in_order_completion_is_not_stale() {
    let (release_first, first_gate) = oneshot::channel();
    let (release_second, second_gate) = oneshot::channel();
    let source = Arc::new(GatedSource::new(vec![(1.0, first_gate), (2.0, second_gate)]));
    let board = AssessmentBoard::new();
    let selector = LocationSelector::new(source, board.clone());

    let first = selector.on_click(MapClick::new(1.0, 0.0)).unwrap();
    let second = selector.on_click(MapClick::new(2.0, 0.0)).unwrap();

    release_first.send(()).unwrap();
    first.join().await.unwrap();
    release_second.send(()).unwrap();
    second.join().await.unwrap();

    assert_eq!(board.current().unwrap().click, 2);
    assert!(!board.is_stale());
}

#[tokio::test]
async fn test_board_subscribers_see_replacements() {
    let source = Arc::new(RecordingSource::default());
    let board = AssessmentBoard::new();
    let selector = LocationSelector::new(source, board.clone());
    let mut updates = board.subscribe();

    let handle = selector.on_click(MapClick::new(5.0, 5.0)).unwrap();
    handle.join().await.unwrap();

    updates.changed().await.unwrap();
    let shown = updates.borrow_and_update().clone().unwrap();
    assert_eq!(shown.click, 1);
    assert!(shown.demo);
}

// ============================================================================
// Click Handling
// ============================================================================

#[tokio::test]
async fn test_one_request_per_click() {
    let source = Arc::new(RecordingSource::default());
    let board = AssessmentBoard::new();
    let selector = LocationSelector::new(Arc::clone(&source), board.clone());

    let handles: Vec<_> = (0..5)
        .map(|i| selector.on_click(MapClick::new(i as f64, 0.0)).unwrap())
        .collect();
    for handle in handles {
        assert!(handle.join().await.is_some());
    }

    assert_eq!(source.seen.lock().unwrap().len(), 5);
    assert_eq!(selector.click_count(), 5);
    assert_eq!(board.latest_click(), 5);
}

#[tokio::test]
async fn test_click_is_normalized_before_request() {
    let source = Arc::new(RecordingSource::default());
    let selector = LocationSelector::new(Arc::clone(&source), AssessmentBoard::new());

    let handle = selector.on_click(MapClick::new(10.5, 436.25)).unwrap();
    assert_eq!(handle.coordinate, Coordinate::new(10.5, 76.25).unwrap());
    handle.join().await.unwrap();

    assert_eq!(
        source.seen.lock().unwrap().as_slice(),
        &[Coordinate::new(10.5, 76.25).unwrap()]
    );
}

#[tokio::test]
async fn test_non_finite_click_is_ignored() {
    let source = Arc::new(RecordingSource::default());
    let board = AssessmentBoard::new();
    let selector = LocationSelector::new(Arc::clone(&source), board.clone());

    assert!(selector.on_click(MapClick::new(f64::NAN, 10.0)).is_none());
    assert_eq!(selector.click_count(), 0);
    assert_eq!(board.latest_click(), 0);
    assert!(source.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_task_publishes_nothing() {
    let board = AssessmentBoard::new();
    let selector = LocationSelector::new(Arc::new(PanickingSource), board.clone());

    let handle = selector.on_click(MapClick::new(10.5, 76.2)).unwrap();
    assert_eq!(handle.click, 1);
    assert!(handle.join().await.is_none());

    assert!(board.current().is_none());
    assert_eq!(board.latest_click(), 1);
}

// ============================================================================
// End to End
// ============================================================================

#[tokio::test]
async fn test_unreachable_service_shows_demo_result() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = ServiceConfig {
        base_url: format!("http://{}", addr),
        timeout_ms: Some(2000),
        no_proxy: true,
    };
    let fallback = FallbackConfig {
        seed: Some(3),
        ..FallbackConfig::default()
    };
    let requester = Arc::new(AssessmentRequester::new(&service, &fallback).unwrap());
    let board = AssessmentBoard::new();
    let selector = LocationSelector::new(requester, board.clone());

    let outcome = selector
        .on_click(MapClick::new(10.5, 76.2))
        .unwrap()
        .join()
        .await
        .unwrap();
    assert!(outcome.is_demo());

    let shown = board.current().unwrap();
    assert!(shown.demo);
    assert_eq!(shown.assessment.location, Coordinate::new(10.5, 76.2).unwrap());
    assert!(FallbackRanges::default().contains(&shown.assessment.environmental_data));
}
