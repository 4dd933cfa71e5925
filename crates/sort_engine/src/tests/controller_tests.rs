use std::time::Duration;

use tokio::time::sleep;

use super::*;

fn settings(speed: Speed) -> EngineSettings {
    EngineSettings {
        array_size: 20,
        speed,
        seed: Some(7),
        ..EngineSettings::default()
    }
}

fn reversed(len: u32) -> Vec<u32> {
    (1..=len).rev().collect()
}

fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn is_sorted(values: &[u32]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

#[tokio::test(start_paused = true)]
async fn new_controller_starts_idle_with_a_generated_sequence() {
    let controller = RunController::new(settings(Speed::DEFAULT));
    assert_eq!(controller.state(), RunState::Idle);
    assert_eq!(controller.operations(), 0);
    assert_eq!(controller.array_size(), 20);
    let values = controller.snapshot();
    assert_eq!(values.len(), 20);
    assert!(values.iter().all(|v| (1..=400).contains(v)));
    assert_eq!(controller.current_run(), None);
}

#[tokio::test(start_paused = true)]
async fn seeded_controllers_generate_identical_sequences() {
    let a = RunController::new(settings(Speed::DEFAULT));
    let b = RunController::new(settings(Speed::DEFAULT));
    assert_eq!(a.snapshot(), b.snapshot());
}

#[tokio::test(start_paused = true)]
async fn a_started_run_sorts_the_sequence_and_completes() {
    let mut controller = RunController::new(settings(Speed::MAX));
    let before = controller.snapshot();

    let run_id = controller.start(AlgorithmId::QuickSort).expect("started");
    assert_eq!(run_id, RunId(1));
    assert_eq!(controller.state(), RunState::Running);
    assert_eq!(
        controller.current_run(),
        Some((RunId(1), AlgorithmId::QuickSort))
    );

    assert_eq!(controller.wait_for_run().await, RunState::Completed);
    let after = controller.snapshot();
    assert!(is_sorted(&after));
    let mut expected = before;
    expected.sort_unstable();
    assert_eq!(after, expected);
    assert!(controller.operations() > 0);
}

#[tokio::test(start_paused = true)]
async fn start_is_ignored_while_a_run_is_active() {
    let mut controller = RunController::new(settings(Speed::MIN));
    assert!(controller.start(AlgorithmId::BubbleSort).is_some());
    assert_eq!(controller.start(AlgorithmId::HeapSort), None);

    assert!(controller.pause());
    assert_eq!(controller.state(), RunState::Paused);
    assert_eq!(controller.start(AlgorithmId::HeapSort), None);
    assert_eq!(
        controller.current_run(),
        Some((RunId(1), AlgorithmId::BubbleSort))
    );
}

#[tokio::test(start_paused = true)]
async fn a_completed_sequence_can_be_run_again() {
    let mut controller = RunController::new(settings(Speed::MAX));
    controller.start(AlgorithmId::MergeSort).expect("first run");
    assert_eq!(controller.wait_for_run().await, RunState::Completed);

    let second = controller.start(AlgorithmId::BubbleSort).expect("second run");
    assert_eq!(second, RunId(2));
    assert_eq!(controller.wait_for_run().await, RunState::Completed);
    // Already sorted: bubble sort finds nothing to swap.
    assert_eq!(controller.operations(), 0);
}

#[tokio::test(start_paused = true)]
async fn reset_is_idempotent_and_zeroes_the_counter() {
    let mut controller = RunController::new(settings(Speed::DEFAULT));
    controller.reset();
    controller.reset();
    assert_eq!(controller.state(), RunState::Cancelled);
    assert_eq!(controller.operations(), 0);
    assert_eq!(controller.snapshot().len(), 20);
    assert_eq!(controller.current_run(), None);
}

#[tokio::test(start_paused = true)]
async fn reset_mid_run_silences_the_old_run() {
    let mut controller = RunController::new(settings(Speed::MAX));
    let mut rx = controller.subscribe_events();
    controller.start(AlgorithmId::InsertionSort).expect("started");
    sleep(Duration::from_millis(15)).await;
    assert!(controller.operations() > 0);

    controller.reset();
    assert_eq!(controller.state(), RunState::Cancelled);
    assert_eq!(controller.operations(), 0);
    let fresh = controller.snapshot();
    assert_eq!(fresh.len(), 20);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(controller.snapshot(), fresh);

    let events = drain(&mut rx);
    let reset_at = events
        .iter()
        .position(|event| matches!(event, EngineEvent::SequenceReset { .. }))
        .expect("sequence reset event");
    let after_reset = &events[reset_at + 1..];
    assert!(after_reset
        .iter()
        .all(|event| !matches!(event, EngineEvent::Step { .. })));
    assert!(after_reset.iter().any(|event| matches!(
        event,
        EngineEvent::RunFinished {
            run_id: RunId(1),
            state: RunState::Cancelled,
            ..
        }
    )));
    assert!(events[..reset_at].iter().any(|event| matches!(
        event,
        EngineEvent::RunStateChanged {
            run_id: RunId(1),
            state: RunState::Cancelled,
        }
    )));

    let next = controller.start(AlgorithmId::InsertionSort).expect("restart");
    assert_eq!(next, RunId(2));
    assert_eq!(controller.wait_for_run().await, RunState::Completed);
    assert!(is_sorted(&controller.snapshot()));
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_progress_and_resume_finishes_the_same_work() {
    let mut controller = RunController::new(settings(Speed::MAX));
    assert!(controller.load_values(reversed(30)));
    controller.start(AlgorithmId::BubbleSort).expect("started");

    sleep(Duration::from_millis(20)).await;
    assert!(controller.pause());
    let frozen_ops = controller.operations();
    let frozen_values = controller.snapshot();
    assert!(frozen_ops > 0);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(controller.state(), RunState::Paused);
    assert_eq!(controller.operations(), frozen_ops);
    assert_eq!(controller.snapshot(), frozen_values);

    assert!(controller.resume());
    assert_eq!(controller.wait_for_run().await, RunState::Completed);
    // A reversed sequence of 30 holds 30 * 29 / 2 inversions.
    assert_eq!(controller.operations(), 435);
    assert_eq!(controller.snapshot(), (1..=30).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn toggle_pause_flips_only_active_runs() {
    let mut controller = RunController::new(settings(Speed::MIN));
    assert_eq!(controller.toggle_pause(), RunState::Idle);

    controller.start(AlgorithmId::SelectionSort).expect("started");
    assert_eq!(controller.toggle_pause(), RunState::Paused);
    assert_eq!(controller.toggle_pause(), RunState::Running);

    let mut rx = controller.subscribe_events();
    controller.toggle_pause();
    controller.toggle_pause();
    let states: Vec<RunState> = drain(&mut rx)
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::RunStateChanged { state, .. } => Some(state),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![RunState::Paused, RunState::Running]);
}

#[tokio::test(start_paused = true)]
async fn array_size_changes_are_refused_while_active() {
    let mut controller = RunController::new(settings(Speed::MAX));
    controller.start(AlgorithmId::HeapSort).expect("started");
    assert!(!controller.set_array_size(100));
    assert_eq!(controller.array_size(), 20);
    assert!(!controller.load_values(vec![1, 2, 3]));

    assert_eq!(controller.wait_for_run().await, RunState::Completed);
    assert!(controller.set_array_size(120));
    assert_eq!(controller.array_size(), 120);
    assert_eq!(controller.snapshot().len(), 120);
    assert_eq!(controller.state(), RunState::Idle);
    assert_eq!(controller.operations(), 0);

    assert!(controller.set_array_size(3));
    assert_eq!(controller.array_size(), 10);
    assert!(controller.set_array_size(5_000));
    assert_eq!(controller.snapshot().len(), 200);
}

#[tokio::test(start_paused = true)]
async fn speed_changes_apply_to_a_running_run() {
    let mut controller = RunController::new(settings(Speed::MIN));
    assert!(controller.load_values(reversed(10)));
    let started = Instant::now();
    controller.start(AlgorithmId::BubbleSort).expect("started");

    sleep(Duration::from_millis(1_000)).await;
    let slow_ops = controller.operations();
    assert!(slow_ops <= 11, "{slow_ops} steps at 100ms each within 1s");

    controller.set_speed(Speed::MAX);
    assert_eq!(controller.speed(), Speed::MAX);
    assert_eq!(controller.wait_for_run().await, RunState::Completed);
    assert_eq!(controller.operations(), 45);
    // 45 steps at the slowest speed would take 4.5s.
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn run_events_arrive_in_order() {
    let mut controller = RunController::new(settings(Speed::MAX));
    assert!(controller.load_values(vec![3, 1, 2]));
    let mut rx = controller.subscribe_events();

    controller.start(AlgorithmId::InsertionSort).expect("started");
    assert_eq!(controller.wait_for_run().await, RunState::Completed);

    let events = drain(&mut rx);
    assert_eq!(
        events.first(),
        Some(&EngineEvent::RunStarted {
            run_id: RunId(1),
            algorithm: AlgorithmId::InsertionSort,
            values: vec![3, 1, 2],
        })
    );
    assert_eq!(
        events.last(),
        Some(&EngineEvent::RunFinished {
            run_id: RunId(1),
            state: RunState::Completed,
            operations: 2,
            values: vec![1, 2, 3],
        })
    );
    let middle = &events[1..events.len() - 1];
    assert!(!middle.is_empty());
    assert!(middle
        .iter()
        .all(|event| matches!(event, EngineEvent::Step { run_id: RunId(1), .. })));
}

#[tokio::test(start_paused = true)]
async fn load_values_publishes_the_new_sequence() {
    let mut controller = RunController::new(settings(Speed::DEFAULT));
    let mut rx = controller.subscribe_events();
    assert!(controller.load_values(vec![9, 8, 7]));
    assert_eq!(controller.snapshot(), vec![9, 8, 7]);
    assert_eq!(
        drain(&mut rx),
        vec![EngineEvent::SequenceReset {
            values: vec![9, 8, 7]
        }]
    );
}
