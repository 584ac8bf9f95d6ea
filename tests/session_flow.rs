use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use fitfocus::db::{Database, History, MemoryStore};
use fitfocus::exercises::{BodyPart, Category};
use fitfocus::session::{SessionController, SessionEvent, TimerMode};

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn test_full_session_through_timers_and_rest() {
    let mut controller =
        SessionController::new(MemoryStore::new(), Box::new(StdRng::seed_from_u64(21))).unwrap();
    let events = controller.subscribe();

    controller.setup_mut().toggle_part(BodyPart::Core);
    // Snaps to the 5-minute grid
    controller.setup_mut().set_minutes(24);
    assert_eq!(controller.setup().minutes(), 25);
    let plan = controller.generate().unwrap().clone();
    // 1 warmup, 3 main, 2 cooldown
    assert_eq!(plan.len(), 6);
    assert_eq!(plan.count_in(Category::Main), 3);

    let t0 = Instant::now();
    let ticket = controller.focus(None, t0).unwrap().expect("first focus reseeds");
    assert!(controller.tick(t0).is_some());
    assert_eq!(controller.timer_state().lead_in, None);

    controller.tick(ticket.due);
    assert_eq!(controller.timer_state().lead_in, Some(3));
    let mut t = ticket.due;
    for _ in 0..3 {
        t += secs(1);
        controller.tick(t);
    }
    let state = controller.timer_state();
    assert!(state.running);
    assert_eq!(state.mode, TimerMode::Stopwatch);

    controller.tick(t + secs(20));
    assert_eq!(controller.timer_state().value, 20);

    controller.start_rest(t + secs(20)).unwrap();
    controller.tick(t + secs(50));
    let state = controller.timer_state();
    assert!(state.resting);
    assert_eq!(state.value, 30);

    let resume = controller.end_rest(t + secs(50)).unwrap();
    assert!(!controller.timer_state().resting);
    assert!(controller.fire_lead_in(resume, resume.due));

    let mut now = resume.due;
    let mut record = None;
    while record.is_none() {
        now += secs(1);
        record = controller.complete_current(now).unwrap();
    }
    let record = record.unwrap();
    assert_eq!(record.completed_rate, 100);
    assert_eq!(record.duration, 25);
    assert_eq!(record.parts, vec![BodyPart::Core]);
    assert_eq!(record.id, plan.id);

    let finished = events
        .try_iter()
        .filter(|e| matches!(e, SessionEvent::SessionFinished(_)))
        .count();
    assert_eq!(finished, 1);
}

#[test]
fn test_history_persists_in_sqlite_newest_first() {
    let db = Database::open_in_memory().unwrap();
    let mut controller = SessionController::new(db, Box::new(StdRng::seed_from_u64(5))).unwrap();

    let first = controller.create_session(&[BodyPart::Legs], 45).unwrap().id.clone();
    let r1 = controller.finish().unwrap();
    let second = controller
        .create_session(&[BodyPart::Chest, BodyPart::Back], 24)
        .unwrap()
        .id
        .clone();
    controller.focus(Some(1), Instant::now()).unwrap();
    let r2 = controller.finish().unwrap();

    assert_eq!(r1.id, first);
    assert_eq!(r2.id, second);
    // 2 of 7 reached
    assert_eq!(r2.completed_rate, 29);

    let ids: Vec<_> = controller.history().records().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![second.clone(), first.clone()]);

    let request = controller.request_history_delete(&first).unwrap();
    assert!(controller.confirm_history_delete(request));
    assert_eq!(controller.history().len(), 1);
    assert!(controller.history().get(&second).is_some());
}

#[test]
fn test_history_file_survives_reopen() {
    let path = std::env::temp_dir().join(format!("fitfocus-test-{}.db", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    let _ = std::fs::remove_file(&path);

    {
        let db = Database::open(&path_str).unwrap();
        let mut controller = SessionController::new(db, Box::new(StdRng::seed_from_u64(8))).unwrap();
        controller.create_session(&[BodyPart::Shoulders], 30).unwrap();
        controller.finish().unwrap();
    }

    let db = Database::open(&path_str).unwrap();
    let history = History::load(&db).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.records()[0].parts, vec![BodyPart::Shoulders]);

    let _ = std::fs::remove_file(&path);
}
