// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::error::{CoreError, Result};
use crate::event::{Action, Event, Operation};
use crate::scheduler::{partition_for, Scheduler, SchedulerConfig, TrySubmitError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn event(source: &str, seq: u64) -> Event {
    Event::new(source, seq, vec![Operation::new(Action::Create, "app.bsky.feed.post/a")])
}

#[test]
fn test_partition_is_stable_and_bounded() {
    for workers in [1, 7, 24] {
        for i in 0..500 {
            let did = format!("did:plc:{i:024}");
            let p = partition_for(&did, workers);
            assert!(p < workers);
            assert_eq!(p, partition_for(&did, workers));
        }
    }
    assert_eq!(partition_for("did:plc:anything", 1), 0);
}

#[test]
fn test_invalid_config_rejected() {
    let no_workers = SchedulerConfig { workers: 0, queue_capacity: 10 };
    let err = Scheduler::new("test", no_workers, |_e: Event| -> Result<()> { Ok(()) }).err().unwrap();
    assert!(matches!(err, CoreError::InvalidConfig(_)));

    let no_capacity = SchedulerConfig { workers: 2, queue_capacity: 0 };
    let err = Scheduler::new("test", no_capacity, |_e: Event| -> Result<()> { Ok(()) }).err().unwrap();
    assert!(matches!(err, CoreError::InvalidConfig(_)));
}

#[test]
fn test_per_source_order_preserved() {
    const SOURCES: usize = 50;
    const PER_SOURCE: u64 = 200;

    let seen: Arc<Mutex<HashMap<String, Vec<u64>>>> = Arc::new(Mutex::new(HashMap::new()));
    let sink = seen.clone();
    let config = SchedulerConfig { workers: 8, queue_capacity: 16 };
    let scheduler = Scheduler::new("order", config, move |e: Event| -> Result<()> {
        sink.lock().unwrap().entry(e.source.clone()).or_default().push(e.seq);
        Ok(())
    })
    .unwrap();

    // Interleave sources; the global seq grows across the whole stream.
    let mut seq = 0;
    for _ in 0..PER_SOURCE {
        for s in 0..SOURCES {
            seq += 1;
            scheduler.submit(event(&format!("did:plc:source{s}"), seq)).unwrap();
        }
    }
    scheduler.shutdown();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), SOURCES);
    for (source, seqs) in seen.iter() {
        assert_eq!(seqs.len() as u64, PER_SOURCE, "{source} lost events");
        assert!(seqs.windows(2).all(|w| w[0] < w[1]), "{source} processed out of order");
    }
}

#[test]
fn test_full_queue_blocks_submit_without_dropping() {
    let (started_tx, started_rx) = crossbeam_channel::unbounded::<u64>();
    let (gate_tx, gate_rx) = crossbeam_channel::unbounded::<()>();
    let order = Arc::new(Mutex::new(Vec::new()));
    let sink = order.clone();

    let config = SchedulerConfig { workers: 1, queue_capacity: 1 };
    let scheduler = Arc::new(
        Scheduler::new("bp", config, move |e: Event| -> Result<()> {
            started_tx.send(e.seq).unwrap();
            gate_rx.recv().unwrap();
            sink.lock().unwrap().push(e.seq);
            Ok(())
        })
        .unwrap(),
    );

    // 1 is taken by the worker, 2 fills the queue.
    scheduler.submit(event("did:plc:a", 1)).unwrap();
    assert_eq!(started_rx.recv().unwrap(), 1);
    scheduler.submit(event("did:plc:a", 2)).unwrap();

    match scheduler.try_submit(event("did:plc:a", 3)) {
        Err(TrySubmitError::Full(e)) => assert_eq!(e.seq, 3),
        other => panic!("expected full queue, got {other:?}"),
    }

    let blocked = {
        let scheduler = scheduler.clone();
        thread::spawn(move || scheduler.submit(event("did:plc:a", 3)))
    };
    thread::sleep(Duration::from_millis(100));
    assert!(!blocked.is_finished(), "submit should block while the queue is full");

    for _ in 0..3 {
        gate_tx.send(()).unwrap();
    }
    blocked.join().unwrap().unwrap();

    let scheduler = Arc::try_unwrap(scheduler).ok().unwrap();
    scheduler.shutdown();
    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_handler_failures_do_not_stop_worker() {
    let processed = Arc::new(AtomicUsize::new(0));
    let counter = processed.clone();
    let config = SchedulerConfig { workers: 1, queue_capacity: 8 };
    let scheduler = Scheduler::new("faulty", config, move |e: Event| -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        match e.seq % 3 {
            0 => Err(CoreError::UnknownAction("bogus".into())),
            1 => panic!("malformed event {}", e.seq),
            _ => Ok(()),
        }
    })
    .unwrap();

    for seq in 0..30 {
        scheduler.submit(event("did:plc:same", seq)).unwrap();
    }
    scheduler.shutdown();

    assert_eq!(processed.load(Ordering::SeqCst), 30);
}

#[test]
fn test_shutdown_drains_queued_events() {
    let processed = Arc::new(AtomicUsize::new(0));
    let counter = processed.clone();
    let config = SchedulerConfig { workers: 4, queue_capacity: 1000 };
    let scheduler = Scheduler::new("drain", config, move |_e: Event| -> Result<()> {
        thread::sleep(Duration::from_micros(200));
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .unwrap();

    for seq in 0..400u64 {
        scheduler.submit(event(&format!("did:plc:{}", seq % 13), seq)).unwrap();
    }
    assert_eq!(scheduler.queue_depths().len(), 4);
    drop(scheduler);

    assert_eq!(processed.load(Ordering::SeqCst), 400);
}
