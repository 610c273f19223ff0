//! Comprehensive tests for the SPSC ring buffer
//!
//! SPSC 环形缓冲区的全面测试

use crate::spsc::new;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Small xorshift generator for deterministic pseudo-random traffic.
///
/// 用于生成确定性伪随机流量的小型 xorshift 生成器。
struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

/// Scrambled but reproducible value for a given sequence number, so both
/// threads can verify the stream without sharing state.
///
/// 将序号打乱为可复现的值，使两个线程无需共享状态即可校验数据流。
fn payload(sequence: u32) -> u32 {
    let mut x = sequence.wrapping_add(0x6d2b_79f5);
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    x
}

// ============================================================================
// SEGMENT 1: Availability Walks
// 第1段：可用量走查
// ============================================================================

#[test]
fn test_availability_walks_with_singles() {
    let (mut producer, mut consumer) = new::<u32, 16>();

    for i in 0..16u32 {
        assert_eq!(producer.slots(), i as usize);
        assert_eq!(producer.free_slots(), 16 - i as usize);
        assert!(!producer.is_full());
        producer.push(i).unwrap();
    }
    assert!(producer.is_full());
    assert_eq!(producer.free_slots(), 0);

    for i in 0..16u32 {
        assert_eq!(consumer.slots(), 16 - i as usize);
        assert_eq!(consumer.pop().unwrap(), i);
    }
    assert!(consumer.is_empty());
}

#[test]
fn test_availability_walks_with_batches() {
    let (mut producer, mut consumer) = new::<u32, 12>();

    let mut filled = 0;
    for chunk in [5usize, 4, 3] {
        let batch: Vec<u32> = (0..chunk as u32).collect();
        producer.push_slice(&batch).unwrap();
        filled += chunk;
        assert_eq!(producer.slots(), filled);
        assert_eq!(producer.free_slots(), 12 - filled);
    }
    assert!(producer.is_full());

    let mut out = [0u32; 6];
    consumer.pop_slice(&mut out).unwrap();
    assert_eq!(consumer.slots(), 6);
    consumer.pop_slice(&mut out).unwrap();
    assert!(consumer.is_empty());
}

#[test]
fn test_failed_operations_change_nothing() {
    let (mut producer, mut consumer) = new::<u32, 4>();

    // Failures on an empty queue
    // 空队列上的失败操作
    assert!(consumer.pop().is_err());
    let mut out = [0u32; 2];
    assert!(consumer.pop_slice(&mut out).is_err());
    assert_eq!(consumer.slots(), 0);

    producer.push_slice(&[1, 2, 3, 4]).unwrap();

    // Failures on a full queue
    // 满队列上的失败操作
    assert!(producer.push(5).is_err());
    assert!(producer.push_slice(&[5, 6]).is_err());
    assert_eq!(producer.free_slots(), 0);
    assert_eq!(consumer.slots(), 4);

    // The stored values are untouched
    // 已存的值保持原样
    let drained: Vec<u32> = consumer.drain().collect();
    assert_eq!(drained, vec![1, 2, 3, 4]);
}

#[test]
fn test_peek_sees_each_element_once_in_order() {
    let (mut producer, mut consumer) = new::<u32, 4>();
    producer.push_slice(&[10, 20, 30]).unwrap();

    for expected in [10, 20, 30] {
        assert_eq!(consumer.peek(), Some(&expected));
        assert_eq!(consumer.pop().unwrap(), expected);
    }
    assert_eq!(consumer.peek(), None);
}

// ============================================================================
// SEGMENT 2: Reference Model Comparison
// 第2段：参考模型对照
// ============================================================================

#[test]
fn test_mixed_traffic_matches_reference_model() {
    let (mut producer, mut consumer) = new::<u32, 13>();
    let mut model: VecDeque<u32> = VecDeque::new();
    let mut rng = XorShift32::new(0x9e37_79b9);
    let mut next = 0u32;

    for _ in 0..20_000 {
        match rng.next() % 6 {
            0 | 1 => {
                let pushed = producer.push(next).is_ok();
                let fits = model.len() < 13;
                assert_eq!(pushed, fits);
                if pushed {
                    model.push_back(next);
                    next += 1;
                }
            }
            2 => {
                let len = (rng.next() % 5) as usize;
                let batch: Vec<u32> = (next..next + len as u32).collect();
                let ok = producer.push_slice(&batch).is_ok();
                let fits = 13 - model.len() >= len;
                assert_eq!(ok, fits);
                if ok {
                    model.extend(batch.iter().copied());
                    next += len as u32;
                }
            }
            3 | 4 => match consumer.pop() {
                Ok(v) => assert_eq!(Some(v), model.pop_front()),
                Err(_) => assert!(model.is_empty()),
            },
            _ => {
                let len = (rng.next() % 5) as usize;
                let mut out = vec![0u32; len];
                let ok = consumer.pop_slice(&mut out).is_ok();
                let enough = model.len() >= len;
                assert_eq!(ok, enough);
                if ok {
                    for v in out {
                        assert_eq!(Some(v), model.pop_front());
                    }
                }
            }
        }

        // With a single thread the queries are exact, not estimates
        // 单线程下查询是精确值而非估计值
        assert_eq!(consumer.slots(), model.len());
        assert_eq!(producer.free_slots(), 13 - model.len());
        assert_eq!(consumer.is_empty(), model.is_empty());
        assert_eq!(producer.is_full(), model.len() == 13);
    }
}

// ============================================================================
// SEGMENT 3: Two-Thread Stress
// 第3段：双线程压力
// ============================================================================

#[test]
fn test_two_thread_ordered_stream() {
    const TOTAL: u32 = 100_000;
    let (mut producer, mut consumer) = new::<u32, 64>();

    let send = thread::spawn(move || {
        let mut rng = XorShift32::new(1);
        let mut next = 0u32;

        while next < TOTAL {
            let progressed = if rng.next() % 2 == 0 {
                match producer.push(payload(next)) {
                    Ok(()) => {
                        next += 1;
                        true
                    }
                    Err(_) => false,
                }
            } else {
                let want = (rng.next() % 9) as usize;
                let len = want.min((TOTAL - next) as usize);
                let batch: Vec<u32> = (next..next + len as u32).map(payload).collect();
                match producer.push_slice(&batch) {
                    Ok(()) => {
                        next += len as u32;
                        true
                    }
                    Err(_) => false,
                }
            };

            if !progressed {
                thread::yield_now();
            }
        }
    });

    let recv = thread::spawn(move || {
        let mut rng = XorShift32::new(2);
        let mut next = 0u32;

        while next < TOTAL {
            let progressed = if rng.next() % 2 == 0 {
                match consumer.pop() {
                    Ok(v) => {
                        assert_eq!(v, payload(next));
                        next += 1;
                        true
                    }
                    Err(_) => false,
                }
            } else {
                let want = (rng.next() % 9) as usize;
                let len = want.min((TOTAL - next) as usize);
                let mut out = vec![0u32; len];
                match consumer.pop_slice(&mut out) {
                    Ok(()) => {
                        for v in out {
                            assert_eq!(v, payload(next));
                            next += 1;
                        }
                        true
                    }
                    Err(_) => false,
                }
            };

            if !progressed {
                thread::yield_now();
            }
        }

        assert!(consumer.is_empty());
    });

    send.join().unwrap();
    recv.join().unwrap();
}

#[test]
fn test_fast_producer_slow_consumer() {
    // The queue runs mostly full, so the producer-side cache is refreshed
    // over and over
    // 队列大部分时间处于满状态，生产者端缓存被反复刷新
    const TOTAL: u32 = 8_000;
    let (mut producer, mut consumer) = new::<u32, 8>();

    let send = thread::spawn(move || {
        for start in (0..TOTAL).step_by(4) {
            let batch = [
                payload(start),
                payload(start + 1),
                payload(start + 2),
                payload(start + 3),
            ];
            while producer.push_slice(&batch).is_err() {
                thread::yield_now();
            }
        }
    });

    let recv = thread::spawn(move || {
        for seq in 0..TOTAL {
            thread::yield_now();
            loop {
                match consumer.pop() {
                    Ok(v) => {
                        assert_eq!(v, payload(seq));
                        break;
                    }
                    Err(_) => thread::yield_now(),
                }
            }
        }
        assert!(consumer.is_empty());
    });

    send.join().unwrap();
    recv.join().unwrap();
}

#[test]
fn test_slow_producer_fast_consumer() {
    // The queue runs mostly empty, so the consumer-side cache is refreshed
    // over and over
    // 队列大部分时间处于空状态，消费者端缓存被反复刷新
    const TOTAL: u32 = 8_000;
    let (mut producer, mut consumer) = new::<u32, 8>();

    let send = thread::spawn(move || {
        for seq in 0..TOTAL {
            thread::yield_now();
            while producer.push(payload(seq)).is_err() {
                thread::yield_now();
            }
        }
    });

    let recv = thread::spawn(move || {
        let mut out = [0u32; 4];
        for start in (0..TOTAL).step_by(4) {
            while consumer.pop_slice(&mut out).is_err() {
                thread::yield_now();
            }
            for (offset, v) in out.iter().enumerate() {
                assert_eq!(*v, payload(start + offset as u32));
            }
        }
        assert!(consumer.is_empty());
    });

    send.join().unwrap();
    recv.join().unwrap();
}

// ============================================================================
// SEGMENT 4: Handle Lifetime
// 第4段：句柄生命周期
// ============================================================================

#[derive(Debug)]
struct Tracked {
    counter: Arc<AtomicUsize>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_leftovers_freed_with_last_handle_in_either_order() {
    // Consumer dropped last
    // 消费者最后被丢弃
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let (mut producer, consumer) = new::<Tracked, 8>();
        for _ in 0..3 {
            producer
                .push(Tracked { counter: counter.clone() })
                .unwrap();
        }
        drop(producer);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        drop(consumer);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 3);

    // Producer dropped last
    // 生产者最后被丢弃
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let (mut producer, consumer) = new::<Tracked, 8>();
        for _ in 0..4 {
            producer
                .push(Tracked { counter: counter.clone() })
                .unwrap();
        }
        drop(consumer);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        drop(producer);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn test_consumer_keeps_working_after_producer_drop() {
    let (mut producer, mut consumer) = new::<u32, 8>();
    producer.push_slice(&[1, 2, 3, 4, 5]).unwrap();
    drop(producer);

    assert_eq!(consumer.pop().unwrap(), 1);
    assert_eq!(consumer.clear(), 4);
    assert!(consumer.pop().is_err());
}

#[test]
fn test_producer_keeps_working_after_consumer_drop() {
    let (mut producer, consumer) = new::<u32, 4>();
    drop(consumer);

    // Nothing reads anymore, but pushing into free slots still works
    // 不再有读取方，但向空闲槽位推送仍然有效
    producer.push(1).unwrap();
    producer.push_slice(&[2, 3, 4]).unwrap();
    assert!(producer.is_full());
    assert!(producer.push(5).is_err());
}
