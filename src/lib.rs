//! # Full-Capacity SPSC Ring Buffer
//!
//! 全容量 SPSC 环形缓冲区
//!
//! `fullring` is a lock-free Single Producer Single Consumer (SPSC) ring
//! buffer whose counters run over twice the capacity range, so every slot of
//! the fixed capacity holds an element when the queue is full.
//!
//! `fullring` 是一个无锁的单生产者单消费者（SPSC）环形缓冲区，
//! 其计数器在两倍容量的范围内运行，因此队列满时固定容量的每个槽位都存放元素。
//!
//! ## Features
//!
//! 特性
//!
//! - **Lock-Free** - Thread-safe communication using atomic operations
//! - **Full Capacity** - A queue of capacity `N` really holds `N` elements, with no sacrificial empty slot
//! - **Wait-Free** - Every operation finishes in a bounded number of its own steps
//! - **Any Capacity** - `N` does not need to be a power of two and is never rounded
//! - **Compile-Time Strategy** - Index reduction is a type parameter, resolved with zero runtime dispatch
//! - **All-or-Nothing Batches** - Slice transfers move the whole slice or report the shortfall and move nothing
//!
//! - **无锁设计** - 使用原子操作实现线程安全的无锁通信
//! - **全容量** - 容量为 `N` 的队列确实存放 `N` 个元素，没有牺牲的空槽位
//! - **无等待** - 每个操作都在自身有限步数内完成
//! - **任意容量** - `N` 不必是 2 的幂，也绝不取整
//! - **编译期策略** - 索引归约是类型参数，零运行时分派
//! - **全有或全无的批量** - 切片传输要么移动整个切片，要么报告缺口且不移动任何元素
//!
//! ## Quick Start
//!
//! 快速开始
//!
//! ```rust
//! use fullring::new;
//!
//! // Create a ring buffer with capacity 8
//! // 创建一个容量为 8 的环形缓冲区
//! let (mut producer, mut consumer) = new::<i32, 8>();
//!
//! // Producer pushes data
//! // 生产者推送数据
//! producer.push(42).unwrap();
//! producer.push(100).unwrap();
//!
//! // Consumer pops data
//! // 消费者获取数据
//! assert_eq!(consumer.pop().unwrap(), 42);
//! assert_eq!(consumer.pop().unwrap(), 100);
//! ```
//!
//! ## Multi-threaded Usage
//!
//! 多线程使用
//!
//! ```rust
//! use fullring::new;
//! use std::thread;
//!
//! let (mut producer, mut consumer) = new::<String, 32>();
//!
//! // Producer thread
//! // 生产者线程
//! let producer_handle = thread::spawn(move || {
//!     for i in 0..100 {
//!         let msg = format!("Message {}", i);
//!         while producer.push(msg.clone()).is_err() {
//!             thread::yield_now();
//!         }
//!     }
//! });
//!
//! // Consumer thread
//! // 消费者线程
//! let consumer_handle = thread::spawn(move || {
//!     let mut received = Vec::new();
//!     for _ in 0..100 {
//!         loop {
//!             match consumer.pop() {
//!                 Ok(msg) => {
//!                     received.push(msg);
//!                     break;
//!                 }
//!                 Err(_) => thread::yield_now(),
//!             }
//!         }
//!     }
//!     received
//! });
//!
//! producer_handle.join().unwrap();
//! let messages = consumer_handle.join().unwrap();
//! assert_eq!(messages.len(), 100);
//! ```
//!
//! ## Reduction Strategies
//!
//! 归约策略
//!
//! Counter values live in `[0, 2N)` and must be reduced to physical slots in
//! `[0, N)`. How that reduction happens is the type parameter `R`:
//!
//! 计数器的值位于 `[0, 2N)`，必须归约为 `[0, N)` 内的物理槽位。
//! 归约方式由类型参数 `R` 决定：
//!
//! ```rust
//! use fullring::{new_with, Branch, Exact, Mask};
//!
//! // Power-of-two capacity, single AND instruction
//! // 2 的幂容量，一条 AND 指令
//! let (mut p, mut c) = new_with::<u32, 64, Mask>();
//! p.push(1).unwrap();
//! assert_eq!(c.pop(), Ok(1));
//!
//! // Any capacity, one compare and one subtract
//! // 任意容量，一次比较加一次减法
//! let (mut p, mut c) = new_with::<u32, 48, Branch>();
//! p.push(2).unwrap();
//! assert_eq!(c.pop(), Ok(2));
//!
//! // Plain modulo, useful as a baseline
//! // 朴素取模，可作为基准
//! let (mut p, mut c) = new_with::<u32, 10, Exact>();
//! p.push(3).unwrap();
//! assert_eq!(c.pop(), Ok(3));
//! ```
//!
//! All strategies produce identical queue behavior; only the cost of the
//! index arithmetic differs. The default [`Fast`] picks the mask for
//! power-of-two capacities and the compare-and-subtract otherwise, entirely
//! at compile time.
//!
//! 所有策略产生完全相同的队列行为，仅索引运算的开销不同。
//! 默认的 [`Fast`] 对 2 的幂容量选掩码，其余容量选比较减法，完全在编译期完成。
//!
//! ## API Overview
//!
//! API 概览
//!
//! ### Producer Methods
//!
//! 生产者方法
//!
//! - `push(value)` - Push a single element
//! - `push_slice(&[T])` - Push a whole slice or nothing (requires `T: Copy`)
//! - `capacity()` - Get buffer capacity
//! - `len()` / `slots()` - Get number of elements in buffer
//! - `free_slots()` - Get available space
//! - `is_empty()` / `is_full()` - Check buffer state
//!
//! - `push(value)` - 推送单个元素
//! - `push_slice(&[T])` - 推送整个切片或不推送（需要 `T: Copy`）
//! - `capacity()` - 获取缓冲区容量
//! - `len()` / `slots()` - 获取缓冲区中的元素数量
//! - `free_slots()` - 获取可用空间
//! - `is_empty()` / `is_full()` - 检查缓冲区状态
//!
//! ### Consumer Methods
//!
//! 消费者方法
//!
//! - `pop()` - Pop a single element
//! - `pop_slice(&mut [T])` - Fill a whole slice or take nothing (requires `T: Copy`)
//! - `peek()` - View first element without removing
//! - `drain()` - Create draining iterator
//! - `clear()` - Remove all elements, returning how many were removed
//! - `capacity()` - Get buffer capacity
//! - `len()` / `slots()` - Get number of elements in buffer
//! - `free_slots()` - Get available space
//! - `is_empty()` / `is_full()` - Check buffer state
//!
//! - `pop()` - 弹出单个元素
//! - `pop_slice(&mut [T])` - 填满整个切片或不取（需要 `T: Copy`）
//! - `peek()` - 查看第一个元素但不移除
//! - `drain()` - 创建消费迭代器
//! - `clear()` - 移除所有元素并返回移除数量
//! - `capacity()` - 获取缓冲区容量
//! - `len()` / `slots()` - 获取缓冲区中的元素数量
//! - `free_slots()` - 获取可用空间
//! - `is_empty()` / `is_full()` - 检查缓冲区状态
//!
//! ## Batch Operations Example
//!
//! 批量操作示例
//!
//! ```rust
//! use fullring::{new, SliceError};
//!
//! let (mut producer, mut consumer) = new::<u32, 16>();
//!
//! // Batch push - one atomic publish for the whole slice
//! // 批量推送 - 整个切片只需一次原子发布
//! let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
//! producer.push_slice(&data).unwrap();
//!
//! // Batch pop
//! // 批量弹出
//! let mut output = [0u32; 5];
//! consumer.pop_slice(&mut output).unwrap();
//! assert_eq!(output, [1, 2, 3, 4, 5]);
//!
//! // A batch that does not fit is refused whole
//! // 放不下的批量会被整体拒绝
//! assert_eq!(
//!     producer.push_slice(&[0; 12]),
//!     Err(SliceError::Insufficient { requested: 12, available: 11 })
//! );
//!
//! // Drain remaining elements
//! // 清空剩余元素
//! let remaining: Vec<u32> = consumer.drain().collect();
//! assert_eq!(remaining, vec![6, 7, 8, 9, 10]);
//! ```
//!
//! ## Peek and Query Example
//!
//! 窥视和查询示例
//!
//! ```rust
//! use fullring::new;
//!
//! let (mut producer, mut consumer) = new::<i32, 8>();
//!
//! producer.push(42).unwrap();
//! producer.push(100).unwrap();
//!
//! // Check capacity and usage
//! // 检查容量和使用情况
//! assert_eq!(producer.capacity(), 8);
//! assert_eq!(producer.len(), 2);
//! assert_eq!(producer.free_slots(), 6);
//! assert!(!producer.is_full());
//!
//! // Peek at first element without consuming
//! // 查看第一个元素但不消费
//! assert_eq!(consumer.peek(), Some(&42));
//! assert_eq!(consumer.len(), 2); // Still 2 elements
//!
//! // Now consume it
//! // 现在消费它
//! assert_eq!(consumer.pop(), Ok(42));
//! assert_eq!(consumer.len(), 1);
//! ```
//!
//! ## Performance Tips
//!
//! 性能提示
//!
//! 1. **Prefer power-of-two capacities** - The default strategy then reduces indices with a single AND
//! 2. **Use batch operations** - `push_slice` and `pop_slice` pay one atomic publish per slice instead of one per element
//! 3. **Let the caches work** - Batch checks consult a cached counter first and touch the shared one only on demand
//! 4. **Use peek when needed** - Avoid pop + re-push patterns
//!
//! 1. **优先选择 2 的幂容量** - 默认策略此时用一条 AND 归约索引
//! 2. **使用批量操作** - `push_slice` 和 `pop_slice` 每个切片只支付一次原子发布，而非每个元素一次
//! 3. **让缓存发挥作用** - 批量检查先查询缓存计数器，仅在需要时触碰共享计数器
//! 4. **在需要时使用 peek** - 避免 pop + 重新 push 的模式
//!
//! ## Notes
//!
//! 注意事项
//!
//! - Capacity is used exactly as given and is never rounded
//! - Only supports Single Producer Single Consumer (SPSC) scenarios
//! - Elements still stored when the last handle is dropped are released with the buffer
//! - The concurrency protocol can be model-checked with `cargo test --features loom --test loom_spsc`
//!
//! - 容量严格按给定值使用，绝不取整
//! - 仅支持单生产者单消费者（SPSC）场景
//! - 最后一个句柄被丢弃时仍存于缓冲区的元素会随缓冲区一并释放
//! - 并发协议可通过 `cargo test --features loom --test loom_spsc` 进行模型检验

pub mod index;
pub mod spsc;
mod core;
mod shim;

#[cfg(all(test, not(feature = "loom")))]
mod tests;

pub use index::{Branch, Exact, Fast, Mask, Reduce};
pub use spsc::{
    new, new_with, Consumer, Drain, PopError, Producer, PushError, SharedData, SliceError,
};
