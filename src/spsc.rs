//! Single-producer single-consumer ring buffer over double-range counters
//!
//! 基于双倍范围计数器的单生产者单消费者环形缓冲区
//!
//! Construction hands out a [`Producer`] and a [`Consumer`] sharing one
//! [`RingCore`](crate::core). Each half owns its own counter and keeps a
//! plain, unsynchronized copy of the other side's counter (the predictive
//! cache) that the batch operations consult before paying for an atomic load.
//! Every operation finishes in a bounded number of its own steps; nothing
//! blocks, spins, or retries internally.
//!
//! 构造函数返回共享同一 [`RingCore`](crate::core) 的 [`Producer`] 和
//! [`Consumer`]。每一端拥有自己的计数器，并保留对方计数器的普通非同步副本
//! （预测缓存），批量操作先查询该副本再支付原子载入的开销。
//! 每个操作都在自身有限步数内完成；内部不阻塞、不自旋、不重试。

use super::core::RingCore;
use super::index::{Fast, Reduce};
use super::shim::atomic::Ordering;
use super::shim::sync::Arc;

/// Ring buffer error for push operations
///
/// push 操作的环形缓冲区错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError<T> {
    /// Buffer is full; the rejected value is handed back
    ///
    /// 缓冲区已满；被拒绝的值原样返还
    Full(T),
}

/// Ring buffer error for pop operations
///
/// pop 操作的环形缓冲区错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopError {
    /// Buffer is empty
    ///
    /// 缓冲区为空
    Empty,
}

/// Ring buffer error for the slice-based batch operations
///
/// 基于切片的批量操作的环形缓冲区错误
///
/// Batch operations are all-or-nothing: when the queue cannot take or supply
/// the whole slice, nothing is transferred and the shortfall is reported.
///
/// 批量操作是全有或全无的：当队列无法容纳或提供整个切片时，
/// 不传输任何元素并报告缺口。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceError {
    /// Not enough free slots (push) or stored elements (pop)
    ///
    /// 空闲槽位（push）或已存元素（pop）不足
    Insufficient {
        /// Length of the slice that was offered or requested
        ///
        /// 提交或请求的切片长度
        requested: usize,
        /// What the queue could actually take or supply at that moment
        ///
        /// 队列当时实际可容纳或提供的数量
        available: usize,
    },
}

/// Shared data between producer and consumer
///
/// 生产者和消费者之间的共享数据
pub struct SharedData<T, const N: usize, R: Reduce = Fast> {
    /// Core ring buffer implementation
    ///
    /// 核心环形缓冲区实现
    core: RingCore<T, N, R>,
}

/// Producer half of the ring buffer
///
/// 环形缓冲区的生产者端
///
/// # Type Parameters
/// - `T`: Element type
/// - `N`: Capacity, used exactly as given
/// - `R`: Index reduction strategy
///
/// # 类型参数
/// - `T`: 元素类型
/// - `N`: 容量，严格按给定值使用
/// - `R`: 索引归约策略
pub struct Producer<T, const N: usize, R: Reduce = Fast> {
    /// Shared data
    ///
    /// 共享数据
    shared: Arc<SharedData<T, N, R>>,

    /// Predictive copy of the read counter; refreshed from the authoritative
    /// counter whenever it cannot prove enough room
    ///
    /// 读计数器的预测副本；当它无法证明有足够空间时，从权威计数器刷新
    cached_read: usize,
}

/// Consumer half of the ring buffer
///
/// 环形缓冲区的消费者端
///
/// # Type Parameters
/// - `T`: Element type
/// - `N`: Capacity, used exactly as given
/// - `R`: Index reduction strategy
///
/// # 类型参数
/// - `T`: 元素类型
/// - `N`: 容量，严格按给定值使用
/// - `R`: 索引归约策略
pub struct Consumer<T, const N: usize, R: Reduce = Fast> {
    /// Shared data
    ///
    /// 共享数据
    shared: Arc<SharedData<T, N, R>>,

    /// Predictive copy of the write counter; refreshed from the authoritative
    /// counter whenever it cannot prove enough data
    ///
    /// 写计数器的预测副本；当它无法证明有足够数据时，从权威计数器刷新
    cached_write: usize,
}

/// Draining iterator for the ring buffer
///
/// 环形缓冲区的消费迭代器
///
/// Removes and returns elements until the buffer is observed empty.
///
/// 移除并返回元素，直到观察到缓冲区为空。
pub struct Drain<'a, T, const N: usize, R: Reduce = Fast> {
    consumer: &'a mut Consumer<T, N, R>,
}

impl<'a, T, const N: usize, R: Reduce> Iterator for Drain<'a, T, N, R> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.consumer.pop().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // Everything currently stored will be yielded, but the producer may
        // add more while we drain, so there is no upper bound
        // 当前已存的元素都会被产出，但消费期间生产者还可能继续推送，
        // 因此没有上界
        (self.consumer.slots(), None)
    }
}

impl<T, const N: usize, R: Reduce> SharedData<T, N, R> {
    /// Get the capacity of the buffer
    ///
    /// 获取缓冲区容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }
}

/// Create a new ring buffer with the default reduction strategy
///
/// 使用默认归约策略创建新的环形缓冲区
///
/// The capacity `N` is used exactly as given: a queue of capacity 9 holds 9
/// elements when full. The reduction strategy is chosen at compile time,
/// bitmask when `N` is a power of two and compare-and-subtract otherwise.
/// `N == 0` is rejected at compile time.
///
/// 容量 `N` 严格按给定值使用：容量为 9 的队列满时存放 9 个元素。
/// 归约策略在编译期选定——`N` 为 2 的幂时用位掩码，否则用比较减法。
/// `N == 0` 在编译期被拒绝。
///
/// # Returns
/// A tuple of (Producer, Consumer)
///
/// # 返回值
/// 返回 (Producer, Consumer) 元组
///
/// # Examples
///
/// ```
/// let (mut producer, mut consumer) = fullring::new::<u32, 8>();
///
/// producer.push(7).unwrap();
/// assert_eq!(consumer.pop(), Ok(7));
/// ```
pub fn new<T, const N: usize>() -> (Producer<T, N>, Consumer<T, N>) {
    new_with::<T, N, Fast>()
}

/// Create a new ring buffer with an explicit reduction strategy
///
/// 使用显式归约策略创建新的环形缓冲区
///
/// [`Exact`](crate::index::Exact) and [`Branch`](crate::index::Branch) accept
/// any capacity; [`Mask`](crate::index::Mask) requires a power of two. All
/// strategies produce identical queue behavior; only the cost of the index
/// arithmetic differs.
///
/// [`Exact`](crate::index::Exact) 与 [`Branch`](crate::index::Branch)
/// 接受任意容量；[`Mask`](crate::index::Mask) 要求 2 的幂。
/// 所有策略产生完全相同的队列行为——仅索引运算的开销不同。
///
/// # Examples
///
/// ```
/// use fullring::index::Exact;
///
/// let (mut producer, mut consumer) = fullring::new_with::<u32, 10, Exact>();
/// producer.push(1).unwrap();
/// assert_eq!(consumer.pop(), Ok(1));
/// ```
pub fn new_with<T, const N: usize, R: Reduce>() -> (Producer<T, N, R>, Consumer<T, N, R>) {
    let shared = Arc::new(SharedData { core: RingCore::new() });

    let producer = Producer {
        shared: shared.clone(),
        cached_read: 0,
    };

    let consumer = Consumer {
        shared,
        cached_write: 0,
    };

    (producer, consumer)
}

impl<T, const N: usize, R: Reduce> Producer<T, N, R> {
    /// Get the capacity of the buffer
    ///
    /// 获取缓冲区容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.core.capacity()
    }

    /// Get the number of elements currently in the buffer
    ///
    /// 获取缓冲区中当前的元素数量
    #[inline]
    pub fn slots(&self) -> usize {
        self.shared.core.available_to_read()
    }

    /// Get the number of elements currently in the buffer (alias for `slots`)
    ///
    /// 获取缓冲区中当前的元素数量（`slots` 的别名）
    #[inline]
    pub fn len(&self) -> usize {
        self.slots()
    }

    /// Check if the buffer is empty
    ///
    /// 检查缓冲区是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shared.core.is_empty()
    }

    /// Get the number of free slots in the buffer
    ///
    /// 获取缓冲区中的空闲槽位数量
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.shared.core.available_to_write()
    }

    /// Check if the buffer is full
    ///
    /// 检查缓冲区是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        self.shared.core.is_full()
    }

    /// Push a value into the buffer
    ///
    /// 向缓冲区推送一个值
    ///
    /// Fails exactly when the buffer holds `N` elements. The failing call
    /// performs no write and leaves both counters untouched.
    ///
    /// 当且仅当缓冲区已存放 `N` 个元素时失败。失败的调用不执行写入，
    /// 两个计数器均保持不变。
    ///
    /// # Errors
    /// Returns `PushError::Full` with the rejected value if the buffer is full
    ///
    /// # 错误
    /// 如果缓冲区满则返回携带被拒绝值的 `PushError::Full`
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), PushError<T>> {
        let core = &self.shared.core;
        let write = core.write_idx().load(Ordering::Relaxed);
        let read = core.read_idx().load(Ordering::Acquire);

        // Refresh the batch-side cache with the value just loaded
        // 用刚载入的值刷新批量操作使用的缓存
        self.cached_read = read;

        // Full when the write counter sits exactly one capacity ahead
        // 写计数器恰好领先一个容量时为满
        if write == R::wrap(read + N, N) {
            return Err(PushError::Full(value));
        }

        unsafe {
            self.shared.core.write_at(R::slot(write, N), value);
        }

        // Publish the element with Release ordering
        // 以 Release 顺序发布该元素
        core.write_idx().store(R::wrap(write + 1, N), Ordering::Release);

        Ok(())
    }
}

impl<T: Copy, const N: usize, R: Reduce> Producer<T, N, R> {
    /// Push an entire slice into the buffer, or nothing at all
    ///
    /// 将整个切片推送到缓冲区，或完全不推送
    ///
    /// Free space is first estimated against the cached read index; the
    /// authoritative counter is loaded only when the cache cannot prove
    /// enough room. On success all elements are copied (splitting at the
    /// physical end of storage when the run wraps) and the write counter is
    /// published once for the whole batch.
    ///
    /// 先以缓存的读索引估算空闲空间；仅当缓存无法证明空间足够时才载入
    /// 权威计数器。成功时拷贝所有元素（序列环绕时在物理存储末尾拆分），
    /// 并为整批一次性发布写计数器。
    ///
    /// # Errors
    /// Returns `SliceError::Insufficient` if fewer than `values.len()` slots
    /// are free; nothing is written in that case
    ///
    /// # 错误
    /// 如果空闲槽位少于 `values.len()` 则返回 `SliceError::Insufficient`，
    /// 此时不写入任何元素
    ///
    /// # Examples
    ///
    /// ```
    /// let (mut producer, _consumer) = fullring::new::<u32, 4>();
    ///
    /// producer.push_slice(&[1, 2, 3]).unwrap();
    /// assert!(producer.push_slice(&[4, 5]).is_err());
    /// producer.push_slice(&[4]).unwrap();
    /// assert!(producer.is_full());
    /// ```
    pub fn push_slice(&mut self, values: &[T]) -> Result<(), SliceError> {
        if values.is_empty() {
            return Ok(());
        }

        let core = &self.shared.core;
        let count = values.len();
        let write = core.write_idx().load(Ordering::Relaxed);

        // Estimate occupancy from the cached read index; the cache never
        // falls a full cycle behind, so the estimate stays in [0, N]
        // 以缓存的读索引估算占用量；缓存落后永不超过一个完整周期，
        // 因此估算值恒在 [0, N] 内
        let occupied = R::wrap(2 * N + write - self.cached_read, N);
        debug_assert!(occupied <= N);
        let mut available = N - occupied;

        if available < count {
            // Refresh the cache from the authoritative counter and re-check
            // 从权威计数器刷新缓存并重新检查
            self.cached_read = core.read_idx().load(Ordering::Acquire);
            available = N - R::wrap(2 * N + write - self.cached_read, N);

            if available < count {
                return Err(SliceError::Insufficient {
                    requested: count,
                    available,
                });
            }
        }

        unsafe {
            core.copy_from_slice(R::slot(write, N), values, count);
        }

        // Publish the whole batch with one Release store
        // 以一次 Release 存储发布整批元素
        core.write_idx().store(R::wrap(write + count, N), Ordering::Release);

        Ok(())
    }
}

impl<T, const N: usize, R: Reduce> Consumer<T, N, R> {
    /// Pop a value from the buffer
    ///
    /// 从缓冲区弹出一个值
    ///
    /// Fails exactly when the buffer is empty. The failing call leaves both
    /// counters untouched.
    ///
    /// 当且仅当缓冲区为空时失败。失败的调用不改变任何计数器。
    ///
    /// # Errors
    /// Returns `PopError::Empty` if the buffer is empty
    ///
    /// # 错误
    /// 如果缓冲区空则返回 `PopError::Empty`
    #[inline]
    pub fn pop(&mut self) -> Result<T, PopError> {
        let core = &self.shared.core;
        let read = core.read_idx().load(Ordering::Relaxed);
        let write = core.write_idx().load(Ordering::Acquire);

        // Refresh the batch-side cache with the value just loaded
        // 用刚载入的值刷新批量操作使用的缓存
        self.cached_write = write;

        // Equal counters mean empty
        // 计数器相等即为空
        if read == write {
            return Err(PopError::Empty);
        }

        let value = unsafe { core.read_at(R::slot(read, N)) };

        // Free the slot with Release ordering
        // 以 Release 顺序释放该槽位
        core.read_idx().store(R::wrap(read + 1, N), Ordering::Release);

        Ok(value)
    }

    /// Check if the buffer is empty
    ///
    /// 检查缓冲区是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shared.core.is_empty()
    }

    /// Check if the buffer is full
    ///
    /// 检查缓冲区是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        self.shared.core.is_full()
    }

    /// Get the number of elements currently in the buffer
    ///
    /// 获取缓冲区中当前的元素数量
    #[inline]
    pub fn slots(&self) -> usize {
        self.shared.core.available_to_read()
    }

    /// Get the number of elements currently in the buffer (alias for `slots`)
    ///
    /// 获取缓冲区中当前的元素数量（`slots` 的别名）
    #[inline]
    pub fn len(&self) -> usize {
        self.slots()
    }

    /// Get the number of free slots in the buffer
    ///
    /// 获取缓冲区中的空闲槽位数量
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.shared.core.available_to_write()
    }

    /// Get the capacity of the buffer
    ///
    /// 获取缓冲区容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.core.capacity()
    }

    /// Peek at the next element without removing it
    ///
    /// 查看下一个元素但不移除它
    ///
    /// # Returns
    /// `Some(&T)` if there is an element, `None` if the buffer is empty
    ///
    /// # 返回值
    /// 如果有元素则返回 `Some(&T)`，如果缓冲区为空则返回 `None`
    ///
    /// The reference stays valid until the next mutating call on this
    /// consumer; the producer never touches a slot the consumer can see.
    ///
    /// 该引用在此消费者下一次修改性调用前保持有效；
    /// 生产者绝不会触及消费者可见的槽位。
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        let core = &self.shared.core;
        let read = core.read_idx().load(Ordering::Relaxed);
        let write = core.write_idx().load(Ordering::Acquire);

        if read == write {
            return None;
        }

        unsafe { Some(core.peek_at(R::slot(read, N))) }
    }

    /// Drop all currently readable elements
    ///
    /// 丢弃当前所有可读元素
    ///
    /// # Returns
    /// How many elements were dropped
    ///
    /// # 返回值
    /// 被丢弃的元素数量
    pub fn clear(&mut self) -> usize {
        let mut dropped = 0;
        while self.pop().is_ok() {
            dropped += 1;
        }
        dropped
    }

    /// Create a draining iterator
    ///
    /// 创建一个消费迭代器
    ///
    /// Returns an iterator that removes and returns elements until the buffer
    /// is observed empty. It does not wait for the producer.
    ///
    /// 返回一个移除并返回元素的迭代器，直到观察到缓冲区为空。
    /// 它不会等待生产者。
    ///
    /// # Examples
    ///
    /// ```
    /// use fullring::new;
    ///
    /// let (mut producer, mut consumer) = new::<i32, 8>();
    /// producer.push(1).unwrap();
    /// producer.push(2).unwrap();
    /// producer.push(3).unwrap();
    ///
    /// let items: Vec<i32> = consumer.drain().collect();
    /// assert_eq!(items, vec![1, 2, 3]);
    /// assert!(consumer.is_empty());
    /// ```
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T, N, R> {
        Drain { consumer: self }
    }

    /// Get a reference to the shared buffer data
    ///
    /// 获取共享缓冲区数据的引用
    #[inline]
    pub fn buffer(&self) -> &SharedData<T, N, R> {
        &self.shared
    }
}

impl<T: Copy, const N: usize, R: Reduce> Consumer<T, N, R> {
    /// Fill an entire slice from the buffer, or take nothing at all
    ///
    /// 从缓冲区填满整个切片，或完全不取
    ///
    /// Availability is first estimated against the cached write index; the
    /// authoritative counter is loaded only when the cache cannot prove
    /// enough data. On success all `dest.len()` elements are copied out and
    /// the read counter is published once for the whole batch.
    ///
    /// 先以缓存的写索引估算可用数据；仅当缓存无法证明数据足够时才载入
    /// 权威计数器。成功时拷出全部 `dest.len()` 个元素，
    /// 并为整批一次性发布读计数器。
    ///
    /// # Errors
    /// Returns `SliceError::Insufficient` if fewer than `dest.len()` elements
    /// are stored; nothing is consumed in that case
    ///
    /// # 错误
    /// 如果已存元素少于 `dest.len()` 则返回 `SliceError::Insufficient`，
    /// 此时不消费任何元素
    ///
    /// # Examples
    ///
    /// ```
    /// let (mut producer, mut consumer) = fullring::new::<u32, 8>();
    /// producer.push_slice(&[1, 2, 3, 4]).unwrap();
    ///
    /// let mut out = [0u32; 2];
    /// consumer.pop_slice(&mut out).unwrap();
    /// assert_eq!(out, [1, 2]);
    /// assert_eq!(consumer.slots(), 2);
    /// ```
    pub fn pop_slice(&mut self, dest: &mut [T]) -> Result<(), SliceError> {
        if dest.is_empty() {
            return Ok(());
        }

        let core = &self.shared.core;
        let count = dest.len();
        let read = core.read_idx().load(Ordering::Relaxed);

        // Estimate availability from the cached write index; the cache never
        // runs a full cycle ahead, so the estimate stays in [0, N]
        // 以缓存的写索引估算可用量；缓存领先永不超过一个完整周期，
        // 因此估算值恒在 [0, N] 内
        let mut available = R::wrap(2 * N + self.cached_write - read, N);
        debug_assert!(available <= N);

        if available < count {
            // Refresh the cache from the authoritative counter and re-check
            // 从权威计数器刷新缓存并重新检查
            self.cached_write = core.write_idx().load(Ordering::Acquire);
            available = R::wrap(2 * N + self.cached_write - read, N);

            if available < count {
                return Err(SliceError::Insufficient {
                    requested: count,
                    available,
                });
            }
        }

        unsafe {
            core.copy_to_slice(R::slot(read, N), dest, count);
        }

        // Free the whole batch with one Release store
        // 以一次 Release 存储释放整批槽位
        core.read_idx().store(R::wrap(read + count, N), Ordering::Release);

        Ok(())
    }
}
