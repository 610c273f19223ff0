//! Core ring buffer storage - shared state between the two halves
//!
//! 核心环形缓冲区存储 - 两端之间的共享状态
//!
//! This module owns everything both threads touch:
//! - The fixed buffer of `N` slots, allocated once at construction
//! - The two atomic counters, each padded onto its own cache line
//! - Raw slot accessors and the wrap-aware batch copies
//! - The acquire/acquire status queries
//!
//! 此模块拥有两个线程都会触及的一切：
//! - 构造时一次性分配的 `N` 个槽位的固定缓冲区
//! - 两个原子计数器，各自填充到独立的缓存行
//! - 原始槽位访问器与处理环绕的批量拷贝
//! - 基于 acquire/acquire 的状态查询
//!
//! Counters live in `[0, 2 * N)` (see [`crate::index`]); occupancy is
//! `wrap(2 * N + write - read)` and is never allowed past `N`.
//!
//! 计数器位于 `[0, 2 * N)`（见 [`crate::index`]）；占用量为
//! `wrap(2 * N + write - read)`，且永不允许超过 `N`。

use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr;

use crossbeam_utils::CachePadded;

use super::index::{Fast, Reduce};
use super::shim::atomic::{AtomicUsize, Ordering};

/// Core ring buffer storage structure
///
/// 核心环形缓冲区存储结构
///
/// # Type Parameters
/// - `T`: Element type
/// - `N`: Capacity in elements, used exactly as given (never rounded)
/// - `R`: Index reduction strategy
///
/// # 类型参数
/// - `T`: 元素类型
/// - `N`: 以元素计的容量，严格按给定值使用（从不取整）
/// - `R`: 索引归约策略
pub struct RingCore<T, const N: usize, R: Reduce = Fast> {
    /// Write counter in [0, 2 * N), advanced only by the producer
    ///
    /// 写计数器，范围 [0, 2 * N)，仅由生产者推进
    write_idx: CachePadded<AtomicUsize>,

    /// Read counter in [0, 2 * N), advanced only by the consumer
    ///
    /// 读计数器，范围 [0, 2 * N)，仅由消费者推进
    read_idx: CachePadded<AtomicUsize>,

    /// Slot storage; a slot is initialized exactly while the counters place
    /// it between read and write
    ///
    /// 槽位存储；仅当计数器将槽位置于读写之间时，该槽位才处于已初始化状态
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,

    strategy: PhantomData<R>,
}

impl<T, const N: usize, R: Reduce> RingCore<T, N, R> {
    /// Create a new core with both counters at zero (empty)
    ///
    /// 创建新核心，两个计数器均为零（空）
    ///
    /// The capacity is validated at compile time: it must be non-zero and
    /// small enough that `4 * N` cannot overflow a `usize`.
    ///
    /// 容量在编译期校验：必须非零，且小到 `4 * N` 不会溢出 `usize`。
    pub fn new() -> Self {
        const {
            assert!(N > 0, "ring capacity must be non-zero");
            assert!(N <= usize::MAX / 4, "ring capacity too large for double-range arithmetic");
        }

        let buffer = (0..N)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();

        Self {
            write_idx: CachePadded::new(AtomicUsize::new(0)),
            read_idx: CachePadded::new(AtomicUsize::new(0)),
            buffer,
            strategy: PhantomData,
        }
    }

    /// Get the capacity of the buffer
    ///
    /// 获取缓冲区容量
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Get a reference to the write counter
    ///
    /// 获取写计数器的引用
    #[inline]
    pub fn write_idx(&self) -> &AtomicUsize {
        &self.write_idx
    }

    /// Get a reference to the read counter
    ///
    /// 获取读计数器的引用
    #[inline]
    pub fn read_idx(&self) -> &AtomicUsize {
        &self.read_idx
    }

    /// Number of elements currently stored, always in [0, N]
    ///
    /// 当前存储的元素数量，恒在 [0, N] 内
    ///
    /// Both counters are loaded with Acquire so the result is safe to act on
    /// from either thread.
    ///
    /// 两个计数器均以 Acquire 载入，因此任一线程都可安全使用该结果。
    #[inline]
    pub fn available_to_read(&self) -> usize {
        let write = self.write_idx.load(Ordering::Acquire);
        let read = self.read_idx.load(Ordering::Acquire);
        R::wrap(2 * N + write - read, N)
    }

    /// Number of free slots, always in [0, N]
    ///
    /// 空闲槽位数量，恒在 [0, N] 内
    #[inline]
    pub fn available_to_write(&self) -> usize {
        N - self.available_to_read()
    }

    /// Check if the buffer is empty
    ///
    /// 检查缓冲区是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        let write = self.write_idx.load(Ordering::Acquire);
        let read = self.read_idx.load(Ordering::Acquire);
        write == read
    }

    /// Check if the buffer is full
    ///
    /// 检查缓冲区是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        self.available_to_read() == N
    }

    /// Raw pointer to the element slot at a physical index
    ///
    /// 指向物理索引处元素槽位的原始指针
    ///
    /// # Safety
    /// `index` must be in [0, N).
    ///
    /// # 安全性
    /// `index` 必须位于 [0, N) 内。
    #[inline]
    unsafe fn slot_ptr(&self, index: usize) -> *mut T {
        debug_assert!(index < N);
        unsafe { self.buffer.get_unchecked(index).get().cast::<T>() }
    }

    /// Write a single element at the given physical slot
    ///
    /// 在给定物理槽位写入单个元素
    ///
    /// # Safety
    /// Caller must ensure:
    /// - `index` is in [0, N) (reduce the counter first)
    /// - The slot is free (counter protocol) and nobody reads it concurrently
    ///
    /// # 安全性
    /// 调用者必须确保：
    /// - `index` 位于 [0, N) 内（先对计数器做归约）
    /// - 该槽位空闲（计数器协议保证）且无并发读取
    #[inline]
    pub unsafe fn write_at(&self, index: usize, value: T) {
        unsafe {
            self.slot_ptr(index).write(value);
        }
    }

    /// Read out the element at the given physical slot
    ///
    /// 读出给定物理槽位的元素
    ///
    /// # Safety
    /// Caller must ensure:
    /// - `index` is in [0, N) (reduce the counter first)
    /// - The slot holds an initialized element that nobody else touches; after
    ///   this call the slot counts as uninitialized again
    ///
    /// # 安全性
    /// 调用者必须确保：
    /// - `index` 位于 [0, N) 内（先对计数器做归约）
    /// - 该槽位持有已初始化的元素且无他方访问；调用后该槽位重新视为未初始化
    #[inline]
    pub unsafe fn read_at(&self, index: usize) -> T {
        unsafe { self.slot_ptr(index).read() }
    }

    /// Borrow the element at the given physical slot without consuming it
    ///
    /// 借用给定物理槽位的元素而不消费它
    ///
    /// # Safety
    /// Caller must ensure:
    /// - `index` is in [0, N) and the slot is initialized
    /// - The slot is not freed or overwritten while the reference lives
    ///
    /// # 安全性
    /// 调用者必须确保：
    /// - `index` 位于 [0, N) 内且槽位已初始化
    /// - 引用存活期间该槽位不被释放或覆盖
    #[inline]
    pub unsafe fn peek_at(&self, index: usize) -> &T {
        unsafe { &*self.slot_ptr(index) }
    }
}

/// Batch copy operations for Copy types
///
/// Copy 类型的批量拷贝操作
impl<T: Copy, const N: usize, R: Reduce> RingCore<T, N, R> {
    /// Copy `count` elements from a slice into the buffer
    ///
    /// 将切片中的 `count` 个元素拷贝到缓冲区
    ///
    /// A run that crosses the physical end of storage is split into two
    /// contiguous copies.
    ///
    /// 跨越物理存储末尾的序列会拆分为两次连续拷贝。
    ///
    /// # Parameters
    /// - `start_slot`: First physical slot, already reduced into [0, N)
    /// - `values`: Source slice
    /// - `count`: Number of elements to copy
    ///
    /// # 参数
    /// - `start_slot`: 起始物理槽位，已归约到 [0, N) 内
    /// - `values`: 源切片
    /// - `count`: 要拷贝的元素数量
    ///
    /// # Safety
    /// Caller must ensure:
    /// - `count <= values.len()` and `count <= N`
    /// - The `count` slots starting at `start_slot` are free and nobody
    ///   accesses them concurrently
    ///
    /// # 安全性
    /// 调用者必须确保：
    /// - `count <= values.len()` 且 `count <= N`
    /// - 从 `start_slot` 起的 `count` 个槽位空闲且无并发访问
    pub unsafe fn copy_from_slice(&self, start_slot: usize, values: &[T], count: usize) {
        debug_assert!(start_slot < N);
        debug_assert!(count <= values.len());
        debug_assert!(count <= N);

        if count == 0 {
            return;
        }

        unsafe {
            if count <= N - start_slot {
                // No wrap-around: single continuous copy
                // 无环绕：单次连续拷贝
                ptr::copy_nonoverlapping(values.as_ptr(), self.slot_ptr(start_slot), count);
            } else {
                // Wrap-around: two copies
                // 环绕：两次拷贝
                let first_part = N - start_slot;
                let second_part = count - first_part;

                // First part, from start_slot to the end of storage
                // 第一部分，从 start_slot 到存储末尾
                ptr::copy_nonoverlapping(values.as_ptr(), self.slot_ptr(start_slot), first_part);

                // Second part, from the beginning of storage
                // 第二部分，从存储开头
                ptr::copy_nonoverlapping(
                    values.as_ptr().add(first_part),
                    self.slot_ptr(0),
                    second_part,
                );
            }
        }
    }

    /// Copy `count` elements out of the buffer into a slice
    ///
    /// 将缓冲区中的 `count` 个元素拷贝到切片
    ///
    /// # Parameters
    /// - `start_slot`: First physical slot, already reduced into [0, N)
    /// - `dest`: Destination slice
    /// - `count`: Number of elements to copy
    ///
    /// # 参数
    /// - `start_slot`: 起始物理槽位，已归约到 [0, N) 内
    /// - `dest`: 目标切片
    /// - `count`: 要拷贝的元素数量
    ///
    /// # Safety
    /// Caller must ensure:
    /// - `count <= dest.len()` and `count <= N`
    /// - The `count` slots starting at `start_slot` are initialized and nobody
    ///   writes them concurrently
    ///
    /// # 安全性
    /// 调用者必须确保：
    /// - `count <= dest.len()` 且 `count <= N`
    /// - 从 `start_slot` 起的 `count` 个槽位已初始化且无并发写入
    pub unsafe fn copy_to_slice(&self, start_slot: usize, dest: &mut [T], count: usize) {
        debug_assert!(start_slot < N);
        debug_assert!(count <= dest.len());
        debug_assert!(count <= N);

        if count == 0 {
            return;
        }

        unsafe {
            if count <= N - start_slot {
                // No wrap-around: single continuous copy
                // 无环绕：单次连续拷贝
                ptr::copy_nonoverlapping(self.slot_ptr(start_slot), dest.as_mut_ptr(), count);
            } else {
                // Wrap-around: two copies
                // 环绕：两次拷贝
                let first_part = N - start_slot;
                let second_part = count - first_part;

                // First part, from start_slot to the end of storage
                // 第一部分，从 start_slot 到存储末尾
                ptr::copy_nonoverlapping(self.slot_ptr(start_slot), dest.as_mut_ptr(), first_part);

                // Second part, from the beginning of storage
                // 第二部分，从存储开头
                ptr::copy_nonoverlapping(
                    self.slot_ptr(0),
                    dest.as_mut_ptr().add(first_part),
                    second_part,
                );
            }
        }
    }
}

impl<T, const N: usize, R: Reduce> Drop for RingCore<T, N, R> {
    fn drop(&mut self) {
        if !std::mem::needs_drop::<T>() {
            return;
        }

        // Exclusive access here; whoever dropped the last handle already
        // synchronized through the shared pointer's reference count.
        // 此处为独占访问；丢弃最后一个句柄的一方已通过共享指针的引用计数同步。
        let write = self.write_idx.load(Ordering::Relaxed);
        let mut read = self.read_idx.load(Ordering::Relaxed);

        while read != write {
            unsafe {
                ptr::drop_in_place(self.slot_ptr(R::slot(read, N)));
            }
            read = R::wrap(read + 1, N);
        }
    }
}

// The counter protocol hands each initialized slot to exactly one thread at a
// time, so sharing the core only requires the elements to be sendable.
// 计数器协议保证每个已初始化槽位同一时刻仅交给一个线程，
// 因此共享核心只要求元素可跨线程发送。
unsafe impl<T: Send, const N: usize, R: Reduce> Send for RingCore<T, N, R> {}
unsafe impl<T: Send, const N: usize, R: Reduce> Sync for RingCore<T, N, R> {}
