//! Index reduction strategies for the double-range counter scheme
//!
//! 双倍范围计数器方案的索引归约策略
//!
//! The ring keeps its write and read counters in `[0, 2 * capacity)` instead
//! of `[0, capacity)`. That way a full buffer (`write == read + capacity`,
//! modulo `2 * capacity`) and an empty buffer (`write == read`) have distinct
//! counter patterns and every one of the `capacity` slots can hold data, with
//! no sentinel slot sacrificed.
//!
//! 环形缓冲区将写/读计数器保持在 `[0, 2 * capacity)` 而非 `[0, capacity)` 范围内。
//! 这样"满"（`write == read + capacity`，模 `2 * capacity`）和"空"
//! （`write == read`）的计数器位模式不同，全部 `capacity` 个槽位都可存放数据，
//! 无需牺牲哨兵槽位。
//!
//! The price is that counters must be folded back into range after every
//! advance, and folded down to a physical slot before every buffer access.
//! Those two folds are this module: [`Reduce::slot`] maps `[0, 2 * capacity)`
//! to `[0, capacity)`, and [`Reduce::wrap`] maps `[0, 4 * capacity)` to
//! `[0, 2 * capacity)`. Inputs are guaranteed in range by the callers, so a
//! full `%` is never required; that guarantee is what makes the cheaper
//! strategies possible.
//!
//! 代价是每次推进后计数器必须折回范围内，每次访问缓冲区前必须折算为物理槽位。
//! 这两种折算即本模块：[`Reduce::slot`] 将 `[0, 2 * capacity)` 映射到
//! `[0, capacity)`，[`Reduce::wrap`] 将 `[0, 4 * capacity)` 映射到
//! `[0, 2 * capacity)`。调用方保证输入在范围内，因此无需完整的 `%` 运算，
//! 这正是更廉价策略可行的原因。

/// Strategy for folding ring counters back into their canonical ranges.
///
/// 将环形计数器折回规范范围的策略。
///
/// All implementations are zero-sized markers: the queue carries the strategy
/// as a type parameter and the capacity as a const generic, so every call
/// below resolves statically and the automatic choice ([`Fast`]) folds to a
/// single instruction at compile time.
///
/// 所有实现都是零尺寸标记类型：队列以类型参数携带策略、以 const 泛型携带容量，
/// 因此下面的每个调用都静态解析，自动选择（[`Fast`]）在编译期折叠为单条指令。
///
/// Implementations must be pure: same inputs, same outputs, no side effects.
/// The valid-input contracts are checked with `debug_assert!` only.
///
/// 实现必须是纯函数：相同输入产生相同输出，无副作用。
/// 输入范围契约仅以 `debug_assert!` 检查。
pub trait Reduce {
    /// Fold `index` from `[0, 2 * capacity)` into `[0, capacity)`.
    ///
    /// 将 `index` 从 `[0, 2 * capacity)` 折算到 `[0, capacity)`。
    fn slot(index: usize, capacity: usize) -> usize;

    /// Fold `index` from `[0, 4 * capacity)` into `[0, 2 * capacity)`.
    ///
    /// 将 `index` 从 `[0, 4 * capacity)` 折算到 `[0, 2 * capacity)`。
    fn wrap(index: usize, capacity: usize) -> usize;
}

/// Division-remainder reduction. Works for any capacity.
///
/// 除法取余归约。适用于任意容量。
///
/// The slowest of the three; kept as the reference the other strategies are
/// checked against.
///
/// 三者中最慢；保留用作校验其他策略的基准实现。
#[derive(Debug, Clone, Copy)]
pub struct Exact;

impl Reduce for Exact {
    #[inline]
    fn slot(index: usize, capacity: usize) -> usize {
        debug_assert!(index < 2 * capacity);
        index % capacity
    }

    #[inline]
    fn wrap(index: usize, capacity: usize) -> usize {
        debug_assert!(index < 4 * capacity);
        index % (2 * capacity)
    }
}

/// Compare-and-subtract reduction. Works for any capacity.
///
/// 比较减法归约。适用于任意容量。
///
/// Because inputs are at most one capacity beyond range, a single comparison
/// and at most one subtraction replace the division. The branch is well
/// predicted in steady state since most values are already in range.
///
/// 由于输入最多超出范围一个容量，一次比较加至多一次减法即可取代除法。
/// 稳态下大多数值已在范围内，分支预测良好。
#[derive(Debug, Clone, Copy)]
pub struct Branch;

impl Reduce for Branch {
    #[inline]
    fn slot(index: usize, capacity: usize) -> usize {
        debug_assert!(index < 2 * capacity);
        if index >= capacity {
            index - capacity
        } else {
            index
        }
    }

    #[inline]
    fn wrap(index: usize, capacity: usize) -> usize {
        debug_assert!(index < 4 * capacity);
        let double = 2 * capacity;
        if index >= double {
            index - double
        } else {
            index
        }
    }
}

/// Bitmask reduction. Valid only for power-of-two capacities.
///
/// 位掩码归约。仅对 2 的幂容量有效。
#[derive(Debug, Clone, Copy)]
pub struct Mask;

impl Reduce for Mask {
    #[inline]
    fn slot(index: usize, capacity: usize) -> usize {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(index < 2 * capacity);
        index & (capacity - 1)
    }

    #[inline]
    fn wrap(index: usize, capacity: usize) -> usize {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(index < 4 * capacity);
        index & (2 * capacity - 1)
    }
}

/// Automatic strategy: [`Mask`] when the capacity is a power of two,
/// [`Branch`] otherwise.
///
/// 自动策略：容量为 2 的幂时使用 [`Mask`]，否则使用 [`Branch`]。
///
/// The power-of-two test runs on the capacity, which reaches this code as a
/// const generic, so the selection is decided at compile time and the
/// non-selected arm disappears from the generated code.
///
/// 2 的幂判断作用于容量，而容量以 const 泛型形式到达此处，
/// 因此选择在编译期完成，未被选中的分支不会出现在生成的代码中。
#[derive(Debug, Clone, Copy)]
pub struct Fast;

impl Reduce for Fast {
    #[inline]
    fn slot(index: usize, capacity: usize) -> usize {
        if capacity.is_power_of_two() {
            Mask::slot(index, capacity)
        } else {
            Branch::slot(index, capacity)
        }
    }

    #[inline]
    fn wrap(index: usize, capacity: usize) -> usize {
        if capacity.is_power_of_two() {
            Mask::wrap(index, capacity)
        } else {
            Branch::wrap(index, capacity)
        }
    }
}
