//! Stack growth for deep recursion
//!
//! Every Bibi call nests several evaluator frames, so a program recursing up
//! to `max_call_depth` can outgrow a small thread stack long before the
//! `StackOverflow` check fires. Statement and expression evaluation go through
//! [`ensure_sufficient_stack`], which moves onto a fresh segment when the
//! current one runs low.

/// Minimum stack space to keep available (128KB red zone)
const RED_ZONE: usize = 128 * 1024;

/// Stack space to allocate when growing (1MB)
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
