//! Pager accumulation, retry and emission policy.

use std::fmt;

use super::PageSource;

pub(crate) type TransformFn<T> = Box<dyn Fn(Vec<T>) -> Vec<T> + Send + Sync>;
pub(crate) type CombineFn<T> = Box<dyn Fn(Vec<T>, Vec<T>) -> Vec<T> + Send + Sync>;

/// Configuration for a [`Pager`](super::Pager).
///
/// Everything is caller-supplied at construction; the defaults are two
/// retry attempts, accumulate-across-sessions off, dedupe off, no error
/// channel and no implicit first session.
pub struct PagerConfig<S: PageSource> {
    pub(crate) retry_attempts: u32,
    pub(crate) reset_on_start_over: bool,
    pub(crate) dedupe_consecutive: bool,
    pub(crate) surface_errors: bool,
    pub(crate) initial_params: Option<S::Params>,
    pub(crate) transform: Option<TransformFn<S::Item>>,
    pub(crate) combine: Option<CombineFn<S::Item>>,
}

impl<S: PageSource> PagerConfig<S> {
    /// Create a config with the defaults.
    pub fn new() -> Self {
        Self {
            retry_attempts: 2,
            reset_on_start_over: false,
            dedupe_consecutive: false,
            surface_errors: false,
            initial_params: None,
            transform: None,
            combine: None,
        }
    }

    /// Start the first session immediately at spawn with `params`,
    /// without waiting for an explicit `start_over`.
    pub fn start_with(mut self, params: S::Params) -> Self {
        self.initial_params = Some(params);
        self
    }

    /// Additional attempts after a failed fetch (default 2).
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Discard previously accumulated items when a new session starts.
    pub fn reset_on_start_over(mut self) -> Self {
        self.reset_on_start_over = true;
        self
    }

    /// Suppress an emission when the newly accumulated sequence equals
    /// the last emitted one.
    pub fn dedupe_consecutive(mut self) -> Self {
        self.dedupe_consecutive = true;
        self
    }

    /// Deliver exhausted fetch failures on the pager's error channel.
    ///
    /// Off by default: the data stream then degrades silently, exactly
    /// like reaching the end of the data.
    pub fn surface_errors(mut self) -> Self {
        self.surface_errors = true;
        self
    }

    /// Per-page item mapping, applied before accumulation (default
    /// identity).
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<S::Item>) -> Vec<S::Item> + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(f));
        self
    }

    /// How a new page merges into the running total (default simple
    /// concatenation). Receives `(accumulated, new_items)`.
    pub fn combine_with<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<S::Item>, Vec<S::Item>) -> Vec<S::Item> + Send + Sync + 'static,
    {
        self.combine = Some(Box::new(f));
        self
    }
}

impl<S: PageSource> Default for PagerConfig<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PageSource> fmt::Debug for PagerConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagerConfig")
            .field("retry_attempts", &self.retry_attempts)
            .field("reset_on_start_over", &self.reset_on_start_over)
            .field("dedupe_consecutive", &self.dedupe_consecutive)
            .field("surface_errors", &self.surface_errors)
            .field("has_initial_params", &self.initial_params.is_some())
            .field("has_transform", &self.transform.is_some())
            .field("has_combine", &self.combine.is_some())
            .finish()
    }
}
