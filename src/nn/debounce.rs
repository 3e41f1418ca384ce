/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 防抖：在静默期结束后只交付最后一次提交的值
 *
 * 时间由调用方注入（`Instant`），本身不启动任何定时器或线程。
 */

use std::time::{Duration, Instant};

/// 单值防抖器
///
/// # 示例
/// ```
/// use shape_flow::nn::Debouncer;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let mut debouncer = Debouncer::new(Duration::from_millis(200));
/// debouncer.schedule("1", start);
/// debouncer.schedule("16", start + Duration::from_millis(100));
/// assert_eq!(debouncer.poll(start + Duration::from_millis(250)), None);
/// assert_eq!(debouncer.poll(start + Duration::from_millis(300)), Some("16"));
/// assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub const fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// 提交新值：替换尚未交付的旧值，并从`now`起重新计算静默期
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// 取消尚未交付的值
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 待交付值的到期时刻
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// 静默期已过则交付（且只交付一次），否则返回`None`
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.cancel(),
            _ => None,
        }
    }

    /// 不等静默期结束，立即交付
    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }
}
