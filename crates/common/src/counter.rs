/// Counts `update()` calls and reports when a cycle completes.
///
/// A cycle completes on the update that pushes the count past `target`.
/// Looping counters then restart from zero; one-shot counters keep reporting
/// completion on every further update until [`reset`](Self::reset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    count: u32,
    target: u32,
    looping: bool,
}

impl Counter {
    pub fn new(target: u32, looping: bool) -> Self {
        Self {
            count: 0,
            target,
            looping,
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn set_target(&mut self, target: u32) {
        self.target = target;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Advance by one; returns `true` when the cycle completed on this call.
    pub fn update(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        if self.count > self.target {
            if self.looping {
                self.count = 0;
            }
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
