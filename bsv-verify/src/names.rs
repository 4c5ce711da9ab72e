#![forbid(unsafe_code)]

/// Session counter for tracker and symbol names.
///
/// Every name is `<prefix>-<n>` with `n` never reused, so names are unique
/// regardless of the prefixes callers pick.
#[derive(Debug, Default)]
pub struct FreshNames {
    count: u64,
}

impl FreshNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_string(&mut self, prefix: &str) -> String {
        let n = self.count;
        self.count += 1;
        format!("{prefix}-{n}")
    }

    /// How many names have been handed out.
    pub fn issued(&self) -> u64 {
        self.count
    }
}
