use std::fmt::{self, Display};
use std::ops::AddAssign;

/// Tally of what a migration did
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Report {
    pub threads: usize,
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl AddAssign for Report {
    fn add_assign(&mut self, other: Report) {
        self.threads += other.threads;
        self.migrated += other.migrated;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} messages migrated, {} skipped, {} failed across {} threads",
            self.migrated, self.skipped, self.failed, self.threads
        )
    }
}
