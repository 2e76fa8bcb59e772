//! Size guard shared by every transport

use crate::domain::DomainError;

/// Default maximum file size (50 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Default maximum number of characters returned for text files
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 50_000;

/// Enforces the configured maximum file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeGuard {
    max_bytes: u64,
}

impl SizeGuard {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Streaming checkpoint: call with the running total after each chunk
    pub fn check_streamed(&self, bytes_so_far: u64) -> Result<(), DomainError> {
        self.check(bytes_so_far)
    }

    /// Post-assembly checkpoint: call once the whole buffer is in memory
    pub fn check_assembled(&self, len: usize) -> Result<(), DomainError> {
        self.check(len as u64)
    }

    fn check(&self, actual: u64) -> Result<(), DomainError> {
        if actual > self.max_bytes {
            return Err(DomainError::file_too_large(actual, self.max_bytes));
        }

        Ok(())
    }
}

impl Default for SizeGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_limit_is_allowed() {
        let guard = SizeGuard::new(10);
        assert!(guard.check_assembled(10).is_ok());
        assert!(guard.check_streamed(10).is_ok());
    }

    #[test]
    fn test_over_limit_reports_actual_size() {
        let guard = SizeGuard::new(10);
        let err = guard.check_streamed(11).unwrap_err();

        assert!(matches!(
            err,
            DomainError::FileTooLarge {
                actual: 11,
                max: 10
            }
        ));
    }

    #[test]
    fn test_default_is_fifty_mib() {
        assert_eq!(SizeGuard::default().max_bytes(), 52_428_800);
    }
}
