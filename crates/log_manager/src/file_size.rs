use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimal and binary size units accepted by `MaxLogFileSize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    B,
    KB,
    KiB,
    MB,
    MiB,
    GB,
    GiB,
}

impl SizeUnit {
    pub fn multiplier(self) -> u64 {
        match self {
            SizeUnit::B => 1,
            SizeUnit::KB => 1_000,
            SizeUnit::KiB => 1_024,
            SizeUnit::MB => 1_000_000,
            SizeUnit::MiB => 1_048_576,
            SizeUnit::GB => 1_000_000_000,
            SizeUnit::GiB => 1_073_741_824,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            SizeUnit::B => "B",
            SizeUnit::KB => "KB",
            SizeUnit::KiB => "KiB",
            SizeUnit::MB => "MB",
            SizeUnit::MiB => "MiB",
            SizeUnit::GB => "GB",
            SizeUnit::GiB => "GiB",
        }
    }
}

/// File size as configured: a count plus a unit, e.g. `50MB` or `100KiB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSize {
    pub size: u64,
    pub unit: SizeUnit,
}

impl FileSize {
    pub fn new(size: u64, unit: SizeUnit) -> Self {
        FileSize { size, unit }
    }

    /// Total size in bytes, saturating at `u64::MAX` for sizes too large to
    /// represent.
    pub fn bytes(&self) -> u64 {
        self.size.saturating_mul(self.unit.multiplier())
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.size, self.unit.symbol())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid file size, expected <positive int><B|KB|KiB|MB|MiB|GB|GiB>: {0}")]
pub struct ParseFileSizeError(pub String);

impl FromStr for FileSize {
    type Err = ParseFileSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseFileSizeError(s.to_string());

        let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 || digits == s.len() {
            return Err(invalid());
        }

        let size: u64 = s[..digits].parse().map_err(|_| invalid())?;
        if size == 0 {
            return Err(invalid());
        }

        let unit = match &s[digits..] {
            "B" => SizeUnit::B,
            "KB" => SizeUnit::KB,
            "KiB" => SizeUnit::KiB,
            "MB" => SizeUnit::MB,
            "MiB" => SizeUnit::MiB,
            "GB" => SizeUnit::GB,
            "GiB" => SizeUnit::GiB,
            _ => return Err(invalid()),
        };

        // Sizes whose byte count does not fit in u64 are rejected up front.
        size.checked_mul(unit.multiplier()).ok_or_else(invalid)?;

        Ok(FileSize { size, unit })
    }
}
