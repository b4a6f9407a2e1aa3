//! The snapshots, one module each, and the registry mapping their numbers
//! to constructors.
//!
//! The numbering has gaps (03 and 05 never shipped); the registry keeps the
//! published numbers rather than renumbering history.

use std::{fmt, str::FromStr};

use anyhow::bail;

use crate::snapshot::SnapshotConstructor;

pub mod step01;
pub mod step02;
pub mod step04;
pub mod step06;
pub mod step07;
pub mod step08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    S01,
    S02,
    S04,
    S06,
    S07,
    S08,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::S01,
        Step::S02,
        Step::S04,
        Step::S06,
        Step::S07,
        Step::S08,
    ];

    pub fn number(self) -> &'static str {
        match self {
            Step::S01 => "01",
            Step::S02 => "02",
            Step::S04 => "04",
            Step::S06 => "06",
            Step::S07 => "07",
            Step::S08 => "08",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::S01 => "blank window",
            Step::S02 => "animated clear colour",
            Step::S04 => "shaded quad",
            Step::S06 => "spinning cube, raw vertex array",
            Step::S07 => "spinning cube, typed vertices",
            Step::S08 => "textured quad",
        }
    }

    pub fn constructor(self) -> SnapshotConstructor {
        match self {
            Step::S01 => step01::build,
            Step::S02 => step02::build,
            Step::S04 => step04::build,
            Step::S06 => step06::build,
            Step::S07 => step07::build,
            Step::S08 => step08::build,
        }
    }
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('0') {
            "1" => Ok(Step::S01),
            "2" => Ok(Step::S02),
            "4" => Ok(Step::S04),
            "6" => Ok(Step::S06),
            "7" => Ok(Step::S07),
            "8" => Ok(Step::S08),
            _ => bail!("unknown snapshot {s:?} (available: 01, 02, 04, 06, 07, 08)"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_bare_numbers() {
        assert_eq!("02".parse::<Step>().unwrap(), Step::S02);
        assert_eq!("2".parse::<Step>().unwrap(), Step::S02);
        assert_eq!(" 08 ".parse::<Step>().unwrap(), Step::S08);
    }

    #[test]
    fn rejects_the_missing_numbers() {
        for missing in ["03", "05", "0", "", "nine"] {
            let err = missing.parse::<Step>().unwrap_err().to_string();
            assert!(err.contains("available"), "unhelpful error: {err}");
        }
    }

    #[test]
    fn registry_is_ordered_and_displayable() {
        let numbers: Vec<&str> = Step::ALL.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, ["01", "02", "04", "06", "07", "08"]);
        for step in Step::ALL {
            assert_eq!(step.to_string(), step.number());
            assert_eq!(step.number().parse::<Step>().unwrap(), step);
        }
    }
}
