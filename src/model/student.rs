use eyre::bail;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StudentId(pub usize);

/// Teaching period a student belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Period {
    P1,
    P2,
}

impl FromStr for Period {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P1" => Ok(Period::P1),
            "P2" => Ok(Period::P2),
            other => bail!("unknown period {other:?} (expected P1 or P2)"),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::P1 => write!(f, "P1"),
            Period::P2 => write!(f, "P2"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Student {
    pub id: StudentId,
    /// Identifier as found in the input file.
    pub label: String,
    /// 1-based line in the input file, header included.
    pub line: usize,
    pub source_group: u32,
    pub profession: String,
    pub period: Period,
    /// Internship outside the region, which rules out groups 1 to 4.
    pub stage_far: bool,
}

impl Student {
    pub fn new(
        id: StudentId,
        label: String,
        line: usize,
        source_group: u32,
        profession: String,
        period: Period,
        stage_far: bool,
    ) -> Student {
        Student {
            id,
            label,
            line,
            source_group,
            profession,
            period,
            stage_far,
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.label, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        assert_eq!("P1".parse::<Period>().unwrap(), Period::P1);
        assert_eq!(" p2 ".parse::<Period>().unwrap(), Period::P2);
        assert!("P3".parse::<Period>().is_err());
        assert!("".parse::<Period>().is_err());
    }
}
