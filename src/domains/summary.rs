use std::collections::BTreeMap;
use thiserror::Error;

pub const ENRICHED: &str = "ENRICHED";

const SEP: char = '\t';
const MIN_FIELDS: usize = 4;
const MIN_ENRICHED_FIELDS: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("line {line}: expected at least {expected} columns, found {found}")]
    MalformedDomain {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid {field} `{value}`")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: Box<str>,
    },
}

///
/// One line of an rseg `*.domains.bed` file:
/// chrom, start, end, state, average read count, domain score
///
#[derive(Debug, Clone, PartialEq)]
pub struct Domain<'a> {
    pub chrom: &'a str,
    pub start: u64,
    pub end: u64,
    pub state: &'a str,
    /// only parsed for enriched domains
    pub count: f64,
    /// only parsed for enriched domains
    pub score: f64,
}

impl<'a> Domain<'a> {
    pub fn parse(line: &'a str, line_no: usize) -> Result<Self, DomainError> {
        let words: Vec<&str> = line.split(SEP).collect();

        if words.len() < MIN_FIELDS {
            return Err(DomainError::MalformedDomain {
                line: line_no,
                expected: MIN_FIELDS,
                found: words.len(),
            });
        }

        let state = words[3];
        let enriched = state == ENRICHED;

        if enriched && words.len() < MIN_ENRICHED_FIELDS {
            return Err(DomainError::MalformedDomain {
                line: line_no,
                expected: MIN_ENRICHED_FIELDS,
                found: words.len(),
            });
        }

        let int = |field: &'static str, s: &str| -> Result<u64, DomainError> {
            s.parse().map_err(|_| DomainError::InvalidNumber {
                line: line_no,
                field,
                value: s.into(),
            })
        };

        let float = |field: &'static str, s: &str| -> Result<f64, DomainError> {
            fast_float::parse(s).map_err(|_| DomainError::InvalidNumber {
                line: line_no,
                field,
                value: s.into(),
            })
        };

        let start = int("start", words[1])?;
        let end = int("end", words[2])?;
        if end < start {
            return Err(DomainError::InvalidNumber {
                line: line_no,
                field: "end",
                value: words[2].into(),
            });
        }

        let (count, score) = match enriched {
            true => (float("count", words[4])?, float("score", words[5])?),
            false => (0_f64, 0_f64),
        };

        Ok(Domain {
            chrom: words[0],
            start,
            end,
            state,
            count,
            score,
        })
    }

    pub fn is_enriched(&self) -> bool {
        self.state == ENRICHED
    }

    pub fn size(&self) -> u64 {
        self.end - self.start
    }
}

///
/// Running totals over a domains file. Everything is a running sum
/// except `sizes`, which the median needs in full.
///
#[derive(Debug, Default, Clone)]
pub struct DomainSummary {
    states: BTreeMap<Box<str>, usize>,
    sizes: Vec<u64>,
    sum_counts: f64,
    sum_scores: f64,
}

impl DomainSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, domain: &Domain) {
        *self.states.entry(domain.state.into()).or_insert(0) += 1;

        if domain.is_enriched() {
            self.sizes.push(domain.size());
            self.sum_counts += domain.count;
            self.sum_scores += domain.score;
        }
    }

    pub fn state_count(&self, state: &str) -> usize {
        self.states.get(state).copied().unwrap_or(0)
    }

    pub fn num_enriched(&self) -> usize {
        self.sizes.len()
    }

    pub fn enriched_length(&self) -> u64 {
        self.sizes.iter().sum()
    }

    fn mean_of(&self, total: f64) -> Option<f64> {
        match self.num_enriched() {
            0 => None,
            n => Some(total / cast::f64(n as u64)),
        }
    }

    pub fn mean_size(&self) -> Option<f64> {
        self.mean_of(cast::f64(self.enriched_length()))
    }

    pub fn mean_count(&self) -> Option<f64> {
        self.mean_of(self.sum_counts)
    }

    pub fn mean_score(&self) -> Option<f64> {
        self.mean_of(self.sum_scores)
    }

    pub fn median_size(&self) -> Option<f64> {
        let mut sizes = self.sizes.clone();
        sizes.sort_unstable();
        let n = sizes.len();
        match n {
            0 => None,
            _ if n % 2 == 0 => Some(cast::f64(sizes[n / 2 - 1] + sizes[n / 2]) / 2_f64),
            _ => Some(cast::f64(sizes[n / 2])),
        }
    }

    /// `STATE:n; STATE:n; ...` in state order
    pub fn state_counts(&self) -> String {
        self.states
            .iter()
            .map(|(k, n)| format!("{}:{}", k, n))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Tab-separated report line, `NA` for statistics over no
    /// enriched domains
    pub fn report(&self, input_name: &str) -> String {
        let rounded = |x: Option<f64>| x.map_or("NA".to_string(), |v| format!("{:.1}", v.round()));
        // midpoint of two sizes keeps a decimal, a single middle size does not
        let median = match self.median_size() {
            None => "NA".to_string(),
            Some(v) if self.sizes.len() % 2 == 0 => format!("{:.1}", v),
            Some(v) => v.to_string(),
        };

        [
            input_name.to_string(),
            self.state_counts(),
            "AVG_ENRICHED_SIZE".to_string(),
            rounded(self.mean_size()),
            "MEDIAN_ENRICHED_SIZE".to_string(),
            median,
            "ENRICHED_LENGTH".to_string(),
            self.enriched_length().to_string(),
            "AVG_COUNTS".to_string(),
            rounded(self.mean_count()),
            "AVG_SCORE".to_string(),
            rounded(self.mean_score()),
        ]
        .join("\t")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAINS: [&str; 5] = [
        "chr1\t0\t1000\tBACKGROUND\t0.5\t10.2",
        "chr1\t1000\t1400\tENRICHED\t12.5\t40.4",
        "chr1\t1400\t2000\tBACKGROUND\t0.1\t3.0",
        "chr1\t2000\t2100\tENRICHED\t7.5\t20.0",
        "chr2\t0\t600\tENRICHED\t2.0\t9.1",
    ];

    fn summarize(lines: &[&str]) -> DomainSummary {
        let mut summary = DomainSummary::new();
        for (i, line) in lines.iter().enumerate() {
            summary.push(&Domain::parse(line, i + 1).unwrap());
        }
        summary
    }

    #[test]
    fn enriched_statistics() {
        let s = summarize(&DOMAINS);
        assert_eq!(s.state_count(ENRICHED), 3);
        assert_eq!(s.state_count("BACKGROUND"), 2);
        assert_eq!(s.enriched_length(), 1100);
        assert_eq!(s.median_size(), Some(400.0));
        assert_eq!(s.mean_count(), Some(22.0 / 3.0));
        assert!((s.mean_score().unwrap() - 23.166_666).abs() < 1e-5);
        assert_eq!(s.state_counts(), "BACKGROUND:2; ENRICHED:3");
    }

    #[test]
    fn even_number_of_sizes_takes_midpoint() {
        let s = summarize(&DOMAINS[1..4]);
        assert_eq!(s.median_size(), Some(250.0));
        assert_eq!(s.mean_size(), Some(250.0));
        assert!(s
            .report("z")
            .contains("AVG_ENRICHED_SIZE\t250.0\tMEDIAN_ENRICHED_SIZE\t250.0\t"));
    }

    #[test]
    fn report_line() {
        let s = summarize(&DOMAINS);
        assert_eq!(
            s.report("x.domains.bed"),
            "x.domains.bed\tBACKGROUND:2; ENRICHED:3\tAVG_ENRICHED_SIZE\t367.0\t\
             MEDIAN_ENRICHED_SIZE\t400\tENRICHED_LENGTH\t1100\tAVG_COUNTS\t7.0\tAVG_SCORE\t23.0"
        );

        let s = summarize(&DOMAINS[..1]);
        assert!(s.report("y").ends_with("AVG_COUNTS\tNA\tAVG_SCORE\tNA"));
        assert!(s.report("y").contains("MEDIAN_ENRICHED_SIZE\tNA\tENRICHED_LENGTH\t0"));
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(
            Domain::parse("chr1\t0\t10", 3),
            Err(DomainError::MalformedDomain {
                line: 3,
                expected: 4,
                found: 3
            })
        );
        assert!(matches!(
            Domain::parse("chr1\t0\t10\tENRICHED\t1.0", 1),
            Err(DomainError::MalformedDomain { expected: 6, .. })
        ));
        assert!(matches!(
            Domain::parse("chr1\t0\t10\tENRICHED\tx\t1.0", 1),
            Err(DomainError::InvalidNumber { field: "count", .. })
        ));
        assert!(matches!(
            Domain::parse("chr1\t50\t10\tBACKGROUND", 1),
            Err(DomainError::InvalidNumber { field: "end", .. })
        ));
        // background lines only need the state
        assert!(Domain::parse("chr1\t0\t10\tBACKGROUND", 1).is_ok());
    }
}
