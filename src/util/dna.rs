///
/// Nucleotide buckets tallied from pileup read bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dna {
    A,
    C,
    G,
    T,
    N,
}

impl Dna {
    pub const ALL: [Dna; 5] = [Dna::A, Dna::C, Dna::G, Dna::T, Dna::N];

    /// Case-insensitive conversion of a base call. Anything other
    /// than `ACGTN` returns `None`.
    pub fn from_byte(bp: u8) -> Option<Dna> {
        match bp {
            b'A' | b'a' => Some(Dna::A),
            b'C' | b'c' => Some(Dna::C),
            b'G' | b'g' => Some(Dna::G),
            b'T' | b't' => Some(Dna::T),
            b'N' | b'n' => Some(Dna::N),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Dna::A => 'A',
            Dna::C => 'C',
            Dna::G => 'G',
            Dna::T => 'T',
            Dna::N => 'N',
        }
    }
}

impl std::fmt::Display for Dna {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

///
/// DNA base-level counts at one position of one sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DnaBaseCount {
    pub a: u32,
    pub c: u32,
    pub g: u32,
    pub t: u32,
    pub n: u32,
}

impl DnaBaseCount {
    pub fn add(&mut self, bp: Dna, k: u32) {
        match bp {
            Dna::A => self.a += k,
            Dna::C => self.c += k,
            Dna::G => self.g += k,
            Dna::T => self.t += k,
            Dna::N => self.n += k,
        }
    }

    pub fn get(&self, bp: Dna) -> u32 {
        match bp {
            Dna::A => self.a,
            Dna::C => self.c,
            Dna::G => self.g,
            Dna::T => self.t,
            Dna::N => self.n,
        }
    }

    /// Total number of base calls, `N` included
    pub fn total(&self) -> u32 {
        self.a + self.c + self.g + self.t + self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_case_calls_map_to_upper() {
        assert_eq!(Dna::from_byte(b'g'), Some(Dna::G));
        assert_eq!(Dna::from_byte(b'n'), Some(Dna::N));
        assert_eq!(Dna::from_byte(b'R'), None);
        assert_eq!(Dna::from_byte(b'.'), None);
    }

    #[test]
    fn total_counts_every_bucket() {
        let mut cnt = DnaBaseCount::default();
        for (i, bp) in Dna::ALL.iter().enumerate() {
            cnt.add(*bp, i as u32 + 1);
        }
        assert_eq!(cnt.get(Dna::T), 4);
        assert_eq!(cnt.total(), 15);
    }
}
