use super::UnknownReference;
use crate::util::dna::{Dna, DnaBaseCount};

/// Count `A/C/G/T/N` calls in a pileup read-base string and fold the
/// reference matches (`.` and `,`) into the reference base bucket.
///
/// * `bases` - 5th column of an mpileup sample block
/// * `ref_base` - 3rd column of the mpileup line
///
/// `^` starts a read and the character after it is the mapping
/// quality, so both are skipped. Strand, indels and read ends are
/// ignored.
pub fn tally_bases(bases: &str, ref_base: &str) -> Result<DnaBaseCount, UnknownReference> {
    let fold_target = match ref_base.as_bytes() {
        [bp] => Dna::from_byte(*bp),
        _ => None,
    }
    .ok_or_else(|| UnknownReference {
        base: ref_base.into(),
    })?;

    let mut counts = DnaBaseCount::default();
    let mut matches = 0_u32;
    let mut skip = false;

    for &x in bases.as_bytes() {
        if skip {
            skip = false;
            continue;
        }
        match x {
            b'^' => skip = true,
            b'.' | b',' => matches += 1,
            _ => {
                if let Some(bp) = Dna::from_byte(x) {
                    counts.add(bp, 1);
                }
            }
        }
    }

    counts.add(fold_target, matches);
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn matches_fold_into_reference() {
        let cnt = tally_bases(",,..AaCcGgTtNn", "A").unwrap();
        assert_eq!(cnt.a, 6);
        assert_eq!((cnt.c, cnt.g, cnt.t, cnt.n), (2, 2, 2, 2));
        assert_eq!(cnt.total(), 14);
    }

    #[test]
    fn read_start_and_mapping_quality_are_skipped() {
        let cnt = tally_bases("^]A.C", "A").unwrap();
        assert_eq!(cnt.a, 2);
        assert_eq!(cnt.c, 1);
        assert_eq!(cnt.total(), 3);
    }

    #[test]
    fn mapping_quality_can_look_like_a_marker() {
        // `^^` opens a read with mapping quality 61, `^A` with 32
        let cnt = tally_bases("^^.^AC", "G").unwrap();
        assert_eq!(cnt.g, 1);
        assert_eq!(cnt.c, 1);
        assert_eq!(cnt.a, 0);
    }

    #[test_case("A$.$,*", "T", 2, 3 ; "read ends and deletions")]
    #[test_case("", "C", 0, 0 ; "no coverage")]
    #[test_case(".,.,", "n", 4, 4 ; "lower case reference")]
    #[test_case(".+2AG", "C", 1, 3 ; "indel letters are not special")]
    fn other_symbols_are_ignored(bases: &str, ref_base: &str, folded: u32, total: u32) {
        let cnt = tally_bases(bases, ref_base).unwrap();
        let target = Dna::from_byte(ref_base.as_bytes()[0]).unwrap();
        assert_eq!(cnt.get(target), folded);
        assert_eq!(cnt.total(), total);
    }

    #[test_case("R" ; "iupac code")]
    #[test_case("*" ; "symbol")]
    #[test_case("" ; "missing")]
    #[test_case("AC" ; "more than one base")]
    fn ambiguous_reference_is_reported(ref_base: &str) {
        assert_eq!(
            tally_bases("..", ref_base),
            Err(UnknownReference {
                base: ref_base.into()
            })
        );
    }
}
