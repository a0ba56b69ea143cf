use crate::util::bam::BamSample;

/// Drop repeated entries, keeping the first occurrence
pub fn unique_in_order(words: &[Box<str>]) -> Vec<Box<str>> {
    let mut ret: Vec<Box<str>> = vec![];
    for w in words {
        if !ret.contains(w) {
            ret.push(w.clone());
        }
    }
    ret
}

/// Pair BAM files with sample labels. Labels are recycled when there
/// are fewer of them than files; with no labels the file stems are
/// used.
///
/// * `bams` - alignment file names
/// * `names` - user-provided labels
pub fn make_samples(bams: &[Box<str>], names: &[Box<str>]) -> Vec<BamSample> {
    bams.iter()
        .enumerate()
        .map(|(i, b)| match names.len() {
            0 => BamSample::from_path(b),
            k => BamSample::with_name(b, &names[i % k]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(xs: &[&str]) -> Vec<Box<str>> {
        xs.iter().map(|x| Box::from(*x)).collect()
    }

    #[test]
    fn duplicates_are_dropped() {
        let bams = boxed(&["b.bam", "a.bam", "b.bam", "c.bam", "a.bam"]);
        assert_eq!(unique_in_order(&bams), boxed(&["b.bam", "a.bam", "c.bam"]));
    }

    #[test]
    fn names_are_recycled() {
        let bams = boxed(&["x/1.bam", "x/2.bam", "x/3.bam"]);
        let samples = make_samples(&bams, &boxed(&["ctrl", "trt"]));
        let names: Vec<_> = samples.iter().map(|s| s.name.as_ref()).collect();
        assert_eq!(names, vec!["ctrl", "trt", "ctrl"]);

        let samples = make_samples(&bams, &[]);
        assert_eq!(samples[2].name.as_ref(), "3");
    }
}
