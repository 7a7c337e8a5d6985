use super::*;

/// Header and solution pairs already seen for one template.
///
/// Grows for the life of the template and is dropped with it.
#[derive(Debug, Default)]
pub struct Submissions {
    seen: DashSet<(Vec<u8>, Vec<u8>)>,
}

impl Submissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time a pair is seen, `false` for every repeat.
    ///
    /// The check and the insert are one atomic step, so two racing copies of
    /// the same submission cannot both be accepted.
    pub fn register(&self, header: &[u8], solution: &[u8]) -> bool {
        self.seen.insert((header.to_vec(), solution.to_vec()))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
