#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly<O>(pub Vec<O>);

impl<O> Poly<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize) -> Self {
        Self(vec![O::default(); n])
    }

    pub fn n(&self) -> usize {
        self.0.len()
    }

    pub fn log_n(&self) -> usize {
        (usize::BITS - (self.n() - 1).leading_zeros()) as usize
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.fill(*v)
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    pub fn copy_from(&mut self, other: &Poly<O>) {
        self.0.resize(other.n(), O::default());
        self.0.copy_from_slice(&other.0)
    }
}

/// A polynomial in RNS representation: limb i holds the residues mod q_i.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PolyRNS<O>(pub Vec<Poly<O>>);

impl<O> PolyRNS<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize, level: usize) -> Self {
        Self((0..level + 1).map(|_| Poly::new(n)).collect())
    }

    pub fn n(&self) -> usize {
        self.0[0].n()
    }

    pub fn log_n(&self) -> usize {
        self.0[0].log_n()
    }

    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    pub fn at(&self, level: usize) -> &Poly<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        &self.0[level]
    }

    pub fn at_mut(&mut self, level: usize) -> &mut Poly<O> {
        &mut self.0[level]
    }

    pub fn split_at_mut(&mut self, level: usize) -> (&mut [Poly<O>], &mut [Poly<O>]) {
        self.0.split_at_mut(level)
    }

    /// Drops the limbs above `level`.
    pub fn truncate(&mut self, level: usize) {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        self.0.truncate(level + 1)
    }

    /// Returns a copy restricted to the limbs [0, level].
    pub fn truncated(&self, level: usize) -> Self {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        Self(self.0[..level + 1].to_vec())
    }

    pub fn resize(&mut self, level: usize) {
        let n: usize = self.n();
        self.0.resize(level + 1, Poly::<O>::new(n));
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.iter_mut().for_each(|p| p.set_all(v))
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    pub fn copy(&mut self, other: &PolyRNS<O>) {
        self.resize(other.level());
        self.copy_level(other.level(), other);
    }

    pub fn copy_level(&mut self, level: usize, other: &PolyRNS<O>) {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        assert!(
            level <= other.level(),
            "invalid argument level: level={} > other.level()={}",
            level,
            other.level()
        );
        (0..level + 1).for_each(|i| self.at_mut(i).copy_from(other.at(i)))
    }
}
