pub mod impl_u64;

use crate::dft::DFT;
use crate::modulus::WordOps;
use crate::modulus::prime::Prime;
use crate::poly::{Poly, PolyRNS};
use std::fmt;
use std::sync::Arc;

/// Z_q[X]/(X^n+1) for a single NTT-friendly prime q.
pub struct Ring<O> {
    pub n: usize,
    pub modulus: Prime<O>,
    pub dft: Box<dyn DFT<O>>,
}

impl<O> Ring<O> {
    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

impl Ring<u64> {
    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }
}

impl<O: fmt::Debug> fmt::Debug for Ring<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("n", &self.n)
            .field("q", &self.modulus.q)
            .finish()
    }
}

/// A chain of rings sharing the degree n; limb i is Z_{q_i}[X]/(X^n+1).
#[derive(Clone)]
pub struct RingRNS<O>(pub Vec<Arc<Ring<O>>>);

impl<O> RingRNS<O> {
    pub fn new(rings: Vec<Arc<Ring<O>>>) -> Self {
        assert!(!rings.is_empty(), "invalid argument rings: empty");
        let n: usize = rings[0].n();
        assert!(
            rings.iter().all(|r| r.n() == n),
            "invalid argument rings: mismatching ring degrees"
        );
        RingRNS(rings)
    }

    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.0[0].n()
    }

    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    pub fn at_level(&self, level: usize) -> RingRNS<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        RingRNS(self.0[..level + 1].to_vec())
    }

    /// Returns the chain with `ring` appended as its last limb.
    pub fn extended_with(&self, ring: Arc<Ring<O>>) -> RingRNS<O> {
        assert!(
            ring.n() == self.n(),
            "invalid argument ring: ring.n()={} != self.n()={}",
            ring.n(),
            self.n()
        );
        let mut rings: Vec<Arc<Ring<O>>> = self.0.clone();
        rings.push(ring);
        RingRNS(rings)
    }
}

impl RingRNS<u64> {
    pub fn new_polyrns(&self) -> PolyRNS<u64> {
        PolyRNS::<u64>::new(self.n(), self.level())
    }

    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }

    pub fn moduli(&self) -> Vec<u64> {
        self.0.iter().map(|r| r.modulus.q).collect()
    }
}

impl<O: fmt::Debug> fmt::Debug for RingRNS<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|r| &r.modulus.q))
            .finish()
    }
}
