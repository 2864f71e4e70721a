use crate::modulus::WordOps;
use utils::map::Map;

/// Generator of the slot rotation group in (Z/nth_root Z)^*.
pub const GALOIS_GENERATOR: usize = 5;

/// Returns GALOIS_GENERATOR^k mod nth_root; negative k wraps around the
/// order nth_root/4 of the generator.
pub fn galois_element(k: i64, nth_root: usize) -> usize {
    assert!(
        nth_root.is_power_of_two() && nth_root >= 4,
        "invalid nth_root={}: not a power-of-two >= 4",
        nth_root
    );
    let order: i64 = (nth_root >> 2) as i64;
    let mut e: u64 = k.rem_euclid(order) as u64;
    let mask: usize = nth_root - 1;
    let mut x: usize = GALOIS_GENERATOR;
    let mut gal_el: usize = 1;
    while e > 0 {
        if e & 1 == 1 {
            gal_el = (gal_el * x) & mask;
        }
        x = (x * x) & mask;
        e >>= 1;
    }
    gal_el
}

/// Lookup table for X^i -> X^{i * gal_el} mod X^n+1 in the coefficient
/// domain. The top bit of each entry flags a negation.
#[derive(Clone, Debug)]
pub struct AutoPerm {
    pub gal_el: usize,
    pub permutation: Vec<usize>,
}

pub(crate) const SIGN_BIT: usize = 1 << (usize::BITS - 1);

impl AutoPerm {
    /// Panics if n is not a power of two or if gal_el is even.
    pub fn new(n: usize, gal_el: usize) -> Self {
        assert!(n.is_power_of_two(), "invalid n={}: not a power-of-two", n);
        assert!(
            gal_el & 1 == 1,
            "invalid gal_el={}: not coprime with nth_root={}",
            gal_el,
            n << 1
        );
        let log_n: usize = n.log2();
        let mask: usize = n - 1;
        let gal_el: usize = gal_el & ((n << 1) - 1);
        let permutation: Vec<usize> = (0..n)
            .map(|i| {
                let gal_el_i: usize = i * gal_el;
                let sign: usize = (gal_el_i >> log_n) & 1;
                (gal_el_i & mask) | (sign * SIGN_BIT)
            })
            .collect();
        Self {
            gal_el,
            permutation,
        }
    }
}

/// Permutation tables keyed by Galois element.
#[derive(Clone, Default)]
pub struct AutoPermMap(Map<usize, AutoPerm>);

impl AutoPermMap {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, perm: AutoPerm) {
        self.0.insert(perm.gal_el, perm);
    }

    /// Builds and stores the table of X -> X^{5^k}.
    pub fn insert_rotation(&mut self, n: usize, k: i64) -> usize {
        let gal_el: usize = galois_element(k, n << 1);
        if !self.0.contains_key(&gal_el) {
            self.insert(AutoPerm::new(n, gal_el));
        }
        gal_el
    }

    pub fn get(&self, gal_el: &usize) -> Option<&AutoPerm> {
        self.0.get(gal_el)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn galois_elements() {
        let nth_root: usize = 1 << 6;
        assert_eq!(galois_element(0, nth_root), 1);
        assert_eq!(galois_element(1, nth_root), 5);
        assert_eq!(galois_element(2, nth_root), 25);
        // 5 has order nth_root/4, so -1 is the same element as nth_root/4 - 1.
        assert_eq!(galois_element(-1, nth_root), galois_element(15, nth_root));
        assert_eq!(
            (galois_element(-1, nth_root) * galois_element(1, nth_root)) % nth_root,
            1
        );
    }
}
