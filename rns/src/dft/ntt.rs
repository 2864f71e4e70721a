use crate::dft::DFT;
use crate::modulus::WordOps;
use crate::modulus::barrett::Barrett;
use crate::modulus::prime::Prime;
use itertools::izip;

/// Negacyclic NTT tables for Z_q[X]/(X^n+1).
/// The forward transform maps coefficients to the evaluations at
/// psi^(2*rev(i)+1), stored at index i.
pub struct Table<O> {
    prime: Prime<O>,
    psi: O,
    psi_forward_rev: Vec<Barrett<O>>,
    psi_backward_rev: Vec<Barrett<O>>,
    n_inv: Barrett<O>,
}

impl Table<u64> {
    pub fn new(prime: Prime<u64>, nth_root: u64) -> Table<u64> {
        assert!(
            nth_root.is_power_of_two() && nth_root >= 4,
            "invalid argument: nth_root = {} is not a power of two >= 4",
            nth_root
        );

        let n: usize = (nth_root >> 1) as usize;
        let psi: u64 = prime.primitive_nth_root(nth_root);
        let psi_inv: u64 = prime.inv(psi);

        let mut psi_forward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];
        let mut psi_backward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];

        let log_n: u32 = n.log2() as _;

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 0..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);
            psi_forward_rev[i_rev] = prime.barrett.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.barrett.prepare(powers_backward);
            powers_forward = prime.barrett.mul_mod(powers_forward, psi);
            powers_backward = prime.barrett.mul_mod(powers_backward, psi_inv);
        }

        let n_inv: Barrett<u64> = prime.barrett.prepare(prime.inv(n as u64));

        Self {
            prime,
            psi,
            psi_forward_rev,
            psi_backward_rev,
            n_inv,
        }
    }

    pub fn psi(&self) -> u64 {
        self.psi
    }

    pub fn forward_inplace(&self, a: &mut [u64]) {
        let n: usize = a.len();
        debug_assert!(
            n == self.psi_forward_rev.len(),
            "invalid a.len()={} != n={}",
            n,
            self.psi_forward_rev.len()
        );
        let log_n: u32 = n.trailing_zeros();
        for layer in 0..log_n {
            let (m, size) = (1usize << layer, n >> (layer + 1));
            izip!(a.chunks_exact_mut(2 * size), &self.psi_forward_rev[m..2 * m]).for_each(
                |(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dit_inplace(a, b, *psi));
                },
            );
        }
    }

    #[inline(always)]
    fn dit_inplace(&self, a: &mut u64, b: &mut u64, psi: Barrett<u64>) {
        let bt: u64 = self.prime.barrett.mul_external(psi, *b);
        let u: u64 = *a;
        *a = self.prime.barrett.add_mod(u, bt);
        *b = self.prime.barrett.sub_mod(u, bt);
    }

    pub fn backward_inplace(&self, a: &mut [u64]) {
        let n: usize = a.len();
        debug_assert!(
            n == self.psi_backward_rev.len(),
            "invalid a.len()={} != n={}",
            n,
            self.psi_backward_rev.len()
        );
        let log_n: u32 = n.trailing_zeros();
        for layer in (0..log_n).rev() {
            let (h, size) = (1usize << layer, n >> (layer + 1));
            izip!(a.chunks_exact_mut(2 * size), &self.psi_backward_rev[h..2 * h]).for_each(
                |(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, *psi));
                },
            );
        }
        a.iter_mut()
            .for_each(|x| self.prime.barrett.mul_external_assign(self.n_inv, x));
    }

    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, psi: Barrett<u64>) {
        let (u, v) = (*a, *b);
        *a = self.prime.barrett.add_mod(u, v);
        *b = self
            .prime
            .barrett
            .mul_external(psi, self.prime.barrett.sub_mod(u, v));
    }
}

impl DFT<u64> for Table<u64> {
    fn forward_inplace(&self, a: &mut [u64]) {
        Table::forward_inplace(self, a)
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        Table::backward_inplace(self, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntt() {
        let prime: Prime<u64> = Prime::new(0x800000000004001);
        let n: u64 = 32;
        let ntt_table: Table<u64> = Table::<u64>::new(prime, n << 1);
        let mut a: Vec<u64> = (0..n).collect();
        let b: Vec<u64> = a.clone();
        ntt_table.forward_inplace(&mut a);
        assert!(a != b);
        ntt_table.backward_inplace(&mut a);
        assert!(a == b);
    }

    #[test]
    fn test_ntt_negacyclic_product() {
        let q: u64 = 0x1fffffffffe00001;
        let prime: Prime<u64> = Prime::new(q);
        let n: usize = 64;
        let table: Table<u64> = Table::<u64>::new(prime.clone(), (n << 1) as u64);

        let a: Vec<u64> = (0..n as u64).map(|i| (i * 7 + 3) % q).collect();
        let b: Vec<u64> = (0..n as u64).map(|i| q - (i * i + 1)).collect();

        // Schoolbook product mod X^n + 1.
        let mut want: Vec<u64> = vec![0; n];
        for i in 0..n {
            for j in 0..n {
                let p: u64 = prime.barrett.mul_mod(a[i], b[j]);
                let k: usize = (i + j) % n;
                if i + j < n {
                    want[k] = prime.barrett.add_mod(want[k], p);
                } else {
                    want[k] = prime.barrett.sub_mod(want[k], p);
                }
            }
        }

        let (mut a_ntt, mut b_ntt) = (a.clone(), b.clone());
        table.forward_inplace(&mut a_ntt);
        table.forward_inplace(&mut b_ntt);
        let mut have: Vec<u64> = izip!(a_ntt.iter(), b_ntt.iter())
            .map(|(x, y)| prime.barrett.mul_mod(*x, *y))
            .collect();
        table.backward_inplace(&mut have);

        assert_eq!(have, want);
    }

    #[test]
    fn test_ntt_evaluation_order() {
        // Slot i of the forward transform holds a(psi^(2*rev(i)+1)).
        let prime: Prime<u64> = Prime::new(0x800000000004001);
        let n: usize = 16;
        let table: Table<u64> = Table::<u64>::new(prime.clone(), (n << 1) as u64);
        let a: Vec<u64> = (1..=n as u64).collect();
        let mut a_ntt: Vec<u64> = a.clone();
        table.forward_inplace(&mut a_ntt);
        let log_n: u32 = n.log2() as _;
        for (i, have) in a_ntt.iter().enumerate() {
            let x: u64 = prime.pow(table.psi(), (2 * i.reverse_bits_msb(log_n) + 1) as u64);
            let want: u64 = a
                .iter()
                .rev()
                .fold(0u64, |acc, c| prime.barrett.add_mod(prime.barrett.mul_mod(acc, x), *c));
            assert_eq!(*have, want, "slot {}", i);
        }
    }
}
