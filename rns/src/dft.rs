pub mod ntt;

/// In-place number-theoretic transform over a fixed ring degree.
pub trait DFT<O>: Send + Sync {
    fn forward_inplace(&self, x: &mut [O]);
    fn backward_inplace(&self, x: &mut [O]);
}
