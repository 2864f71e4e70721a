pub mod barrett;
pub mod prime;
pub mod prime_generator;

pub trait WordOps<O> {
    /// Returns ceil(log2(self)).
    fn log2(self) -> usize;
    /// Reverses the `n` least significant bits.
    fn reverse_bits_msb(self, n: u32) -> O;
    /// Returns the smallest all-ones mask covering self-1.
    fn mask(self) -> O;
}

impl WordOps<u64> for u64 {
    #[inline(always)]
    fn log2(self) -> usize {
        (u64::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> u64 {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (u64::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> u64 {
        (1 << self.log2()) - 1
    }
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (usize::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> usize {
        (1 << self.log2()) - 1
    }
}

pub trait ReduceOnce<O> {
    /// Assigns self-q to self if self >= q.
    /// User must ensure that 2q fits in O.
    fn reduce_once_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self.
    /// User must ensure that 2q fits in O.
    fn reduce_once(&self, q: O) -> O;
}

impl ReduceOnce<u64> for u64 {
    #[inline(always)]
    fn reduce_once_assign(&mut self, q: u64) {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        *self = (*self).min(self.wrapping_sub(q))
    }

    #[inline(always)]
    fn reduce_once(&self, q: u64) -> u64 {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        (*self).min(self.wrapping_sub(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_ops() {
        assert_eq!(1024u64.log2(), 10);
        assert_eq!(1025u64.log2(), 11);
        assert_eq!(12289u64.mask(), (1 << 14) - 1);
        assert_eq!(1usize.reverse_bits_msb(3), 4);
        assert_eq!(6usize.reverse_bits_msb(3), 3);
        assert_eq!(5u64.reduce_once(5), 0);
        assert_eq!(4u64.reduce_once(5), 4);
    }
}
