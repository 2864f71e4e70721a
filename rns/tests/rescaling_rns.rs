use num_bigint::BigInt;
use num_integer::Integer;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use sampling::source::Source;

#[test]
fn rescaling_rns_u64() {
    let n: usize = 1 << 10;
    let moduli: Vec<u64> = vec![
        0x1fffffffffc80001u64,
        0x1fffffffffe00001u64,
        0x800000000004001u64,
    ];
    let ring_rns: RingRNS<u64> = RingRNS::from_moduli(n, &moduli);

    sub_test("test_div_round_by_last_modulus_ntt", || {
        test_div_round_by_last_modulus_ntt(&ring_rns)
    });
    sub_test("test_div_round_by_last_modulus_ntt_inplace", || {
        test_div_round_by_last_modulus_ntt_inplace(&ring_rns)
    });
    sub_test("test_div_round_by_last_modulus_twice", || {
        test_div_round_by_last_modulus_twice(&ring_rns)
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

/// round(a / q) for odd q.
fn div_round(a: &BigInt, q: &BigInt) -> BigInt {
    let num: BigInt = a * 2 + q;
    let den: BigInt = q * 2;
    num.div_floor(&den)
}

fn random_polyrns(ring_rns: &RingRNS<u64>, seed: u8) -> (PolyRNS<u64>, Vec<BigInt>) {
    let mut source: Source = Source::new([seed; 32]);
    let mut a: PolyRNS<u64> = ring_rns.new_polyrns();
    ring_rns.fill_uniform(&mut source, &mut a);
    let mut coeffs: Vec<BigInt> = vec![BigInt::default(); a.n()];
    ring_rns.to_bigint_inplace(&a, 1, &mut coeffs);
    (a, coeffs)
}

fn test_div_round_by_last_modulus_ntt(ring_rns: &RingRNS<u64>) {
    let (mut a, coeffs_a) = random_polyrns(ring_rns, 0);
    let ring_out: RingRNS<u64> = ring_rns.at_level(ring_rns.level() - 1);
    let mut b: PolyRNS<u64> = ring_out.new_polyrns();

    ring_rns.ntt_inplace(&mut a);
    ring_rns.div_round_by_last_modulus_ntt(&a, &mut b);
    ring_out.intt_inplace(&mut b);

    let mut coeffs_b: Vec<BigInt> = vec![BigInt::default(); b.n()];
    ring_out.to_bigint_inplace(&b, 1, &mut coeffs_b);

    let q_last: BigInt = BigInt::from(ring_rns.0[ring_rns.level()].modulus.q);
    let want: Vec<BigInt> = coeffs_a.iter().map(|a| div_round(a, &q_last)).collect();
    assert!(want == coeffs_b);
}

fn test_div_round_by_last_modulus_ntt_inplace(ring_rns: &RingRNS<u64>) {
    let (mut a, coeffs_a) = random_polyrns(ring_rns, 1);

    ring_rns.ntt_inplace(&mut a);
    ring_rns.div_round_by_last_modulus_ntt_inplace(&mut a);
    assert_eq!(a.level(), ring_rns.level() - 1);

    let ring_out: RingRNS<u64> = ring_rns.at_level(a.level());
    ring_out.intt_inplace(&mut a);
    let mut coeffs_b: Vec<BigInt> = vec![BigInt::default(); a.n()];
    ring_out.to_bigint_inplace(&a, 1, &mut coeffs_b);

    let q_last: BigInt = BigInt::from(ring_rns.0[ring_rns.level()].modulus.q);
    let want: Vec<BigInt> = coeffs_a.iter().map(|a| div_round(a, &q_last)).collect();
    assert!(want == coeffs_b);
}

fn test_div_round_by_last_modulus_twice(ring_rns: &RingRNS<u64>) {
    let (mut a, coeffs_a) = random_polyrns(ring_rns, 2);

    ring_rns.ntt_inplace(&mut a);
    ring_rns.div_round_by_last_modulus_ntt_inplace(&mut a);
    ring_rns
        .at_level(ring_rns.level() - 1)
        .div_round_by_last_modulus_ntt_inplace(&mut a);

    let ring_out: RingRNS<u64> = ring_rns.at_level(a.level());
    ring_out.intt_inplace(&mut a);
    let mut coeffs_b: Vec<BigInt> = vec![BigInt::default(); a.n()];
    ring_out.to_bigint_inplace(&a, 1, &mut coeffs_b);

    // Two successive roundings stay within one unit of the exact quotient.
    let level: usize = ring_rns.level();
    let q_two: BigInt = BigInt::from(ring_rns.0[level].modulus.q) * BigInt::from(ring_rns.0[level - 1].modulus.q);
    coeffs_a.iter().zip(coeffs_b.iter()).for_each(|(a, b)| {
        let diff: BigInt = div_round(a, &q_two) - b;
        assert!(diff >= BigInt::from(-1) && diff <= BigInt::from(1), "diff={}", diff);
    });
}
