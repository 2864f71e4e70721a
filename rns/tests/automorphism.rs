use itertools::izip;
use rns::automorphism::{AutoPerm, AutoPermMap, galois_element};
use rns::poly::{Poly, PolyRNS};
use rns::ring::{Ring, RingRNS};

#[test]
fn automorphism_u64() {
    let n: usize = 1 << 4;
    let ring: Ring<u64> = Ring::new(n, 65537u64);

    sub_test("test_automorphism_u64", || test_automorphism_u64(&ring));
    sub_test("test_automorphism_from_perm_u64", || {
        test_automorphism_from_perm_u64(&ring)
    });
    sub_test("test_automorphism_composition_u64", || {
        test_automorphism_composition_u64(&ring)
    });
    sub_test("test_automorphism_rns_u64", || test_automorphism_rns_u64(n));
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

/// X -> X^{2n-1} = X^{-1} maps sum i*X^i to -sum (n-i)*X^i for i > 0.
fn expected_inverse_image(ring: &Ring<u64>) -> Poly<u64> {
    let n: usize = ring.n();
    let q: u64 = ring.modulus.q;
    let mut p: Poly<u64> = ring.new_poly();
    p.0[0] = 0;
    for i in 1..n {
        p.0[i] = q - (n - i) as u64
    }
    p
}

fn test_automorphism_u64(ring: &Ring<u64>) {
    let mut p0: Poly<u64> = ring.new_poly();
    let mut p1: Poly<u64> = ring.new_poly();
    for i in 0..p0.n() {
        p0.0[i] = i as u64
    }
    let gal_el: usize = 2 * (ring.n() << 1) - 1;
    ring.automorphism(&p0, gal_el, &mut p1);
    izip!(expected_inverse_image(ring).0, p1.0).for_each(|(a, b)| assert_eq!(a, b));
}

fn test_automorphism_from_perm_u64(ring: &Ring<u64>) {
    let mut p0: Poly<u64> = ring.new_poly();
    let mut p1: Poly<u64> = ring.new_poly();
    for i in 0..p0.n() {
        p0.0[i] = i as u64
    }
    let gal_el: usize = (ring.n() << 1) - 1;
    let auto_perm: AutoPerm = AutoPerm::new(ring.n(), gal_el);
    ring.automorphism_from_perm(&p0, &auto_perm, &mut p1);
    izip!(expected_inverse_image(ring).0, p1.0).for_each(|(a, b)| assert_eq!(a, b));
}

fn test_automorphism_composition_u64(ring: &Ring<u64>) {
    let n: usize = ring.n();
    let nth_root: usize = n << 1;
    let mut p0: Poly<u64> = ring.new_poly();
    for i in 0..n {
        p0.0[i] = (i * i + 3) as u64
    }

    // phi_{5^2} = phi_5 o phi_5, and phi_{5^-1} undoes phi_5.
    let mut p1: Poly<u64> = ring.new_poly();
    let mut p2: Poly<u64> = ring.new_poly();
    let mut p3: Poly<u64> = ring.new_poly();
    ring.automorphism(&p0, galois_element(1, nth_root), &mut p1);
    ring.automorphism(&p1, galois_element(1, nth_root), &mut p2);
    ring.automorphism(&p0, galois_element(2, nth_root), &mut p3);
    assert_eq!(p2, p3);

    let mut perms: AutoPermMap = AutoPermMap::new();
    let gal_el_inv: usize = perms.insert_rotation(n, -1);
    assert_eq!(perms.len(), 1);
    let perm = perms.get(&gal_el_inv).expect("missing permutation");
    ring.automorphism_from_perm(&p1, perm, &mut p2);
    assert_eq!(p2, p0);
}

fn test_automorphism_rns_u64(n: usize) {
    let ring_rns: RingRNS<u64> = RingRNS::from_moduli(n, &[65537u64, 0x1fffffffffe00001u64]);
    let mut a: PolyRNS<u64> = ring_rns.new_polyrns();
    ring_rns.from_i64(&(0..n as i64).collect::<Vec<i64>>(), &mut a);

    let mut b: PolyRNS<u64> = ring_rns.new_polyrns();
    let gal_el: usize = galois_element(3, n << 1);
    ring_rns.automorphism(&a, gal_el, &mut b);

    let perm: AutoPerm = AutoPerm::new(n, gal_el);
    let mut c: PolyRNS<u64> = ring_rns.new_polyrns();
    ring_rns.automorphism_from_perm(&a, &perm, &mut c);
    assert_eq!(b, c);

    // Limbs agree on the same signed integers.
    let (q0, q1) = (ring_rns.0[0].modulus.q, ring_rns.0[1].modulus.q);
    izip!(b.at(0).0.iter(), b.at(1).0.iter()).for_each(|(x0, x1)| {
        let s0: i64 = if *x0 > q0 / 2 { *x0 as i64 - q0 as i64 } else { *x0 as i64 };
        let s1: i64 = if *x1 > q1 / 2 { -((q1 - *x1) as i64) } else { *x1 as i64 };
        assert_eq!(s0, s1);
    });
}
