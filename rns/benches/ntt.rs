use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rns::modulus::WordOps;
use rns::poly::{Poly, PolyRNS};
use rns::ring::{Ring, RingRNS};
use std::hint::black_box;

fn ntt(c: &mut Criterion) {
    fn runner<'a, const FORWARD: bool>(ring: &'a Ring<u64>) -> Box<dyn FnMut() + 'a> {
        let mut a: Poly<u64> = ring.new_poly();
        for i in 0..a.n() {
            a.0[i] = i as u64;
        }
        if FORWARD {
            Box::new(move || ring.ntt_inplace(black_box(&mut a)))
        } else {
            Box::new(move || ring.intt_inplace(black_box(&mut a)))
        }
    }

    let q: u64 = 0x1fffffffffe00001u64;

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("ntt");

    for log_n in 10..17 {
        let ring: Ring<u64> = Ring::new(1 << log_n, q);

        let runners: [(String, Box<dyn FnMut()>); 2] = [
            (format!("forward/q={}", q.log2()), runner::<true>(&ring)),
            (format!("backward/q={}", q.log2()), runner::<false>(&ring)),
        ];

        for (name, mut runner) in runners {
            let id: BenchmarkId = BenchmarkId::new(name, format!("n={}", 1 << log_n));
            b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
                b.iter(&mut runner)
            });
        }
    }
}

fn rescale(c: &mut Criterion) {
    let moduli: Vec<u64> = vec![
        0x1fffffffffc80001u64,
        0x1fffffffffe00001u64,
        0x800000000004001u64,
    ];

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("div_round_by_last_modulus_ntt");

    for log_n in 10..15 {
        let ring_rns: RingRNS<u64> = RingRNS::from_moduli(1 << log_n, &moduli);
        let mut a: PolyRNS<u64> = ring_rns.new_polyrns();
        a.0.iter_mut()
            .for_each(|p| p.0.iter_mut().enumerate().for_each(|(i, x)| *x = i as u64));
        let mut out: PolyRNS<u64> = ring_rns.at_level(ring_rns.level() - 1).new_polyrns();
        let id: BenchmarkId = BenchmarkId::new("level=2", format!("n={}", 1 << log_n));
        b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
            b.iter(|| ring_rns.div_round_by_last_modulus_ntt(black_box(&a), &mut out))
        });
    }
}

criterion_group!(benches, ntt, rescale);
criterion_main!(benches);
