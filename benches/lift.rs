//! Benchmarks the two dimension-to-dimension transitions that dominate the
//! crate's running time: the cartesian lift itself, and the Veldkamp-lift
//! hyperplane construction that consumes D = 2's Veldkamp lines to build
//! D = 3's ~3,280 hyperplanes.

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;

use segre::geometry::Geometry;
use segre::hyperplane;
use segre::veldkamp;

fn bench_lift(c: &mut Criterion) {
    let g1 = Geometry::dimension1();
    let g2 = g1.lift();

    c.bench_function("lift d1 to d2", |b| {
        b.iter(|| g1.lift());
    });
    c.bench_function("lift d2 to d3", |b| {
        b.iter(|| g2.lift());
    });
}

fn bench_hyperplane_discovery(c: &mut Criterion) {
    let g1 = Geometry::dimension1();
    let g2 = g1.lift();
    let g3 = g2.lift();

    c.bench_function("brute force hyperplanes at d2", |b| {
        b.iter(|| hyperplane::brute_force(&g2));
    });

    let v2 = hyperplane::brute_force(&g2);
    let mut lines2 = veldkamp::find_veldkamp_lines(&v2);
    veldkamp::distinguish(&mut lines2, &v2, &g3);

    c.bench_function("veldkamp lift hyperplanes at d3", |b| {
        b.iter(|| hyperplane::from_veldkamp_lines(&g2, &v2, &lines2.projective));
    });
}

fn bench_veldkamp_lines(c: &mut Criterion) {
    let g1 = Geometry::dimension1();
    let g2 = g1.lift();
    let v2 = hyperplane::brute_force(&g2);

    c.bench_function("find veldkamp lines at d2", |b| {
        b.iter(|| veldkamp::find_veldkamp_lines(&v2));
    });
}

criterion_group!(benches, bench_lift, bench_hyperplane_discovery, bench_veldkamp_lines);
criterion_main!(benches);
