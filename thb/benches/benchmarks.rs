use criterion::{criterion_group, criterion_main, Criterion};
use thb::{
    geo::coord, master_thb, DirectionSet, Face, Observation, ReferencePoint, ReferencePoints,
    StationParams,
};

fn reference_points() -> ReferencePoints {
    [
        ReferencePoint {
            id: "1001".to_string(),
            coord: coord! { x: 2_611_432.12, y: 1_267_005.48 },
            height_m: 512.331,
            geoid_m: 49.12,
            xi_cc: 31.0,
            eta_cc: -12.0,
        },
        ReferencePoint {
            id: "1002".to_string(),
            coord: coord! { x: 2_612_020.77, y: 1_267_331.09 },
            height_m: 548.904,
            geoid_m: 49.15,
            xi_cc: 28.0,
            eta_cc: -9.0,
        },
    ]
    .into_iter()
    .collect()
}

fn direction(station: &str, target: &str, vertical_gon: f64, n: usize) -> DirectionSet {
    let observations = (0..n)
        .map(|i| {
            let face = if i % 2 == 0 { Face::One } else { Face::Two };
            let jitter = (i % 7) as f64 * 1e-4;
            let vertical_gon = match face {
                Face::One => vertical_gon + jitter,
                Face::Two => 400.0 - vertical_gon - jitter,
            };
            Observation {
                id: format!("1{i:04}"),
                face: Some(face),
                vertical_gon,
                slant_m: 673.412 + jitter,
            }
        })
        .collect();
    DirectionSet {
        station: station.to_string(),
        target: target.to_string(),
        observations,
    }
}

fn height_determination(c: &mut Criterion) {
    let mut group = c.benchmark_group("Height Determination");

    let points = reference_points();
    let stations = StationParams {
        signal_a: 1.65,
        offset_a: 0.12,
        signal_b: 1.58,
        offset_b: 0.12,
    };

    for n in [20, 2000] {
        let forward = direction("1001", "1002", 96.5432, n);
        let backward = direction("1002", "1001", 103.4651, n);
        group.bench_with_input(
            format!("master_thb/{n}"),
            &(forward, backward),
            |b, (f, r)| b.iter(|| master_thb(f, r, &points, stations).unwrap()),
        );
    }
}

criterion_group!(benches, height_determination);
criterion_main!(benches);
