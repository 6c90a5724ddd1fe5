//! Microbenchmarks for the per-frame junction hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crossroadsim::traffic::signal::{IntersectionPhase, SignalPhase};
use crossroadsim::traffic::vehicles::{MovingCar, TravelAxis, TravelDirection};

fn bench_phase_cycle(c: &mut Criterion) {
    c.bench_function("phase_cycle_1000", |b| {
        b.iter(|| {
            let mut phase = IntersectionPhase::default();
            for _ in 0..1000 {
                phase = black_box(phase.advance());
            }
            phase
        })
    });
}

fn bench_phase_projection(c: &mut Criterion) {
    let phases = [
        IntersectionPhase::Startup,
        IntersectionPhase::XRedZYellow,
        IntersectionPhase::XGreenZRed,
        IntersectionPhase::XYellowZGreen,
    ];
    c.bench_function("phase_projection", |b| {
        b.iter(|| {
            let mut greens = 0;
            for &phase in &phases {
                for axis in [TravelAxis::X, TravelAxis::Z] {
                    if phase.phase_for(black_box(axis)) == SignalPhase::Green {
                        greens += 1;
                    }
                }
            }
            greens
        })
    });
}

fn bench_velocity_commands(c: &mut Criterion) {
    let roster = [
        (TravelAxis::X, TravelDirection::Positive),
        (TravelAxis::X, TravelDirection::Negative),
        (TravelAxis::Z, TravelDirection::Positive),
        (TravelAxis::Z, TravelDirection::Negative),
    ]
    .map(|(axis, direction)| MovingCar { axis, direction });

    c.bench_function("velocity_commands", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for car in &roster {
                let v = black_box(car.commanded_velocity());
                sum += v.x + v.y + v.z;
            }
            sum
        })
    });
}

criterion_group!(
    benches,
    bench_phase_cycle,
    bench_phase_projection,
    bench_velocity_commands
);
criterion_main!(benches);
