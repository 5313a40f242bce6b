use std::time::{Duration, Instant};

use criterion::measurement::WallTime;
use criterion::{Bencher, Criterion, criterion_group, criterion_main};

use archbench_archive::ArchiveFormat;
use archbench_bench::{BenchCase, BenchSettings, BuildFromDir, BuildFromStringWithBuffering};

const FORMATS: [ArchiveFormat; 2] = [ArchiveFormat::Zip, ArchiveFormat::TarGz];

/// Time only [`BenchCase::bench`], running setup and teardown around every iteration.
fn iterate(b: &mut Bencher<'_, WallTime>, case: &mut impl BenchCase) {
    b.iter_custom(|iters| {
        let mut elapsed = Duration::ZERO;
        for _ in 0..iters {
            case.setup().unwrap();
            let start = Instant::now();
            case.bench().unwrap();
            elapsed += start.elapsed();
            case.teardown();
        }
        elapsed
    });
}

fn build_archives(c: &mut Criterion<WallTime>) {
    let settings = BenchSettings::from_env().unwrap();

    for format in FORMATS {
        let settings = BenchSettings {
            format,
            ..settings.clone()
        };
        let mut group = c.benchmark_group(format.to_string());
        group.sample_size(10);

        let mut case = BuildFromDir::new(settings.clone());
        group.bench_function(BuildFromDir::NAME, |b| iterate(b, &mut case));

        let mut case = BuildFromStringWithBuffering::new(settings);
        group.bench_function(BuildFromStringWithBuffering::NAME, |b| {
            iterate(b, &mut case);
        });

        group.finish();
    }
}

criterion_group!(archive_build, build_archives);
criterion_main!(archive_build);
