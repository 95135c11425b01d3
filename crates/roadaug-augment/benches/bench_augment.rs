use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rand::{rngs::StdRng, SeedableRng};
use roadaug_augment::{
    noise_blur::NoiseBlurStage, photometric::PhotometricJitter, Augmenter, ShadowAsset,
};
use roadaug_image::Image;

fn bench_augment(c: &mut Criterion) {
    let mut group = c.benchmark_group("Augment");

    let shadows = vec![ShadowAsset {
        top: Image::from_size_val([128, 128].into(), 0).unwrap(),
        mask: Image::from_size_val([128, 128].into(), 160).unwrap(),
    }];

    for (width, height) in [(160, 120), (256, 256)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image = Image::<u8, 3>::new(
            [*width, *height].into(),
            (0..width * height * 3).map(|i| (i % 253) as u8).collect(),
        )
        .unwrap();

        let augmenter = Augmenter::default();
        group.bench_with_input(
            BenchmarkId::new("pipeline", &parameter_string),
            &image,
            |b, image| {
                let mut rng = StdRng::seed_from_u64(0);
                b.iter(|| {
                    augmenter.augment_discrete(
                        black_box(image),
                        Some(&shadows),
                        black_box(true),
                        &mut rng,
                    )
                })
            },
        );

        let jitter = PhotometricJitter::default();
        group.bench_with_input(
            BenchmarkId::new("photometric", &parameter_string),
            &image,
            |b, image| {
                let mut rng = StdRng::seed_from_u64(1);
                b.iter(|| jitter.apply(black_box(image), &mut rng))
            },
        );

        let stage = NoiseBlurStage::default();
        group.bench_with_input(
            BenchmarkId::new("noise_blur", &parameter_string),
            &image,
            |b, image| {
                let mut rng = StdRng::seed_from_u64(2);
                b.iter(|| stage.apply(black_box(image), &mut rng))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_augment);
criterion_main!(benches);
