use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use enigma_core::{EnigmaMachine, KeygenOptions, ReflectorKind, generate_configuration, validate};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

const BENCH_MESSAGE_SYMBOLS: usize = 4096;

fn latin() -> Vec<char> {
    ('A'..='Z').collect()
}

fn options(rotors: usize) -> KeygenOptions {
    KeygenOptions {
        rotors,
        plug_cycles: 6,
        cycle_len: 2,
        rotation_factor: 0,
        reflector: ReflectorKind::Mirror,
    }
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
    let config = generate_configuration(&latin(), &options(5), &mut rng).unwrap();
    group.bench_function("validate", |b| {
        b.iter(|| validate(black_box(&config)).unwrap())
    });
    group.bench_function("machine-new", |b| {
        b.iter(|| EnigmaMachine::new(black_box(&config)).unwrap())
    });
    group.finish();
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    group.throughput(Throughput::Elements(BENCH_MESSAGE_SYMBOLS as u64));
    let symbols = latin();
    let message: String = (0..BENCH_MESSAGE_SYMBOLS)
        .map(|i| symbols[(i * 7) % symbols.len()])
        .collect();
    for rotors in [1usize, 3, 8] {
        let mut rng = ChaCha20Rng::from_seed([rotors as u8; 32]);
        let config = generate_configuration(&symbols, &options(rotors), &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("rotors", rotors), &message, |b, message| {
            b.iter(|| {
                let mut machine = EnigmaMachine::new(&config).unwrap();
                machine.process_str(black_box(message)).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_construction, bench_process);
criterion_main!(benches);
