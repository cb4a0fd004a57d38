use a2::{parse, tokenize_series, ResolveOptions};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_source(blocks: usize) -> String {
    let mut source = String::new();
    for b in 0..blocks {
        source.push_str(&format!("_regs{}:\n", b));
        for r in 0..16 {
            source.push_str(&format!("  reg{}: 0x{:X}\n", r, 0x4000 + r * 4));
            source.push_str("    .enable: 1\n    .mode: 3\n");
            source.push_str(&format!("    sub{}: {}\n", r, r));
        }
    }
    source.push_str("#vectors:\n");
    for v in 0..32 {
        source.push_str(&format!("  vec{}:@handler{} + 4\n", v, v));
    }
    source.push_str("main:\n");
    for i in 0..256 {
        if i % 8 == 0 {
            source.push_str(&format!("  handler{}:\n", i / 8));
        }
        source.push_str(&format!("  MOV(regs0.reg{}.sub{} + 2, 0x{:X})\n", i % 16, i % 16, i));
    }
    source
}

fn parse_benchmark(c: &mut Criterion) {
    let source = sample_source(8);

    c.bench_function("parse sample program", |b| {
        b.iter(|| parse(black_box(&source)).unwrap())
    });
}

fn series_benchmark(c: &mut Criterion) {
    c.bench_function("tokenize series", |b| {
        b.iter(|| tokenize_series(black_box("io.uart.ctrl + @buffer - 0x10 + 4")).unwrap())
    });

    let program = parse(&sample_source(1)).unwrap();
    let resolver = program.resolver(ResolveOptions::default());
    c.bench_function("evaluate instruction arguments", |b| {
        b.iter(|| {
            for inst in &program.instructions {
                for arg in &inst.args {
                    black_box(resolver.evaluate(arg).unwrap());
                }
            }
        })
    });
}

criterion_group!(benches, parse_benchmark, series_benchmark);
criterion_main!(benches);
