//! Text store benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use redraft::TextBuffer;
use std::hint::black_box;

fn buffer_append(c: &mut Criterion) {
    c.bench_function("buffer_append_10k_chars", |b| {
        b.iter(|| {
            let mut buffer = TextBuffer::new();
            for _ in 0..10_000 {
                buffer.append(black_box("x")).unwrap();
            }
            buffer
        })
    });

    c.bench_function("buffer_append_lines", |b| {
        b.iter(|| {
            let mut buffer = TextBuffer::new();
            for _ in 0..1_000 {
                buffer.append(black_box("The quick brown fox")).unwrap();
                buffer.add_new_line().unwrap();
            }
            buffer
        })
    });
}

fn buffer_insert_remove(c: &mut Criterion) {
    let text = "lorem ipsum dolor sit amet ".repeat(2_000);

    c.bench_function("buffer_insert_middle", |b| {
        b.iter_batched(
            || TextBuffer::with_text(&text),
            |mut buffer| {
                let middle = buffer.len() / 2;
                buffer.insert(middle, black_box("inserted")).unwrap();
                buffer
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("buffer_remove_front", |b| {
        b.iter_batched(
            || TextBuffer::with_text(&text),
            |mut buffer| {
                buffer.remove(0, black_box(64)).unwrap();
                buffer
            },
            BatchSize::SmallInput,
        )
    });
}

fn buffer_search(c: &mut Criterion) {
    let buffer = TextBuffer::with_text(&"needle in a haystack\n".repeat(5_000));

    c.bench_function("buffer_find_all", |b| {
        b.iter(|| buffer.find_all(black_box("needle")))
    });

    c.bench_function("buffer_line_lookup", |b| {
        b.iter(|| buffer.line(black_box(4_000)))
    });
}

criterion_group!(
    benches,
    buffer_append,
    buffer_insert_remove,
    buffer_search
);
criterion_main!(benches);
