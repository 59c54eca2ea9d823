//! History engine benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use redraft::{History, TextBuffer};
use std::hint::black_box;

fn recorded(edits: usize, chunk: &str) -> (TextBuffer, History) {
    let mut buffer = TextBuffer::new();
    let mut history = History::new();
    for _ in 0..edits {
        buffer.append(chunk).unwrap();
        history.save_state(&buffer, "append");
    }
    (buffer, history)
}

fn history_record(c: &mut Criterion) {
    c.bench_function("history_record_100", |b| {
        b.iter(|| recorded(black_box(100), "word "))
    });

    c.bench_function("history_record_with_eviction", |b| {
        b.iter_batched(
            || recorded(100, "word "),
            |(mut buffer, mut history)| {
                for _ in 0..50 {
                    buffer.append("more ").unwrap();
                    history.save_state(&buffer, "append");
                }
                history
            },
            BatchSize::SmallInput,
        )
    });
}

fn history_undo_redo(c: &mut Criterion) {
    c.bench_function("history_undo_redo_cycle", |b| {
        b.iter_batched(
            || recorded(100, "word "),
            |(mut buffer, mut history)| {
                while history.undo(&mut buffer).is_ok() {}
                while history.redo(&mut buffer).is_ok() {}
                buffer
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("history_replace_all", |b| {
        let text = "alpha beta gamma ".repeat(1_000);
        b.iter_batched(
            || {
                let buffer = TextBuffer::with_text(&text);
                let history = History::for_buffer(&buffer);
                (buffer, history)
            },
            |(mut buffer, mut history)| {
                history
                    .replace_all(&mut buffer, black_box("beta"), "BETA")
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

fn history_export(c: &mut Criterion) {
    let (_, history) = recorded(100, "some text ");
    let exported = history.export_history().unwrap();

    c.bench_function("history_export", |b| b.iter(|| history.export_history()));
    c.bench_function("history_import", |b| {
        b.iter_batched(
            History::new,
            |mut history| {
                history.import_history(black_box(&exported)).unwrap();
                history
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, history_record, history_undo_redo, history_export);
criterion_main!(benches);
