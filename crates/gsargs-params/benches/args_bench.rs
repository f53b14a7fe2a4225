// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for argument generation in the gsargs-params crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gsargs_core::types::{ColorConversionStrategy, HostDisplay};
use gsargs_params::path::canonicalize;
use gsargs_params::{EngineParams, PdfParams};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Serialize a PDF model with most fields away from their defaults.
fn bench_pdf_serialization(c: &mut Criterion) {
    let mut params = PdfParams::new();
    params.base_mut().set_device("pdfwrite");
    params.base_mut().set_output_file("/tmp/out.pdf");
    params.base_mut().set_no_pause(true);
    params.set_color_conversion_strategy(ColorConversionStrategy::Cmyk);
    params.set_embed_all_fonts(true);
    params.set_title("Benchmark");
    params.set_show_annots(false);
    params.set_page_list("1,3,5-9");
    params.set_subset_fonts(false);
    let host = HostDisplay::default();

    c.bench_function("pdf_params_to_args", |b| {
        b.iter(|| black_box(params.to_args(black_box(&host))));
    });
}

fn bench_canonicalize(c: &mut Criterion) {
    let path = r"C:\\Program Files\\gs\gs10.03.0\\lib\\..\Resource\Init\\";
    c.bench_function("canonicalize (windows path)", |b| {
        b.iter(|| black_box(canonicalize(black_box(path))));
    });
}

criterion_group!(benches, bench_pdf_serialization, bench_canonicalize);
criterion_main!(benches);
