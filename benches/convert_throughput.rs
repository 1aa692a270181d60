//! Conversion throughput benchmarks
//!
//! Measures:
//! - Single-document conversion with growing sequence sizes (10, 100, 1000, 10000 items)
//! - Batch conversion across executors (sync, rayon with 2/4/8 threads)
//!
//! Run benchmarks: `cargo bench --bench convert_throughput`
//!
//! Compare specific groups:
//! ```
//! cargo bench --bench convert_throughput -- "sequence_size"
//! cargo bench --bench convert_throughput -- "batch_executor"
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jsonize::{
    ExecutorImpl, JsonizeMap, LoadOptions, SyncExecutor, TransformationRegistry, XmlDocument,
    convert, convert_batch,
};
use std::hint::black_box;
use std::sync::Arc;

fn order_map() -> JsonizeMap {
    JsonizeMap::from_json_str(
        r#"[
          { "from": { "path": "/Order/@id", "type": "attribute" },
            "to": { "path": "order.id", "type": "string" } },
          { "from": { "path": "/Order/Customer", "type": "value" },
            "to": { "path": "order.customer", "type": "string" },
            "transformation": "normalize_whitespace" },
          { "from": { "path": "/Order/Line", "type": "sequence" },
            "to": { "path": "order.lines", "type": "array" },
            "itemMappings": [
              { "from": { "path": "@sku", "type": "attribute" },
                "to": { "path": "@.sku", "type": "string" } },
              { "from": { "path": "Qty", "type": "value" },
                "to": { "path": "@.qty", "type": "integer" } },
              { "from": { "path": "Price", "type": "value" },
                "to": { "path": "@.price", "type": "number" } },
              { "from": { "path": "Note", "type": "value", "optional": true },
                "to": { "path": "@.note", "type": "infer" } }
            ] }
        ]"#,
        &TransformationRegistry::default(),
        &LoadOptions::default(),
    )
    .expect("Failed to compile map")
}

/// An order document with `lines` repeated line elements.
fn order_xml(lines: usize) -> String {
    let mut xml = String::from("<Order id=\"bench\"><Customer>  Bench   Mark </Customer>");
    for i in 0..lines {
        xml.push_str(&format!(
            "<Line sku=\"S{}\"><Qty>{}</Qty><Price>{}.{:02}</Price>{}</Line>",
            i,
            i % 17,
            i % 500,
            i % 100,
            if i % 3 == 0 { "<Note>fragile</Note>" } else { "" }
        ));
    }
    xml.push_str("</Order>");
    xml
}

fn benchmark_sequence_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_size");
    let map = order_map();

    for lines in [10, 100, 1000, 10000] {
        group.throughput(Throughput::Elements(lines as u64));
        let xml = order_xml(lines);

        group.bench_with_input(BenchmarkId::new("lines", lines), &xml, |b, xml| {
            b.iter(|| {
                let doc = XmlDocument::parse(xml).expect("Failed to parse XML");
                black_box(convert(doc.root_node(), &map).expect("Failed to convert"))
            });
        });
    }

    group.finish();
}

fn benchmark_batch_executor(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_executor");
    let map = Arc::new(order_map());
    let documents: Vec<String> = (0..64).map(|_| order_xml(200)).collect();
    group.throughput(Throughput::Elements(documents.len() as u64));

    group.bench_function("sync", |b| {
        b.iter(|| black_box(convert_batch(&SyncExecutor::new(), map.clone(), documents.clone())))
    });

    for threads in [2, 4, 8] {
        let executor = ExecutorImpl::with_jobs(threads);
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, _| {
            b.iter(|| black_box(convert_batch(&executor, map.clone(), documents.clone())))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sequence_size, benchmark_batch_executor);
criterion_main!(benches);
