use std::hint::black_box;

use bencher::{TestCase, TestFile};
use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_ingest::{ChunkAggregator, ContentTypeTag, DecoderSet};
use micro_ingest_http::codec::RequestDecoder;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

static FORM_SMALL: TestFile = TestFile::new("post_form_small.txt", include_str!("../resources/request/post_form_small.txt"));
static FORM_LARGE: TestFile = TestFile::new("post_form_large.txt", include_str!("../resources/request/post_form_large.txt"));
static JSON_LARGE: TestFile = TestFile::new("post_json_large.txt", include_str!("../resources/request/post_json_large.txt"));

fn create_test_cases() -> Vec<(TestCase, ContentTypeTag)> {
    vec![
        (TestCase::new("form_small", FORM_SMALL), ContentTypeTag::FormUrlEncoded),
        (TestCase::new("form_large", FORM_LARGE), ContentTypeTag::FormUrlEncoded),
        (TestCase::new("json_large", JSON_LARGE), ContentTypeTag::Json),
    ]
}

fn benchmark_request_decoder(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("request_decoder");

    for (case, _) in create_test_cases() {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            let mut request_decoder = RequestDecoder::new();
            b.iter_batched_ref(
                || BytesMut::from(case.file().content()),
                |bytes_mut| {
                    let header = request_decoder.decode(bytes_mut).expect("input should be a valid request head").unwrap();
                    let body = request_decoder.decode(bytes_mut).expect("input should be a valid request body").unwrap();
                    let eof = request_decoder.decode(bytes_mut).expect("input should end after its body").unwrap();
                    black_box((header, body, eof));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_body_decoder(criterion: &mut Criterion) {
    let decoders = DecoderSet::standard();
    let mut group = criterion.benchmark_group("body_decoder");

    for (case, tag) in create_test_cases() {
        let body = case.file().body().as_bytes();
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), body, |b, body| {
            b.iter(|| black_box(decoders.decode(tag, body).expect("fixture bodies decode")));
        });
    }

    group.finish();
}

fn benchmark_chunk_aggregator(criterion: &mut Criterion) {
    let body = JSON_LARGE.body().as_bytes();
    let mut group = criterion.benchmark_group("chunk_aggregator");
    group.throughput(Throughput::Bytes(body.len() as u64));

    for fragment_size in [64, 512, 4096] {
        let fragments: Vec<Bytes> = body.chunks(fragment_size).map(Bytes::copy_from_slice).collect();
        group.bench_with_input(BenchmarkId::from_parameter(fragment_size), &fragments, |b, fragments| {
            b.iter_batched(
                || fragments.clone(),
                |fragments| {
                    let mut aggregator = ChunkAggregator::new(None);
                    for fragment in fragments {
                        aggregator.push(fragment).expect("no limit is set");
                    }
                    black_box(aggregator.finish())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(decoder, benchmark_request_decoder, benchmark_body_decoder, benchmark_chunk_aggregator);
criterion_main!(decoder);
