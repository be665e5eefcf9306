mod fixtures;

use criterion::Criterion;
use criterion::Throughput;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use libfieldtree_parser::GraphQLParser;
use libfieldtree_parser::token_source::StrGraphQLTokenSource;

// ─── Group 1: Lexing ──────────────────────────────────────

fn lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    group.throughput(Throughput::Bytes(
        fixtures::PRODUCTS_SEARCH_QUERY.len() as u64,
    ));
    group.bench_function("products_search", |b| {
        b.iter(|| {
            let lexer = StrGraphQLTokenSource::new(
                black_box(fixtures::PRODUCTS_SEARCH_QUERY),
            );
            black_box(lexer.count())
        })
    });

    group.finish();
}

// ─── Group 2: Executable Document Parsing ─────────────────

fn executable_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("executable_parse");

    group.bench_function("simple_query", |b| {
        b.iter(|| {
            let parser = GraphQLParser::new(fixtures::SIMPLE_QUERY);
            black_box(parser.parse_executable_document())
        })
    });

    group.bench_function("products_search", |b| {
        b.iter(|| {
            let parser = GraphQLParser::new(fixtures::PRODUCTS_SEARCH_QUERY);
            black_box(parser.parse_executable_document())
        })
    });

    let nested = fixtures::deeply_nested_query(30);
    group.bench_function("deeply_nested_30", |b| {
        b.iter(|| {
            let parser = GraphQLParser::new(&nested);
            black_box(parser.parse_executable_document())
        })
    });

    let chain = fixtures::fragment_chain_query(50);
    group.bench_function("fragment_chain_50", |b| {
        b.iter(|| {
            let parser = GraphQLParser::new(&chain);
            black_box(parser.parse_executable_document())
        })
    });

    group.finish();
}

criterion_group!(benches, lexer, executable_parse);
criterion_main!(benches);
