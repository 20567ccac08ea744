//! 工具函数性能基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use edgelink::utils::url_validator::validate_url;
use edgelink::utils::{decode_base64_lenient, generate_random_code, is_valid_short_code};

// ============== is_valid_short_code 基准测试 ==============

fn bench_is_valid_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_short_code");

    group.bench_function("valid", |b| {
        b.iter(|| {
            assert!(is_valid_short_code("abc123"));
        });
    });

    group.bench_function("invalid_length", |b| {
        b.iter(|| {
            assert!(!is_valid_short_code("healthz"));
        });
    });

    group.bench_function("invalid_chars", |b| {
        b.iter(|| {
            assert!(!is_valid_short_code("ab-_12"));
        });
    });

    group.finish();
}

// ============== generate_random_code 基准测试 ==============

fn bench_generate_random_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_random_code");

    for length in [6, 8, 12] {
        group.bench_with_input(BenchmarkId::new("length", length), &length, |b, &length| {
            b.iter(|| {
                let code = generate_random_code(length);
                assert_eq!(code.len(), length);
            });
        });
    }

    group.finish();
}

// ============== validate_url 基准测试 ==============

fn bench_validate_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_url");

    group.bench_function("valid_https", |b| {
        b.iter(|| {
            assert!(validate_url("https://example.com/path?query=1").is_ok());
        });
    });

    group.bench_function("invalid_protocol", |b| {
        b.iter(|| {
            assert!(validate_url("javascript:alert(1)").is_err());
        });
    });

    let long_url = format!("https://example.com/{}", "a".repeat(1000));
    group.bench_function("valid_long_url", |b| {
        b.iter(|| {
            assert!(validate_url(&long_url).is_ok());
        });
    });

    group.finish();
}

// ============== decode_base64_lenient 基准测试 ==============

fn bench_decode_base64(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/decode_base64_lenient");

    group.bench_function("url_safe", |b| {
        b.iter(|| decode_base64_lenient("eyJzdWIiOiJ1c2VyLTEyMyIsImF1ZCI6InByb2plY3QifQ"));
    });

    group.bench_function("standard_fallback", |b| {
        b.iter(|| decode_base64_lenient("+/+/+/+/+/+/+/+/"));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_is_valid_short_code,
    bench_generate_random_code,
    bench_validate_url,
    bench_decode_base64,
);
criterion_main!(benches);
