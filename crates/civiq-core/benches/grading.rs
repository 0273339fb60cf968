use criterion::{black_box, criterion_group, criterion_main, Criterion};

use civiq_core::grader::{grade, matches, normalize};
use civiq_core::model::QuestionRecord;

fn single() -> QuestionRecord {
    let mut q = QuestionRecord::new(1, "What is the supreme law of the land?");
    q.acceptable_answers = vec!["(U.S.) Constitution".into(), "the Constitution".into()];
    q
}

fn multi() -> QuestionRecord {
    let mut q = QuestionRecord::new(
        10,
        "Name two important ideas from the Declaration of Independence and the Constitution.",
    );
    q.acceptable_answers = [
        "Equality",
        "Liberty",
        "Social contract",
        "Natural rights",
        "Limited government",
        "Self-government",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    q.min_answers_required = Some(2);
    q
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box("  The U.S. Constitution -- \"We the People\"!  ")))
    });
}

fn bench_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("matches");

    group.bench_function("equal", |b| {
        b.iter(|| matches(black_box("George Washington"), black_box("george washington")))
    });

    group.bench_function("guarded_miss", |b| {
        b.iter(|| matches(black_box("US"), black_box("United States")))
    });

    group.finish();
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");
    let single = single();
    let multi = multi();

    group.bench_function("single_hit", |b| {
        b.iter(|| grade(black_box("the constitution"), black_box(&single)))
    });

    group.bench_function("multi_hit", |b| {
        b.iter(|| grade(black_box("liberty, equality and natural rights"), black_box(&multi)))
    });

    group.bench_function("multi_miss", |b| {
        b.iter(|| grade(black_box("freedom"), black_box(&multi)))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_matches, bench_grade);
criterion_main!(benches);
