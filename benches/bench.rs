// Criterion benchmarks for Scholar Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scholar_match::core::{calculate_match_score, tokenize, Matcher};
use scholar_match::models::{
    CandidateProfile, Education, Experience, JobPosting, PersonalDetails, ScoringWeights,
};

const TITLES: [&str; 6] = [
    "PhD Research Fellow in Machine Learning",
    "Lecturer in Computational Biology",
    "Postdoctoral Research Associate (Fixed-Term, 24 months)",
    "Senior Data Scientist - Full Time",
    "Research Software Engineer",
    "Teaching Fellow in Statistics",
];

fn create_job(id: usize) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        title: TITLES[id % TITLES.len()].to_string(),
        employer: format!("University {}", id % 25),
        ..Default::default()
    }
}

fn create_profile() -> CandidateProfile {
    CandidateProfile {
        personal: PersonalDetails {
            summary: Some("Machine learning research on biological data and statistics".to_string()),
            ..Default::default()
        },
        education: vec![Education {
            degree: "PhD in Computational Biology".to_string(),
            ..Default::default()
        }],
        experience: vec![
            Experience {
                role: "Research Software Engineer".to_string(),
                ..Default::default()
            },
            Experience {
                role: "Data Scientist".to_string(),
                ..Default::default()
            },
        ],
        skills: vec![
            "Python".to_string(),
            "Machine Learning".to_string(),
            "Statistics".to_string(),
            "Bioinformatics".to_string(),
        ],
        ..Default::default()
    }
}

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_title", |b| {
        b.iter(|| tokenize(black_box(Some(TITLES[2]))));
    });
}

fn bench_match_score(c: &mut Criterion) {
    let profile = create_profile();
    let job = create_job(0);
    let weights = ScoringWeights::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| calculate_match_score(black_box(Some(&profile)), black_box(Some(&job)), &weights));
    });
}

fn bench_rank_jobs(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let profile = create_profile();

    let mut group = c.benchmark_group("ranking");

    for job_count in [10, 50, 100, 500, 1000].iter() {
        let jobs: Vec<JobPosting> = (0..*job_count).map(create_job).collect();
        let excluded: Vec<String> = (0..*job_count).step_by(10).map(|i| i.to_string()).collect();

        group.bench_with_input(BenchmarkId::new("rank_jobs", job_count), job_count, |b, _| {
            b.iter(|| {
                matcher.rank_jobs(
                    black_box(&profile),
                    black_box(jobs.clone()),
                    black_box(&excluded),
                    black_box(20),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_match_score, bench_rank_jobs);

criterion_main!(benches);
