use jtree::sampler::{read_lines, sample_lines, sample_size};
use jtree::{Event, Location, NoopObserver, Observer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Cursor;
use std::sync::Mutex;

const LINES: usize = 10_000;

/// Equal-length lines, so the mean estimate is exact.
fn uniform_corpus() -> Vec<u8> {
    (0..LINES)
        .map(|i| format!("{{\"n\":{:06}}}\n", i))
        .collect::<String>()
        .into_bytes()
}

#[test]
fn test_ten_percent_of_uniform_lines() {
    let data = uniform_corpus();
    let line_len = data.len() / LINES;
    assert_eq!(sample_size(10.0, data.len() as u64, line_len as f64), 1000);

    let mut rng = StdRng::seed_from_u64(2024);
    let sample = sample_lines(&mut Cursor::new(data), 10.0, 1000, &mut rng, &NoopObserver).unwrap();
    println!("sampled {} lines", sample.len());

    // offsets inside the last line are dropped; 1000 draws over 10k lines
    // rarely land there
    assert!(sample.len() >= 990 && sample.len() <= 1000);
    assert!(sample.iter().all(|l| matches!(l.location, Location::Offset(_))));
    assert!(sample.iter().all(|l| l.text.starts_with("{\"n\":")));
}

#[test]
fn test_first_line_is_never_sampled() {
    let mut rng = StdRng::seed_from_u64(5);
    let sample = sample_lines(
        &mut Cursor::new(uniform_corpus()),
        50.0,
        1000,
        &mut rng,
        &NoopObserver,
    )
    .unwrap();
    assert!(sample.iter().all(|l| l.text != "{\"n\":000000}"));
}

#[test]
fn test_full_read_keeps_every_line() {
    let lines = read_lines(Cursor::new(uniform_corpus())).unwrap();
    assert_eq!(lines.len(), LINES);
    assert_eq!(lines[LINES - 1].location, Location::Line(LINES));
}

#[test]
fn test_different_seeds_differ() {
    let data = uniform_corpus();
    let draw = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        sample_lines(&mut Cursor::new(data.clone()), 5.0, 1000, &mut rng, &NoopObserver).unwrap()
    };
    assert_ne!(draw(1), draw(2));
}

/// Remembers the planned sample size and any short-sample report.
#[derive(Default)]
struct SampleReport {
    planned: Mutex<Option<usize>>,
    short: Mutex<Option<(usize, usize)>>,
}

impl Observer for SampleReport {
    fn event(&self, event: &Event<'_>) {
        match event {
            Event::SamplePlanned { target, .. } => *self.planned.lock().unwrap() = Some(*target),
            Event::ShortSample {
                requested,
                returned,
            } => *self.short.lock().unwrap() = Some((*requested, *returned)),
            _ => {}
        }
    }
}

#[test]
fn test_trailing_blank_line_reported_as_short() {
    let mut data = (0..100)
        .map(|i| format!("{{\"n\":{:03}}}\n", i))
        .collect::<String>();
    data.push('\n');

    let mut short_runs = 0;
    for seed in 0..200 {
        let report = SampleReport::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let sample =
            sample_lines(&mut Cursor::new(data.as_bytes()), 50.0, 1000, &mut rng, &report).unwrap();

        assert!(sample.iter().all(|l| !l.is_blank()), "seed {}", seed);
        let planned = report.planned.lock().unwrap().unwrap();
        let short = *report.short.lock().unwrap();
        if sample.len() < planned {
            short_runs += 1;
            assert_eq!(short, Some((planned, sample.len())), "seed {}", seed);
        } else {
            assert_eq!(short, None, "seed {}", seed);
        }
    }
    // offsets in the last document line land before the blank line
    assert!(short_runs > 0);
}
