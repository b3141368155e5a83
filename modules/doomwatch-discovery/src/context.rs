//! Historical AI-capability context attached to accepted claims. All of
//! it is curated data compiled into the binary — computed at enrichment
//! time, never fetched live.

use chrono::{DateTime, Utc};

use doomwatch_common::ContextMetadata;

/// Frontier models ordered by public release date. The `YYYY-MM-DD`
/// strings compare lexicographically, which the lookups rely on.
pub const FRONTIER_MODELS: &[(&str, &str)] = &[
    ("2019-02-14", "GPT-2"),
    ("2020-05-28", "GPT-3"),
    ("2022-01-27", "InstructGPT"),
    ("2022-11-30", "ChatGPT (GPT-3.5)"),
    ("2023-03-14", "GPT-4"),
    ("2024-05-13", "GPT-4o"),
    ("2024-06-20", "Claude 3.5 Sonnet"),
    ("2024-09-12", "OpenAI o1"),
    ("2025-02-24", "Claude 3.7 Sonnet"),
    ("2025-04-16", "OpenAI o3"),
    ("2025-05-22", "Claude Opus 4"),
    ("2025-08-07", "GPT-5"),
];

struct Snapshot {
    date: &'static str,
    benchmark_name: Option<&'static str>,
    benchmark_score: Option<f64>,
    nvda: Option<f64>,
    msft: Option<f64>,
    goog: Option<f64>,
    milestone: Option<&'static str>,
}

/// Capability/market snapshots ordered by date. Prices are split-adjusted
/// closes near the snapshot date.
const CONTEXT_SNAPSHOTS: &[Snapshot] = &[
    Snapshot {
        date: "2019-02-14",
        benchmark_name: None,
        benchmark_score: None,
        nvda: Some(3.9),
        msft: Some(106.9),
        goog: Some(56.1),
        milestone: Some("OpenAI withholds full GPT-2 over misuse concerns"),
    },
    Snapshot {
        date: "2020-05-28",
        benchmark_name: Some("MMLU"),
        benchmark_score: Some(43.9),
        nvda: Some(8.9),
        msft: Some(181.4),
        goog: Some(71.3),
        milestone: Some("GPT-3 shows few-shot learning at 175B parameters"),
    },
    Snapshot {
        date: "2022-11-30",
        benchmark_name: Some("MMLU"),
        benchmark_score: Some(70.0),
        nvda: Some(16.9),
        msft: Some(255.1),
        goog: Some(101.0),
        milestone: Some("ChatGPT reaches a million users in five days"),
    },
    Snapshot {
        date: "2023-03-14",
        benchmark_name: Some("MMLU"),
        benchmark_score: Some(86.4),
        nvda: Some(24.1),
        msft: Some(260.8),
        goog: Some(96.7),
        milestone: Some("GPT-4 passes the bar exam"),
    },
    Snapshot {
        date: "2024-05-13",
        benchmark_name: Some("MMLU"),
        benchmark_score: Some(88.7),
        nvda: Some(90.4),
        msft: Some(413.7),
        goog: Some(170.9),
        milestone: Some("GPT-4o ships real-time voice to free users"),
    },
    Snapshot {
        date: "2024-09-12",
        benchmark_name: Some("GPQA Diamond"),
        benchmark_score: Some(78.0),
        nvda: Some(119.1),
        msft: Some(427.0),
        goog: Some(157.5),
        milestone: Some("o1 introduces inference-time reasoning"),
    },
    Snapshot {
        date: "2025-05-22",
        benchmark_name: Some("SWE-bench Verified"),
        benchmark_score: Some(72.5),
        nvda: Some(132.8),
        msft: Some(454.9),
        goog: Some(170.9),
        milestone: Some("Claude Opus 4 works autonomously for hours"),
    },
    Snapshot {
        date: "2025-08-07",
        benchmark_name: Some("SWE-bench Verified"),
        benchmark_score: Some(74.9),
        nvda: Some(179.4),
        msft: Some(522.0),
        goog: Some(201.4),
        milestone: Some("GPT-5 replaces the entire ChatGPT model picker"),
    },
];

/// The most advanced publicly known model at `date`. Total and monotonic:
/// dates before the first entry get the earliest model, dates after the
/// last get the most recent.
pub fn model_at_date(date: DateTime<Utc>) -> &'static str {
    let key = date.format("%Y-%m-%d").to_string();
    let mut current = FRONTIER_MODELS[0].1;
    for (release, name) in FRONTIER_MODELS {
        if *release <= key.as_str() {
            current = *name;
        } else {
            break;
        }
    }
    current
}

/// Build the historical snapshot for a claim date. `current_model` is
/// always present; the rest is None before data coverage begins.
pub fn context_at_date(date: DateTime<Utc>) -> ContextMetadata {
    let key = date.format("%Y-%m-%d").to_string();
    let model = model_at_date(date);

    let snapshot = CONTEXT_SNAPSHOTS
        .iter()
        .take_while(|s| s.date <= key.as_str())
        .last();

    let mut context = ContextMetadata {
        current_model: Some(model.to_string()),
        note: Some(format!("Frontier model at the time: {model}")),
        ..ContextMetadata::default()
    };

    if let Some(s) = snapshot {
        context.benchmark_name = s.benchmark_name.map(str::to_string);
        context.benchmark_score = s.benchmark_score;
        context.nvda_price = s.nvda;
        context.msft_price = s.msft;
        context.goog_price = s.goog;
        context.milestone = s.milestone.map(str::to_string);
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn dates_before_the_timeline_return_the_earliest_model() {
        assert_eq!(model_at_date(at(2015, 1, 1)), "GPT-2");
    }

    #[test]
    fn dates_after_the_timeline_return_the_latest_model() {
        assert_eq!(model_at_date(at(2030, 1, 1)), "GPT-5");
    }

    #[test]
    fn interior_dates_return_the_last_release_at_or_before() {
        assert_eq!(model_at_date(at(2021, 6, 15)), "GPT-3");
        assert_eq!(model_at_date(at(2023, 3, 14)), "GPT-4");
        assert_eq!(model_at_date(at(2023, 3, 13)), "ChatGPT (GPT-3.5)");
    }

    #[test]
    fn model_lookup_is_monotonic_across_the_timeline() {
        let mut last_index = 0;
        for year in 2015..=2030 {
            let model = model_at_date(at(year, 6, 1));
            let index = FRONTIER_MODELS
                .iter()
                .position(|(_, name)| *name == model)
                .unwrap();
            assert!(index >= last_index, "model regressed at year {year}");
            last_index = index;
        }
    }

    #[test]
    fn timeline_and_snapshots_are_date_ordered() {
        for pair in FRONTIER_MODELS.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        for pair in CONTEXT_SNAPSHOTS.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn context_before_coverage_has_model_but_no_market_data() {
        let context = context_at_date(at(2016, 1, 1));
        assert_eq!(context.current_model.as_deref(), Some("GPT-2"));
        assert!(context.benchmark_name.is_none());
        assert!(context.nvda_price.is_none());
        assert!(context.note.is_some());
    }

    #[test]
    fn context_inside_coverage_carries_the_nearest_prior_snapshot() {
        let context = context_at_date(at(2023, 6, 1));
        assert_eq!(context.current_model.as_deref(), Some("GPT-4"));
        assert_eq!(context.benchmark_name.as_deref(), Some("MMLU"));
        assert_eq!(context.benchmark_score, Some(86.4));
        assert_eq!(context.milestone.as_deref(), Some("GPT-4 passes the bar exam"));
    }
}
