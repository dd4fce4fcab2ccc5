//! Example: Accumulate a vocal profile from several practice sessions
//!
//! Synthesizes a month of F0 series, analyzes each one and prints the
//! accumulated, strategy-weighted and robust profiles.
//!
//! Run with `RUST_LOG=debug` to see per-stage diagnostics.

use chrono::{Duration, Utc};
use vocal_profile::{
    analyze_recording, AnalysisConfig, ProfileAggregator, RecordingInfo, WeightingStrategy,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let now = Utc::now();
    let config = AnalysisConfig::default();
    let songs = ["Arirang", "Scale practice", "Arirang", "Ballad", "Scale practice"];

    let mut history = Vec::new();
    for (session, song) in songs.iter().enumerate() {
        let centre = 210.0 + 6.0 * session as f32;
        let frames: Vec<f32> = (0..1500)
            .map(|i| {
                if i % 12 == 0 {
                    0.0
                } else {
                    centre * (1.0 + 0.08 * (i as f32 * 0.01).sin() + 0.003 * (i as f32 * 1.3).sin())
                }
            })
            .collect();
        let days_ago = 7 * (songs.len() - 1 - session) as i64;
        let info = RecordingInfo::new(now - Duration::days(days_ago), 34.8).with_song(*song);
        let analysis = analyze_recording(&frames, info, config.clone())?;

        println!(
            "Session {} ({}): total {}, rating {}, stability {:.2}",
            session + 1,
            song,
            analysis.record.total_range.note_span(),
            analysis.record.rating,
            analysis.record.stability_metrics.stability_score
        );
        history.push(analysis.record);
    }

    let aggregator = ProfileAggregator::default();

    let profile = aggregator.accumulate(&history, None, now)?;
    println!("\nAccumulated profile:");
    println!("  Comfortable: {}", profile.comfortable_range.note_span());
    println!("  Core: {}", profile.core_range.note_span());
    println!(
        "  Confidence: {:.1} / 100, trend: {}",
        profile.stability_profile.confidence, profile.stability_trend
    );

    let strategy: WeightingStrategy = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "adaptive".to_string())
        .parse()?;
    let weighted = aggregator.weighted_profile(&history, strategy, None, now)?;
    println!("\nWeighted profile ({}):", strategy);
    println!("  Total: {}", weighted.total_range.note_span());
    println!("  Weights: {:.3?}", weighted.weights);

    let robust = aggregator.robust_profile(&history, None, now)?;
    println!("\nRobust profile:");
    println!("  Total: {}", robust.total_range.note_span());
    println!(
        "  Measurement confidence: {} ({:.0}%) - {}",
        robust.measurement.level, robust.measurement.percentage, robust.measurement.recommendation
    );

    for song in aggregator.song_summaries(&history, None, now)? {
        println!(
            "  {}: {} recording(s), {:.1}-{:.1} Hz",
            song.song, song.measurement_count, song.avg_min_freq, song.avg_max_freq
        );
    }

    Ok(())
}
