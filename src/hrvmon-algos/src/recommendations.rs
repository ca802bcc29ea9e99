use hrvmon_types::StressLevel;

/// Suggested actions for a stress level.
pub fn stress_recommendations(level: StressLevel) -> &'static [&'static str] {
    match level {
        StressLevel::VeryLow => &[
            "Keep up your current routine",
            "A good moment for focused or creative work",
        ],
        StressLevel::Low => &[
            "Maintain regular breaks",
            "Stay hydrated and keep moving",
        ],
        StressLevel::Moderate => &[
            "Take a short break",
            "Try a few minutes of slow, deep breathing",
            "Step away from the screen for a moment",
        ],
        StressLevel::High => &[
            "Pause and do a 5 minute breathing exercise",
            "Go for a short walk",
            "Postpone non-urgent demanding tasks",
        ],
        StressLevel::VeryHigh => &[
            "Stop the current activity and rest",
            "Practice paced breathing (4s in, 6s out) for 10 minutes",
            "Reach out to someone you trust",
            "Seek professional help if this persists",
        ],
    }
}
