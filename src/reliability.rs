use crate::config::SourceTiers;

const GENERIC_CREDIBLE: [&str; 5] = ["news", "times", "post", "herald", "daily"];
const LOW_CREDIBILITY: [&str; 3] = ["blog", "personal", "wordpress"];

/// Static trust score for a publisher label, `[0, 1]`. Case-insensitive
/// substring match, first tier wins; unknown or empty sources land on 0.5.
pub fn reliability_score(source: &str, tiers: &SourceTiers) -> f32 {
    let source = source.to_lowercase();

    if contains_any(&source, tiers.domestic.iter().map(String::as_str)) {
        return 1.0;
    }
    if contains_any(&source, tiers.international.iter().map(String::as_str)) {
        return 0.9;
    }
    if contains_any(&source, GENERIC_CREDIBLE.iter().copied()) {
        return 0.7;
    }
    if contains_any(&source, LOW_CREDIBILITY.iter().copied()) {
        return 0.3;
    }
    0.5
}

fn contains_any<'a>(source: &str, labels: impl Iterator<Item = &'a str>) -> bool {
    let mut labels = labels;
    labels.any(|label| !label.is_empty() && source.contains(&label.to_lowercase()))
}
