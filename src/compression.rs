//! Maps an ELA variance and an image size to zero or more named
//! compression profiles, ported directly from the known social-media
//! recompression fingerprints.

use crate::{CompressionProfile, ProfileConfidence};

struct ProfileDef {
    name: &'static str,
    ela_range: (f64, f64),
    typical_size: (u32, u32),
    message: &'static str,
}

const PROFILES: [ProfileDef; 5] = [
    ProfileDef {
        name: "whatsapp_low",
        ela_range: (10.0, 50.0),
        typical_size: (1280, 1280),
        message: "Consistent with WhatsApp's low-quality recompression",
    },
    ProfileDef {
        name: "instagram",
        ela_range: (80.0, 180.0),
        typical_size: (1080, 1080),
        message: "Consistent with Instagram's recompression",
    },
    ProfileDef {
        name: "facebook",
        ela_range: (120.0, 280.0),
        typical_size: (2048, 2048),
        message: "Consistent with Facebook's recompression",
    },
    ProfileDef {
        name: "twitter",
        ela_range: (60.0, 160.0),
        typical_size: (1200, 675),
        message: "Consistent with Twitter/X's recompression",
    },
    ProfileDef {
        name: "original_camera",
        ela_range: (150.0, 450.0),
        typical_size: (4000, 3000),
        message: "Consistent with an unmodified camera original",
    },
];

const SOCIAL_MEDIA_PROFILES: [&str; 4] = ["whatsapp_low", "instagram", "facebook", "twitter"];

pub struct CompressionProfiler;

impl CompressionProfiler {
    pub fn detect(ela_variance: f64, size: (u32, u32)) -> Vec<CompressionProfile> {
        let mut matches: Vec<CompressionProfile> = PROFILES
            .iter()
            .filter(|profile| {
                ela_variance >= profile.ela_range.0 && ela_variance <= profile.ela_range.1
            })
            .map(|profile| {
                let (typical_w, typical_h) = profile.typical_size;
                let size_match = (size.0 as f64 - typical_w as f64).abs() <= 0.5 * typical_w as f64
                    && (size.1 as f64 - typical_h as f64).abs() <= 0.5 * typical_h as f64;

                CompressionProfile {
                    profile: profile.name.to_string(),
                    message: profile.message.to_string(),
                    confidence: if size_match {
                        ProfileConfidence::High
                    } else {
                        ProfileConfidence::Medium
                    },
                    size_match,
                    ela_range: profile.ela_range,
                    typical_size: profile.typical_size,
                }
            })
            .collect();

        matches.sort_by_key(|profile| match profile.confidence {
            ProfileConfidence::High => 0,
            ProfileConfidence::Medium => 1,
            ProfileConfidence::Low => 2,
        });

        matches
    }

    pub fn is_social_media_compressed(profiles: &[CompressionProfile]) -> bool {
        profiles
            .iter()
            .any(|profile| SOCIAL_MEDIA_PROFILES.contains(&profile.profile.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_profile_matches_with_high_confidence_on_exact_size() {
        let profiles = CompressionProfiler::detect(30.0, (1280, 1280));
        let whatsapp = profiles
            .iter()
            .find(|p| p.profile == "whatsapp_low")
            .expect("whatsapp_low profile should match");
        assert_eq!(whatsapp.confidence, ProfileConfidence::High);
        assert!(whatsapp.size_match);
    }

    #[test]
    fn whatsapp_profile_downgrades_to_medium_on_size_mismatch() {
        let profiles = CompressionProfiler::detect(30.0, (2000, 2000));
        let whatsapp = profiles
            .iter()
            .find(|p| p.profile == "whatsapp_low")
            .expect("whatsapp_low profile should match");
        assert_eq!(whatsapp.confidence, ProfileConfidence::Medium);
        assert!(!whatsapp.size_match);
    }

    #[test]
    fn low_ela_variance_matches_no_profile() {
        let profiles = CompressionProfiler::detect(5.0, (1000, 1000));
        assert!(profiles.is_empty());
    }

    #[test]
    fn detection_is_deterministic() {
        let first = CompressionProfiler::detect(100.0, (2048, 2048));
        let second = CompressionProfiler::detect(100.0, (2048, 2048));
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.profile, b.profile);
        }
    }

    #[test]
    fn social_media_predicate_recognizes_known_profiles() {
        let profiles = CompressionProfiler::detect(30.0, (1280, 1280));
        assert!(CompressionProfiler::is_social_media_compressed(&profiles));

        let camera_only = CompressionProfiler::detect(200.0, (4000, 3000));
        let non_social: Vec<_> = camera_only
            .into_iter()
            .filter(|p| p.profile == "original_camera")
            .collect();
        assert!(!CompressionProfiler::is_social_media_compressed(&non_social));
    }
}
