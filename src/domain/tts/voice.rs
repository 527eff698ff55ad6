use super::error::TtsServiceError;
use serde::Serialize;

/// A voice the operator can pick, mapped to the provider's identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceProfile {
    pub display_name: &'static str,
    pub provider_voice_id: &'static str,
}

/// Voices offered to the operator. The first entry is the default.
pub const VOICES: &[VoiceProfile] = &[
    VoiceProfile {
        display_name: "Camila - Feminina (pt-BR)",
        provider_voice_id: "pt-BR-FranciscaNeural",
    },
    VoiceProfile {
        display_name: "Daniel - Masculina (pt-BR)",
        provider_voice_id: "pt-BR-AntonioNeural",
    },
    VoiceProfile {
        display_name: "Igual Google Tradutor",
        provider_voice_id: "pt-BR-BrendaNeural",
    },
    VoiceProfile {
        display_name: "Narrador - Neutro",
        provider_voice_id: "pt-BR-CelioNeural",
    },
];

pub fn default_voice() -> VoiceProfile {
    VOICES[0]
}

/// Resolve a voice by display name or provider id
pub fn find_voice(name: &str) -> Option<VoiceProfile> {
    let name = name.trim();
    VOICES
        .iter()
        .find(|v| v.display_name.eq_ignore_ascii_case(name) || v.provider_voice_id.eq_ignore_ascii_case(name))
        .copied()
}

/// Speaking rate modifier in percent, bounded to what the UI ever offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpeechRate(i32);

impl SpeechRate {
    pub const MIN: i32 = -50;
    pub const MAX: i32 = 50;

    pub fn new(percent: i32) -> Result<Self, TtsServiceError> {
        if !(Self::MIN..=Self::MAX).contains(&percent) {
            return Err(TtsServiceError::Invalid(format!(
                "Speech rate must be between {}% and {}%, got {}%",
                Self::MIN,
                Self::MAX,
                percent
            )));
        }
        Ok(Self(percent))
    }

    pub fn percent(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for SpeechRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
