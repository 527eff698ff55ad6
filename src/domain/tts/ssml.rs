use super::voice::{SpeechRate, VoiceProfile};

/// Build the SSML document Azure expects for a single chunk
pub fn build_ssml(text: &str, voice: &VoiceProfile, rate: SpeechRate) -> String {
    format!(
        "<speak version='1.0' xml:lang='pt-BR'><voice name='{}'><prosody rate=\"{}%\">{}</prosody></voice></speak>",
        escape_xml(voice.provider_voice_id),
        rate.percent(),
        escape_xml(text)
    )
}

/// Escape the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
