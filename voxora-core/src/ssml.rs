//! Prosody markup for standard-voice synthesis.
//!
//! Rate and pitch sliders produce multipliers around 1.0. The synthesis
//! service expects them as SSML prosody attributes, either the keyword
//! `medium` or a signed percentage delta.

/// Encode a rate or pitch multiplier as a prosody attribute value.
///
/// Only an exact `1.0` maps to `medium`. Anything else becomes a percentage
/// delta with halves rounded toward positive infinity. The leading `+` follows
/// the multiplier, so `1.004` encodes as `+0%` rather than `medium`.
pub fn encode_prosody(value: f64) -> String {
    if value == 1.0 {
        return "medium".to_string();
    }

    // stays f64 for any finite input; `+ 0.0` normalises -0
    let percentage = ((value - 1.0) * 100.0 + 0.5).floor() + 0.0;
    if value > 1.0 {
        format!("+{percentage:.0}%")
    } else {
        format!("{percentage:.0}%")
    }
}

/// Wrap `text` in a `<speak><prosody>` envelope carrying encoded rate and pitch.
pub fn wrap_prosody(text: &str, rate: f64, pitch: f64) -> String {
    format!(
        "<speak><prosody rate=\"{}\" pitch=\"{}\">{}</prosody></speak>",
        encode_prosody(rate),
        encode_prosody(pitch),
        escape_text(text)
    )
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, "medium")]
    #[case(1.3, "+30%")]
    #[case(0.7, "-30%")]
    #[case(1.004, "+0%")]
    #[case(0.996, "0%")]
    #[case(2.0, "+100%")]
    #[case(0.5, "-50%")]
    #[case(1.25, "+25%")]
    #[case(3.5, "+250%")]
    #[case(-1.0, "-200%")]
    #[case(1e20, "+10000000000000000000000%")]
    #[case(-1e20, "-10000000000000000000000%")]
    fn test_encode_prosody(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(encode_prosody(value), expected);
    }

    #[test]
    fn test_only_exact_one_is_medium() {
        let mut value = 0.5;
        while value <= 2.0 {
            let encoded = encode_prosody(value);
            if value == 1.0 {
                assert_eq!(encoded, "medium");
            } else {
                assert_ne!(encoded, "medium", "value {value} encoded as medium");
                let digits = encoded
                    .strip_suffix('%')
                    .expect("percentage suffix")
                    .trim_start_matches(['+', '-']);
                assert!(
                    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
                    "unexpected encoding {encoded} for {value}"
                );
                let numeric: f64 = encoded.trim_end_matches('%').parse().unwrap();
                assert_eq!(numeric, ((value - 1.0) * 100.0 + 0.5).floor());
            }
            value += 0.05;
        }
    }

    #[test]
    fn test_wrap_prosody_defaults() {
        assert_eq!(
            wrap_prosody("Test message", 1.0, 1.0),
            "<speak><prosody rate=\"medium\" pitch=\"medium\">Test message</prosody></speak>"
        );
    }

    #[test]
    fn test_wrap_prosody_mixed() {
        let wrapped = wrap_prosody("Hello", 1.5, 0.8);
        assert!(wrapped.contains("rate=\"+50%\""));
        assert!(wrapped.contains("pitch=\"-20%\""));
    }

    #[test]
    fn test_wrap_prosody_escapes_markup() {
        let wrapped = wrap_prosody("Tom & Jerry <3", 1.0, 1.0);
        assert!(wrapped.contains(">Tom &amp; Jerry &lt;3</prosody>"));
    }
}
