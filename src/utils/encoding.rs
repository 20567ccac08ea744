use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose};

/// base64url，padding 可有可无
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64url or standard base64, with or without padding
pub fn decode_base64_lenient(input: &str) -> Option<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(input)
        .or_else(|_| STANDARD_LENIENT.decode(input))
        .ok()
}
