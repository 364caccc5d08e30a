//! Out-of-band invitation URL decoding.
//!
//! Three transports arrive through the same scan/paste input: a full
//! invitation URL (resolved by the remote agent), a shortened URL that must
//! be dereferenced first, and a connectionless message carried base64url-
//! encoded in the query. Decoding is pure apart from the one dereferencing
//! fetch.

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use url::Url;

use super::error::ConnectionError;
use crate::models::OutOfBandInvitation;

/// Path marker for shortened invitation URLs.
const SHORTEN_PATH_MARKER: &str = "/shorten/";
/// Query key carrying a connectionless message attachment.
const CONNECTIONLESS_MSG_KEY: &str = "d_m";
/// Legacy connection-invitation query key; never valid as a connectionless
/// message.
const LEGACY_INVITATION_KEY: &str = "c_i";
/// Query key under which multi-sig group OOBIs carry their group id.
const GROUP_ID_KEY: &str = "groupId";

const DIDCOMM_INVITE_BASE: &str = "didcomm://invite";

/// Attachments are produced both padded and unpadded in the wild.
const BASE64_URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Whether the invitation URL must be dereferenced before decoding.
pub fn is_shortened(url: &str) -> bool {
    url.contains(SHORTEN_PATH_MARKER)
}

/// Dereference a shortened invitation URL with a single fetch; the
/// canonical URL is the final URL after redirects.
pub async fn resolve_shortened(
    http: &reqwest::Client,
    url: &str,
) -> Result<String, ConnectionError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| ConnectionError::ShortenResolutionFailed(e.to_string()))?;
    if !response.status().is_success() {
        return Err(ConnectionError::ShortenResolutionFailed(format!(
            "shorten service returned {}",
            response.status()
        )));
    }
    let resolved = response.url().to_string();
    if is_shortened(&resolved) {
        // The service answered without redirecting to the canonical URL
        return Err(ConnectionError::ShortenResolutionFailed(
            "shortened url did not dereference".to_string(),
        ));
    }
    Ok(resolved)
}

/// Extract the connectionless message carried in the URL query, if any.
///
/// Returns `Ok(None)` when the URL is a full invitation to hand to the
/// agent. A legacy `c_i` attachment is rejected outright; the two keys are
/// not interchangeable.
pub fn decode_connectionless(url: &str) -> Result<Option<String>, ConnectionError> {
    let parsed =
        Url::parse(url).map_err(|e| ConnectionError::InvalidInvitation(e.to_string()))?;

    let mut message_payload = None;
    let mut has_legacy_key = false;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            CONNECTIONLESS_MSG_KEY => message_payload = Some(value.into_owned()),
            LEGACY_INVITATION_KEY => has_legacy_key = true,
            _ => {}
        }
    }

    match message_payload {
        Some(payload) => {
            let bytes = BASE64_URL_LENIENT
                .decode(payload.as_bytes())
                .map_err(|e| ConnectionError::InvalidInvitation(e.to_string()))?;
            let message = String::from_utf8(bytes)
                .map_err(|e| ConnectionError::InvalidInvitation(e.to_string()))?;
            Ok(Some(message))
        }
        None if has_legacy_key => Err(ConnectionError::InvalidConnectionlessMsg),
        None => Ok(None),
    }
}

/// Extract the multi-sig group id from the URL query, if present.
pub fn extract_group_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == GROUP_ID_KEY)
        .map(|(_, value)| value.into_owned())
}

/// Encode an invitation as a `didcomm://invite?oob=` URL.
pub fn encode_invitation_url(
    invitation: &OutOfBandInvitation,
) -> Result<String, ConnectionError> {
    let json = serde_json::to_string(invitation)
        .map_err(|e| ConnectionError::InvalidInvitation(e.to_string()))?;
    Ok(format!(
        "{DIDCOMM_INVITE_BASE}?oob={}",
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_marker_detection() {
        assert!(is_shortened("http://localhost:3000/shorten/abc123"));
        assert!(!is_shortened("http://localhost?oob=3423"));
    }

    #[test]
    fn test_decodes_connectionless_message() {
        // base64url("test message")
        let url = "http://localhost:4320?d_m=dGVzdCBtZXNzYWdl";
        assert_eq!(
            decode_connectionless(url).unwrap(),
            Some("test message".to_string())
        );
        // Padded payloads decode too
        let padded = "http://localhost:4320?d_m=dGVzdCBtZXNzYWdlIQ==";
        assert_eq!(
            decode_connectionless(padded).unwrap(),
            Some("test message!".to_string())
        );
    }

    #[test]
    fn test_legacy_key_always_rejected() {
        // The payload itself is valid base64; the key alone disqualifies it
        let url = "http://localhost:4320?c_i=dGVzdCBtZXNzYWdl";
        assert!(matches!(
            decode_connectionless(url),
            Err(ConnectionError::InvalidConnectionlessMsg)
        ));
    }

    #[test]
    fn test_full_invitation_passes_through_unchanged() {
        let url = "http://localhost?oob=3423";
        assert_eq!(decode_connectionless(url).unwrap(), None);
        // Idempotent on an already-canonical URL
        assert_eq!(decode_connectionless(url).unwrap(), None);
    }

    #[test]
    fn test_undecodable_payload_is_invalid() {
        let url = "http://localhost:4320?d_m=%%%not-base64%%%";
        assert!(matches!(
            decode_connectionless(url),
            Err(ConnectionError::InvalidInvitation(_))
        ));
    }

    #[test]
    fn test_group_id_extraction() {
        assert_eq!(
            extract_group_id("http://keria/oobi?groupId=72e2f089cef6"),
            Some("72e2f089cef6".to_string())
        );
        assert_eq!(extract_group_id("http://keria/oobi/EGrdt"), None);
        assert_eq!(extract_group_id("not a url"), None);
    }

    #[test]
    fn test_didcomm_invitation_url_round_trips() {
        let invitation = OutOfBandInvitation {
            label: Some("label".to_string()),
            services: vec!["http://localhost:5341".to_string()],
            goal_code: None,
            handshake_protocols: None,
            appended_attachments: None,
        };
        let url = encode_invitation_url(&invitation).unwrap();
        assert!(url.starts_with("didcomm://invite?oob="));

        let payload = url.split_once("?oob=").unwrap().1;
        let decoded = BASE64_URL_LENIENT.decode(payload.as_bytes()).unwrap();
        let parsed: OutOfBandInvitation = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(parsed, invitation);
    }
}
