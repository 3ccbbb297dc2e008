//! # Webhook Signature Verification
//!
//! Stripe signs `"{timestamp}.{raw body}"` with HMAC-SHA256 using the
//! endpoint's signing secret and sends the result in the `Stripe-Signature`
//! header (`t=...,v1=...[,v1=...]`). The MAC is computed over the body bytes
//! exactly as received; a re-serialized JSON body will not verify.

use hmac::{Hmac, Mac};
use pay_core::PaymentError;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header Stripe puts the signature in
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Reasons a signature is rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Unable to extract timestamp and signatures from header")]
    MalformedHeader,

    #[error("No v1 signature found")]
    NoSignatures,

    #[error("Invalid signing secret")]
    InvalidSecret,

    #[error("No signatures found matching the expected signature for payload")]
    Mismatch,

    #[error("Timestamp outside the tolerance zone ({age_secs}s old)")]
    TimestampOutsideTolerance { age_secs: i64 },
}

impl From<SignatureError> for PaymentError {
    fn from(err: SignatureError) -> Self {
        PaymentError::WebhookVerificationFailed(err.to_string())
    }
}

/// Parsed `Stripe-Signature` header
#[derive(Debug)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// Timestamp exactly as it appeared in the header; this is what was signed
    raw_timestamp: String,
    pub signatures: Vec<Vec<u8>>,
}

pub fn parse_signature_header(header: &str) -> Result<SignatureHeader, SignatureError> {
    let mut raw_timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            // First occurrence wins
            "t" if raw_timestamp.is_none() => {
                raw_timestamp = Some(value);
            }
            "v1" => {
                // Non-hex entries can never match, drop them
                if let Ok(sig) = hex::decode(value) {
                    signatures.push(sig);
                }
            }
            _ => {}
        }
    }

    let raw_timestamp = raw_timestamp.ok_or(SignatureError::MalformedHeader)?;
    let timestamp = raw_timestamp
        .parse::<i64>()
        .map_err(|_| SignatureError::MalformedHeader)?;

    if signatures.is_empty() {
        return Err(SignatureError::NoSignatures);
    }

    Ok(SignatureHeader {
        timestamp,
        raw_timestamp: raw_timestamp.to_string(),
        signatures,
    })
}

fn signed_payload_mac(
    secret: &str,
    timestamp: &str,
    payload: &[u8],
) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Verify `header` against the raw `payload`.
///
/// `now` is a unix timestamp; events signed more than `tolerance_secs` before
/// it are rejected. Returns the signed timestamp on success.
pub fn verify_signature(
    header: &str,
    payload: &[u8],
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<i64, SignatureError> {
    let parsed = parse_signature_header(header)?;
    let mac = signed_payload_mac(secret, &parsed.raw_timestamp, payload)?;

    // verify_slice compares in constant time
    let matched = parsed
        .signatures
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok());

    if !matched {
        return Err(SignatureError::Mismatch);
    }

    let age_secs = now - parsed.timestamp;
    if tolerance_secs > 0 && age_secs > tolerance_secs {
        return Err(SignatureError::TimestampOutsideTolerance { age_secs });
    }

    Ok(parsed.timestamp)
}

/// Build a `Stripe-Signature` header value the way Stripe does.
///
/// Used to exercise webhook endpoints locally.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, SignatureError> {
    let mac = signed_payload_mac(secret, &timestamp.to_string(), payload)?;
    Ok(format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    ))
}
