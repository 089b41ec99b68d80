//! Splits user-supplied text into one or more SMS payloads.

use crate::config::ClientConfig;
use crate::status::SendStatus;

/// Per-SMS payload ceiling.
const SMS_CEILING: usize = 140;
/// UDH `05 00 03 REF TOTAL SEQ`.
const LONG_SMS_HEADER_LEN: usize = 6;
const LONG_SMS_PAYLOAD: usize = SMS_CEILING - LONG_SMS_HEADER_LEN;
const MAX_FRAGMENTS: usize = 8;

/// How a [`FragmentPlan`]'s payloads should be carried on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FragmentMode {
    /// One `SUBMIT`, `TpUdhi = 0`.
    Short,
    /// Several independent `SUBMIT`s, each `TpUdhi = 0`, with no relation to each other on the
    /// carrier side.
    SplitShort,
    /// Several `SUBMIT`s forming one concatenated long SMS, each `TpUdhi = 1` and prefixed with
    /// a shared-reference UDH.
    ConcatenatedLong,
}

/// The result of fragmenting one `Send` call's content.
#[derive(Debug, Clone)]
pub struct FragmentPlan {
    pub mode: FragmentMode,
    pub payloads: Vec<Vec<u8>>,
}

/// Encodes `text` as big-endian UCS-2 (UTF-16BE); surrogate pairs take 4 bytes.
pub fn encode_ucs2(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

/// Fragments `content` per `config`.
///
/// `concat_ref` is the UDH reference byte: the low 8 bits of the sequence counter's current
/// value at fragmentation time, stable across every fragment of this submission.
pub fn fragment(
    content: &str,
    config: &ClientConfig,
    concat_ref: u8,
) -> Result<FragmentPlan, SendStatus> {
    if content.is_empty() {
        return Err(SendStatus::Unknown);
    }

    let encoded_signature = encode_ucs2(config.gateway_signature());

    if config.send_long_message_as_short_messages() {
        return fragment_as_short_messages(content, config, &encoded_signature);
    }

    let encoded_content = encode_ucs2(content);
    // The signature is folded into `combined` up front so the single-SMS threshold check below
    // and the long-SMS chunking that follows both see the same bytes: a signature counted
    // against the 140-byte ceiling must also ride along once that ceiling is exceeded, not just
    // inform the decision to exceed it.
    let combined = compose_single(&encoded_content, &encoded_signature, config);

    if combined.len() <= SMS_CEILING {
        return validate(FragmentMode::Short, vec![combined], config);
    }

    let total = ceil_div(combined.len(), LONG_SMS_PAYLOAD);
    let mut payloads = Vec::with_capacity(total);
    for (i, chunk) in combined.chunks(LONG_SMS_PAYLOAD).enumerate() {
        let mut bytes = Vec::with_capacity(LONG_SMS_HEADER_LEN + chunk.len());
        bytes.extend_from_slice(&[0x05, 0x00, 0x03, concat_ref, total as u8, (i + 1) as u8]);
        bytes.extend_from_slice(chunk);
        payloads.push(bytes);
    }
    validate(FragmentMode::ConcatenatedLong, payloads, config)
}

fn fragment_as_short_messages(
    content: &str,
    config: &ClientConfig,
    encoded_signature: &[u8],
) -> Result<FragmentPlan, SendStatus> {
    let signature_len = if config.prepositive_gateway_signature() && !config.attempt_remove_signature()
    {
        encoded_signature.len()
    } else {
        0
    };
    let max_units = (SMS_CEILING.saturating_sub(signature_len) / 2).max(1);

    let units: Vec<u16> = content.encode_utf16().collect();
    let payloads = units
        .chunks(max_units)
        .map(|chunk| {
            let mut bytes = Vec::with_capacity(encoded_signature.len() + chunk.len() * 2);
            if config.prepositive_gateway_signature() {
                bytes.extend_from_slice(encoded_signature);
            }
            for unit in chunk {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
            if !config.prepositive_gateway_signature() {
                bytes.extend_from_slice(encoded_signature);
            }
            bytes
        })
        .collect();
    validate(FragmentMode::SplitShort, payloads, config)
}

fn compose_single(encoded_content: &[u8], encoded_signature: &[u8], config: &ClientConfig) -> Vec<u8> {
    let mut payload = Vec::with_capacity(encoded_content.len() + encoded_signature.len());
    let include_signature = !config.attempt_remove_signature();
    if config.prepositive_gateway_signature() && include_signature {
        payload.extend_from_slice(encoded_signature);
    }
    payload.extend_from_slice(encoded_content);
    if !config.prepositive_gateway_signature() && include_signature {
        payload.extend_from_slice(encoded_signature);
    }
    payload
}

fn ceil_div(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

fn validate(
    mode: FragmentMode,
    payloads: Vec<Vec<u8>>,
    config: &ClientConfig,
) -> Result<FragmentPlan, SendStatus> {
    match payloads.len() {
        0 => Err(SendStatus::Unknown),
        n if n > MAX_FRAGMENTS => Err(SendStatus::MessageTooLong),
        n if n > 1 && config.disable_long_message() => Err(SendStatus::MessageTooLong),
        _ => Ok(FragmentPlan { mode, payloads }),
    }
}
