use std::fmt;

use solana_pubkey::Pubkey;

use crate::error::Error;
use crate::events::AnchorEvent;

pub const PUBKEY_LEN: usize = 32;
pub const QUOTE_ID_LEN: usize = 32;

/// Opaque 32-byte quote identifier; displayed as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuoteId(pub [u8; QUOTE_ID_LEN]);

impl QuoteId {
    pub fn as_bytes(&self) -> &[u8; QUOTE_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(value: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; QUOTE_ID_LEN];
        hex::decode_to_slice(value, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; QUOTE_ID_LEN]> for QuoteId {
    fn from(bytes: [u8; QUOTE_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuoteId({})", self.to_hex())
    }
}

/// Emitted by the execution beacon program each time a quote is executed.
///
/// Layout: `payer` (32 bytes) followed by `quote_id` (32 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionObserved {
    pub payer: Pubkey,
    pub quote_id: QuoteId,
}

impl ExecutionObserved {
    pub fn payer_base58(&self) -> String {
        self.payer.to_string()
    }
}

impl AnchorEvent for ExecutionObserved {
    const NAME: &'static str = "ExecutionObserved";
    const PAYLOAD_LEN: usize = PUBKEY_LEN + QUOTE_ID_LEN;

    fn decode_payload(payload: &[u8]) -> Result<Self, Error> {
        if payload.len() != Self::PAYLOAD_LEN {
            return Err(Error::Decode {
                event: Self::NAME.to_string(),
                reason: format!(
                    "payload must be {} bytes, got {}",
                    Self::PAYLOAD_LEN,
                    payload.len()
                ),
            });
        }

        let (payer, quote_id) = payload.split_at(PUBKEY_LEN);
        let payer = <[u8; PUBKEY_LEN]>::try_from(payer).map_err(|_| Error::Decode {
            event: Self::NAME.to_string(),
            reason: "payer is not 32 bytes".into(),
        })?;
        let quote_id = <[u8; QUOTE_ID_LEN]>::try_from(quote_id).map_err(|_| Error::Decode {
            event: Self::NAME.to_string(),
            reason: "quote_id is not 32 bytes".into(),
        })?;

        Ok(Self {
            payer: Pubkey::new_from_array(payer),
            quote_id: QuoteId(quote_id),
        })
    }

    fn encode_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(Self::PAYLOAD_LEN);
        payload.extend_from_slice(&self.payer.to_bytes());
        payload.extend_from_slice(&self.quote_id.0);
        payload
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionObservedView {
    payer: String,
    quote_id: String,
}

impl serde::Serialize for ExecutionObserved {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = ExecutionObservedView {
            payer: self.payer_base58(),
            quote_id: self.quote_id.to_hex(),
        };
        serde::Serialize::serialize(&view, serializer)
    }
}
