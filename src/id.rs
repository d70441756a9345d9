//! Book identifiers.
//!
//! A `BookId` is twelve bytes rendered as 24 lowercase hex characters:
//! four bytes of creation time (seconds, big endian), five bytes unique to
//! the running process and a three byte counter.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::InvalidId;

const ID_LEN: usize = 12;
const COUNTER_MASK: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId([u8; ID_LEN]);

struct ProcessSeed {
    unique: [u8; 5],
    counter: AtomicU32,
}

fn process_seed() -> &'static ProcessSeed {
    static SEED: OnceLock<ProcessSeed> = OnceLock::new();
    SEED.get_or_init(|| {
        let started = Utc::now();
        let mut hasher = Sha256::new();
        hasher.update(std::process::id().to_be_bytes());
        hasher.update(started.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
        hasher.update(format!("{:?}", std::thread::current().id()).as_bytes());
        let digest = hasher.finalize();

        let mut unique = [0u8; 5];
        unique.copy_from_slice(&digest[..5]);
        let start = u32::from_be_bytes([0, digest[5], digest[6], digest[7]]);

        ProcessSeed {
            unique,
            counter: AtomicU32::new(start),
        }
    })
}

impl BookId {
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    fn generate_at(at: DateTime<Utc>) -> Self {
        let seed = process_seed();
        let count = seed.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        let secs = at.timestamp() as u32;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&seed.unique);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        BookId(bytes)
    }

    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        if s.len() != ID_LEN * 2 {
            return Err(InvalidId(s.to_owned()));
        }
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidId(s.to_owned()))?;
        Ok(BookId(bytes))
    }

    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Creation time embedded in the identifier, to second precision.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(secs as i64, 0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for BookId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookId::parse(s)
    }
}

impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BookId::parse(&s).map_err(serde::de::Error::custom)
    }
}
