use std::fmt;

use serde::{Deserialize, Serialize};

/// Small enumerated constant used as predicate/value shorthand.
///
/// Known values keep common predicates (`isA`, `note`, `verifiedBy`, ...)
/// to a few bytes on the wire instead of repeating their names as text. The
/// numeric assignments are fixed and never reused for a different meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownValue(u64);

/// The subject's type (`isA`).
pub const IS_A: KnownValue = KnownValue::new(1);
/// The subject's unique identifier.
pub const ID: KnownValue = KnownValue::new(2);
/// A signature over the subject's digest.
pub const VERIFIED_BY: KnownValue = KnownValue::new(3);
/// A human-readable annotation.
pub const NOTE: KnownValue = KnownValue::new(4);
/// A recipient able to decrypt the subject.
pub const HAS_RECIPIENT: KnownValue = KnownValue::new(5);
/// A share of a split symmetric key.
pub const SSKR_SHARE: KnownValue = KnownValue::new(6);
/// The party controlling the subject.
pub const CONTROLLER: KnownValue = KnownValue::new(7);
/// Public key material for the subject.
pub const PUBLIC_KEYS: KnownValue = KnownValue::new(8);
/// Where the subject's content can be dereferenced.
pub const DEREFERENCE_VIA: KnownValue = KnownValue::new(9);
/// The entity a document describes.
pub const ENTITY: KnownValue = KnownValue::new(10);
/// The subject's version.
pub const IS_VERSION: KnownValue = KnownValue::new(11);
/// The holder of a credential.
pub const HOLDER: KnownValue = KnownValue::new(12);
/// The issuer of a credential.
pub const ISSUER: KnownValue = KnownValue::new(13);
/// Random decorrelating material; carries no information.
pub const SALT: KnownValue = KnownValue::new(15);
/// A date attached to the subject.
pub const DATE: KnownValue = KnownValue::new(16);

impl KnownValue {
    /// Constructs a known value from its numeric identifier.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The numeric identifier.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The registered name for this value, if it is in the standard table.
    pub fn name(&self) -> Option<&'static str> {
        Some(match self.0 {
            1 => "isA",
            2 => "id",
            3 => "verifiedBy",
            4 => "note",
            5 => "hasRecipient",
            6 => "sskrShare",
            7 => "controller",
            8 => "publicKeys",
            9 => "dereferenceVia",
            10 => "entity",
            11 => "isVersion",
            12 => "holder",
            13 => "issuer",
            15 => "salt",
            16 => "date",
            _ => return None,
        })
    }
}

impl fmt::Display for KnownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}
