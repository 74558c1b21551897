use serde::de::{self, Error, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

pub const ALL: &str = "all";

/// A selector value: either everything, or one specific variant of `T`.
/// (De)serialized as the string "all" or the variant's own name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T: Serialize> Serialize for Choice<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Choice::All => serializer.serialize_str(ALL),
            Choice::Only(value) => value.serialize(serializer),
        }
    }
}

struct ChoiceVisitor<T>(PhantomData<T>);

impl<'de, T: FromStr> Visitor<'de> for ChoiceVisitor<T> {
    type Value = Choice<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("\"all\" or a variant name")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v == ALL {
            return Ok(Choice::All);
        }
        v.parse::<T>()
            .map(Choice::Only)
            .map_err(|_| Error::invalid_value(Unexpected::Str(v), &self))
    }
}

impl<'de, T: FromStr> Deserialize<'de> for Choice<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(ChoiceVisitor(PhantomData))
    }
}
