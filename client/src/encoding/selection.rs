use std::cell::Cell;

use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};

use super::EncodeError;

/// Field tree of a response type as seen by its `Deserialize` impl.
///
/// Lists and options are transparent: a `Vec<Edge>` field selects the same sub-fields
/// as an `Edge` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    Object(Vec<(&'static str, Shape)>),
}

impl Shape {
    fn render(&self, depth: usize, out: &mut String) {
        let Shape::Object(fields) = self else {
            return;
        };
        for (name, shape) in fields {
            out.push_str(&"  ".repeat(depth));
            out.push_str(name);
            if matches!(shape, Shape::Object(_)) {
                out.push_str(" {\n");
                shape.render(depth + 1, out);
                out.push_str(&"  ".repeat(depth));
                out.push('}');
            }
            out.push('\n');
        }
    }
}

/// Placeholder strings fed to string leaves, tried in order until the leaf accepts one.
const STRING_SAMPLES: &[&str] = &[
    "",
    "00000000-0000-0000-0000-000000000000",
    "1970-01-01T00:00:00Z",
    "1970-01-01",
    "00:00:00",
    "0.0.0.0",
    "0.0.0.0:0",
    "::",
    "0",
];
const INTEGER_SAMPLES: &[u8] = &[0, 1];
const FLOAT_SAMPLES: &[f64] = &[0.0, 1.0];
const CHAR_SAMPLES: &[char] = &['_', '0'];

/// Placeholder choice per leaf, in traversal order, for one tracing pass.
#[derive(Default)]
struct Samples {
    choices: Vec<usize>,
    next_leaf: Cell<usize>,
    /// Ordinal and sample count of the leaf whose visitor rejected its placeholder.
    rejected: Cell<Option<(usize, usize)>>,
}

impl Samples {
    /// Claims the next leaf ordinal and its current sample index.
    fn leaf(&self) -> (usize, usize) {
        let ordinal = self.next_leaf.get();
        self.next_leaf.set(ordinal + 1);
        (ordinal, self.choices.get(ordinal).copied().unwrap_or_default())
    }

    fn visit<T>(&self, ordinal: usize, count: usize, result: Result<T, EncodeError>) -> Result<T, EncodeError> {
        if result.is_err() && self.rejected.get().is_none() {
            self.rejected.set(Some((ordinal, count)));
        }
        result
    }
}

/// Traces the shape `T` deserializes from.
///
/// Supported kinds are structs, `Vec`, `Option`, newtype structs, unit enums and scalars.
/// Scalars that validate their input (parsed strings, non-zero integers) are retried with
/// other placeholders until one is accepted. Maps, tuples, `#[serde(flatten)]`, field
/// aliases and untagged or internally tagged enums have no fixed selection and are rejected.
pub fn selection_shape<T: DeserializeOwned>() -> Result<Shape, EncodeError> {
    let mut choices = Vec::new();
    loop {
        let samples = Samples {
            choices: choices.clone(),
            ..Default::default()
        };
        let mut shape = Shape::Leaf;
        let error = match T::deserialize(ShapeTracer {
            slot: &mut shape,
            samples: &samples,
        }) {
            Ok(_) => return Ok(shape),
            Err(error) => error,
        };

        let Some((ordinal, count)) = samples.rejected.get() else {
            return Err(error);
        };
        if choices.len() <= ordinal {
            choices.resize(ordinal + 1, 0);
        }
        choices[ordinal] += 1;
        if choices[ordinal] >= count {
            return Err(EncodeError::Unsupported("scalar rejecting every placeholder"));
        }
    }
}

/// Renders the GraphQL selection set for `T`, one field per line, without the outer braces.
pub fn encode_selection<T: DeserializeOwned>() -> Result<String, EncodeError> {
    let shape = selection_shape::<T>()?;
    if shape == Shape::Leaf {
        return Err(EncodeError::Unsupported("scalar selection root"));
    }

    let mut out = String::new();
    shape.render(0, &mut out);
    Ok(out)
}

/// Deserializer that feeds placeholder values to the visitor and records the requested shape.
struct ShapeTracer<'a> {
    slot: &'a mut Shape,
    samples: &'a Samples,
}

impl ShapeTracer<'_> {
    fn integer<'de, V, F>(self, visitor: V, visit: F) -> Result<V::Value, EncodeError>
    where
        V: Visitor<'de>,
        F: FnOnce(V, u8) -> Result<V::Value, EncodeError>,
    {
        let (ordinal, choice) = self.samples.leaf();
        let result = visit(visitor, INTEGER_SAMPLES[choice.min(INTEGER_SAMPLES.len() - 1)]);
        self.samples.visit(ordinal, INTEGER_SAMPLES.len(), result)
    }

    fn float<'de, V, F>(self, visitor: V, visit: F) -> Result<V::Value, EncodeError>
    where
        V: Visitor<'de>,
        F: FnOnce(V, f64) -> Result<V::Value, EncodeError>,
    {
        let (ordinal, choice) = self.samples.leaf();
        let result = visit(visitor, FLOAT_SAMPLES[choice.min(FLOAT_SAMPLES.len() - 1)]);
        self.samples.visit(ordinal, FLOAT_SAMPLES.len(), result)
    }

    fn string<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        let (ordinal, choice) = self.samples.leaf();
        let result = visitor.visit_borrowed_str(STRING_SAMPLES[choice.min(STRING_SAMPLES.len() - 1)]);
        self.samples.visit(ordinal, STRING_SAMPLES.len(), result)
    }
}

impl<'de> de::Deserializer<'de> for ShapeTracer<'_> {
    type Error = EncodeError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("self-describing value"))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        visitor.visit_bool(false)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.integer(visitor, |visitor, sample| visitor.visit_i8(sample as i8))
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.integer(visitor, |visitor, sample| visitor.visit_i16(sample.into()))
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.integer(visitor, |visitor, sample| visitor.visit_i32(sample.into()))
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.integer(visitor, |visitor, sample| visitor.visit_i64(sample.into()))
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.integer(visitor, |visitor, sample| visitor.visit_u8(sample.into()))
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.integer(visitor, |visitor, sample| visitor.visit_u16(sample.into()))
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.integer(visitor, |visitor, sample| visitor.visit_u32(sample.into()))
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.integer(visitor, |visitor, sample| visitor.visit_u64(sample.into()))
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.float(visitor, |visitor, sample| visitor.visit_f32(sample as f32))
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.float(visitor, |visitor, sample| visitor.visit_f64(sample))
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        let (ordinal, choice) = self.samples.leaf();
        let result = visitor.visit_char(CHAR_SAMPLES[choice.min(CHAR_SAMPLES.len() - 1)]);
        self.samples.visit(ordinal, CHAR_SAMPLES.len(), result)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        self.string(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("bytes"))
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("bytes"))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value, EncodeError> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, EncodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        visitor.visit_seq(ElementTracer {
            slot: Some(self.slot),
            samples: self.samples,
        })
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("tuple"))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("tuple struct"))
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("map"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, EncodeError> {
        let mut entries: Vec<(&'static str, Shape)> = fields.iter().map(|field| (*field, Shape::Leaf)).collect();
        let value = visitor.visit_seq(FieldTracer {
            entries: &mut entries,
            next: 0,
            samples: self.samples,
        })?;
        *self.slot = Shape::Object(entries);
        Ok(value)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, EncodeError> {
        let variant = *variants.first().ok_or(EncodeError::Unsupported("enum without variants"))?;
        visitor.visit_enum(VariantTracer { variant })
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("identifier"))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, EncodeError> {
        visitor.visit_unit()
    }
}

/// Yields a single traced element; list elements share the list's slot.
struct ElementTracer<'a> {
    slot: Option<&'a mut Shape>,
    samples: &'a Samples,
}

impl<'de> de::SeqAccess<'de> for ElementTracer<'_> {
    type Error = EncodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>, EncodeError> {
        match self.slot.take() {
            Some(slot) => seed
                .deserialize(ShapeTracer {
                    slot,
                    samples: self.samples,
                })
                .map(Some),
            None => Ok(None),
        }
    }
}

/// Struct fields visited in declaration order, which matches the `fields` list serde passes.
struct FieldTracer<'a> {
    entries: &'a mut Vec<(&'static str, Shape)>,
    next: usize,
    samples: &'a Samples,
}

impl<'de> de::SeqAccess<'de> for FieldTracer<'_> {
    type Error = EncodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>, EncodeError> {
        let Some((_, slot)) = self.entries.get_mut(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        seed.deserialize(ShapeTracer {
            slot,
            samples: self.samples,
        })
        .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len() - self.next)
    }
}

struct VariantTracer {
    variant: &'static str,
}

impl<'de> de::EnumAccess<'de> for VariantTracer {
    type Error = EncodeError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self), EncodeError> {
        let identifier: de::value::StrDeserializer<'_, EncodeError> = self.variant.into_deserializer();
        let value = seed.deserialize(identifier)?;
        Ok((value, self))
    }
}

impl<'de> de::VariantAccess<'de> for VariantTracer {
    type Error = EncodeError;

    fn unit_variant(self) -> Result<(), EncodeError> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, _seed: T) -> Result<T::Value, EncodeError> {
        Err(EncodeError::Unsupported("newtype variant"))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("tuple variant"))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, EncodeError> {
        Err(EncodeError::Unsupported("struct variant"))
    }
}
